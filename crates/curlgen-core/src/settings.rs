//! Generation settings for curlgen.
//!
//! The settings are consumed, never owned, by the synthesis engine: they
//! select the output dialect, the file layout, and the values baked into
//! every generated request (base URL, authorization, content type).
//!
//! # Examples
//!
//! ```
//! use curlgen_core::{GeneratorSettings, OutputMode, ScriptDialect};
//!
//! // Use default settings
//! let settings = GeneratorSettings::default();
//! assert_eq!(settings.content_type, "application/json");
//! assert_eq!(settings.dialect, ScriptDialect::Interactive);
//!
//! // Create custom settings
//! let custom = GeneratorSettings::builder()
//!     .dialect(ScriptDialect::Shell)
//!     .output_mode(OutputMode::Combined)
//!     .base_url("https://api.example.com")
//!     .build();
//! assert_eq!(custom.dialect.extension(), "sh");
//! ```

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default `Content-Type` used when none is configured.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Script output syntax.
///
/// # Examples
///
/// ```
/// use curlgen_core::ScriptDialect;
///
/// let dialect: ScriptDialect = "bash".parse().unwrap();
/// assert_eq!(dialect, ScriptDialect::Shell);
/// assert_eq!(dialect.extension(), "sh");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptDialect {
    /// PowerShell-flavoured scripts: typed mandatory `param()` block,
    /// backtick line continuation, single-quoted arguments.
    #[default]
    #[serde(alias = "powershell")]
    Interactive,
    /// Bash-flavoured scripts: plain variable initialization, backslash
    /// line continuation, double-quoted arguments.
    #[serde(alias = "bash")]
    Shell,
}

impl ScriptDialect {
    /// Returns the file extension (without the dot) for this dialect.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Interactive => "ps1",
            Self::Shell => "sh",
        }
    }

    /// Returns the string representation of the dialect.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::Shell => "shell",
        }
    }
}

impl fmt::Display for ScriptDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptDialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interactive" | "powershell" | "ps1" => Ok(Self::Interactive),
            "shell" | "bash" | "sh" => Ok(Self::Shell),
            _ => Err(Error::InvalidArgument(format!(
                "invalid script dialect: '{s}' (expected: interactive or shell)"
            ))),
        }
    }
}

/// How generated scripts are laid out on disk.
///
/// # Examples
///
/// ```
/// use curlgen_core::OutputMode;
///
/// assert_eq!(OutputMode::default(), OutputMode::PerOperation);
/// assert_eq!("combined".parse::<OutputMode>().unwrap(), OutputMode::Combined);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// One script file per operation.
    #[default]
    PerOperation,
    /// All operations concatenated into a single script file.
    Combined,
}

impl OutputMode {
    /// Returns the string representation of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PerOperation => "per-operation",
            Self::Combined => "combined",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per-operation" | "per_operation" | "split" => Ok(Self::PerOperation),
            "combined" | "one-file" | "single" => Ok(Self::Combined),
            _ => Err(Error::InvalidArgument(format!(
                "invalid output mode: '{s}' (expected: per-operation or combined)"
            ))),
        }
    }
}

/// Settings for one generation run.
///
/// # Examples
///
/// ```
/// use curlgen_core::GeneratorSettings;
///
/// let settings = GeneratorSettings {
///     authorization_header: Some("Bearer token".to_string()),
///     ..Default::default()
/// };
///
/// assert_eq!(settings.authorization(), Some("Bearer token"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Prefix for every request URL.
    ///
    /// Concatenated with the first server URL declared by the document.
    /// Default: None
    pub base_url: Option<String>,

    /// Value of the `Authorization` header added to every request.
    ///
    /// Blank values are treated as absent.
    /// Default: None
    pub authorization_header: Option<String>,

    /// Preferred `Content-Type`.
    ///
    /// The interactive dialect sends it verbatim and attaches a body only
    /// when the operation declares a matching media type. The shell dialect
    /// negotiates its own type from the request body.
    /// Default: `application/json`
    pub content_type: String,

    /// Output dialect.
    /// Default: `Interactive`
    pub dialect: ScriptDialect,

    /// File layout.
    /// Default: `PerOperation`
    pub output_mode: OutputMode,

    /// Location the API description was loaded from.
    ///
    /// Used to complete relative server URLs when the document was fetched
    /// over HTTP.
    /// Default: None
    pub source_location: Option<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            authorization_header: None,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            dialect: ScriptDialect::default(),
            output_mode: OutputMode::default(),
            source_location: None,
        }
    }
}

impl GeneratorSettings {
    /// Creates a new settings builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use curlgen_core::{GeneratorSettings, ScriptDialect};
    ///
    /// let settings = GeneratorSettings::builder()
    ///     .dialect(ScriptDialect::Shell)
    ///     .content_type("application/xml")
    ///     .build();
    ///
    /// assert_eq!(settings.content_type, "application/xml");
    /// ```
    #[must_use]
    pub fn builder() -> GeneratorSettingsBuilder {
        GeneratorSettingsBuilder::new()
    }

    /// Returns the authorization header value if it is non-blank.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.authorization_header
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use curlgen_core::GeneratorSettings;
    ///
    /// assert!(GeneratorSettings::default().validate().is_ok());
    ///
    /// let mut invalid = GeneratorSettings::default();
    /// invalid.content_type = " ".to_string();
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), Error> {
        if self.content_type.trim().is_empty() {
            return Err(Error::ConfigError {
                message: "content type cannot be blank".to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for `GeneratorSettings`.
///
/// # Examples
///
/// ```
/// use curlgen_core::{GeneratorSettings, OutputMode};
///
/// let settings = GeneratorSettings::builder()
///     .authorization_header("Bearer abc")
///     .output_mode(OutputMode::Combined)
///     .source_location("https://petstore3.swagger.io/api/v3/openapi.json")
///     .build();
///
/// assert_eq!(settings.output_mode, OutputMode::Combined);
/// ```
#[derive(Debug)]
pub struct GeneratorSettingsBuilder {
    settings: GeneratorSettings,
}

impl GeneratorSettingsBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: GeneratorSettings::default(),
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.settings.base_url = Some(url.into());
        self
    }

    /// Sets the authorization header value.
    #[must_use]
    pub fn authorization_header(mut self, value: impl Into<String>) -> Self {
        self.settings.authorization_header = Some(value.into());
        self
    }

    /// Sets the preferred content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.settings.content_type = content_type.into();
        self
    }

    /// Sets the output dialect.
    #[must_use]
    pub const fn dialect(mut self, dialect: ScriptDialect) -> Self {
        self.settings.dialect = dialect;
        self
    }

    /// Sets the output mode.
    #[must_use]
    pub const fn output_mode(mut self, mode: OutputMode) -> Self {
        self.settings.output_mode = mode;
        self
    }

    /// Sets the location the document was loaded from.
    #[must_use]
    pub fn source_location(mut self, location: impl Into<String>) -> Self {
        self.settings.source_location = Some(location.into());
        self
    }

    /// Builds the settings.
    #[must_use]
    pub fn build(self) -> GeneratorSettings {
        self.settings
    }
}

impl Default for GeneratorSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
