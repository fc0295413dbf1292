//! CLI-facing types shared across the workspace.
//!
//! # Examples
//!
//! ```
//! use curlgen_core::cli::{ExitCode, OutputFormat, SourceLocation};
//!
//! let format = OutputFormat::Pretty;
//! assert_eq!(format.as_str(), "pretty");
//!
//! let code = ExitCode::SUCCESS;
//! assert_eq!(code.as_i32(), 0);
//!
//! let source = SourceLocation::new("https://petstore3.swagger.io/api/v3/openapi.json").unwrap();
//! assert!(source.is_remote());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// CLI output format for command summaries.
///
/// Generated scripts are always written as files; the format only affects
/// what the CLI prints about the run.
///
/// # Examples
///
/// ```
/// use curlgen_core::cli::OutputFormat;
///
/// let format: OutputFormat = "json".parse().unwrap();
/// assert_eq!(format, OutputFormat::Json);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// JSON output for machine parsing
    Json,
    /// Plain text output for scripts
    Text,
    /// Colored output for human reading
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(crate::Error::InvalidArgument(format!(
                "invalid output format: '{s}' (expected: json, text, or pretty)"
            ))),
        }
    }
}

/// Process exit code.
///
/// # Examples
///
/// ```
/// use curlgen_core::cli::ExitCode;
///
/// assert!(ExitCode::SUCCESS.is_success());
/// assert!(!ExitCode::DOCUMENT_ERROR.is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// General error (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Invalid input: bad arguments or an unusable API description (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// The API description could not be acquired (exit code 3).
    pub const DOCUMENT_ERROR: Self = Self(3);

    /// Creates an exit code from an integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Maps a library error to the exit code reported for it.
    ///
    /// # Examples
    ///
    /// ```
    /// use curlgen_core::Error;
    /// use curlgen_core::cli::ExitCode;
    ///
    /// let err = Error::InvalidArgument("empty source".to_string());
    /// assert_eq!(ExitCode::for_error(&err), ExitCode::INVALID_INPUT);
    /// ```
    #[must_use]
    pub const fn for_error(error: &crate::Error) -> Self {
        if error.is_document_unavailable() {
            Self::DOCUMENT_ERROR
        } else if error.is_document_invalid() || error.is_invalid_argument() {
            Self::INVALID_INPUT
        } else {
            Self::ERROR
        }
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated location of an API description.
///
/// Values starting with `http://` or `https://` are remote; everything
/// else is a filesystem path.
///
/// # Examples
///
/// ```
/// use curlgen_core::cli::SourceLocation;
///
/// let local = SourceLocation::new("  ./petstore.yaml ").unwrap();
/// assert!(!local.is_remote());
/// assert_eq!(local.as_str(), "./petstore.yaml");
///
/// assert!(SourceLocation::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceLocation {
    /// HTTP(S) URL
    Remote(String),
    /// Filesystem path
    Local(PathBuf),
}

impl SourceLocation {
    /// Creates a validated source location.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty after trimming or contains
    /// control characters.
    pub fn new(s: impl Into<String>) -> crate::Result<Self> {
        let s = s.into();

        if s.chars().any(char::is_control) {
            return Err(crate::Error::InvalidArgument(
                "source location cannot contain control characters".to_string(),
            ));
        }

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::InvalidArgument(
                "source location cannot be empty".to_string(),
            ));
        }

        if is_http(trimmed) {
            Ok(Self::Remote(trimmed.to_string()))
        } else {
            Ok(Self::Local(PathBuf::from(trimmed)))
        }
    }

    /// Returns `true` for HTTP(S) locations.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Returns the filesystem path for local locations.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path),
            Self::Remote(_) => None,
        }
    }

    /// Returns the location as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Remote(url) => url,
            Self::Local(path) => path.to_str().unwrap_or_default(),
        }
    }
}

fn is_http(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

impl FromStr for SourceLocation {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
