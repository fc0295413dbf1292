//! Error types for curlgen.
//!
//! The synthesis engine itself never fails: name resolution and sample
//! synthesis degrade to fallbacks. The variants here belong to the
//! collaborators around it (document acquisition, configuration, output).
//!
//! # Examples
//!
//! ```
//! use curlgen_core::{Error, Result};
//!
//! fn require_source(source: &str) -> Result<()> {
//!     if source.is_empty() {
//!         return Err(Error::InvalidArgument("source cannot be empty".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! let err = require_source("").unwrap_err();
//! assert!(err.is_invalid_argument());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for curlgen.
///
/// All library crates in the workspace report failures through this type.
#[derive(Error, Debug)]
pub enum Error {
    /// The API description could not be acquired.
    ///
    /// Raised when the file does not exist or cannot be read, or when the
    /// HTTP request for a remote description fails.
    #[error("API description unavailable: {source_location}")]
    DocumentUnavailable {
        /// File path or URL that was requested
        source_location: String,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The API description was acquired but is not usable.
    ///
    /// Raised when the content is neither JSON nor YAML, or when it does
    /// not describe an OpenAPI 3.x or Swagger 2.0 document.
    #[error("Invalid API description {source_location}: {reason}")]
    DocumentInvalid {
        /// File path or URL of the document
        source_location: String,
        /// Description of the problem
        reason: String,
    },

    /// Configuration error.
    ///
    /// Raised when a configuration file is malformed or contains
    /// contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Filesystem error while persisting generated scripts.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if the API description could not be acquired.
    ///
    /// # Examples
    ///
    /// ```
    /// use curlgen_core::Error;
    ///
    /// let err = Error::DocumentUnavailable {
    ///     source_location: "petstore.json".to_string(),
    ///     source: "file not found".into(),
    /// };
    /// assert!(err.is_document_unavailable());
    /// ```
    #[must_use]
    pub const fn is_document_unavailable(&self) -> bool {
        matches!(self, Self::DocumentUnavailable { .. })
    }

    /// Returns `true` if the API description was unusable.
    ///
    /// # Examples
    ///
    /// ```
    /// use curlgen_core::Error;
    ///
    /// let err = Error::DocumentInvalid {
    ///     source_location: "petstore.json".to_string(),
    ///     reason: "missing 'paths'".to_string(),
    /// };
    /// assert!(err.is_document_invalid());
    /// ```
    #[must_use]
    pub const fn is_document_invalid(&self) -> bool {
        matches!(self, Self::DocumentInvalid { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` if this is a filesystem error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result type alias for curlgen operations.
///
/// # Examples
///
/// ```
/// use curlgen_core::{Error, Result};
///
/// fn parse_port(value: &str) -> Result<u16> {
///     value
///         .parse()
///         .map_err(|_| Error::InvalidArgument(format!("not a port: {value}")))
/// }
///
/// assert!(parse_port("8080").is_ok());
/// assert!(parse_port("http").is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_unavailable_detection() {
        let err = Error::DocumentUnavailable {
            source_location: "https://example.com/openapi.json".to_string(),
            source: "connection refused".into(),
        };
        assert!(err.is_document_unavailable());
        assert!(!err.is_document_invalid());
    }

    #[test]
    fn test_document_invalid_detection() {
        let err = Error::DocumentInvalid {
            source_location: "petstore.yaml".to_string(),
            reason: "not an OpenAPI document".to_string(),
        };
        assert!(err.is_document_invalid());
        assert!(!err.is_document_unavailable());
    }

    #[test]
    fn test_config_error_detection() {
        let err = Error::ConfigError {
            message: "unknown dialect".to_string(),
        };
        assert!(err.is_config_error());
        assert!(!err.is_io_error());
    }

    #[test]
    fn test_io_error_display_includes_path() {
        let err = Error::Io {
            path: PathBuf::from("/tmp/out/GetPets.ps1"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_io_error());
        let display = err.to_string();
        assert!(display.contains("GetPets.ps1"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::DocumentInvalid {
            source_location: "api.json".to_string(),
            reason: "unsupported version 1.2".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("Invalid API description"));
        assert!(display.contains("api.json"));
        assert!(display.contains("unsupported version 1.2"));
    }
}
