//! Error types for the draupnir library.
//!
//! Every fatal error class carries a distinct process exit code; per-file
//! parse failures are the only recoverable class and are handled at the
//! preprocessing layer rather than surfaced.

use std::io;

use thiserror::Error;

/// Main result type for draupnir operations.
pub type Result<T> = std::result::Result<T, DraupnirError>;

/// Comprehensive error type for all draupnir operations.
#[derive(Error, Debug)]
pub enum DraupnirError {
    /// Configuration errors (invalid option values, unknown language)
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Source tree errors (unreadable root, file read failures)
    #[error("Source error: {message}")]
    Source {
        /// Error description
        message: String,
        /// Underlying I/O error
        #[source]
        source: Option<io::Error>,
    },

    /// Parsing errors for a single file; recoverable at the preprocessor
    #[error("Parse error in {language}: {message}")]
    Parse {
        /// Language being parsed
        language: String,
        /// Error description
        message: String,
        /// File path where the error occurred
        file_path: Option<String>,
    },

    /// Output I/O errors (pair file, code-blocks file)
    #[error("I/O error: {message}")]
    Io {
        /// Error description
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// External interrupt (SIGINT); buffers are flushed before surfacing
    #[error("interrupted")]
    Interrupted,

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
    },
}

impl DraupnirError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new source-tree error
    pub fn source(message: impl Into<String>, source: io::Error) -> Self {
        Self::Source {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a new parse error
    pub fn parse(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            file_path: None,
        }
    }

    /// Create a new parse error with file context
    pub fn parse_in_file(
        language: impl Into<String>,
        message: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            file_path: Some(file_path.into()),
        }
    }

    /// Create a new output I/O error
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Process exit code for this error class.
    ///
    /// `0` is success; parse errors never become fatal so they share the
    /// internal-error code if one ever escapes.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 1,
            Self::Source { .. } => 2,
            Self::Io { .. } => 3,
            Self::Interrupted => 130,
            Self::Parse { .. } | Self::Internal { .. } => 1,
        }
    }

    /// Whether the preprocessor may recover from this error by skipping the file.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

impl From<serde_yaml::Error> for DraupnirError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config(format!("invalid YAML configuration: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = DraupnirError::config("negative gram size");
        assert!(matches!(err, DraupnirError::Config { .. }));

        let err = DraupnirError::parse("java", "unbalanced braces");
        assert!(matches!(err, DraupnirError::Parse { .. }));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(DraupnirError::config("x").exit_code(), 1);
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        assert_eq!(DraupnirError::source("x", io_err).exit_code(), 2);
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(DraupnirError::io("x", io_err).exit_code(), 3);
        assert_eq!(DraupnirError::Interrupted.exit_code(), 130);
    }

    #[test]
    fn test_recoverability() {
        assert!(DraupnirError::parse("python", "bad file").is_recoverable());
        assert!(!DraupnirError::config("bad option").is_recoverable());
    }
}
