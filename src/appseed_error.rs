//! Unified error type for appseed operations.
//!
//! `AppseedError` gives every failure that can reach the command line a
//! category, a structured error code, a suggested exit code and a serde
//! representation for structured logs. Leaf modules keep their own small
//! `thiserror` types and convert at the boundary.
//!
//! # Error Codes
//!
//! - E001-E009: I/O and filesystem errors
//! - E020-E029: Configuration errors
//! - E040-E049: CLI errors
//! - E050-E059: Validation errors
//! - E060-E069: Server errors
//!
//! # Example
//!
//! ```rust
//! use appseed::appseed_error::{AppseedError, ErrorCode};
//!
//! let err = AppseedError::config_with_field("port must be non-zero", "server.port");
//! assert_eq!(err.code(), ErrorCode::CONFIG_INVALID);
//! assert!(err.is_user_fixable());
//! ```

use crate::shape::KindParseError;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// I/O error - file not found
    pub const IO_FILE_NOT_FOUND: ErrorCode = ErrorCode("E001");
    /// I/O error - permission denied
    pub const IO_PERMISSION_DENIED: ErrorCode = ErrorCode("E002");
    /// I/O error - generic
    pub const IO_GENERIC: ErrorCode = ErrorCode("E009");

    /// Config error - invalid value
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");
    /// Config error - unparsable file
    pub const CONFIG_PARSE: ErrorCode = ErrorCode("E021");
    /// Config error - file already exists
    pub const CONFIG_EXISTS: ErrorCode = ErrorCode("E022");

    /// CLI error - invalid argument
    pub const CLI_INVALID_ARG: ErrorCode = ErrorCode("E042");

    /// Validation error - generic
    pub const VALIDATION_GENERIC: ErrorCode = ErrorCode("E050");
    /// Validation error - unknown argument kind
    pub const VALIDATION_ARG_KIND: ErrorCode = ErrorCode("E051");

    /// Server error - could not bind the listen address
    pub const SERVER_BIND: ErrorCode = ErrorCode("E060");
    /// Server error - document root missing or not a directory
    pub const SERVER_ROOT: ErrorCode = ErrorCode("E061");
    /// Server error - generic
    pub const SERVER_GENERIC: ErrorCode = ErrorCode("E069");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum AppseedError {
    /// I/O and filesystem errors.
    Io {
        code: ErrorCode,
        message: String,
        path: Option<PathBuf>,
        source: Option<Arc<std::io::Error>>,
    },

    /// Configuration errors.
    Config {
        code: ErrorCode,
        message: String,
        /// Dotted field name, e.g. `server.port`.
        field: Option<String>,
        path: Option<PathBuf>,
    },

    /// CLI argument errors.
    Cli {
        code: ErrorCode,
        message: String,
        arg: Option<String>,
    },

    /// Validation errors (may contain multiple issues).
    Validation {
        code: ErrorCode,
        count: usize,
        errors: Vec<String>,
    },

    /// Static server errors.
    Server {
        code: ErrorCode,
        message: String,
        /// Listen address or document root involved.
        target: Option<String>,
    },
}

impl AppseedError {
    // ==========================================================================
    // Constructor Methods
    // ==========================================================================

    #[must_use]
    pub fn from_io_error(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::IO_FILE_NOT_FOUND,
            std::io::ErrorKind::PermissionDenied => ErrorCode::IO_PERMISSION_DENIED,
            _ => ErrorCode::IO_GENERIC,
        };
        Self::Io {
            code,
            message: err.to_string(),
            path,
            source: Some(Arc::new(err)),
        }
    }

    #[must_use]
    pub fn config_with_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_INVALID,
            message: message.into(),
            field: Some(field.into()),
            path: None,
        }
    }

    #[must_use]
    pub fn config_parse(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_PARSE,
            message: message.into(),
            field: None,
            path: Some(path.into()),
        }
    }

    #[must_use]
    pub fn config_exists(path: impl Into<PathBuf>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_EXISTS,
            message: "Configuration file already exists. Use --force to overwrite.".to_string(),
            field: None,
            path: Some(path.into()),
        }
    }

    #[must_use]
    pub fn cli_invalid_arg(arg: impl Into<String>, reason: impl Into<String>) -> Self {
        let arg_str = arg.into();
        Self::Cli {
            code: ErrorCode::CLI_INVALID_ARG,
            message: format!("Invalid argument '{}': {}", arg_str, reason.into()),
            arg: Some(arg_str),
        }
    }

    #[must_use]
    pub fn validations(errors: Vec<String>) -> Self {
        Self::Validation {
            code: ErrorCode::VALIDATION_GENERIC,
            count: errors.len(),
            errors,
        }
    }

    #[must_use]
    pub fn server_bind(addr: impl Into<String>, err: &std::io::Error) -> Self {
        let addr = addr.into();
        Self::Server {
            code: ErrorCode::SERVER_BIND,
            message: format!("Failed to bind {}: {}", addr, err),
            target: Some(addr),
        }
    }

    #[must_use]
    pub fn server_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::Server {
            code: ErrorCode::SERVER_ROOT,
            message: format!("Document root {} is not a directory", root.display()),
            target: Some(root.display().to_string()),
        }
    }

    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            code: ErrorCode::SERVER_GENERIC,
            message: message.into(),
            target: None,
        }
    }

    // ==========================================================================
    // Accessor Methods
    // ==========================================================================

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io { code, .. }
            | Self::Config { code, .. }
            | Self::Cli { code, .. }
            | Self::Validation { code, .. }
            | Self::Server { code, .. } => *code,
        }
    }

    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io { .. } => "I/O",
            Self::Config { .. } => "Config",
            Self::Cli { .. } => "CLI",
            Self::Validation { .. } => "Validation",
            Self::Server { .. } => "Server",
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Io { message, .. }
            | Self::Config { message, .. }
            | Self::Cli { message, .. }
            | Self::Server { message, .. } => message,
            Self::Validation { errors, .. } => errors.first().map_or("Validation failed", |s| s),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::Config { path, .. } => path.as_ref(),
            _ => None,
        }
    }

    // ==========================================================================
    // Classification Methods
    // ==========================================================================

    /// Errors the user can fix by changing config, arguments or input.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        match self {
            Self::Config { .. } | Self::Cli { .. } | Self::Validation { .. } => true,
            Self::Server { code, .. } => *code == ErrorCode::SERVER_ROOT,
            Self::Io { .. } => false,
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cli { .. } => 2,
            Self::Config { .. } => 3,
            Self::Validation { .. } => 4,
            Self::Server { .. } => 5,
            Self::Io { .. } => 1,
        }
    }
}

impl std::fmt::Display for AppseedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                code,
                message,
                path,
                ..
            } => {
                write!(f, "[{}] I/O error: {}", code, message)?;
                if let Some(p) = path {
                    write!(f, " (path: {})", p.display())?;
                }
                Ok(())
            }
            Self::Config {
                code,
                message,
                field,
                path,
            } => {
                write!(f, "[{}] Configuration error: {}", code, message)?;
                if let Some(fld) = field {
                    write!(f, " (field: {})", fld)?;
                }
                if let Some(p) = path {
                    write!(f, " (file: {})", p.display())?;
                }
                Ok(())
            }
            Self::Cli { code, message, .. } => write!(f, "[{}] CLI error: {}", code, message),
            Self::Validation {
                code,
                count,
                errors,
            } => {
                write!(f, "[{}] Validation failed with {} error(s)", code, count)?;
                for (i, err) in errors.iter().take(3).enumerate() {
                    write!(f, "\n  {}. {}", i + 1, err)?;
                }
                if *count > 3 {
                    write!(f, "\n  ... and {} more", count - 3)?;
                }
                Ok(())
            }
            Self::Server { code, message, .. } => write!(f, "[{}] Server error: {}", code, message),
        }
    }
}

impl std::error::Error for AppseedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl Serialize for AppseedError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("AppseedError", 4)?;
        state.serialize_field("code", &self.code().as_str())?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("user_fixable", &self.is_user_fixable())?;
        state.end()
    }
}

impl From<std::io::Error> for AppseedError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(err, None)
    }
}

impl From<KindParseError> for AppseedError {
    fn from(err: KindParseError) -> Self {
        Self::Validation {
            code: ErrorCode::VALIDATION_ARG_KIND,
            count: 1,
            errors: vec![err.to_string()],
        }
    }
}

impl From<toml::de::Error> for AppseedError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_PARSE,
            message: err.to_string(),
            field: None,
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AppseedError::from_io_error(io_err, Some(PathBuf::from("/srv/index.html")));
        assert_eq!(err.code(), ErrorCode::IO_FILE_NOT_FOUND);
        assert_eq!(err.category(), "I/O");
        assert_eq!(err.path(), Some(&PathBuf::from("/srv/index.html")));
        assert!(!err.is_user_fixable());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error_with_field() {
        let err = AppseedError::config_with_field("must be non-zero", "server.port");
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID);
        assert!(err.to_string().contains("(field: server.port)"));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_kind_parse_error_becomes_validation() {
        let err: AppseedError = KindParseError("symbol".to_string()).into();
        assert_eq!(err.code(), ErrorCode::VALIDATION_ARG_KIND);
        assert!(err.message().contains("symbol"));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_server_root_is_user_fixable() {
        assert!(AppseedError::server_root("/missing").is_user_fixable());
        assert!(!AppseedError::server("boom").is_user_fixable());
    }

    #[test]
    fn test_validation_display_truncates() {
        let err = AppseedError::validations((1..=5).map(|i| format!("Error {}", i)).collect());
        let display = err.to_string();
        assert!(display.contains("5 error(s)"));
        assert!(display.contains("Error 3"));
        assert!(!display.contains("Error 4"));
        assert!(display.contains("and 2 more"));
    }

    #[test]
    fn test_error_serialization() {
        let err = AppseedError::from_io_error(std::io::Error::other("Test error"), None);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":\"E009\""));
        assert!(json.contains("\"category\":\"I/O\""));
        assert!(json.contains("\"user_fixable\":false"));
    }

    #[test]
    fn test_into_anyhow() {
        let err = AppseedError::cli_invalid_arg("--port", "not a number");
        let anyhow_err: anyhow::Error = err.into();
        assert!(anyhow_err.to_string().contains("Invalid argument '--port'"));
    }
}
