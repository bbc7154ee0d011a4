//! Custom error types for onsave.

use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for onsave operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse RON file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Failed to serialize RON: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Terminal error: {0}")]
    Pty(String),

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Invalid config file {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

/// Result type alias using our custom Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        let display = format!("{}", err);
        assert!(display.contains("IO error"));
    }

    #[test]
    fn test_error_display_pty() {
        let err = Error::Pty("openpty failed".to_string());
        let display = format!("{}", err);
        assert!(display.contains("Terminal error"));
        assert!(display.contains("openpty failed"));
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config {
            path: PathBuf::from("/etc/onsave/config.ron"),
            reason: "expected a struct".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("Invalid config file"));
        assert!(display.contains("/etc/onsave/config.ron"));
        assert!(display.contains("expected a struct"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_parse_error_from() {
        let parse_err = ron::from_str::<Vec<String>>("[1, ").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
