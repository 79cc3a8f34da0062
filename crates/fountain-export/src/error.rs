//! Error types for fountain-export

use std::io;
use thiserror::Error;

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Manifest could not be serialized
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Invalid export options
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Manifest(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_becomes_manifest_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ExportError::from(err);
        assert!(matches!(err, ExportError::Manifest(_)));
        assert!(err.to_string().starts_with("Manifest error: "));
    }

    #[test]
    fn test_io_error_display() {
        let err = ExportError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(matches!(err, ExportError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: missing");
    }
}
