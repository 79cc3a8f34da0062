//! Error types for fountain-core.

use thiserror::Error;

/// Error type for fountain-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Project parse error: {0}")]
    ProjectParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ProjectParse(e.to_string())
    }
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
