use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for gather-packages operations
#[derive(Error, Debug)]
pub enum GatherError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Failed to stage '{}': {source}", .path.display())]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gather-packages
pub type Result<T> = std::result::Result<T, GatherError>;

impl GatherError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GatherError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GatherError::Version(msg.into())
    }

    /// Create an artifact error with context
    pub fn artifact(msg: impl Into<String>) -> Self {
        GatherError::Artifact(msg.into())
    }

    /// Wrap an I/O failure that happened while staging `path`
    pub fn stage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GatherError::Stage {
            path: path.into(),
            source,
        }
    }
}
