use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for grelly operations
#[derive(Error, Debug)]
pub enum GrellyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository access failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository access failed: {0}")]
    Repository(String),

    #[error("Release conflict: {0}")]
    ReleaseConflict(String),

    #[error("Changelog update failed for {}: {source} (tag '{tag}' was already created)", path.display())]
    ChangelogIo {
        path: PathBuf,
        tag: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in grelly
pub type Result<T> = std::result::Result<T, GrellyError>;

impl GrellyError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GrellyError::Config(msg.into())
    }

    /// Create a repository access error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        GrellyError::Repository(msg.into())
    }

    /// Create a release conflict error with context
    pub fn release_conflict(msg: impl Into<String>) -> Self {
        GrellyError::ReleaseConflict(msg.into())
    }

    /// Whether the error means the repository could not be read
    pub fn is_repository_access(&self) -> bool {
        matches!(self, GrellyError::Git(_) | GrellyError::Repository(_))
    }

    /// Process exit code for this error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            GrellyError::Config(_) => 2,
            GrellyError::Git(_) | GrellyError::Repository(_) => 3,
            GrellyError::ReleaseConflict(_) => 4,
            GrellyError::ChangelogIo { .. } => 5,
            GrellyError::Io(_) => 1,
        }
    }
}
