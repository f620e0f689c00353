//! Error types for the build pipeline.

use std::path::PathBuf;

/// Result type alias for build operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning, compiling or delivering CSS.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A fatal engine error: unresolved or cyclic references, invalid
    /// definitions, invalid variant combinations.
    #[error(transparent)]
    Core(#[from] styleframe_core::Error),

    /// File I/O error.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid build configuration.
    #[error("Invalid build config '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid content glob pattern.
    #[error("Invalid content pattern: {0}")]
    Glob(#[from] globset::Error),

    /// Virtual module manifest could not be encoded.
    #[error("Manifest encoding error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// The build was cancelled before committing.
    #[error("Build cancelled")]
    Cancelled,

    /// No session has been compiled yet.
    #[error("No compiled session; call compile first")]
    NoSession,

    /// Hot-reload error.
    #[cfg(feature = "hot-reload")]
    #[error("Hot-reload error: {0}")]
    HotReload(String),
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborted a build that may simply be retried.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
