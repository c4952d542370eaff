//! Shell error types
//!
//! Defines all errors that can occur while navigating panels and
//! initializing them.

use thiserror::Error;

/// Errors that can occur in the admin shell
#[derive(Error, Debug)]
pub enum ShellError {
    /// Fetching a panel fragment failed (network error or non-2xx status)
    #[error("Failed to load content from {url}: {reason}")]
    FragmentLoad { url: String, reason: String },

    /// Fetching or decoding dashboard data failed
    ///
    /// The message is shown to the user verbatim.
    #[error("{0}")]
    DataLoad(String),

    /// Embedded JSON in the loaded fragment could not be decoded
    #[error("Embedded data error: {0}")]
    EmbeddedData(String),

    /// Reading or writing persisted navigation state failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// A newer navigation superseded this one before it finished
    #[error("Navigation to {0} was superseded")]
    Superseded(String),
}

impl ShellError {
    /// Whether this error only means a newer navigation took over
    pub fn is_superseded(&self) -> bool {
        matches!(self, ShellError::Superseded(_))
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(err: serde_json::Error) -> Self {
        ShellError::EmbeddedData(err.to_string())
    }
}

/// Result type alias for shell operations
pub type ShellResult<T> = Result<T, ShellError>;
