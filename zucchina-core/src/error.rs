//! Error types for Zucchina

use thiserror::Error;

/// Result type for Zucchina operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Zucchina
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document fetch error
    #[error("Fetch error for {location}: {reason}")]
    Fetch { location: String, reason: String },

    /// Location token could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a fetch error for `location`
    pub fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
