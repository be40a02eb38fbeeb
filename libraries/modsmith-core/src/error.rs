//! Core error types for Modsmith

use thiserror::Error;

/// Result type alias using `ModsmithError`
pub type Result<T> = std::result::Result<T, ModsmithError>;

/// Error raised by collaborators (package parser, asset copy, install, save)
#[derive(Error, Debug)]
pub enum ModsmithError {
    /// Domain failure whose message is meant to be shown to the user as-is
    #[error("{0}")]
    Installation(String),

    /// Operation lock errors
    #[error("Operation lock error: {0}")]
    Lock(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ModsmithError {
    /// Create an installation error
    pub fn installation(msg: impl Into<String>) -> Self {
        Self::Installation(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an uncategorised error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this is a domain failure whose message is user-facing
    pub fn is_installation(&self) -> bool {
        matches!(self, Self::Installation(_))
    }
}
