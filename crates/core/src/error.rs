//! Core error types

use thiserror::Error;

/// Core errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Invalid definition for question '{id}': {message}")]
    InvalidDefinition { id: String, message: String },
}

/// Result type alias using the core Error
pub type Result<T> = std::result::Result<T, Error>;
