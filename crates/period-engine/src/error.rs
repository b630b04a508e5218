//! Error types for period-engine operations.
//!
//! Failing to interpret text is not an error: parsers return an empty list
//! and the classifier returns `None`. These variants cover values that are
//! rejected at construction time.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
