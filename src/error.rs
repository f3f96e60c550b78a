//! Error type shared by the constructor, the annealer and instance parsing.

use thiserror::Error;

/// Errors raised by tour construction and search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TspError {
    /// The caller supplied data the core cannot work with (e.g. no points).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An [`AnnealConfig`](crate::sa::AnnealConfig) failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A coordinate line could not be parsed into a point.
    #[error("cannot parse point: {0}")]
    ParsePoint(String),
}

impl TspError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TspError>;
