//! Error types for scls-lp
//!
//! Defines crate-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for the landing page interaction core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors surfaced from scls-common
    #[error(transparent)]
    Common(#[from] scls_common::Error),

    /// Invalid parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience Result type using scls-lp Error
pub type Result<T> = std::result::Result<T, Error>;
