//! Error types for scls-pre
//!
//! Every failure crosses the method-call bridge as the single code
//! `PreprocessingError` plus the error's display message.

use std::path::PathBuf;
use thiserror::Error;

/// Error code reported to bridge callers for any preprocessing failure
pub const PREPROCESSING_ERROR: &str = "PreprocessingError";

#[derive(Error, Debug)]
pub enum PreprocessError {
    /// No background remover has been installed
    #[error("ImagePreprocessor not initialized")]
    NotInitialized,

    /// Missing method-call argument
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Image file could not be read or decoded
    #[error("Cannot decode image: {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Background removal returned no image
    #[error("Failed to remove background: {0}")]
    BackgroundRemoval(String),

    /// Output image could not be written
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Zero-sized image or target
    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A blocking worker panicked or was cancelled
    #[error("Preprocessing task failed: {0}")]
    Task(String),
}

impl PreprocessError {
    /// Bridge error code
    pub fn code(&self) -> &'static str {
        PREPROCESSING_ERROR
    }
}

impl From<tokio::task::JoinError> for PreprocessError {
    fn from(err: tokio::task::JoinError) -> Self {
        PreprocessError::Task(err.to_string())
    }
}

/// Convenience Result type using PreprocessError
pub type Result<T> = std::result::Result<T, PreprocessError>;
