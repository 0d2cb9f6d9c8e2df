//! Error types for the consumption pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for consumption operations.
pub type ConsumeResult<T> = Result<T, ConsumeError>;

/// Errors that can occur during consumption.
#[derive(Error, Debug)]
pub enum ConsumeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Db(#[from] docvault_db::DbError),

    #[error("Encryption error: {0}")]
    Crypto(#[from] docvault_crypto::CryptoError),

    #[error("Extraction failed for {}: {message}", .path.display())]
    Extraction { path: PathBuf, message: String },

    #[error("File name does not follow the consumption grammar: {}", .0.display())]
    InvalidFilename(PathBuf),
}
