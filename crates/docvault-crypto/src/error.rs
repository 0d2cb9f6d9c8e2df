//! Encryption error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed")]
    Encryption,

    #[error("Decryption failed (wrong passphrase or corrupted artifact)")]
    Decryption,
}

pub type CryptoResult<T> = Result<T, CryptoError>;
