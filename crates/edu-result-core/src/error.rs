//! Cipher error types

use thiserror::Error;

/// Errors from the envelope cipher.
///
/// Failures display only as "Failed to encrypt data" or "Failed to decrypt
/// data"; the cause is logged at debug level.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption key is empty")]
    EmptyKey,

    #[error("Failed to encrypt data")]
    Encrypt,

    #[error("Failed to decrypt data")]
    Decrypt,

    #[error("Failed to encrypt data")]
    Serialize(#[source] serde_json::Error),
}
