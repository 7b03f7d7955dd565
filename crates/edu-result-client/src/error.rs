//! Client error types

use edu_result_core::CryptoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The proxy answered with a non-2xx status. 400 means the lookup was
    /// rejected, anything else is a server or upstream fault.
    #[error("Failed to fetch result (status {status})")]
    FetchFailed { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether the proxy rejected the lookup parameters themselves
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ClientError::FetchFailed { status: 400 })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
