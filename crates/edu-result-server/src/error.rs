//! Proxy error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use edu_result_core::{CryptoError, ErrorResponse};
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Missing encrypted payload")]
    MissingPayload,

    #[error("Invalid payload format")]
    InvalidPayloadFormat,

    #[error("Missing required parameters")]
    MissingParameters,

    #[error("Failed to fetch from external API")]
    Upstream { status: u16 },

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Stable code used in logs and metric labels. Never sent to callers.
    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::MissingPayload => "MISSING_PAYLOAD",
            ProxyError::InvalidPayloadFormat => "INVALID_PAYLOAD_FORMAT",
            ProxyError::MissingParameters => "MISSING_PARAMETERS",
            ProxyError::Upstream { .. } => "UPSTREAM_ERROR",
            ProxyError::Crypto(_) => "CRYPTO_ERROR",
            ProxyError::Http(_) => "HTTP_ERROR",
            ProxyError::Json(_) => "JSON_ERROR",
            ProxyError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingPayload => StatusCode::BAD_REQUEST,
            ProxyError::InvalidPayloadFormat => StatusCode::BAD_REQUEST,
            ProxyError::MissingParameters => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::Crypto(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body
    fn public_message(&self) -> String {
        match self {
            ProxyError::MissingPayload
            | ProxyError::InvalidPayloadFormat
            | ProxyError::MissingParameters
            | ProxyError::Upstream { .. } => self.to_string(),
            _ => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = self.code(), error = %self, "Error fetching result");
        } else {
            tracing::debug!(code = self.code(), status = status.as_u16(), "Rejected lookup");
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
