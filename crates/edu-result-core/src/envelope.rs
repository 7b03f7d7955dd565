//! Wire bodies for the proxy route

use serde::{Deserialize, Serialize};

/// Request body: the encrypted [`crate::LookupRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedPayload {
    #[serde(rename = "encryptedPayload")]
    pub encrypted_payload: String,
}

/// Response body: the encrypted upstream result text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedResponse {
    #[serde(rename = "encryptedData")]
    pub encrypted_data: String,
}

/// Error body returned on any non-200 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
