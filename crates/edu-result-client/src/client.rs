//! Lookup client for the result proxy

use std::time::Duration;

use edu_result_core::{
    Cipher, DecryptResult, EncryptedPayload, EncryptedResponse, LookupRequest, ResultRecord,
    RESULT_ROUTE,
};
use reqwest::Client;

use crate::error::{ClientError, Result};

/// Sends encrypted lookups to the proxy and decrypts its answers.
///
/// Every lookup is a single POST; there is no retry.
pub struct LookupClient {
    http: Client,
    endpoint: String,
    cipher: Cipher,
}

impl LookupClient {
    /// Create a client for the proxy at `server_url`
    pub fn new(server_url: impl AsRef<str>, cipher: Cipher) -> Self {
        Self::with_http(Client::new(), server_url, RESULT_ROUTE, cipher)
    }

    fn with_http(http: Client, server_url: impl AsRef<str>, route: &str, cipher: Cipher) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", server_url.as_ref().trim_end_matches('/'), route),
            cipher,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Look up a result and return the decrypted body as-is
    pub async fn lookup(&self, request: &LookupRequest) -> Result<DecryptResult> {
        let envelope = EncryptedPayload {
            encrypted_payload: self.cipher.encrypt(request)?,
        };

        tracing::debug!(endpoint = %self.endpoint, exam = %request.exam, "Sending lookup");

        let resp = self.http.post(&self.endpoint).json(&envelope).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            tracing::warn!(status, "Result lookup failed");
            return Err(ClientError::FetchFailed { status });
        }

        let body: EncryptedResponse = resp.json().await?;
        Ok(self.cipher.decrypt(&body.encrypted_data)?)
    }

    /// Look up a result and parse it as a [`ResultRecord`]
    pub async fn lookup_record(&self, request: &LookupRequest) -> Result<ResultRecord> {
        match self.lookup(request).await? {
            DecryptResult::Json(value) => Ok(serde_json::from_value(value)?),
            DecryptResult::Text(text) => Err(ClientError::InvalidResponse(format!(
                "expected a JSON result, got {} bytes of text",
                text.len()
            ))),
        }
    }

    /// Look up by roll and registration number
    pub async fn lookup_by_roll_and_registration(
        &self,
        exam: &str,
        year: &str,
        board: &str,
        roll: &str,
        reg: &str,
        mobile_number: Option<&str>,
    ) -> Result<DecryptResult> {
        let mut request = LookupRequest::new(exam, year, board, roll, reg);
        request.mobile_number = mobile_number.map(str::to_string);
        self.lookup(&request).await
    }
}

/// Builder for [`LookupClient`]
pub struct ClientBuilder {
    server_url: String,
    route: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            route: RESULT_ROUTE.to_string(),
            timeout: None,
        }
    }

    /// Override the proxy route path
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    /// Overall deadline for each lookup
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self, cipher: Cipher) -> Result<LookupClient> {
        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(LookupClient::with_http(
            http.build()?,
            &self.server_url,
            &self.route,
            cipher,
        ))
    }
}
