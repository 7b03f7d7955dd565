//! Client for the upstream exam-board result API

use std::time::{Duration, Instant};

use reqwest::header::{REFERER, USER_AGENT};
use reqwest::Client;

use crate::error::{ProxyError, Result};
use crate::payload::ValidatedLookup;

/// User agent presented to the upstream API
pub const UPSTREAM_USER_AGENT: &str = "Mozilla/5.0";

pub struct UpstreamClient {
    http: Client,
    base_url: String,
    referer: String,
    timeout: Option<Duration>,
}

impl UpstreamClient {
    pub fn new(http: Client, base_url: impl Into<String>, referer: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            referer: referer.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Endpoint the query parameters are appended to
    pub fn endpoint(&self) -> String {
        format!("{}/", self.base_url)
    }

    /// Fetch the raw result body for a validated lookup.
    ///
    /// Query parameters are percent-encoded per field. A non-2xx upstream
    /// status becomes [`ProxyError::Upstream`] carrying that status.
    pub async fn fetch(&self, lookup: &ValidatedLookup) -> Result<String> {
        let mut request = self
            .http
            .get(self.endpoint())
            .query(&lookup.query_pairs())
            .header(USER_AGENT, UPSTREAM_USER_AGENT);

        if !self.referer.is_empty() {
            request = request.header(REFERER, &self.referer);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let start = Instant::now();
        let resp = request.send().await?;
        crate::metrics::record_upstream_latency(start.elapsed());

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Upstream returned error status");
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        tracing::debug!(
            status = status.as_u16(),
            bytes = body.len(),
            "Fetched upstream result"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_result_core::DecryptResult;
    use serde_json::json;

    #[test]
    fn test_endpoint_normalises_trailing_slash() {
        let client = UpstreamClient::new(Client::new(), "http://board.example/api/", "");
        assert_eq!(client.endpoint(), "http://board.example/api/");

        let client = UpstreamClient::new(Client::new(), "http://board.example", "");
        assert_eq!(client.endpoint(), "http://board.example/");
    }

    #[test]
    fn test_query_is_percent_encoded() {
        let payload = json!({
            "exam": "ssc",
            "year": "2023",
            "board": "dhaka",
            "roll": "123&reg=1",
            "reg": "a b",
        });
        let lookup = ValidatedLookup::from_decrypted(DecryptResult::Json(payload)).unwrap();

        let request = Client::new()
            .get("http://board.example/")
            .query(&lookup.query_pairs())
            .build()
            .unwrap();

        assert_eq!(
            request.url().query(),
            Some("exam=ssc&year=2023&board=dhaka&roll=123%26reg%3D1&reg=a+b")
        );
    }
}
