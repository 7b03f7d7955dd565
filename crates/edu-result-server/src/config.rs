//! Server configuration
//!
//! Every setting can come from a flag or its environment variable. The
//! encryption key has no default: an unset or empty key stops startup.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use edu_result_core::CryptoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Encryption key is missing or empty (set RESULT_ENCRYPTION_KEY)")]
    EmptyKey,

    #[error("Upstream API URL is missing (set RESULT_API_URL)")]
    MissingUpstream,

    #[error("Concurrency limit must be at least 1")]
    ZeroConcurrency,

    #[error("Invalid {field} URL {value}: {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cipher error: {0}")]
    Cipher(#[from] CryptoError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "edu-result-server")]
#[command(about = "Encrypted proxy for exam-board result lookups")]
pub struct ServerArgs {
    /// Address the public API listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Address for the Prometheus /metrics endpoint (disabled when unset)
    #[arg(long, env = "ADMIN_LISTEN_ADDR")]
    pub admin_listen: Option<SocketAddr>,

    /// Base URL of the upstream result API
    #[arg(long, env = "RESULT_API_URL")]
    pub upstream_url: String,

    /// Referer header sent to the upstream API
    #[arg(long, env = "RESULT_REFERER", default_value = "")]
    pub referer: String,

    /// Base URL of the mirror backend (mirroring disabled when unset)
    #[arg(long, env = "RESULT_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Pre-shared passphrase for envelope encryption
    #[arg(long, env = "RESULT_ENCRYPTION_KEY", hide_env_values = true)]
    pub encryption_key: String,

    /// Upstream request timeout in seconds (no timeout when unset)
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    /// Maximum number of in-flight requests
    #[arg(long, env = "MAX_CONCURRENT_REQUESTS", default_value_t = 256)]
    pub max_concurrent: usize,
}

impl ServerArgs {
    pub fn into_config(self) -> ProxyConfig {
        ProxyConfig {
            listen: self.listen,
            admin_listen: self.admin_listen,
            upstream_url: self.upstream_url,
            referer: self.referer,
            backend_url: self.backend_url.filter(|url| !url.trim().is_empty()),
            encryption_key: self.encryption_key,
            upstream_timeout: self.upstream_timeout_secs.map(Duration::from_secs),
            max_concurrent: self.max_concurrent,
        }
    }
}

#[derive(Clone)]
pub struct ProxyConfig {
    pub listen: SocketAddr,
    pub admin_listen: Option<SocketAddr>,
    pub upstream_url: String,
    pub referer: String,
    pub backend_url: Option<String>,
    pub encryption_key: String,
    pub upstream_timeout: Option<Duration>,
    pub max_concurrent: usize,
}

impl ProxyConfig {
    /// Minimal config for the given upstream and key; everything else defaults
    pub fn new(upstream_url: impl Into<String>, encryption_key: impl Into<String>) -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 3000)),
            admin_listen: None,
            upstream_url: upstream_url.into(),
            referer: String::new(),
            backend_url: None,
            encryption_key: encryption_key.into(),
            upstream_timeout: None,
            max_concurrent: 256,
        }
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    pub fn with_backend_url(mut self, backend_url: impl Into<String>) -> Self {
        self.backend_url = Some(backend_url.into());
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = Some(timeout);
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Fail fast on settings the proxy cannot run without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.encryption_key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        if self.upstream_url.trim().is_empty() {
            return Err(ConfigError::MissingUpstream);
        }
        if self.max_concurrent == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        check_url("upstream", &self.upstream_url)?;
        if let Some(backend_url) = &self.backend_url {
            check_url("backend", backend_url)?;
        }
        Ok(())
    }
}

// Keep the key out of debug output
impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("listen", &self.listen)
            .field("admin_listen", &self.admin_listen)
            .field("upstream_url", &self.upstream_url)
            .field("referer", &self.referer)
            .field("backend_url", &self.backend_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("max_concurrent", &self.max_concurrent)
            .finish_non_exhaustive()
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
