//! Proxy server assembly and lifecycle

use std::sync::Arc;

use axum::Router;
use edu_result_core::Cipher;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::limit::GlobalConcurrencyLimitLayer;

use crate::config::{ConfigError, ProxyConfig};
use crate::metrics::init_prometheus_recorder;
use crate::mirror::{spawn_mirror_worker, MirrorSink};
use crate::routes::{create_admin_router, create_router};
use crate::state::{AppState, SharedState};
use crate::upstream::UpstreamClient;

/// A configured proxy, ready to serve
pub struct ProxyServer {
    config: ProxyConfig,
    state: SharedState,
    mirror_worker: Option<JoinHandle<()>>,
}

impl ProxyServer {
    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// Public router with the concurrency limit applied. All routes draw
    /// from one shared pool of permits.
    pub fn router(&self) -> Router {
        create_router(self.state())
            .layer(GlobalConcurrencyLimitLayer::new(self.config.max_concurrent))
    }

    /// Serve the public router on `listener` until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        // Dropping the state closes the mirror queue; let queued copies drain
        drop(self.state);
        if let Some(worker) = self.mirror_worker {
            if let Err(e) = worker.await {
                tracing::warn!(error = %e, "Mirror worker ended abnormally");
            }
        }
        Ok(())
    }

    /// Bind the configured addresses and serve until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        if let Some(admin_addr) = self.config.admin_listen {
            let handle = init_prometheus_recorder()?;
            let admin_listener = TcpListener::bind(admin_addr).await?;
            tracing::info!(addr = %admin_addr, "Metrics endpoint listening");
            tokio::spawn(async move {
                if let Err(e) = axum::serve(admin_listener, create_admin_router(handle)).await {
                    tracing::error!(error = %e, "Metrics endpoint failed");
                }
            });
        }

        let listener = TcpListener::bind(self.config.listen).await?;
        tracing::info!(
            addr = %self.config.listen,
            upstream = %self.config.upstream_url,
            mirror_enabled = self.state.mirror.is_enabled(),
            key_fingerprint = %self.state.cipher.fingerprint(),
            "Result proxy listening"
        );

        self.serve_with_shutdown(listener, shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Builder for [`ProxyServer`]
pub struct ServerBuilder {
    config: ProxyConfig,
    http: Option<reqwest::Client>,
}

impl ServerBuilder {
    pub fn new(config: ProxyConfig) -> Self {
        Self { config, http: None }
    }

    /// Use a preconfigured HTTP client for upstream and mirror calls
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Validate the config and assemble the server.
    ///
    /// Spawns the mirror worker when a backend is configured, so this must
    /// run inside a Tokio runtime.
    pub fn build(self) -> Result<ProxyServer, ConfigError> {
        self.config.validate()?;

        let cipher = Cipher::from_passphrase(&self.config.encryption_key)?;
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder().build()?,
        };

        let upstream = UpstreamClient::new(
            http.clone(),
            self.config.upstream_url.clone(),
            self.config.referer.clone(),
        )
        .with_timeout(self.config.upstream_timeout);

        let (mirror, mirror_worker) = match &self.config.backend_url {
            Some(backend_url) => {
                let (sink, worker) = spawn_mirror_worker(http, backend_url);
                (sink, Some(worker))
            }
            None => (MirrorSink::disabled(), None),
        };

        let state = Arc::new(AppState::new(cipher, upstream, mirror));

        Ok(ProxyServer {
            config: self.config,
            state,
            mirror_worker,
        })
    }
}
