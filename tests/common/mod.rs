//! Stub upstream and mirror servers for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use edu_result::{Cipher, LookupClient, ProxyConfig, ProxyServer, ServerBuilder};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const TEST_KEY: &str = "integration-test-passphrase";

/// What the stub upstream saw for one request
#[derive(Debug, Clone)]
pub struct UpstreamHit {
    pub query: HashMap<String, String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

struct UpstreamStub {
    status: StatusCode,
    body: String,
    hits: mpsc::UnboundedSender<UpstreamHit>,
}

async fn upstream_handler(
    State(stub): State<Arc<UpstreamStub>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let _ = stub.hits.send(UpstreamHit {
        query,
        user_agent: header("user-agent"),
        referer: header("referer"),
    });
    (stub.status, stub.body.clone())
}

pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Start an upstream that answers every request with `status` and `body`
pub async fn spawn_upstream(
    status: StatusCode,
    body: impl Into<String>,
) -> (String, mpsc::UnboundedReceiver<UpstreamHit>) {
    let (hits, rx) = mpsc::unbounded_channel();
    let stub = Arc::new(UpstreamStub {
        status,
        body: body.into(),
        hits,
    });
    let router = Router::new()
        .route("/", get(upstream_handler))
        .with_state(stub);
    (spawn(router).await, rx)
}

/// Start an upstream that waits `delay` before answering 200 with `body`
pub async fn spawn_slow_upstream(delay: Duration, body: impl Into<String>) -> String {
    let body = body.into();
    let router = Router::new().route(
        "/",
        get(move || {
            let body = body.clone();
            async move {
                tokio::time::sleep(delay).await;
                body
            }
        }),
    );
    spawn(router).await
}

/// Start a mirror backend that forwards every posted body to the receiver
pub async fn spawn_mirror() -> (String, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let router = Router::new().route(
        "/create/results",
        post(move |Json(body): Json<Value>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(body);
                StatusCode::CREATED
            }
        }),
    );
    (spawn(router).await, rx)
}

/// Start the proxy for `config` and return its base URL
pub async fn spawn_proxy(config: ProxyConfig) -> String {
    serve(ServerBuilder::new(config).build().unwrap()).await
}

/// Serve an already built proxy and return its base URL
pub async fn serve(server: ProxyServer) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server
            .serve_with_shutdown(listener, std::future::pending())
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

pub fn cipher() -> Cipher {
    Cipher::from_passphrase(TEST_KEY).unwrap()
}

pub fn client(proxy_url: &str) -> LookupClient {
    LookupClient::new(proxy_url, cipher())
}
