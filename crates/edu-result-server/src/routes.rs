//! HTTP routes
//!
//! `POST /api/result` runs one lookup per request, strictly in order:
//! receive -> decrypt -> validate -> forward -> (mirror) -> respond.
//! Each step either advances or ends the request with a `ProxyError`.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use edu_result_core::{EncryptedResponse, RESULT_ROUTE};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::error::{ProxyError, Result};
use crate::metrics::record_request;
use crate::mirror::MirrorMessage;
use crate::payload::{is_truthy, ValidatedLookup};
use crate::state::{AppState, SharedState};

/// Field of the request body carrying the encrypted lookup
const ENVELOPE_FIELD: &str = "encryptedPayload";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mirror_enabled: bool,
    pub version: &'static str,
}

/// Create the public router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route(RESULT_ROUTE, post(result_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the admin router serving Prometheus metrics
pub fn create_admin_router(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || std::future::ready(handle.render())))
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        mirror_enabled: state.mirror.is_enabled(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn result_handler(State(state): State<SharedState>, body: Bytes) -> Response {
    match lookup(&state, &body).await {
        Ok(response) => {
            record_request("ok");
            Json(response).into_response()
        }
        Err(e) => {
            record_request(e.code());
            e.into_response()
        }
    }
}

async fn lookup(state: &AppState, body: &[u8]) -> Result<EncryptedResponse> {
    // Receive
    let body: Value = serde_json::from_slice(body)?;
    if body.is_null() {
        return Err(ProxyError::Internal("request body is null".to_string()));
    }
    let envelope = body
        .get(ENVELOPE_FIELD)
        .filter(|value| is_truthy(value))
        .ok_or(ProxyError::MissingPayload)?;
    let token = envelope
        .as_str()
        .ok_or_else(|| ProxyError::Internal("envelope is not a string".to_string()))?;

    // Decrypt
    let decrypted = state.cipher.decrypt(token)?;

    // Validate shape
    let lookup = ValidatedLookup::from_decrypted(decrypted)?;

    // Forward
    let raw = state.upstream.fetch(&lookup).await?;

    // Mirror
    mirror_result(state, &lookup, &raw);

    // Respond with the exact upstream bytes
    let encrypted_data = state.cipher.encrypt_text(&raw)?;
    Ok(EncryptedResponse { encrypted_data })
}

/// Hand a successful result to the mirror queue. Never fails the lookup.
fn mirror_result(state: &AppState, lookup: &ValidatedLookup, raw: &str) {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse result data for saving");
            return;
        }
    };

    if !state.mirror.is_enabled() || !parsed.get("success").is_some_and(is_truthy) {
        return;
    }

    match MirrorMessage::new(parsed, lookup) {
        Some(message) => {
            state.mirror.dispatch(message);
        }
        None => tracing::debug!("Upstream result is not an object, not mirroring"),
    }
}
