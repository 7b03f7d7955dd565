//! Prometheus metrics
//!
//! Recording functions are no-ops until [`init_prometheus_recorder`] installs
//! a recorder, so tests and embedders pay nothing for them.

use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const REQUESTS_TOTAL: &str = "edu_result_requests_total";
pub const UPSTREAM_SECONDS: &str = "edu_result_upstream_seconds";
pub const MIRROR_DISPATCHED_TOTAL: &str = "edu_result_mirror_dispatched_total";
pub const MIRROR_DROPPED_TOTAL: &str = "edu_result_mirror_dropped_total";
pub const MIRROR_FAILED_TOTAL: &str = "edu_result_mirror_failed_total";

/// Install the global Prometheus recorder and return a handle for rendering
pub fn init_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {e}"))?;
    Ok(handle)
}

/// Count a finished lookup. `outcome` is `"ok"` or a `ProxyError` code.
pub fn record_request(outcome: &'static str) {
    ::metrics::counter!(REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_upstream_latency(elapsed: Duration) {
    ::metrics::histogram!(UPSTREAM_SECONDS).record(elapsed.as_secs_f64());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorEvent {
    Dispatched,
    Dropped,
    Failed,
}

pub fn record_mirror(event: MirrorEvent) {
    let name = match event {
        MirrorEvent::Dispatched => MIRROR_DISPATCHED_TOTAL,
        MirrorEvent::Dropped => MIRROR_DROPPED_TOTAL,
        MirrorEvent::Failed => MIRROR_FAILED_TOTAL,
    };
    ::metrics::counter!(name).increment(1);
}
