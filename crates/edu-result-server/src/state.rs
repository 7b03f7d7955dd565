//! Shared state for the proxy routes

use std::sync::Arc;

use edu_result_core::Cipher;

use crate::mirror::MirrorSink;
use crate::upstream::UpstreamClient;

/// Per-process state. Immutable after startup; nothing is shared between
/// requests except these handles.
pub struct AppState {
    pub cipher: Cipher,
    pub upstream: UpstreamClient,
    pub mirror: MirrorSink,
}

impl AppState {
    pub fn new(cipher: Cipher, upstream: UpstreamClient, mirror: MirrorSink) -> Self {
        Self {
            cipher,
            upstream,
            mirror,
        }
    }
}

pub type SharedState = Arc<AppState>;
