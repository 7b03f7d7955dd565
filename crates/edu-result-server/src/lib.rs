//! edu-result-server: Encrypted proxy in front of the exam-board result API
//!
//! Decrypts the caller's envelope, validates the lookup parameters, forwards
//! them to the upstream result API and returns the upstream body re-encrypted.
//! Successful results can be mirrored to a secondary backend through a
//! one-way queue that never affects the caller's response.

pub mod config;
pub mod error;
pub mod metrics;
pub mod mirror;
pub mod payload;
pub mod routes;
pub mod server;
pub mod state;
pub mod upstream;

pub use config::{ConfigError, ProxyConfig, ServerArgs};
pub use error::ProxyError;
pub use metrics::init_prometheus_recorder;
pub use mirror::{spawn_mirror_worker, MirrorMessage, MirrorSink};
pub use payload::ValidatedLookup;
pub use routes::{create_admin_router, create_router};
pub use server::{ProxyServer, ServerBuilder};
pub use state::{AppState, SharedState};
pub use upstream::UpstreamClient;
