//! One-way mirroring of successful results to a secondary backend
//!
//! The route handler hands a [`MirrorMessage`] to a [`MirrorSink`] and moves
//! on. A single worker task drains the queue and POSTs each message to
//! `{backend}/create/results`.
//!
//! ## Guarantees
//! - `dispatch` never blocks and never fails the caller's lookup
//! - Delivery failures are logged and counted, nothing else
//! - When the queue is full the message is dropped with a warning

use edu_result_core::MIRROR_ROUTE;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::metrics::{record_mirror, MirrorEvent};
use crate::payload::ValidatedLookup;

/// Queue capacity between the route handler and the mirror worker
pub const MIRROR_QUEUE_CAPACITY: usize = 256;

/// A result copy bound for the mirror backend
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorMessage {
    pub payload: Value,
}

impl MirrorMessage {
    /// Build the mirror body: the upstream result's own fields, then the
    /// `request` echo and `mobileNumber` (only when the caller sent one).
    ///
    /// Returns `None` if the upstream result is not a JSON object.
    pub fn new(result: Value, lookup: &ValidatedLookup) -> Option<Self> {
        let Value::Object(mut payload) = result else {
            return None;
        };

        payload.insert("request".to_string(), lookup.request_echo());
        if let Some(mobile_number) = &lookup.mobile_number {
            payload.insert("mobileNumber".to_string(), mobile_number.clone());
        }

        Some(Self {
            payload: Value::Object(payload),
        })
    }
}

/// Sending half of the mirror queue
#[derive(Clone, Debug, Default)]
pub struct MirrorSink {
    tx: Option<mpsc::Sender<MirrorMessage>>,
}

impl MirrorSink {
    /// A sink with no backend; every dispatch is ignored
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a message without waiting.
    ///
    /// Returns whether the message was queued.
    pub fn dispatch(&self, message: MirrorMessage) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };

        match tx.try_send(message) {
            Ok(()) => {
                record_mirror(MirrorEvent::Dispatched);
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    capacity = MIRROR_QUEUE_CAPACITY,
                    "Mirror queue full, dropping result"
                );
                record_mirror(MirrorEvent::Dropped);
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("Mirror worker stopped, dropping result");
                record_mirror(MirrorEvent::Dropped);
                false
            }
        }
    }
}

/// Spawn the mirror worker for `backend_url`.
///
/// The worker exits once every [`MirrorSink`] clone has been dropped.
pub fn spawn_mirror_worker(http: Client, backend_url: &str) -> (MirrorSink, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(MIRROR_QUEUE_CAPACITY);
    let url = format!("{}{}", backend_url.trim_end_matches('/'), MIRROR_ROUTE);

    let handle = tokio::spawn(run_worker(rx, http, url));

    (MirrorSink { tx: Some(tx) }, handle)
}

async fn run_worker(mut rx: mpsc::Receiver<MirrorMessage>, http: Client, url: String) {
    tracing::debug!(url = %url, "Mirror worker started");

    while let Some(message) = rx.recv().await {
        deliver(&http, &url, &message).await;
    }

    tracing::debug!("Mirror worker stopped");
}

async fn deliver(http: &Client, url: &str, message: &MirrorMessage) {
    match http.post(url).json(&message.payload).send().await {
        Ok(resp) if resp.status().is_success() => {
            tracing::debug!(status = resp.status().as_u16(), "Mirrored result");
        }
        Ok(resp) => {
            tracing::warn!(
                status = resp.status().as_u16(),
                "Failed to save result to backend"
            );
            record_mirror(MirrorEvent::Failed);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to save result to backend");
            record_mirror(MirrorEvent::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_result_core::DecryptResult;
    use serde_json::json;

    fn lookup(mobile_number: Option<Value>) -> ValidatedLookup {
        let mut payload = json!({
            "exam": "ssc",
            "year": "2023",
            "board": "dhaka",
            "roll": "123456",
            "reg": "987654321",
        });
        if let Some(mobile_number) = mobile_number {
            payload["mobileNumber"] = mobile_number;
        }
        ValidatedLookup::from_decrypted(DecryptResult::Json(payload)).unwrap()
    }

    #[test]
    fn test_message_merges_request_echo() {
        let result = json!({"success": true, "summary": {"GPA": "5.00"}});
        let message = MirrorMessage::new(result, &lookup(Some(json!("01700000000")))).unwrap();

        assert_eq!(message.payload["summary"]["GPA"], "5.00");
        assert_eq!(message.payload["request"]["roll"], "123456");
        assert_eq!(message.payload["mobileNumber"], "01700000000");
    }

    #[test]
    fn test_message_omits_absent_mobile_number() {
        let message = MirrorMessage::new(json!({"success": true}), &lookup(None)).unwrap();
        assert!(message.payload.get("mobileNumber").is_none());
    }

    #[test]
    fn test_message_overrides_upstream_request_field() {
        let result = json!({"success": true, "request": {"roll": "other"}});
        let message = MirrorMessage::new(result, &lookup(None)).unwrap();

        assert_eq!(message.payload["request"]["roll"], "123456");
        assert_eq!(message.payload["request"]["reg"], "987654321");
    }

    #[test]
    fn test_message_requires_object() {
        assert!(MirrorMessage::new(json!([true]), &lookup(None)).is_none());
    }

    #[test]
    fn test_disabled_sink_ignores_dispatch() {
        let sink = MirrorSink::disabled();
        assert!(!sink.is_enabled());

        let message = MirrorMessage::new(json!({"success": true}), &lookup(None)).unwrap();
        assert!(!sink.dispatch(message));
    }

    #[tokio::test]
    async fn test_dispatch_to_closed_worker_drops() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sink = MirrorSink { tx: Some(tx) };

        let message = MirrorMessage::new(json!({"success": true}), &lookup(None)).unwrap();
        assert!(!sink.dispatch(message));
    }

    #[tokio::test]
    async fn test_full_queue_drops() {
        let (tx, _rx) = mpsc::channel(1);
        let sink = MirrorSink { tx: Some(tx) };
        let message = MirrorMessage::new(json!({"success": true}), &lookup(None)).unwrap();

        assert!(sink.dispatch(message.clone()));
        assert!(!sink.dispatch(message));
    }

    #[tokio::test]
    async fn test_worker_survives_unreachable_backend() {
        let (sink, handle) = spawn_mirror_worker(Client::new(), "http://127.0.0.1:1");
        let message = MirrorMessage::new(json!({"success": true}), &lookup(None)).unwrap();

        assert!(sink.dispatch(message));
        drop(sink);

        tokio::time::timeout(std::time::Duration::from_secs(10), handle)
            .await
            .expect("worker should exit once the sink is dropped")
            .unwrap();
    }
}
