//! Shape validation for decrypted lookup payloads
//!
//! Validation runs in two passes with distinct errors:
//! 1. The value must be an object containing every required key
//!    (any value, including null) -> else `InvalidPayloadFormat`
//! 2. Every required value must be truthy -> else `MissingParameters`
//!
//! So `{"reg": ""}` passes the first pass and fails the second.

use edu_result_core::DecryptResult;
use serde_json::{Map, Value};

use crate::error::{ProxyError, Result};

/// Keys every lookup payload must carry, in upstream query order
pub const REQUIRED_FIELDS: [&str; 5] = ["exam", "year", "board", "roll", "reg"];

const MOBILE_NUMBER_FIELD: &str = "mobileNumber";

/// Truthiness as browsers evaluate it for JSON values
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text used when a field is placed in the upstream query
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A lookup payload that passed both validation passes
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLookup {
    pub exam: String,
    pub year: String,
    pub board: String,
    pub roll: String,
    pub reg: String,
    /// Carried verbatim to the mirror backend; `None` when the key was absent
    pub mobile_number: Option<Value>,
    /// The required fields as decrypted, before text conversion
    request: Map<String, Value>,
}

impl ValidatedLookup {
    /// Validate a decrypted payload
    pub fn from_decrypted(decrypted: DecryptResult) -> Result<Self> {
        let map = match decrypted {
            DecryptResult::Json(Value::Object(map)) => map,
            _ => return Err(ProxyError::InvalidPayloadFormat),
        };

        if !REQUIRED_FIELDS.iter().all(|key| map.contains_key(*key)) {
            return Err(ProxyError::InvalidPayloadFormat);
        }

        if !REQUIRED_FIELDS.iter().all(|key| map.get(*key).is_some_and(is_truthy)) {
            return Err(ProxyError::MissingParameters);
        }

        let text = |key: &str| map.get(key).map(field_text).unwrap_or_default();
        let request = REQUIRED_FIELDS
            .iter()
            .filter_map(|key| map.get(*key).map(|value| (key.to_string(), value.clone())))
            .collect();

        Ok(Self {
            exam: text("exam"),
            year: text("year"),
            board: text("board"),
            roll: text("roll"),
            reg: text("reg"),
            mobile_number: map.get(MOBILE_NUMBER_FIELD).cloned(),
            request,
        })
    }

    /// Query pairs for the upstream request, in upstream order
    pub fn query_pairs(&self) -> [(&'static str, &str); 5] {
        [
            ("exam", self.exam.as_str()),
            ("year", self.year.as_str()),
            ("board", self.board.as_str()),
            ("roll", self.roll.as_str()),
            ("reg", self.reg.as_str()),
        ]
    }

    /// The `request` echo object sent along with mirrored results. Values
    /// keep their decrypted JSON type.
    pub fn request_echo(&self) -> Value {
        Value::Object(self.request.clone())
    }
}
