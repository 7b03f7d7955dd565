//! edu-result-core: Shared types and the envelope cipher for encrypted result lookups
//!
//! Every lookup crosses the network twice, and both hops carry exactly one
//! opaque string:
//! - Request hop: `{"encryptedPayload": "<token>"}` from the caller to the proxy
//! - Response hop: `{"encryptedData": "<token>"}` from the proxy back
//!
//! # Threat Model
//!
//! - **Pre-shared key**: caller and proxy hold the same passphrase
//! - **Security goal**: payload confidentiality and integrity between caller
//!   and proxy (AES-256-GCM)
//! - **Non-goals**: hiding that a lookup happened, protecting the upstream hop
//!   (the proxy talks to the exam board in the clear), key rotation
//!
//! | Information | Visible on the wire |
//! |-------------|---------------------|
//! | Exam, roll, registration | NO - inside the envelope |
//! | Result record | NO - inside the envelope |
//! | Payload size, timing | YES |
//!
//! Anyone holding the passphrase can read and forge envelopes; the key is
//! shared with every client build.

pub mod cipher;
mod envelope;
mod error;
mod record;
mod request;

pub use cipher::{Cipher, CipherKey, DecryptResult, TOKEN_MAGIC, TOKEN_VERSION};
pub use envelope::{EncryptedPayload, EncryptedResponse, ErrorResponse};
pub use error::CryptoError;
pub use record::{EchoedRequest, ResultRecord, ResultSummary, StudentInfo, Subject};
pub use request::LookupRequest;

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Path of the proxy route, relative to the server base URL
pub const RESULT_ROUTE: &str = "/api/result";

/// Path on the mirror backend that receives copies of successful results
pub const MIRROR_ROUTE: &str = "/create/results";
