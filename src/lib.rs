//! edu-result: Encrypted exam-result lookups
//!
//! - `edu-result-core`: envelope cipher and shared data model
//! - `edu-result-server`: the proxy in front of the exam-board API
//! - `edu-result-client`: the lookup client

pub use edu_result_client::{render_record, ClientBuilder, ClientError, LookupClient};
pub use edu_result_core::{
    Cipher, CryptoError, DecryptResult, EncryptedPayload, EncryptedResponse, ErrorResponse,
    LookupRequest, ResultRecord,
};
pub use edu_result_server::{ProxyConfig, ProxyError, ProxyServer, ServerBuilder};
