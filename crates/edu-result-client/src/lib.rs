//! edu-result-client: Lookup client for the encrypted result proxy
//!
//! Encrypts a [`edu_result_core::LookupRequest`], posts it to the proxy and
//! decrypts the answer.

pub mod client;
pub mod error;
pub mod render;

pub use client::{ClientBuilder, LookupClient};
pub use error::ClientError;
pub use render::render_record;
