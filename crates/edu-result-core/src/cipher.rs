//! Envelope cipher: encrypts JSON values to a single printable token
//!
//! Uses AES-256-GCM with a key derived from a pre-shared passphrase.
//!
//! Token layout (lowercase hex of):
//!
//! ```text
//! [magic:3 "ERX"][version:1][nonce:12][ciphertext + tag:16]
//! ```
//!
//! Plaintext is JSON text. Strings are encrypted as their raw text, so a
//! string that happens to be a valid JSON literal (`"123"`, `"true"`) comes
//! back from [`Cipher::decrypt`] as [`DecryptResult::Json`], not as text.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::Result;

/// Token magic bytes
pub const TOKEN_MAGIC: [u8; 3] = *b"ERX";

/// Token format version
pub const TOKEN_VERSION: u8 = 1;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const HEADER_LEN: usize = TOKEN_MAGIC.len() + 1 + NONCE_LEN;

/// 256-bit key derived from the pre-shared passphrase. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey {
    bytes: [u8; KEY_LEN],
}

impl CipherKey {
    /// Derive a key as SHA-256 of the passphrase. Empty passphrases are rejected.
    pub fn from_passphrase(passphrase: &str) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(CryptoError::EmptyKey);
        }
        let bytes: [u8; KEY_LEN] = Sha256::digest(passphrase.as_bytes()).into();
        Ok(Self { bytes })
    }

    /// Short non-secret fingerprint for log correlation
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytes);
        hex::encode(&digest[..4])
    }
}

// Key bytes must never end up in logs
impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Outcome of decrypting a token.
///
/// The recovered plaintext is parsed as JSON when possible; anything else is
/// returned verbatim as text.
#[derive(Debug, Clone, PartialEq)]
pub enum DecryptResult {
    Json(Value),
    Text(String),
}

impl DecryptResult {
    fn from_plaintext(plaintext: String) -> Self {
        match serde_json::from_str(&plaintext) {
            Ok(value) => DecryptResult::Json(value),
            Err(_) => DecryptResult::Text(plaintext),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecryptResult::Json(_) => None,
            DecryptResult::Text(text) => Some(text),
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            DecryptResult::Json(value) => Some(value),
            DecryptResult::Text(_) => None,
        }
    }

    /// Collapse into a JSON value, wrapping text as `Value::String`
    pub fn into_value(self) -> Value {
        match self {
            DecryptResult::Json(value) => value,
            DecryptResult::Text(text) => Value::String(text),
        }
    }
}

/// Symmetric envelope cipher shared by client and proxy
#[derive(Clone)]
pub struct Cipher {
    aead: Aes256Gcm,
    fingerprint: String,
}

impl Cipher {
    pub fn new(key: &CipherKey) -> Self {
        Self {
            aead: Aes256Gcm::new(&key.bytes.into()),
            fingerprint: key.fingerprint(),
        }
    }

    /// Build a cipher straight from a passphrase
    pub fn from_passphrase(passphrase: &str) -> Result<Self> {
        let key = CipherKey::from_passphrase(passphrase)?;
        Ok(Self::new(&key))
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Encrypt any serializable value.
    ///
    /// JSON strings are encrypted as their raw text; every other value is
    /// encrypted as compact JSON.
    pub fn encrypt<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let text = match serde_json::to_value(value).map_err(serialize_failed)? {
            Value::String(text) => text,
            other => serde_json::to_string(&other).map_err(serialize_failed)?,
        };
        self.encrypt_text(&text)
    }

    /// Encrypt exact text, byte for byte
    pub fn encrypt_text(&self, text: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .aead
            .encrypt(Nonce::from_slice(&nonce_bytes), text.as_bytes())
            .map_err(|_| {
                tracing::debug!("AES-GCM encryption failed");
                CryptoError::Encrypt
            })?;

        let mut blob = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        blob.extend_from_slice(&TOKEN_MAGIC);
        blob.push(TOKEN_VERSION);
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);

        Ok(hex::encode(blob))
    }

    /// Decrypt a token produced by [`Cipher::encrypt`] or [`Cipher::encrypt_text`]
    pub fn decrypt(&self, token: &str) -> Result<DecryptResult> {
        let plaintext = self.decrypt_text(token)?;
        Ok(DecryptResult::from_plaintext(plaintext))
    }

    /// Decrypt a token to its raw plaintext without JSON interpretation
    pub fn decrypt_text(&self, token: &str) -> Result<String> {
        let blob = hex::decode(token.trim()).map_err(|e| {
            tracing::debug!(error = %e, "Token is not valid hex");
            CryptoError::Decrypt
        })?;

        let (nonce, ciphertext) = parse_blob(&blob)?;

        let plaintext = self.aead.decrypt(nonce, ciphertext).map_err(|_| {
            tracing::debug!("Token failed authentication");
            CryptoError::Decrypt
        })?;

        String::from_utf8(plaintext).map_err(|e| {
            tracing::debug!(error = %e, "Plaintext is not UTF-8");
            CryptoError::Decrypt
        })
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher")
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

fn serialize_failed(e: serde_json::Error) -> CryptoError {
    tracing::debug!(error = %e, "Value could not be serialized for encryption");
    CryptoError::Serialize(e)
}

fn parse_blob(blob: &[u8]) -> Result<(&Nonce<aes_gcm::aead::consts::U12>, &[u8])> {
    if blob.len() < HEADER_LEN + TAG_LEN {
        tracing::debug!(len = blob.len(), "Token too short");
        return Err(CryptoError::Decrypt);
    }

    let (magic, rest) = blob.split_at(TOKEN_MAGIC.len());
    if magic != TOKEN_MAGIC {
        tracing::debug!("Token magic mismatch");
        return Err(CryptoError::Decrypt);
    }

    let (version, rest) = rest.split_at(1);
    if version[0] != TOKEN_VERSION {
        tracing::debug!(version = version[0], "Unsupported token version");
        return Err(CryptoError::Decrypt);
    }

    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
    Ok((Nonce::from_slice(nonce), ciphertext))
}
