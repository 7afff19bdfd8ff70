//! Device key derivation.
//!
//! A salted SHA-1 chain that turns a device identifier into a 42-character
//! key. The firmware on the device runs the same chain, so every step here
//! (including which digest is carried forward) is part of the protocol:
//!
//! 1. `h1 = sha1(identifier)`
//! 2. `h2 = sha1(hex(h1) + SALT)`
//! 3. `h3 = sha1(hex(h2))`
//! 4. `key = hex(h2) + last two chars of hex(h3)`
//!
//! `h1` is dropped after step 2 and the salt is not reapplied in step 3.

pub mod key;

use sha1::{Digest, Sha1};
use thiserror::Error;

pub use key::DeviceKey;

/// Salt shared with the device firmware.
///
/// Changing this invalidates every key derived so far.
pub const SALT: &str = "Q9m#T4vP!s2Lx8Z@";

/// Length of a SHA-1 digest rendered as hex.
pub const DIGEST_HEX_LEN: usize = 40;

/// Number of trailing `h3` characters appended to the key.
pub const SUFFIX_LEN: usize = 2;

/// Length of a derived key.
pub const KEY_LEN: usize = DIGEST_HEX_LEN + SUFFIX_LEN;

/// Errors produced while deriving or parsing keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeriveError {
    #[error("device identifier is empty")]
    EmptyIdentifier,

    #[error("malformed device key: {reason}")]
    MalformedKey { reason: String },
}

/// Every stage of a derivation, for cross-checking against the firmware.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DerivationTrace {
    /// `sha1(identifier)`
    pub h1: String,
    /// `sha1(h1 + SALT)`, the key prefix.
    pub h2: String,
    /// `sha1(h2)`, source of the key suffix.
    pub h3: String,
    /// The derived key.
    pub key: DeviceKey,
}

/// Derive the device key for `identifier`.
pub fn derive(identifier: &str) -> Result<DeviceKey, DeriveError> {
    trace(identifier).map(|t| t.key)
}

/// Derive the device key and keep the intermediate digests.
pub fn trace(identifier: &str) -> Result<DerivationTrace, DeriveError> {
    if identifier.is_empty() {
        return Err(DeriveError::EmptyIdentifier);
    }

    let h1 = sha1_hex(identifier);
    let h2 = sha1_hex(&format!("{h1}{SALT}"));
    let h3 = sha1_hex(&h2);

    let suffix = &h3[h3.len() - SUFFIX_LEN..];
    let key = DeviceKey::from_digest_parts(&h2, suffix);

    tracing::debug!(h1 = %h1, h2 = %h2, h3 = %h3, "derived device key");

    Ok(DerivationTrace { h1, h2, h3, key })
}

/// SHA-1 of the UTF-8 bytes of `text`, as lowercase hex.
fn sha1_hex(text: &str) -> String {
    hex::encode(Sha1::digest(text.as_bytes()))
}
