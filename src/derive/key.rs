//! The derived key type.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::{DeriveError, KEY_LEN};

/// A 42-character lowercase hex device key.
///
/// Only produced by derivation or by parsing text that has the right shape,
/// so holders can rely on the format.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DeviceKey(String);

impl DeviceKey {
    /// Assemble a key from the `h2` digest and the `h3` suffix.
    pub(super) fn from_digest_parts(prefix: &str, suffix: &str) -> Self {
        let mut key = String::with_capacity(KEY_LEN);
        key.push_str(prefix);
        key.push_str(suffix);
        Self(key)
    }

    /// The key as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for DeviceKey {
    type Err = DeriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != KEY_LEN {
            return Err(DeriveError::MalformedKey {
                reason: format!("expected {KEY_LEN} characters, found {}", s.len()),
            });
        }
        if let Some(c) = s.chars().find(|c| !matches!(c, '0'..='9' | 'a'..='f')) {
            return Err(DeriveError::MalformedKey {
                reason: format!("unexpected character {c:?}"),
            });
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Keeps the key out of `{:?}` output in logs and error chains.
impl fmt::Debug for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceKey({}…)", &self.0[..6.min(self.0.len())])
    }
}

impl Serialize for DeviceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
