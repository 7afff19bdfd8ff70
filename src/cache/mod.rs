//! Per-identifier key cache.
//!
//! Memoizes derived keys so a process derives each identifier at most
//! once. The cache is an ordinary value owned by whoever needs it; there
//! is no global state.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::derive::{self, DeriveError, DeviceKey};

/// Outcome of [`KeyCache::get_or_derive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The key was already cached.
    Hit(DeviceKey),
    /// The key was derived by this call.
    Computed(DeviceKey),
}

impl Lookup {
    pub fn key(&self) -> &DeviceKey {
        match self {
            Lookup::Hit(k) | Lookup::Computed(k) => k,
        }
    }

    pub fn into_key(self) -> DeviceKey {
        match self {
            Lookup::Hit(k) | Lookup::Computed(k) => k,
        }
    }

    pub fn was_computed(&self) -> bool {
        matches!(self, Lookup::Computed(_))
    }
}

/// Derived keys keyed by device identifier.
#[derive(Debug, Default)]
pub struct KeyCache {
    entries: Mutex<HashMap<String, DeviceKey>>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached key for `identifier`, deriving and storing it on a miss.
    ///
    /// The lock is held across lookup and derivation, so concurrent callers
    /// with the same identifier see exactly one `Computed`.
    pub fn get_or_derive(&self, identifier: &str) -> Result<Lookup, DeriveError> {
        let mut entries = self.lock();
        if let Some(key) = entries.get(identifier) {
            tracing::debug!("device key cache hit");
            return Ok(Lookup::Hit(key.clone()));
        }

        let key = derive::derive(identifier)?;
        entries.insert(identifier.to_string(), key.clone());
        Ok(Lookup::Computed(key))
    }

    /// Cached key for `identifier`, without deriving.
    pub fn get(&self, identifier: &str) -> Option<DeviceKey> {
        self.lock().get(identifier).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached key.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, DeviceKey>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
