//! In-memory store, used as a stand-in for files in tests and embedding.

use std::io;
use std::sync::Mutex;

use super::{IdentifierSource, KeySink, StoreError, parse_identifier, parse_key};
use crate::derive::DeviceKey;

const LOCATION: &str = "<memory>";

/// Holds an identifier and a key in memory.
///
/// Implements both [`IdentifierSource`] and [`KeySink`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    identifier: Mutex<Option<String>>,
    key: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    /// An empty store: reading the identifier fails with `SourceMissing`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with raw identifier content.
    pub fn with_identifier(raw: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_identifier(raw);
        store
    }

    /// Replace the raw identifier content.
    pub fn set_identifier(&self, raw: impl Into<String>) {
        *lock(&self.identifier) = Some(raw.into());
    }

    /// Raw key text as last written, if any.
    pub fn raw_key(&self) -> Option<String> {
        lock(&self.key).clone()
    }

    /// Overwrite the raw key text without validation.
    pub fn set_raw_key(&self, raw: impl Into<String>) {
        *lock(&self.key) = Some(raw.into());
    }

    /// Number of successful `write_key` calls.
    pub fn write_count(&self) -> usize {
        *lock(&self.writes)
    }
}

impl IdentifierSource for MemoryStore {
    fn read_identifier(&self) -> Result<String, StoreError> {
        let raw = lock(&self.identifier).clone().ok_or_else(|| StoreError::SourceMissing {
            location: LOCATION.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no identifier set"),
        })?;
        parse_identifier(&raw, LOCATION)
    }

    fn location(&self) -> String {
        LOCATION.to_string()
    }
}

impl KeySink for MemoryStore {
    fn write_key(&self, key: &DeviceKey) -> Result<(), StoreError> {
        *lock(&self.key) = Some(key.as_str().to_string());
        *lock(&self.writes) += 1;
        Ok(())
    }

    fn read_key(&self) -> Result<DeviceKey, StoreError> {
        let raw = lock(&self.key).clone().ok_or_else(|| StoreError::KeyMissing {
            location: LOCATION.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no key written"),
        })?;
        parse_key(&raw, LOCATION)
    }

    fn location(&self) -> String {
        LOCATION.to_string()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
