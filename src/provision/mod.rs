//! Provisioning flow: read identifier, derive (or reuse) the key, persist it.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use thiserror::Error;

use crate::cache::KeyCache;
use crate::derive::{DeriveError, DeviceKey};
use crate::store::{IdentifierSource, KeySink, StoreError};

/// Errors during provisioning or verification.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Derive(#[from] DeriveError),
}

/// Result of [`Provisioner::provision`].
#[derive(Debug, Clone, Serialize)]
pub struct Provisioned {
    pub device_id: String,
    pub device_key: DeviceKey,
    /// `true` when the key was written to the sink by this call.
    pub fresh: bool,
    /// Where the key is persisted.
    pub key_location: String,
}

/// Result of [`Provisioner::verify`].
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub device_id: String,
    pub expected: DeviceKey,
    pub stored: DeviceKey,
    pub matches: bool,
    pub key_location: String,
}

/// Derives and persists the key for the identifier found in `source`.
///
/// Owns a [`KeyCache`], so each identifier is derived at most once. The
/// sink is written whenever the current identifier is not the one this
/// provisioner last persisted successfully.
pub struct Provisioner<S, K> {
    source: S,
    sink: K,
    cache: KeyCache,
    persisted: Mutex<Option<String>>,
}

impl<S: IdentifierSource, K: KeySink> Provisioner<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        Self {
            source,
            sink,
            cache: KeyCache::new(),
            persisted: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn cache(&self) -> &KeyCache {
        &self.cache
    }

    /// Read the device identifier from the source.
    pub fn identifier(&self) -> Result<String, ProvisionError> {
        Ok(self.source.read_identifier()?)
    }

    /// Compute or fetch the key and persist it unless the sink already
    /// holds this identifier's key from an earlier call.
    pub fn provision(&self) -> Result<Provisioned, ProvisionError> {
        let device_id = self.identifier()?;
        let lookup = self.cache.get_or_derive(&device_id)?;

        // Held across the write so concurrent calls agree on what the sink holds.
        let mut persisted = self.persisted();
        let fresh = persisted.as_deref() != Some(device_id.as_str());
        if fresh {
            // Forget the previous identifier first: a failed write may have
            // clobbered it.
            *persisted = None;
            self.sink.write_key(lookup.key())?;
            *persisted = Some(device_id.clone());
        }
        drop(persisted);

        tracing::info!(
            source = %self.source.location(),
            sink = %self.sink.location(),
            fresh,
            "device key provisioned"
        );

        Ok(Provisioned {
            device_id,
            device_key: lookup.into_key(),
            fresh,
            key_location: self.sink.location(),
        })
    }

    fn persisted(&self) -> MutexGuard<'_, Option<String>> {
        self.persisted.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Compare the persisted key against a derivation from the current identifier.
    pub fn verify(&self) -> Result<Verification, ProvisionError> {
        let device_id = self.identifier()?;
        let expected = self.cache.get_or_derive(&device_id)?.into_key();
        let stored = self.sink.read_key()?;
        let matches = expected == stored;

        if !matches {
            tracing::warn!(sink = %self.sink.location(), "persisted device key does not match");
        }

        Ok(Verification {
            device_id,
            expected,
            stored,
            matches,
            key_location: self.sink.location(),
        })
    }
}
