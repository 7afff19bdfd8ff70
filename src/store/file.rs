//! Filesystem-backed stores.
//!
//! The identifier is a plain text file; the key is written as exactly
//! 42 characters with no trailing newline.

use std::path::{Path, PathBuf};

use super::{IdentifierSource, KeySink, StoreError, parse_identifier, parse_key};
use crate::derive::DeviceKey;

/// Reads the device identifier from a text file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentifierSource for FileSource {
    fn read_identifier(&self) -> Result<String, StoreError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| StoreError::SourceMissing {
                location: self.location(),
                source,
            })?;
        parse_identifier(&content, &self.location())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Persists the derived key to a text file.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeySink for FileSink {
    fn write_key(&self, key: &DeviceKey) -> Result<(), StoreError> {
        let write_failed = |source| StoreError::WriteFailed {
            location: self.location(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_failed)?;
        }
        std::fs::write(&self.path, key.as_str()).map_err(write_failed)?;

        tracing::info!(path = %self.path.display(), "device key written");
        Ok(())
    }

    fn read_key(&self) -> Result<DeviceKey, StoreError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| StoreError::KeyMissing {
                location: self.location(),
                source,
            })?;
        parse_key(&content, &self.location())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
