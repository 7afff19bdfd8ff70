//! Identifier sources and key sinks.
//!
//! The deriver itself does no I/O. These traits describe where the
//! identifier comes from and where the key goes, so the provisioning
//! flow can run against files in production and memory in tests.

pub mod file;
pub mod memory;

use std::io;

use thiserror::Error;

use crate::derive::{DeriveError, DeviceKey};

pub use file::{FileSink, FileSource};
pub use memory::MemoryStore;

/// Errors raised by stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("device identifier source not found or unreadable: {location}")]
    SourceMissing {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error(
        "device identifier source is empty: {location}\n\
         Populate it with a valid device identifier and try again."
    )]
    EmptyIdentifier { location: String },

    #[error("device key not found or unreadable: {location}")]
    KeyMissing {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("device key at {location} is malformed")]
    MalformedKey {
        location: String,
        #[source]
        source: DeriveError,
    },

    #[error("failed to write device key to {location}")]
    WriteFailed {
        location: String,
        #[source]
        source: io::Error,
    },
}

/// Where the device identifier is read from.
pub trait IdentifierSource {
    /// Read the identifier, trimmed of surrounding whitespace.
    ///
    /// Fails with [`StoreError::SourceMissing`] when the source is absent
    /// and [`StoreError::EmptyIdentifier`] when nothing usable is left
    /// after trimming.
    fn read_identifier(&self) -> Result<String, StoreError>;

    /// Human-readable location, for messages.
    fn location(&self) -> String;
}

/// Where the derived key is persisted.
pub trait KeySink {
    /// Overwrite the sink with exactly the key text.
    fn write_key(&self, key: &DeviceKey) -> Result<(), StoreError>;

    /// Read the persisted key back.
    fn read_key(&self) -> Result<DeviceKey, StoreError>;

    /// Human-readable location, for messages.
    fn location(&self) -> String;
}

/// Trim raw source content into an identifier.
///
/// Strips Unicode whitespace plus the ASCII information separators
/// U+001C..=U+001F, the same set Python's `str.strip()` removes.
pub(crate) fn parse_identifier(raw: &str, location: &str) -> Result<String, StoreError> {
    let trimmed = raw.trim_matches(is_blank);
    if trimmed.is_empty() {
        return Err(StoreError::EmptyIdentifier {
            location: location.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Parse persisted text into a key, byte for byte.
pub(crate) fn parse_key(raw: &str, location: &str) -> Result<DeviceKey, StoreError> {
    raw.parse().map_err(|source| StoreError::MalformedKey {
        location: location.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_identifier_trims_newline() {
        assert_eq!(parse_identifier("ABC123\n", "mem").unwrap(), "ABC123");
    }

    #[test]
    fn parse_identifier_trims_crlf_and_spaces() {
        assert_eq!(parse_identifier("  ABC123 \r\n", "mem").unwrap(), "ABC123");
    }

    #[test]
    fn parse_identifier_keeps_interior_whitespace() {
        assert_eq!(parse_identifier("unit 7\n", "mem").unwrap(), "unit 7");
    }

    #[test]
    fn parse_identifier_trims_ascii_separators() {
        assert_eq!(parse_identifier("\u{1c}ABC123\u{1f}\n", "mem").unwrap(), "ABC123");
        assert_eq!(parse_identifier("ABC123\u{1e}\u{1d}", "mem").unwrap(), "ABC123");
    }

    #[test]
    fn parse_identifier_rejects_blank() {
        for raw in ["", "\n", "   \t\r\n", "\u{1f}\n"] {
            let err = parse_identifier(raw, "mem").unwrap_err();
            assert!(matches!(err, StoreError::EmptyIdentifier { .. }), "raw: {raw:?}");
        }
    }

    #[test]
    fn empty_identifier_message_tells_operator_what_to_do() {
        let err = parse_identifier("", "/tmp/DEVICE_ID").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/tmp/DEVICE_ID"), "got: {msg}");
        assert!(msg.contains("Populate"), "got: {msg}");
    }

    #[test]
    fn parse_key_rejects_whitespace() {
        let err = parse_key("22af9bb3596029e03316ff0915c9317bc656ef7351\n", "mem").unwrap_err();
        assert!(matches!(err, StoreError::MalformedKey { .. }));
    }
}
