//! Output renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use std::path::PathBuf;

use crate::config::Config;
use crate::derive::{DerivationTrace, DeviceKey};
use crate::provision::{Provisioned, Verification};

/// Everything a command can print.
#[derive(Debug, Clone)]
pub enum Report {
    /// `generate`: key derived (or reused) and persisted.
    Provisioned(Provisioned),
    /// `compute`: pure derivation of a literal identifier.
    Computed {
        device_id: String,
        trace: DerivationTrace,
        show_trace: bool,
    },
    /// `verify`: persisted key compared to a fresh derivation.
    Verified(Verification),
    /// `show`: the persisted key.
    Stored {
        key_location: String,
        device_key: DeviceKey,
    },
    /// `config`: the resolved configuration.
    Config {
        config: Config,
        id_path: PathBuf,
        key_path: PathBuf,
    },
}

/// Trait for rendering a report to an output format.
pub trait OutputRenderer {
    /// Render the report to a string.
    fn render(&self, report: &Report) -> String;
}
