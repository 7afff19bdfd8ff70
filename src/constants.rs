//! App-wide constants.
//!
//! Centralises the tool name, config paths, default store filenames,
//! and environment variable names so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "devkey";

/// Crate version, as reported by `devkey version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target triple this binary was compiled for (set by `build.rs`).
pub const TARGET: &str = env!("TARGET");

/// Local config filename (e.g. `.devkey.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".devkey.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "devkey";

/// Default filename holding the provisioned device identifier.
pub const DEFAULT_ID_FILE: &str = "DEVICE_ID";

/// Default filename the derived key is written to.
pub const DEFAULT_KEY_FILE: &str = "DEVICE_KEY";

/// Default tracing filter when nothing else is configured.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_ID_FILE: &str = "DEVKEY_ID_FILE";
pub const ENV_KEY_FILE: &str = "DEVKEY_KEY_FILE";
pub const ENV_LOG: &str = "DEVKEY_LOG";
