//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.devkey.toml` in the working directory
//! 4. `~/.config/devkey/config.toml` (global defaults)
//! 5. Built-in defaults
//!
//! The salt is intentionally not configurable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{DEFAULT_ID_FILE, DEFAULT_KEY_FILE, DEFAULT_LOG_LEVEL};
use crate::env::Env;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub log: LogConfig,
}

/// Locations of the identifier source and key sink.
///
/// Relative paths are resolved against the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub device_id: PathBuf,
    pub device_key: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            device_id: PathBuf::from(DEFAULT_ID_FILE),
            device_key: PathBuf::from(DEFAULT_KEY_FILE),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// A `tracing` filter directive, e.g. `info` or `devkey=debug`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// A loaded config plus the problems noticed while layering it.
///
/// Loading runs before logging is set up, so warnings are handed back for
/// the caller to emit once a subscriber exists.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub config: Config,
    pub warnings: Vec<String>,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, the working-directory config, then applies
    /// environment variable overrides. CLI flags are applied by the caller
    /// through [`Config::apply_overrides`].
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Loaded, ConfigError> {
        let global = Self::global_config_path();
        Self::load_from(global.as_deref(), work_dir, env)
    }

    /// Same as [`Config::load`] with an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        work_dir: Option<&Path>,
        env: &Env,
    ) -> Result<Loaded, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                let global = Self::load_file(global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: working-directory config
        if let Some(dir) = work_dir {
            let local_path = dir.join(crate::constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        let warnings = config.apply_env_vars(env);

        Ok(Loaded { config, warnings })
    }

    /// Apply CLI flag overrides (layer 1).
    pub fn apply_overrides(
        &mut self,
        id_file: Option<PathBuf>,
        key_file: Option<PathBuf>,
        verbose: bool,
    ) {
        if let Some(path) = id_file {
            self.paths.device_id = path;
        }
        if let Some(path) = key_file {
            self.paths.device_key = path;
        }
        if verbose {
            self.log.level = "debug".to_string();
        }
    }

    /// Identifier path resolved against `base`.
    pub fn id_path(&self, base: &Path) -> PathBuf {
        base.join(&self.paths.device_id)
    }

    /// Key path resolved against `base`.
    pub fn key_path(&self, base: &Path) -> PathBuf {
        base.join(&self.paths.device_key)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        let default_paths = PathsConfig::default();
        if other.paths.device_id != default_paths.device_id {
            self.paths.device_id = other.paths.device_id;
        }
        if other.paths.device_key != default_paths.device_key {
            self.paths.device_key = other.paths.device_key;
        }

        if other.log.level != LogConfig::default().level {
            self.log.level = other.log.level;
        }
    }

    /// Apply environment variable overrides, returning warnings for ignored values.
    fn apply_env_vars(&mut self, env: &Env) -> Vec<String> {
        use crate::constants::{ENV_ID_FILE, ENV_KEY_FILE, ENV_LOG};

        let mut warnings = Vec::new();
        let mut ignore_if_empty = |name: &str| {
            if env.var(name).is_ok_and(|v| v.trim().is_empty()) {
                warnings.push(format!("ignoring empty {name} value"));
            }
        };
        ignore_if_empty(ENV_ID_FILE);
        ignore_if_empty(ENV_KEY_FILE);
        ignore_if_empty(ENV_LOG);

        if let Some(path) = env.path(ENV_ID_FILE) {
            self.paths.device_id = path;
        }
        if let Some(path) = env.path(ENV_KEY_FILE) {
            self.paths.device_key = path;
        }
        if let Ok(val) = env.var(ENV_LOG) {
            if !val.trim().is_empty() {
                self.log.level = val;
            }
        }

        warnings
    }
}
