//! Configuration loading logic.
//!
//! Resolves which config file applies, reads it, and layers environment
//! variable overrides on top. Only [`try_load_from_path`] reports failures;
//! the other entry points degrade to the built-in defaults with a warning.

use crate::CentralConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "TESSERA_CONFIG";

/// Failure to read or parse a config file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// File named by `TESSERA_CONFIG`.
    EnvPath(PathBuf),
    /// First existing entry of [`CONFIG_SEARCH_PATHS`].
    SearchPath(PathBuf),
    /// Built-in defaults, either because no file exists or it was unusable.
    Defaults,
}

impl ConfigSource {
    /// The file behind this source, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::EnvPath(path) | ConfigSource::SearchPath(path) => Some(path),
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::EnvPath(path) => write!(f, "{} ({})", path.display(), CONFIG_PATH_VAR),
            ConfigSource::SearchPath(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by TESSERA_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    load_config_with_source().0
}

/// [`load_config`], also reporting which source was used.
pub fn load_config_with_source() -> (CentralConfig, ConfigSource) {
    if let Some(source) = locate_config() {
        if let Some(path) = source.path() {
            info!("Loading config from {}", source);
            let loaded = try_load_from_path(path);
            return match loaded {
                Ok(config) => (config, source),
                Err(e) => {
                    warn!("{}, using defaults", e);
                    (
                        apply_env_overrides(CentralConfig::default()),
                        ConfigSource::Defaults,
                    )
                }
            };
        }
    }

    debug!("No config.toml found, using built-in defaults");
    (
        apply_env_overrides(CentralConfig::default()),
        ConfigSource::Defaults,
    )
}

/// Resolve the config file to load, if any.
fn locate_config() -> Option<ConfigSource> {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(ConfigSource::EnvPath(path));
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_VAR,
            path.display()
        );
    }

    CONFIG_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
        .map(ConfigSource::SearchPath)
}

/// Load configuration from a specific path, falling back to the defaults
/// (with a warning) if the file cannot be read or parsed.
pub fn load_from_path(path: &Path) -> CentralConfig {
    try_load_from_path(path).unwrap_or_else(|e| {
        warn!("{}, using defaults", e);
        apply_env_overrides(CentralConfig::default())
    })
}

/// Load configuration from a specific path, with environment overrides.
pub fn try_load_from_path(path: &Path) -> Result<CentralConfig, ConfigLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(apply_env_overrides(config))
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field; unparsable values are ignored with a warning
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!("Ignoring {}={:?}: not a valid value", $key, raw),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: TESSERA_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    env_override!(config, common.env_id, "TESSERA_COMMON_ENV_ID");
    env_override!(config, common.log_level, "TESSERA_COMMON_LOG_LEVEL");

    env_override!(config, mcts.num_simulations, "TESSERA_MCTS_NUM_SIMULATIONS", parse);
    env_override!(config, mcts.c_puct, "TESSERA_MCTS_C_PUCT", parse);
    env_override!(config, mcts.temperature, "TESSERA_MCTS_TEMPERATURE", parse);

    config
}
