//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across the Rust components (analyzer, benches).
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`TESSERA_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults
//!
//! Command-line flags of the binaries sit above all of these.
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! TESSERA_<SECTION>_<KEY>=value
//!
//! Examples:
//!     TESSERA_COMMON_ENV_ID=connect4
//!     TESSERA_COMMON_LOG_LEVEL=debug
//!     TESSERA_MCTS_NUM_SIMULATIONS=800
//!     TESSERA_MCTS_C_PUCT=1.5
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_config_with_source, load_from_path, try_load_from_path,
    ConfigLoadError, ConfigSource, CONFIG_PATH_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
