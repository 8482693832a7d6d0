//! Configuration file loading for consensus-oracle
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ORACLE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./oracle.toml` or `./.oracle.toml`
//! 4. Global: `$XDG_CONFIG_HOME/consensus-oracle/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEngineConfig, FileOutputConfig, FileQueryConfig,
    FileResponderConfig,
};
pub use loader::ConfigLoader;
