//! Configuration file loading for orchestra
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ORCHESTRA_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./orchestra.toml` or `./.orchestra.toml`
//! 4. Global: `$XDG_CONFIG_HOME/orchestra/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentCommand, FileAgentsConfig, FileConfig, FileCoordinatorConfig,
    FileLoggingConfig, FileSkillsConfig, FileStateConfig,
};
pub use loader::ConfigLoader;
