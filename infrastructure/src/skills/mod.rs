//! Skill map loading.
//!
//! Reads the per-role JSON skill map into a [`SkillConfig`]. Role names and
//! modes are validated while deserializing.

use orchestra_domain::SkillConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading a skill map
#[derive(Error, Debug)]
pub enum SkillConfigError {
    #[error("Failed to read skill map {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid skill map {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads the skill map at `path`.
pub fn load_skill_config(path: &Path) -> Result<SkillConfig, SkillConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| SkillConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SkillConfig =
        serde_json::from_str(&text).map_err(|source| SkillConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("Loaded skill map from {}", path.display());
    Ok(config)
}

/// Loads the skill map if a path is configured, otherwise no skills.
pub fn load_optional(path: Option<&Path>) -> Result<SkillConfig, SkillConfigError> {
    match path {
        Some(path) => load_skill_config(path),
        None => Ok(SkillConfig::default()),
    }
}
