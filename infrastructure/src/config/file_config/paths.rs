//! File locations from TOML (`[skills]`, `[state]` and `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[skills]`: where the per-role skill map lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSkillsConfig {
    /// JSON skill map; no skills are enabled when unset
    pub path: Option<PathBuf>,
}

/// `[state]`: where session snapshots are written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStateConfig {
    /// Snapshot root; persistence is off when unset
    pub dir: Option<PathBuf>,
}

/// `[logging]`: file outputs next to the console
///
/// ```toml
/// [logging]
/// dir = "~/.local/state/orchestra/logs"   # daily-rotated tracing log
/// audit_file = "orchestra.audit.jsonl"    # one JSON line per event
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub dir: Option<PathBuf>,
    /// Relative paths resolve against `dir` when it is set
    pub audit_file: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// Resolved audit log path, if audit logging is configured.
    pub fn audit_path(&self) -> Option<PathBuf> {
        let file = self.audit_file.as_ref()?;
        match &self.dir {
            Some(dir) if file.is_relative() => Some(dir.join(file)),
            _ => Some(file.clone()),
        }
    }
}
