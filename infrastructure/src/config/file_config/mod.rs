//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enum-valued settings stay strings here and are parsed during validation,
//! so one bad value produces a readable issue instead of a serde error.

mod agents;
mod coordinator;
mod paths;

pub use agents::{FileAgentCommand, FileAgentsConfig};
pub use coordinator::FileCoordinatorConfig;
pub use paths::{FileLoggingConfig, FileSkillsConfig, FileStateConfig};

use orchestra_application::CoordinatorParams;
use orchestra_domain::{ConfigIssue, SkillConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration that cannot be used to start a session
#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("invalid configuration:\n{}", render_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

impl ConfigValidationError {
    pub fn issues(&self) -> &[ConfigIssue] {
        match self {
            ConfigValidationError::Invalid(issues) => issues,
        }
    }
}

fn render_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Scheduling and completion settings
    pub coordinator: FileCoordinatorConfig,
    /// Agent processes
    pub agents: FileAgentsConfig,
    pub skills: FileSkillsConfig,
    pub state: FileStateConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.coordinator.validate();
        issues.extend(self.agents.validate());
        issues
    }

    /// Splits issues into a hard error and the remaining warnings.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let issues = self.validate();
        if orchestra_domain::config::has_errors(&issues) {
            let errors = issues.into_iter().filter(ConfigIssue::is_error).collect();
            return Err(ConfigValidationError::Invalid(errors));
        }
        Ok(issues)
    }

    /// Coordinator parameters for this configuration.
    ///
    /// Invalid enum values fall back to their defaults; call
    /// [`FileConfig::check`] first to reject them.
    pub fn to_params(&self, skills: SkillConfig) -> CoordinatorParams {
        let coordinator = &self.coordinator;
        CoordinatorParams::default()
            .with_max_parallel(coordinator.max_parallel)
            .with_max_revisions(coordinator.max_revisions)
            .with_failure_policy(coordinator.parse_failure_policy().0)
            .with_max_validation_rounds(coordinator.max_validation_rounds)
            .with_agent_timeout(self.agents.timeout())
            .with_skills(skills)
    }
}
