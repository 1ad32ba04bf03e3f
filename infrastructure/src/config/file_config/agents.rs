//! Agent process configuration from TOML (`[agents]` section)

use orchestra_domain::{AgentRole, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Command line used to start one agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentCommand {
    pub command: String,
    pub args: Vec<String>,
}

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agents]
/// command = "claude"              # default for every role
/// args = ["--print"]
/// timeout_secs = 600
/// workdir = "."
///
/// [agents.tech_lead]              # per-role override
/// command = "claude"
/// args = ["--print", "--model", "opus"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    /// Default command for roles without an override
    pub command: Option<String>,
    pub args: Vec<String>,
    /// Per-invocation timeout; 0 is rejected
    pub timeout_secs: u64,
    /// Working directory for agent processes
    pub workdir: Option<PathBuf>,
    pub developer: Option<FileAgentCommand>,
    pub qa: Option<FileAgentCommand>,
    pub tech_lead: Option<FileAgentCommand>,
}

impl Default for FileAgentsConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: 600,
            workdir: None,
            developer: None,
            qa: None,
            tech_lead: None,
        }
    }
}

impl FileAgentsConfig {
    /// Command for `role`: the role override if present, else the default.
    pub fn command_for(&self, role: AgentRole) -> Option<FileAgentCommand> {
        let override_ = match role {
            AgentRole::Developer => self.developer.as_ref(),
            AgentRole::Qa => self.qa.as_ref(),
            AgentRole::TechLead => self.tech_lead.as_ref(),
            AgentRole::ProjectManager => None,
        };
        override_.cloned().or_else(|| {
            self.command.as_ref().map(|command| FileAgentCommand {
                command: command.clone(),
                args: self.args.clone(),
            })
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroAgentTimeout,
                "agents.timeout_secs cannot be 0",
            ));
        }
        if let Some(command) = &self.command
            && command.trim().is_empty()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyAgentCommand,
                "agents.command cannot be empty",
            ));
        }
        let overrides = [
            ("developer", &self.developer),
            ("qa", &self.qa),
            ("tech_lead", &self.tech_lead),
        ];
        for (name, entry) in overrides {
            if let Some(entry) = entry
                && entry.command.trim().is_empty()
            {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyAgentCommand,
                    format!("agents.{}.command cannot be empty", name),
                ));
            }
        }
        issues
    }
}
