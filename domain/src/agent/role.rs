//! Agent roles.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A named responsibility the coordinator can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Plans the session and breaks the scope into task groups
    ProjectManager,
    /// Implements a task group
    Developer,
    /// Tests a task group
    Qa,
    /// Reviews and approves a task group
    TechLead,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::ProjectManager,
        AgentRole::Developer,
        AgentRole::Qa,
        AgentRole::TechLead,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AgentRole::ProjectManager => "project_manager",
            AgentRole::Developer => "developer",
            AgentRole::Qa => "qa",
            AgentRole::TechLead => "tech_lead",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            AgentRole::ProjectManager => "Project Manager",
            AgentRole::Developer => "Developer",
            AgentRole::Qa => "QA",
            AgentRole::TechLead => "Tech Lead",
        }
    }

    /// Whether this role works on task groups (as opposed to planning).
    pub fn is_group_worker(&self) -> bool {
        !matches!(self, AgentRole::ProjectManager)
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pm" | "project_manager" => Ok(AgentRole::ProjectManager),
            "dev" | "developer" => Ok(AgentRole::Developer),
            "qa" | "qa_expert" => Ok(AgentRole::Qa),
            "tl" | "techlead" | "tech_lead" => Ok(AgentRole::TechLead),
            other => Err(format!("unknown agent role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_aliases() {
        assert_eq!("pm".parse(), Ok(AgentRole::ProjectManager));
        assert_eq!("Developer".parse(), Ok(AgentRole::Developer));
        assert_eq!("qa_expert".parse(), Ok(AgentRole::Qa));
        assert_eq!("tech-lead".parse(), Ok(AgentRole::TechLead));
        assert_eq!("TL".parse(), Ok(AgentRole::TechLead));
        assert!("designer".parse::<AgentRole>().is_err());
    }

    #[test]
    fn test_as_str_parses_back() {
        for role in AgentRole::ALL {
            assert_eq!(role.as_str().parse::<AgentRole>(), Ok(role));
        }
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for role in AgentRole::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_only_pm_is_not_a_group_worker() {
        assert!(!AgentRole::ProjectManager.is_group_worker());
        assert!(AgentRole::Developer.is_group_worker());
        assert!(AgentRole::Qa.is_group_worker());
        assert!(AgentRole::TechLead.is_group_worker());
    }
}
