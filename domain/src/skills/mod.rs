//! Skill availability map.
//!
//! A flat per-role map deciding which auxiliary checks an agent must run:
//!
//! ```json
//! {
//!   "developer": { "lint-check": "mandatory", "codebase-analysis": "disabled" },
//!   "tech_lead": { "security-scan": "mandatory" }
//! }
//! ```
//!
//! Role keys accept the same aliases as [`AgentRole`]'s `FromStr`.

use crate::agent::role::AgentRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a skill runs for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillMode {
    Mandatory,
    Disabled,
}

type RawSkillMap = BTreeMap<String, BTreeMap<String, SkillMode>>;

/// Per-role skill configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSkillMap", into = "RawSkillMap")]
pub struct SkillConfig {
    roles: BTreeMap<AgentRole, BTreeMap<String, SkillMode>>,
}

impl SkillConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skill(mut self, role: AgentRole, skill: impl Into<String>, mode: SkillMode) -> Self {
        self.roles.entry(role).or_default().insert(skill.into(), mode);
        self
    }

    pub fn mode(&self, role: AgentRole, skill: &str) -> Option<SkillMode> {
        self.roles.get(&role).and_then(|skills| skills.get(skill)).copied()
    }

    /// Mandatory skills for `role`, in name order.
    pub fn enabled_for(&self, role: AgentRole) -> Vec<String> {
        self.roles
            .get(&role)
            .map(|skills| {
                skills
                    .iter()
                    .filter(|(_, mode)| **mode == SkillMode::Mandatory)
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.values().all(|skills| skills.is_empty())
    }
}

impl TryFrom<RawSkillMap> for SkillConfig {
    type Error = String;

    fn try_from(raw: RawSkillMap) -> Result<Self, Self::Error> {
        let mut roles: BTreeMap<AgentRole, BTreeMap<String, SkillMode>> = BTreeMap::new();
        for (key, skills) in raw {
            let role: AgentRole = key.parse()?;
            roles.entry(role).or_default().extend(skills);
        }
        Ok(Self { roles })
    }
}

impl From<SkillConfig> for RawSkillMap {
    fn from(config: SkillConfig) -> Self {
        config
            .roles
            .into_iter()
            .map(|(role, skills)| (role.as_str().to_string(), skills))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_aliases() {
        let json = r#"{
            "developer": { "lint-check": "mandatory", "codebase-analysis": "disabled" },
            "qa_expert": { "pattern-miner": "mandatory" },
            "tl": { "security-scan": "mandatory", "api-diff": "mandatory" }
        }"#;
        let config: SkillConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.enabled_for(AgentRole::Developer), vec!["lint-check"]);
        assert_eq!(config.enabled_for(AgentRole::Qa), vec!["pattern-miner"]);
        assert_eq!(
            config.enabled_for(AgentRole::TechLead),
            vec!["api-diff", "security-scan"]
        );
        assert!(config.enabled_for(AgentRole::ProjectManager).is_empty());
        assert_eq!(
            config.mode(AgentRole::Developer, "codebase-analysis"),
            Some(SkillMode::Disabled)
        );
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = serde_json::from_str::<SkillConfig>(r#"{"designer": {}}"#).unwrap_err();
        assert!(err.to_string().contains("designer"));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(serde_json::from_str::<SkillConfig>(r#"{"qa": {"x": "optional"}}"#).is_err());
    }

    #[test]
    fn test_serializes_canonical_role_names() {
        let config = SkillConfig::new().with_skill(AgentRole::TechLead, "security-scan", SkillMode::Mandatory);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["tech_lead"]["security-scan"], "mandatory");
        assert!(!config.is_empty());
        assert!(SkillConfig::new().is_empty());
    }
}
