//! Coordinator configuration from TOML (`[coordinator]` section)

use orchestra_domain::{ConfigIssue, ConfigIssueCode, FailurePolicy};
use serde::{Deserialize, Serialize};

/// Raw coordinator configuration from TOML
///
/// # Example
///
/// ```toml
/// [coordinator]
/// max_parallel = 4                # groups with an open dispatch at once
/// max_revisions = 3               # retry cycles per group before it fails
/// failure_policy = "strict"       # "strict" or "tolerate_failed"
/// max_validation_rounds = 3       # gap refills before giving up
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCoordinatorConfig {
    pub max_parallel: usize,
    pub max_revisions: u32,
    /// Failure policy: "strict" or "tolerate_failed"
    pub failure_policy: String,
    pub max_validation_rounds: u32,
}

impl Default for FileCoordinatorConfig {
    fn default() -> Self {
        Self {
            max_parallel: 4,
            max_revisions: 3,
            failure_policy: "strict".to_string(),
            max_validation_rounds: 3,
        }
    }
}

impl FileCoordinatorConfig {
    /// Parse failure_policy into FailurePolicy, returning an error issue on failure.
    pub fn parse_failure_policy(&self) -> (FailurePolicy, Vec<ConfigIssue>) {
        match self.failure_policy.parse::<FailurePolicy>() {
            Ok(policy) => (policy, vec![]),
            Err(_) => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue,
                    format!(
                        "coordinator.failure_policy: unknown value '{}' (expected 'strict' or 'tolerate_failed')",
                        self.failure_policy
                    ),
                );
                (FailurePolicy::default(), vec![issue])
            }
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_failure_policy().1;

        if self.max_parallel == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroMaxParallel,
                "coordinator.max_parallel must be at least 1",
            ));
        }
        if self.max_revisions == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroMaxRevisions,
                "coordinator.max_revisions is 0: the first rejection fails a group",
            ));
        }
        if self.max_validation_rounds == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroValidationRounds,
                "coordinator.max_validation_rounds is 0: scope gaps are reported, never refilled",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinator_config_default_is_clean() {
        let config = FileCoordinatorConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.parse_failure_policy().0, FailurePolicy::Strict);
    }

    #[test]
    fn test_parse_failure_policy_aliases() {
        let config = FileCoordinatorConfig {
            failure_policy: "tolerate".to_string(),
            ..Default::default()
        };
        assert_eq!(config.parse_failure_policy().0, FailurePolicy::TolerateFailed);
    }

    #[test]
    fn test_unknown_failure_policy_is_error() {
        let config = FileCoordinatorConfig {
            failure_policy: "lenient".to_string(),
            ..Default::default()
        };
        let (policy, issues) = config.parse_failure_policy();
        assert_eq!(policy, FailurePolicy::Strict);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert!(issues[0].message.contains("lenient"));
    }

    #[test]
    fn test_zero_values() {
        let config = FileCoordinatorConfig {
            max_parallel: 0,
            max_revisions: 0,
            max_validation_rounds: 0,
            ..Default::default()
        };
        let codes: Vec<_> = config.validate().iter().map(|i| (i.code, i.is_error())).collect();
        assert_eq!(
            codes,
            vec![
                (ConfigIssueCode::ZeroMaxParallel, true),
                (ConfigIssueCode::ZeroMaxRevisions, false),
                (ConfigIssueCode::ZeroValidationRounds, false),
            ]
        );
    }
}
