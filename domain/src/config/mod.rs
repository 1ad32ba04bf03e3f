//! Structured configuration issues.
//!
//! Configuration is validated as a whole before a session starts. Each
//! problem is reported as a [`ConfigIssue`] with a severity, so callers can
//! print warnings and refuse to start only on errors.
//!
//! # Examples
//!
//! ```
//! use orchestra_domain::config::{ConfigIssue, ConfigIssueCode, Severity, has_errors};
//!
//! let issues = vec![ConfigIssue::warning(
//!     ConfigIssueCode::ZeroMaxRevisions,
//!     "every rejection fails the group",
//! )];
//! assert!(!has_errors(&issues));
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the coordinator cannot start with this configuration.
    Error,
    /// Non-fatal: the run works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `coordinator.max_parallel` is zero; nothing could ever be dispatched.
    ZeroMaxParallel,
    /// `coordinator.max_revisions` is zero; every rejection fails the group.
    ZeroMaxRevisions,
    /// `coordinator.max_validation_rounds` is zero; gaps can never be filled.
    ZeroValidationRounds,
    /// An enum-valued string did not parse.
    InvalidEnumValue,
    /// An agent command is empty.
    EmptyAgentCommand,
    /// `agents.timeout_secs` is zero.
    ZeroAgentTimeout,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// True if any issue is an error.
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(ConfigIssue::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors() {
        let warning = ConfigIssue::warning(ConfigIssueCode::ZeroMaxRevisions, "no revisions");
        let error = ConfigIssue::error(ConfigIssueCode::ZeroMaxParallel, "max_parallel is 0");

        assert!(!has_errors(&[]));
        assert!(!has_errors(std::slice::from_ref(&warning)));
        assert!(has_errors(&[warning, error]));
    }

    #[test]
    fn test_display_prefixes_severity() {
        let issue = ConfigIssue::error(ConfigIssueCode::EmptyAgentCommand, "agents.developer is empty");
        assert_eq!(issue.to_string(), "error: agents.developer is empty");
    }
}
