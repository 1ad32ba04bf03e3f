//! Session-level policies.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How validation treats groups that ended `failed`.
///
/// There is no implicit acceptance: a session with failed groups only
/// completes when the caller opted into [`FailurePolicy::TolerateFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Failed groups block completion and are reported for human attention
    #[default]
    Strict,
    /// Failed groups are accepted; the session completes and reports them
    TolerateFailed,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &str {
        match self {
            FailurePolicy::Strict => "strict",
            FailurePolicy::TolerateFailed => "tolerate_failed",
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "strict" => Ok(FailurePolicy::Strict),
            "tolerate" | "tolerate_failed" => Ok(FailurePolicy::TolerateFailed),
            other => Err(format!("unknown failure policy: {}", other)),
        }
    }
}

/// Dispatch mode of a session.
///
/// Chosen from configuration (the concurrency cap), never inferred from the
/// scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One group at a time
    Simple,
    /// Several groups dispatched concurrently
    Parallel,
}

impl ExecutionMode {
    pub fn from_max_parallel(max_parallel: usize) -> Self {
        if max_parallel <= 1 {
            ExecutionMode::Simple
        } else {
            ExecutionMode::Parallel
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExecutionMode::Simple => "simple",
            ExecutionMode::Parallel => "parallel",
        }
    }
}
