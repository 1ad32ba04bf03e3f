//! Coordinator parameters.
//!
//! [`CoordinatorParams`] groups the static knobs of one coordinator run. The
//! infrastructure layer builds it from the file configuration; tests build it
//! directly with the `with_*` methods.

use orchestra_domain::{ExecutionMode, FailurePolicy, RevisionPolicy, SkillConfig};
use std::time::Duration;

/// Default cap on concurrently dispatched groups.
pub const DEFAULT_MAX_PARALLEL: usize = 4;

/// Dispatch, revision and completion parameters.
#[derive(Debug, Clone)]
pub struct CoordinatorParams {
    /// Maximum number of groups with an open dispatch.
    pub max_parallel: usize,
    /// Revision ceiling applied by the registry.
    pub revision_policy: RevisionPolicy,
    /// Whether failed groups may be accepted at validation.
    pub failure_policy: FailurePolicy,
    /// Per-invocation timeout; `None` waits indefinitely.
    pub agent_timeout: Option<Duration>,
    /// How many times validation may send the session back to execution.
    pub max_validation_rounds: u32,
    /// Mandatory skills passed along with each request.
    pub skills: SkillConfig,
}

impl Default for CoordinatorParams {
    fn default() -> Self {
        Self {
            max_parallel: DEFAULT_MAX_PARALLEL,
            revision_policy: RevisionPolicy::default(),
            failure_policy: FailurePolicy::default(),
            agent_timeout: Some(Duration::from_secs(600)),
            max_validation_rounds: 3,
            skills: SkillConfig::default(),
        }
    }
}

impl CoordinatorParams {
    pub fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::from_max_parallel(self.max_parallel)
    }

    // ==================== Builder Methods ====================

    pub fn with_max_parallel(mut self, max: usize) -> Self {
        self.max_parallel = max;
        self
    }

    pub fn with_max_revisions(mut self, max: u32) -> Self {
        self.revision_policy = RevisionPolicy::new(max);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_max_validation_rounds(mut self, rounds: u32) -> Self {
        self.max_validation_rounds = rounds;
        self
    }

    pub fn with_skills(mut self, skills: SkillConfig) -> Self {
        self.skills = skills;
        self
    }
}
