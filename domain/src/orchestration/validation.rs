//! Completion validation against the original scope.
//!
//! Runs once the dispatch queue is drained. It deliberately looks at the
//! registry's counts and the scope recorded at session creation, not at the
//! plan, so a plan that under-delivered the scope is caught here.

use super::policy::FailurePolicy;
use crate::group::entities::TaskGroup;
use crate::group::status::GroupStatus;
use serde::{Deserialize, Serialize};

/// Per-status group counts for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounts {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub failed: usize,
}

impl GroupCounts {
    pub fn from_groups<'a>(groups: impl IntoIterator<Item = &'a TaskGroup>) -> Self {
        let mut counts = Self::default();
        for group in groups {
            counts.total += 1;
            match group.status {
                GroupStatus::Pending => counts.pending += 1,
                GroupStatus::InProgress => counts.in_progress += 1,
                GroupStatus::Completed => counts.completed += 1,
                GroupStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// All groups terminal.
    pub fn is_drained(&self) -> bool {
        self.pending == 0 && self.in_progress == 0
    }
}

/// Result of checking a drained session against its scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeVerdict {
    /// Groups are still pending or in progress
    NotDrained,
    /// Fewer groups finished than the scope asked for; create this many more
    Gap { missing: usize },
    /// Every item is accounted for but some failed and the policy is strict
    BlockedByFailures { failed: usize },
    /// The session may complete; `failed` is non-zero only when tolerated
    Satisfied { failed: usize },
}

/// Scope completion check
#[derive(Debug, Clone, Copy)]
pub struct ScopeCheck {
    pub expected_items: Option<usize>,
    pub policy: FailurePolicy,
}

impl ScopeCheck {
    pub fn new(expected_items: Option<usize>, policy: FailurePolicy) -> Self {
        Self {
            expected_items,
            policy,
        }
    }

    /// Failed groups count as accounted-for items (they are not re-planned),
    /// so a gap only appears when the plan produced too few groups.
    pub fn evaluate(&self, counts: &GroupCounts) -> ScopeVerdict {
        if !counts.is_drained() {
            return ScopeVerdict::NotDrained;
        }

        let accounted = counts.completed + counts.failed;
        let missing = self
            .expected_items
            .map(|expected| expected.saturating_sub(accounted))
            .unwrap_or(0);
        if missing > 0 {
            return ScopeVerdict::Gap { missing };
        }

        match (counts.failed, self.policy) {
            (0, _) => ScopeVerdict::Satisfied { failed: 0 },
            (failed, FailurePolicy::Strict) => ScopeVerdict::BlockedByFailures { failed },
            (failed, FailurePolicy::TolerateFailed) => ScopeVerdict::Satisfied { failed },
        }
    }
}
