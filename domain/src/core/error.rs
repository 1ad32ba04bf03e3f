//! Domain error types

use super::ids::{GroupId, SessionId};
use crate::agent::role::AgentRole;
use crate::group::status::GroupStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),

    #[error("Unknown task group: {0}")]
    UnknownGroup(GroupId),

    #[error("Invalid transition for group {group}: {expected} -> {to} (current status: {actual})")]
    InvalidTransition {
        group: GroupId,
        expected: GroupStatus,
        actual: GroupStatus,
        to: GroupStatus,
    },

    #[error("Group {0} cannot complete without a recorded approval")]
    ApprovalMissing(GroupId),

    #[error("Group {0} already has an open dispatch")]
    AlreadyDispatched(GroupId),

    #[error("Group {group} has no open {reported} dispatch (open: {open:?})")]
    DispatchMismatch {
        group: GroupId,
        open: Option<AgentRole>,
        reported: AgentRole,
    },

    #[error("Group {group} is {status}, expected in_progress")]
    NotInProgress { group: GroupId, status: GroupStatus },

    #[error("Group {group} exceeded its revision limit of {limit}")]
    RevisionLimitExceeded { group: GroupId, limit: u32 },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Whether the caller may re-read current state and try again.
    ///
    /// Only optimistic-concurrency conflicts qualify; everything else is a
    /// caller bug or a terminal condition.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }

    pub fn is_revision_limit(&self) -> bool {
        matches!(self, DomainError::RevisionLimitExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_invalid_transition_display() {
        let error = DomainError::InvalidTransition {
            group: GroupId::new("g1"),
            expected: GroupStatus::Pending,
            actual: GroupStatus::Completed,
            to: GroupStatus::InProgress,
        };
        assert_eq!(
            error.to_string(),
            "Invalid transition for group g1: pending -> in_progress (current status: completed)"
        );
    }

    #[test]
    fn test_only_transition_conflicts_are_retryable() {
        let conflict = DomainError::InvalidTransition {
            group: GroupId::new("g1"),
            expected: GroupStatus::Pending,
            actual: GroupStatus::InProgress,
            to: GroupStatus::InProgress,
        };
        assert!(conflict.is_retryable());
        assert!(!DomainError::UnknownGroup(GroupId::new("g9")).is_retryable());
        assert!(!DomainError::InvalidScope("empty".into()).is_retryable());
        assert!(
            !DomainError::RevisionLimitExceeded {
                group: GroupId::new("g1"),
                limit: 3
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_dispatch_mismatch_display() {
        let error = DomainError::DispatchMismatch {
            group: GroupId::new("g2"),
            open: Some(AgentRole::Developer),
            reported: AgentRole::TechLead,
        };
        assert_eq!(
            error.to_string(),
            "Group g2 has no open Tech Lead dispatch (open: Some(Developer))"
        );
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::ApprovalMissing(GroupId::new("g1")).is_cancelled());
    }
}
