//! Task group entity

use super::policy::RevisionPolicy;
use super::status::GroupStatus;
use crate::agent::outcome::{InvocationOutcome, ReviewOutcome, Route};
use crate::agent::role::AgentRole;
use crate::core::error::DomainError;
use crate::core::ids::{GroupId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a group was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrigin {
    /// Created while planning the session
    #[default]
    Planned,
    /// Created by completion validation to cover a shortfall against the scope
    ScopeGap,
}

/// Why a group ended up `failed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    RevisionLimitExceeded {
        revisions: u32,
        last_feedback: Option<String>,
    },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::RevisionLimitExceeded { revisions, .. } => {
                write!(f, "revision limit exceeded after {} revisions", revisions)
            }
        }
    }
}

/// One unit of schedulable work within a session (Entity).
///
/// The status only moves along [`GroupStatus::can_transition_to`] edges, and
/// only through [`TaskGroup::apply_transition`]. Everything else recorded here
/// (dispatch marker, last review, follow-up role) is bookkeeping the dispatch
/// queue reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGroup {
    pub id: GroupId,
    pub session_id: SessionId,
    pub description: String,
    pub status: GroupStatus,
    /// Role of the most recent dispatch
    pub assigned_role: Option<AgentRole>,
    pub revision_count: u32,
    pub last_review: Option<ReviewOutcome>,
    pub last_feedback: Option<String>,
    /// At least one approval has been recorded
    pub approved: bool,
    /// Creation order across the registry; the FIFO key
    pub sequence: u64,
    pub origin: GroupOrigin,
    pub failure: Option<FailureReason>,
    /// Role of the open dispatch, if any
    pub in_flight: Option<AgentRole>,
    /// Role that should pick the group up next while it is in progress
    pub follow_up: Option<AgentRole>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskGroup {
    pub fn new(
        id: GroupId,
        session_id: SessionId,
        description: impl Into<String>,
        sequence: u64,
        origin: GroupOrigin,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            session_id,
            description: description.into(),
            status: GroupStatus::Pending,
            assigned_role: None,
            revision_count: 0,
            last_review: None,
            last_feedback: None,
            approved: false,
            sequence,
            origin,
            failure: None,
            in_flight: None,
            follow_up: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_dispatched(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Role the group needs next, or `None` if nothing can be dispatched.
    ///
    /// Pending groups always start with the developer unless a follow-up
    /// role was recorded; in-progress groups need an explicit follow-up.
    pub fn next_role(&self) -> Option<AgentRole> {
        if self.is_dispatched() {
            return None;
        }
        match self.status {
            GroupStatus::Pending => Some(self.follow_up.unwrap_or(AgentRole::Developer)),
            GroupStatus::InProgress => self.follow_up,
            GroupStatus::Completed | GroupStatus::Failed => None,
        }
    }

    /// Compare-and-set on the status.
    ///
    /// Fails with [`DomainError::InvalidTransition`] unless `from` is the
    /// current status and `from -> to` is an allowed edge, and with
    /// [`DomainError::ApprovalMissing`] when completing an unapproved group.
    pub fn apply_transition(&mut self, from: GroupStatus, to: GroupStatus) -> Result<(), DomainError> {
        if self.status != from || !from.can_transition_to(to) {
            return Err(DomainError::InvalidTransition {
                group: self.id.clone(),
                expected: from,
                actual: self.status,
                to,
            });
        }
        if to == GroupStatus::Completed && !self.approved {
            return Err(DomainError::ApprovalMissing(self.id.clone()));
        }

        self.status = to;
        if to.is_terminal() {
            self.follow_up = None;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Opens a dispatch for `role`, moving a pending group into progress.
    pub fn begin_dispatch(&mut self, role: AgentRole) -> Result<(), DomainError> {
        if self.is_dispatched() {
            return Err(DomainError::AlreadyDispatched(self.id.clone()));
        }
        match self.status {
            GroupStatus::Pending => {
                self.apply_transition(GroupStatus::Pending, GroupStatus::InProgress)?
            }
            GroupStatus::InProgress => {}
            status => {
                return Err(DomainError::NotInProgress {
                    group: self.id.clone(),
                    status,
                });
            }
        }
        self.in_flight = Some(role);
        self.assigned_role = Some(role);
        self.follow_up = None;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Closes the open dispatch and records what the agent reported.
    ///
    /// Returns the routing decision; applying it (transitions, revisions) is
    /// left to the caller so every status change still goes through
    /// [`TaskGroup::apply_transition`].
    pub fn record_outcome(&mut self, role: AgentRole, outcome: &InvocationOutcome) -> Route {
        self.in_flight = None;
        if let Some(review) = outcome.review_outcome() {
            self.last_review = Some(review);
            if review == ReviewOutcome::Approved {
                self.approved = true;
            }
        }
        if let Some(feedback) = outcome.feedback() {
            self.last_feedback = Some(feedback.to_string());
        }

        let route = outcome.route(role);
        self.follow_up = match route {
            Route::Forward(next) => Some(next),
            Route::Revise(next) if next != AgentRole::Developer => Some(next),
            _ => None,
        };
        self.updated_at = Utc::now();
        route
    }

    /// Spends one revision.
    ///
    /// Once the count exceeds the policy ceiling the group is moved to
    /// `failed` and [`DomainError::RevisionLimitExceeded`] is returned.
    pub fn increment_revision(&mut self, policy: &RevisionPolicy) -> Result<u32, DomainError> {
        if self.status != GroupStatus::InProgress {
            return Err(DomainError::NotInProgress {
                group: self.id.clone(),
                status: self.status,
            });
        }
        self.revision_count += 1;
        self.updated_at = Utc::now();
        if policy.allows(self.revision_count) {
            return Ok(self.revision_count);
        }

        self.apply_transition(GroupStatus::InProgress, GroupStatus::Failed)?;
        self.failure = Some(FailureReason::RevisionLimitExceeded {
            revisions: self.revision_count,
            last_feedback: self.last_feedback.clone(),
        });
        Err(DomainError::RevisionLimitExceeded {
            group: self.id.clone(),
            limit: policy.max_revisions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> TaskGroup {
        TaskGroup::new(
            GroupId::new("g1"),
            SessionId::new("s1"),
            "Login endpoint",
            1,
            GroupOrigin::Planned,
        )
    }

    #[test]
    fn test_new_group_is_pending_for_developer() {
        let g = group();
        assert_eq!(g.status, GroupStatus::Pending);
        assert_eq!(g.next_role(), Some(AgentRole::Developer));
        assert!(!g.approved);
    }

    #[test]
    fn test_stale_from_status_rejected() {
        let mut g = group();
        let err = g
            .apply_transition(GroupStatus::InProgress, GroupStatus::Pending)
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTransition {
                actual: GroupStatus::Pending,
                ..
            }
        ));
        assert_eq!(g.status, GroupStatus::Pending);
    }

    #[test]
    fn test_completion_requires_approval() {
        let mut g = group();
        g.begin_dispatch(AgentRole::Developer).unwrap();
        assert_eq!(
            g.apply_transition(GroupStatus::InProgress, GroupStatus::Completed),
            Err(DomainError::ApprovalMissing(GroupId::new("g1")))
        );

        g.record_outcome(AgentRole::Developer, &InvocationOutcome::ReadyForReview);
        g.begin_dispatch(AgentRole::TechLead).unwrap();
        let route = g.record_outcome(AgentRole::TechLead, &InvocationOutcome::Approved);
        assert_eq!(route, Route::Complete);
        g.apply_transition(GroupStatus::InProgress, GroupStatus::Completed)
            .unwrap();
        assert!(g.is_terminal());
    }

    #[test]
    fn test_double_dispatch_rejected() {
        let mut g = group();
        g.begin_dispatch(AgentRole::Developer).unwrap();
        assert_eq!(
            g.begin_dispatch(AgentRole::Qa),
            Err(DomainError::AlreadyDispatched(GroupId::new("g1")))
        );
        assert_eq!(g.next_role(), None);
    }

    #[test]
    fn test_forward_sets_follow_up() {
        let mut g = group();
        g.begin_dispatch(AgentRole::Developer).unwrap();
        let route = g.record_outcome(AgentRole::Developer, &InvocationOutcome::ReadyForQa);
        assert_eq!(route, Route::Forward(AgentRole::Qa));
        assert_eq!(g.status, GroupStatus::InProgress);
        assert_eq!(g.next_role(), Some(AgentRole::Qa));
    }

    #[test]
    fn test_errored_review_retries_same_role() {
        let mut g = group();
        g.begin_dispatch(AgentRole::Developer).unwrap();
        g.record_outcome(AgentRole::Developer, &InvocationOutcome::ReadyForQa);
        g.begin_dispatch(AgentRole::Qa).unwrap();
        let route = g.record_outcome(AgentRole::Qa, &InvocationOutcome::Errored("timeout".into()));
        assert_eq!(route, Route::Revise(AgentRole::Qa));
        assert_eq!(g.next_role(), Some(AgentRole::Qa));
        assert_eq!(g.last_feedback.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_revision_ceiling_fails_group() {
        let policy = RevisionPolicy::new(3);
        let mut g = group();
        g.begin_dispatch(AgentRole::Developer).unwrap();
        for expected in 1..=3 {
            assert_eq!(g.increment_revision(&policy), Ok(expected));
        }
        let err = g.increment_revision(&policy).unwrap_err();
        assert!(err.is_revision_limit());
        assert_eq!(g.status, GroupStatus::Failed);
        assert!(matches!(
            g.failure,
            Some(FailureReason::RevisionLimitExceeded { revisions: 4, .. })
        ));
    }

    #[test]
    fn test_revision_requires_in_progress() {
        let mut g = group();
        assert!(matches!(
            g.increment_revision(&RevisionPolicy::default()),
            Err(DomainError::NotInProgress { .. })
        ));
    }

    #[test]
    fn test_terminal_group_cannot_be_dispatched() {
        let policy = RevisionPolicy::new(0);
        let mut g = group();
        g.begin_dispatch(AgentRole::Developer).unwrap();
        g.record_outcome(AgentRole::Developer, &InvocationOutcome::Blocked("no".into()));
        assert!(g.increment_revision(&policy).is_err());
        assert!(matches!(
            g.begin_dispatch(AgentRole::Developer),
            Err(DomainError::NotInProgress {
                status: GroupStatus::Failed,
                ..
            })
        ));
    }
}
