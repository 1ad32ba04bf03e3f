//! Dispatch queue.
//!
//! Decides which group gets which agent role next. Follow-up work on groups
//! already in progress goes before new pending groups; within each class the
//! earliest-created group goes first. A hard cap bounds how many groups may
//! have an open dispatch at once.

use crate::stores::TaskGroupRegistry;
use orchestra_domain::{AgentRole, DomainError, GroupId, GroupStatus, SessionId, TaskGroup};
use std::sync::Arc;

/// What the coordinator should do next for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    /// Hand `group_id` to `role`
    Dispatch { group_id: GroupId, role: AgentRole },
    /// Eligible work exists but every dispatch slot is taken
    Saturated,
    /// Nothing is eligible; wait for an in-flight invocation to finish
    AwaitingInFlight,
    /// Every group is terminal
    Drained,
}

/// Picks the next unit of work for a session
#[derive(Debug, Clone)]
pub struct DispatchQueue {
    registry: Arc<TaskGroupRegistry>,
    max_parallel: usize,
}

impl DispatchQueue {
    /// A cap below 1 is raised to 1.
    pub fn new(registry: Arc<TaskGroupRegistry>, max_parallel: usize) -> Self {
        Self {
            registry,
            max_parallel: max_parallel.max(1),
        }
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    pub fn next_action(&self, session_id: &SessionId) -> Result<NextAction, DomainError> {
        let groups = self.groups(session_id)?;
        if groups.iter().all(TaskGroup::is_terminal) {
            return Ok(NextAction::Drained);
        }

        let in_flight = groups.iter().filter(|g| g.is_dispatched()).count();
        let Some((group_id, role)) = Self::ordered(&groups).into_iter().next() else {
            return Ok(NextAction::AwaitingInFlight);
        };
        if in_flight >= self.max_parallel {
            return Ok(NextAction::Saturated);
        }
        Ok(NextAction::Dispatch { group_id, role })
    }

    /// Every group that could be dispatched right now, in dispatch order,
    /// ignoring the concurrency cap.
    pub fn eligible(&self, session_id: &SessionId) -> Result<Vec<(GroupId, AgentRole)>, DomainError> {
        Ok(Self::ordered(&self.groups(session_id)?))
    }

    fn groups(&self, session_id: &SessionId) -> Result<Vec<TaskGroup>, DomainError> {
        if !self.registry.has_session(session_id) {
            return Err(DomainError::UnknownSession(session_id.clone()));
        }
        Ok(self.registry.groups_for_session(session_id))
    }

    /// `groups` must already be sorted by creation sequence.
    fn ordered(groups: &[TaskGroup]) -> Vec<(GroupId, AgentRole)> {
        let mut follow_ups = Vec::new();
        let mut fresh = Vec::new();
        for group in groups {
            let Some(role) = group.next_role() else {
                continue;
            };
            match group.status {
                GroupStatus::InProgress => follow_ups.push((group.id.clone(), role)),
                GroupStatus::Pending => fresh.push((group.id.clone(), role)),
                GroupStatus::Completed | GroupStatus::Failed => {}
            }
        }
        follow_ups.extend(fresh);
        follow_ups
    }
}
