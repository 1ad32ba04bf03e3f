//! Task group registry.
//!
//! The single authority on group status. Every status change is a
//! compare-and-set through [`TaskGroupRegistry::transition`] (or one of the
//! dispatch helpers that run the same check), performed under one lock, so
//! two callers racing on the same stale status get exactly one success.
//!
//! Agent outcomes only reach a group through
//! [`TaskGroupRegistry::record_invocation`], which appends the record to the
//! shared [`InvocationLog`] first. Completion is checked against that log, so
//! a group never completes without a logged approval.

use super::invocation_log::InvocationLog;
use super::lock;
use super::session_store::SessionStore;
use orchestra_domain::agent::Route;
use orchestra_domain::{
    AgentInvocation, AgentRole, DomainError, GroupCounts, GroupId, GroupOrigin, GroupStatus, InvocationOutcome,
    RevisionPolicy, SessionId, TaskGroup,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct RegistryInner {
    groups: HashMap<GroupId, TaskGroup>,
    next_sequence: u64,
}

impl RegistryInner {
    fn group_mut(&mut self, group_id: &GroupId) -> Result<&mut TaskGroup, DomainError> {
        self.groups
            .get_mut(group_id)
            .ok_or_else(|| DomainError::UnknownGroup(group_id.clone()))
    }
}

/// Authoritative status of each unit of work
#[derive(Debug)]
pub struct TaskGroupRegistry {
    sessions: Arc<SessionStore>,
    invocations: Arc<InvocationLog>,
    policy: RevisionPolicy,
    inner: Mutex<RegistryInner>,
}

impl TaskGroupRegistry {
    pub fn new(
        sessions: Arc<SessionStore>,
        invocations: Arc<InvocationLog>,
        policy: RevisionPolicy,
    ) -> Self {
        Self {
            sessions,
            invocations,
            policy,
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// The log every recorded outcome is appended to.
    pub fn invocations(&self) -> &Arc<InvocationLog> {
        &self.invocations
    }

    pub fn revision_policy(&self) -> RevisionPolicy {
        self.policy
    }

    pub fn has_session(&self, session_id: &SessionId) -> bool {
        self.sessions.contains(session_id)
    }

    /// Creates a pending group for the session.
    pub fn create_group(
        &self,
        session_id: &SessionId,
        description: impl Into<String>,
    ) -> Result<GroupId, DomainError> {
        self.insert(session_id, description.into(), GroupOrigin::Planned)
    }

    /// Creates a pending group covering a shortfall found by validation.
    pub fn create_gap_group(
        &self,
        session_id: &SessionId,
        description: impl Into<String>,
    ) -> Result<GroupId, DomainError> {
        self.insert(session_id, description.into(), GroupOrigin::ScopeGap)
    }

    fn insert(
        &self,
        session_id: &SessionId,
        description: String,
        origin: GroupOrigin,
    ) -> Result<GroupId, DomainError> {
        if !self.has_session(session_id) {
            return Err(DomainError::UnknownSession(session_id.clone()));
        }

        let mut inner = lock(&self.inner);
        inner.next_sequence += 1;
        let sequence = inner.next_sequence;
        let id = GroupId::from_sequence(sequence);
        let group = TaskGroup::new(id.clone(), session_id.clone(), description, sequence, origin);
        inner.groups.insert(id.clone(), group);
        debug!("Created group {} for session {}", id, session_id);
        Ok(id)
    }

    /// Moves a group from `from` to `to`.
    ///
    /// Fails with [`DomainError::InvalidTransition`] unless `from` is the
    /// current status and the edge is allowed; callers that lose a race
    /// should re-read the group and decide again. Completing requires an
    /// approval in the invocation log ([`DomainError::ApprovalMissing`]).
    pub fn transition(
        &self,
        group_id: &GroupId,
        from: GroupStatus,
        to: GroupStatus,
    ) -> Result<(), DomainError> {
        if to == GroupStatus::Completed && !self.invocations.has_approval(group_id) {
            return Err(DomainError::ApprovalMissing(group_id.clone()));
        }
        let mut inner = lock(&self.inner);
        let group = inner.group_mut(group_id)?;
        group.apply_transition(from, to)?;
        info!("Group {}: {} -> {}", group_id, from, to);
        Ok(())
    }

    /// Spends one revision on an in-progress group.
    ///
    /// Past the configured ceiling the group is moved to `failed` and
    /// [`DomainError::RevisionLimitExceeded`] is returned.
    pub fn increment_revision(&self, group_id: &GroupId) -> Result<u32, DomainError> {
        let mut inner = lock(&self.inner);
        let group = inner.group_mut(group_id)?;
        let result = group.increment_revision(&self.policy);
        match &result {
            Ok(count) => debug!("Group {} revision {}/{}", group_id, count, self.policy.max_revisions),
            Err(DomainError::RevisionLimitExceeded { limit, .. }) => {
                warn!("Group {} exceeded {} revisions, marking failed", group_id, limit)
            }
            Err(_) => {}
        }
        result
    }

    /// Opens a dispatch for `role` and returns the updated group.
    ///
    /// A pending group moves to `in_progress`. Fails with
    /// [`DomainError::AlreadyDispatched`] while another dispatch is open.
    pub fn begin_dispatch(&self, group_id: &GroupId, role: AgentRole) -> Result<TaskGroup, DomainError> {
        let mut inner = lock(&self.inner);
        let group = inner.group_mut(group_id)?;
        group.begin_dispatch(role)?;
        Ok(group.clone())
    }

    /// Appends a finished invocation to the log and closes the group's
    /// open dispatch with its outcome.
    ///
    /// Fails with [`DomainError::DispatchMismatch`] unless the group has an
    /// open dispatch for the invocation's role; nothing is logged then.
    /// Returns the logged record (with its sequence) and the routing
    /// decision.
    pub fn record_invocation(
        &self,
        invocation: AgentInvocation,
    ) -> Result<(AgentInvocation, Route), DomainError> {
        let mut inner = lock(&self.inner);
        let group = inner.group_mut(&invocation.group_id)?;
        if group.in_flight != Some(invocation.role) {
            return Err(DomainError::DispatchMismatch {
                group: group.id.clone(),
                open: group.in_flight,
                reported: invocation.role,
            });
        }
        let record = self.invocations.append(invocation);
        let route = group.record_outcome(record.role, &record.outcome);
        Ok((record, route))
    }

    pub fn get(&self, group_id: &GroupId) -> Result<TaskGroup, DomainError> {
        lock(&self.inner)
            .groups
            .get(group_id)
            .cloned()
            .ok_or_else(|| DomainError::UnknownGroup(group_id.clone()))
    }

    /// The session's groups in creation order.
    pub fn groups_for_session(&self, session_id: &SessionId) -> Vec<TaskGroup> {
        let mut groups: Vec<TaskGroup> = lock(&self.inner)
            .groups
            .values()
            .filter(|g| &g.session_id == session_id)
            .cloned()
            .collect();
        groups.sort_by_key(|g| g.sequence);
        groups
    }

    pub fn counts(&self, session_id: &SessionId) -> GroupCounts {
        let inner = lock(&self.inner);
        GroupCounts::from_groups(inner.groups.values().filter(|g| &g.session_id == session_id))
    }

    /// Number of the session's groups with an open dispatch.
    pub fn in_flight_count(&self, session_id: &SessionId) -> usize {
        lock(&self.inner)
            .groups
            .values()
            .filter(|g| &g.session_id == session_id && g.is_dispatched())
            .count()
    }
}
