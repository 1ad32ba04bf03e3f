//! Append-only invocation log.

use super::lock;
use orchestra_domain::{AgentInvocation, GroupId, SessionId};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct LogInner {
    records: Vec<AgentInvocation>,
    next_sequence: u64,
}

/// Audit trail of agent invocations.
///
/// Records are appended in completion order and never changed or removed;
/// the log hands out clones only.
#[derive(Debug, Default)]
pub struct InvocationLog {
    inner: Mutex<LogInner>,
}

impl InvocationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, assigning the next sequence number.
    pub fn append(&self, invocation: AgentInvocation) -> AgentInvocation {
        let mut inner = lock(&self.inner);
        inner.next_sequence += 1;
        let record = invocation.with_sequence(inner.next_sequence);
        inner.records.push(record.clone());
        record
    }

    pub fn for_session(&self, session_id: &SessionId) -> Vec<AgentInvocation> {
        lock(&self.inner)
            .records
            .iter()
            .filter(|r| &r.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn for_group(&self, group_id: &GroupId) -> Vec<AgentInvocation> {
        lock(&self.inner)
            .records
            .iter()
            .filter(|r| &r.group_id == group_id)
            .cloned()
            .collect()
    }

    /// Whether the group has at least one recorded approval.
    pub fn has_approval(&self, group_id: &GroupId) -> bool {
        lock(&self.inner)
            .records
            .iter()
            .any(|r| &r.group_id == group_id && r.is_approval())
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
