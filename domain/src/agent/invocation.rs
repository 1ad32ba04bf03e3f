//! Agent invocation audit record.

use super::outcome::InvocationOutcome;
use super::role::AgentRole;
use crate::core::ids::{GroupId, SessionId};
use crate::util::summarize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum size of the payload summary kept in the audit trail.
pub const PAYLOAD_SUMMARY_BYTES: usize = 240;

/// One dispatch to an external agent and what came back (Entity).
///
/// Append-only: created once when the invocation finishes, never mutated
/// afterwards. The sequence number is assigned by the log on append, so it
/// reflects completion order rather than dispatch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInvocation {
    pub session_id: SessionId,
    pub group_id: GroupId,
    pub role: AgentRole,
    pub sequence: u64,
    /// Revision the group was on when it was dispatched
    pub revision: u32,
    pub payload_summary: String,
    pub outcome: InvocationOutcome,
    pub recorded_at: DateTime<Utc>,
}

impl AgentInvocation {
    /// Builds a record from the raw agent reply. The sequence is left at 0
    /// until the log assigns one.
    pub fn new(
        session_id: SessionId,
        group_id: GroupId,
        role: AgentRole,
        revision: u32,
        payload: &str,
        outcome: InvocationOutcome,
    ) -> Self {
        Self {
            session_id,
            group_id,
            role,
            sequence: 0,
            revision,
            payload_summary: summarize(payload, PAYLOAD_SUMMARY_BYTES),
            outcome,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn is_approval(&self) -> bool {
        self.outcome == InvocationOutcome::Approved
    }
}
