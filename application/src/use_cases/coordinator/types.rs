//! Type definitions for the Coordinator use case.

use crate::ports::agent_gateway::{AgentReply, AgentRequest, GatewayError};
use crate::ports::planner::PlanningError;
use orchestra_domain::{
    CoordinatorPhase, DomainError, ExecutionMode, GroupCounts, GroupStatus, SessionId, TaskGroup,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that stop a coordinator run
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Planning(#[from] PlanningError),

    #[error("Invalid phase change: {from} -> {to}")]
    InvalidPhase {
        from: CoordinatorPhase,
        to: CoordinatorPhase,
    },

    #[error("Agent task failed: {0}")]
    AgentTask(String),

    #[error("Session {0} stalled: dispatches are open but no invocation is running")]
    Stalled(SessionId),
}

/// How a coordinator run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Every group completed; the session is marked completed
    Completed,
    /// Completed under a policy that tolerates failed groups
    CompletedWithFailures,
    /// The session stays active: failed groups or an unfilled scope gap
    /// need human attention
    Partial,
    /// Cancelled; in-flight work was recorded, nothing new was dispatched
    Abandoned,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            SessionOutcome::Completed => "completed",
            SessionOutcome::CompletedWithFailures => "completed_with_failures",
            SessionOutcome::Partial => "partial",
            SessionOutcome::Abandoned => "abandoned",
        }
    }

    /// Whether the session reached `completed`.
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            SessionOutcome::Completed | SessionOutcome::CompletedWithFailures
        )
    }
}

impl std::fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a coordinator run
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub outcome: SessionOutcome,
    /// Phase the coordinator stopped in
    pub phase: CoordinatorPhase,
    pub mode: ExecutionMode,
    pub counts: GroupCounts,
    pub groups: Vec<TaskGroup>,
    /// Number of recorded agent invocations for the session
    pub invocations: usize,
    pub validation_rounds: u32,
    /// Items still missing when validation gave up refilling the scope
    pub unfilled_gap: Option<usize>,
}

impl SessionReport {
    pub fn failed_groups(&self) -> Vec<&TaskGroup> {
        self.groups
            .iter()
            .filter(|g| g.status == GroupStatus::Failed)
            .collect()
    }

    pub fn is_completed(&self) -> bool {
        self.outcome.is_completed()
    }
}

/// Mutable bookkeeping of one run
#[derive(Debug)]
pub(super) struct RunState {
    pub phase: CoordinatorPhase,
    pub validation_rounds: u32,
    pub unfilled_gap: Option<usize>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            phase: CoordinatorPhase::Planning,
            validation_rounds: 0,
            unfilled_gap: None,
        }
    }
}

/// A finished agent task, as returned through the join set
pub(super) struct DispatchResult {
    pub request: AgentRequest,
    pub result: Result<AgentReply, GatewayError>,
}

/// Why the execution phase stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ExecutionEnd {
    Drained,
    Cancelled,
}

/// What validation decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ValidationStep {
    Complete { failed: usize },
    Refill,
    Blocked,
    GapUnfilled { missing: usize },
}
