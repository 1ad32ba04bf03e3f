//! Typed state snapshots.
//!
//! Persisted coordinator state is a tagged union with one explicit schema per
//! kind, so every stored record deserializes into a known shape:
//!
//! ```json
//! { "kind": "task_group", "id": "g1", "status": "in_progress", ... }
//! ```

use crate::core::ids::{GroupId, SessionId};
use crate::group::entities::TaskGroup;
use crate::orchestration::phase::CoordinatorPhase;
use crate::orchestration::policy::ExecutionMode;
use crate::orchestration::validation::GroupCounts;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Planning output for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmState {
    pub session_id: SessionId,
    pub mode: ExecutionMode,
    pub planned_groups: Vec<GroupId>,
    pub rationale: String,
    pub updated_at: DateTime<Utc>,
}

/// Coordinator progress for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorState {
    pub session_id: SessionId,
    pub phase: CoordinatorPhase,
    pub validation_rounds: u32,
    pub counts: GroupCounts,
    pub in_flight: usize,
    pub updated_at: DateTime<Utc>,
}

/// Full record of one task group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskGroupState(pub TaskGroup);

/// One persisted state record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateSnapshot {
    Pm(PmState),
    Orchestrator(OrchestratorState),
    TaskGroup(TaskGroupState),
}

impl StateSnapshot {
    pub fn session_id(&self) -> &SessionId {
        match self {
            StateSnapshot::Pm(state) => &state.session_id,
            StateSnapshot::Orchestrator(state) => &state.session_id,
            StateSnapshot::TaskGroup(state) => &state.0.session_id,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            StateSnapshot::Pm(_) => "pm",
            StateSnapshot::Orchestrator(_) => "orchestrator",
            StateSnapshot::TaskGroup(_) => "task_group",
        }
    }
}

impl From<TaskGroup> for StateSnapshot {
    fn from(group: TaskGroup) -> Self {
        StateSnapshot::TaskGroup(TaskGroupState(group))
    }
}
