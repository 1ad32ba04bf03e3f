//! Task group status and the allowed-transition table.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of a task group
///
/// ```text
/// pending ──> in_progress ──> completed
///    ^             │
///    └── retry ────┤
///                  └────────> failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    /// Waiting to be dispatched
    #[default]
    Pending,
    /// Dispatched to (or between) agents
    InProgress,
    /// Approved and done
    Completed,
    /// Abandoned after exhausting revisions
    Failed,
}

impl GroupStatus {
    pub const ALL: [GroupStatus; 4] = [
        GroupStatus::Pending,
        GroupStatus::InProgress,
        GroupStatus::Completed,
        GroupStatus::Failed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            GroupStatus::Pending => "pending",
            GroupStatus::InProgress => "in_progress",
            GroupStatus::Completed => "completed",
            GroupStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GroupStatus::Completed | GroupStatus::Failed)
    }

    /// Whether `self -> to` is an edge of the state machine.
    pub fn can_transition_to(&self, to: GroupStatus) -> bool {
        matches!(
            (self, to),
            (GroupStatus::Pending, GroupStatus::InProgress)
                | (GroupStatus::InProgress, GroupStatus::Completed)
                | (GroupStatus::InProgress, GroupStatus::Pending)
                | (GroupStatus::InProgress, GroupStatus::Failed)
        )
    }
}

impl std::fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(GroupStatus::Pending),
            "in_progress" => Ok(GroupStatus::InProgress),
            "completed" => Ok(GroupStatus::Completed),
            "failed" => Ok(GroupStatus::Failed),
            other => Err(format!("unknown group status: {}", other)),
        }
    }
}
