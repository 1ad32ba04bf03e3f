//! Session domain entities

use super::scope::Scope;
use crate::core::ids::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents one orchestration run (Entity)
///
/// The scope is fixed at creation; only the status changes, and only from
/// `Active` to `Completed`. Sessions are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    scope: Scope,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: SessionId, scope: Scope) -> Self {
        Self {
            id,
            scope,
            status: SessionStatus::Active,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Marks the session completed.
    ///
    /// Idempotent: a second call keeps the original completion timestamp and
    /// returns `false`.
    pub fn complete(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        self.status = SessionStatus::Completed;
        self.completed_at = Some(Utc::now());
        true
    }
}
