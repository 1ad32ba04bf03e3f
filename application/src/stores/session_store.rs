//! Session store.

use super::lock;
use orchestra_domain::{DomainError, Scope, Session, SessionId};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// Durable record of orchestration runs and their declared scope.
///
/// Sessions are never removed. The scope is stored once at creation and
/// only handed out by value afterwards; there is no way to change it.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new active session for `scope`.
    pub fn create_session(&self, scope: Scope) -> Result<SessionId, DomainError> {
        scope.validate()?;
        let id = SessionId::generate();
        let session = Session::new(id.clone(), scope);
        lock(&self.sessions).insert(id.clone(), session);
        info!("Created session {}", id);
        Ok(id)
    }

    /// Marks the session completed.
    ///
    /// Idempotent: returns `true` on the call that completed it and `false`
    /// afterwards, leaving the first completion timestamp in place.
    pub fn mark_completed(&self, session_id: &SessionId) -> Result<bool, DomainError> {
        let mut sessions = lock(&self.sessions);
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| DomainError::UnknownSession(session_id.clone()))?;
        let changed = session.complete();
        if changed {
            info!("Session {} completed", session_id);
        } else {
            debug!("Session {} was already completed", session_id);
        }
        Ok(changed)
    }

    /// The scope the session was created with, unchanged.
    pub fn get_scope(&self, session_id: &SessionId) -> Result<Scope, DomainError> {
        self.get(session_id).map(|session| session.scope().clone())
    }

    pub fn get(&self, session_id: &SessionId) -> Result<Session, DomainError> {
        lock(&self.sessions)
            .get(session_id)
            .cloned()
            .ok_or_else(|| DomainError::UnknownSession(session_id.clone()))
    }

    pub fn contains(&self, session_id: &SessionId) -> bool {
        lock(&self.sessions).contains_key(session_id)
    }

    /// All sessions, oldest first.
    pub fn sessions(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = lock(&self.sessions).values().cloned().collect();
        sessions.sort_by_key(|s| s.created_at());
        sessions
    }
}
