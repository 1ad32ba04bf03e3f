//! State repository port
//!
//! Persists typed [`StateSnapshot`]s so a session's planning output,
//! coordinator progress and group records can be inspected after a run.

use orchestra_domain::{SessionId, StateSnapshot};
use thiserror::Error;

/// Errors that can occur while persisting state
#[derive(Error, Debug)]
pub enum StateRepositoryError {
    #[error("State I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt state record {path}: {message}")]
    Corrupt { path: String, message: String },
}

/// Port for snapshot persistence
pub trait StateRepository: Send + Sync {
    /// Stores the snapshot, replacing the previous one of the same identity.
    fn save(&self, snapshot: &StateSnapshot) -> Result<(), StateRepositoryError>;

    /// All snapshots recorded for a session.
    fn load_session(&self, session_id: &SessionId) -> Result<Vec<StateSnapshot>, StateRepositoryError>;
}

/// No-op repository used when state persistence is disabled
pub struct NoStateRepository;

impl StateRepository for NoStateRepository {
    fn save(&self, _snapshot: &StateSnapshot) -> Result<(), StateRepositoryError> {
        Ok(())
    }

    fn load_session(&self, _session_id: &SessionId) -> Result<Vec<StateSnapshot>, StateRepositoryError> {
        Ok(Vec::new())
    }
}
