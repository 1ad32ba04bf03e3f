//! File-backed state repository.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/<session>/pm.json
//! <root>/<session>/orchestrator.json
//! <root>/<session>/groups/<group>.json
//! ```
//!
//! Each file holds one pretty-printed [`StateSnapshot`]. Writes go to a
//! temporary sibling first and are renamed into place, so readers never see
//! a half-written record.

use orchestra_application::{StateRepository, StateRepositoryError};
use orchestra_domain::{GroupId, SessionId, StateSnapshot};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

const GROUPS_DIR: &str = "groups";

/// JSON snapshot store rooted at a directory
#[derive(Debug, Clone)]
pub struct JsonStateRepository {
    root: PathBuf,
}

impl JsonStateRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one session's records.
    pub fn session_dir(&self, session_id: &SessionId) -> PathBuf {
        self.root.join(session_id.as_str())
    }

    /// File a snapshot is stored in.
    pub fn path_for(&self, snapshot: &StateSnapshot) -> PathBuf {
        let dir = self.session_dir(snapshot.session_id());
        match snapshot {
            StateSnapshot::Pm(_) => dir.join("pm.json"),
            StateSnapshot::Orchestrator(_) => dir.join("orchestrator.json"),
            StateSnapshot::TaskGroup(state) => dir
                .join(GROUPS_DIR)
                .join(format!("{}.json", state.0.id.as_str())),
        }
    }

    fn write_atomic(path: &Path, contents: &str) -> Result<(), StateRepositoryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = path.with_file_name(format!(".{}.tmp", file_name));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn read_record(path: &Path) -> Result<StateSnapshot, StateRepositoryError> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| StateRepositoryError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl StateRepository for JsonStateRepository {
    fn save(&self, snapshot: &StateSnapshot) -> Result<(), StateRepositoryError> {
        let path = self.path_for(snapshot);
        let json = serde_json::to_string_pretty(snapshot)?;
        Self::write_atomic(&path, &json)?;
        trace!("Saved {} state to {}", snapshot.kind(), path.display());
        Ok(())
    }

    /// Records in a stable order: pm, orchestrator, then groups in creation
    /// order.
    fn load_session(&self, session_id: &SessionId) -> Result<Vec<StateSnapshot>, StateRepositoryError> {
        let dir = self.session_dir(session_id);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();
        for name in ["pm.json", "orchestrator.json"] {
            let path = dir.join(name);
            if path.is_file() {
                snapshots.push(Self::read_record(&path)?);
            }
        }

        let groups_dir = dir.join(GROUPS_DIR);
        if groups_dir.is_dir() {
            let paths: Vec<PathBuf> = fs::read_dir(&groups_dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| {
                    path.extension().is_some_and(|ext| ext == "json")
                        && !path
                            .file_name()
                            .is_some_and(|name| name.to_string_lossy().starts_with('.'))
                })
                .collect();
            let mut groups = paths
                .iter()
                .map(|path| Self::read_record(path))
                .collect::<Result<Vec<_>, _>>()?;
            // File names sort g10 before g2; the creation sequence does not.
            groups.sort_by_key(|snapshot| match snapshot {
                StateSnapshot::TaskGroup(state) => (state.0.sequence, state.0.id.clone()),
                _ => (0, GroupId::new("")),
            });
            snapshots.extend(groups);
        }

        for snapshot in &snapshots {
            if snapshot.session_id() != session_id {
                return Err(StateRepositoryError::Corrupt {
                    path: dir.display().to_string(),
                    message: format!(
                        "{} record belongs to session {}",
                        snapshot.kind(),
                        snapshot.session_id()
                    ),
                });
            }
        }
        Ok(snapshots)
    }
}
