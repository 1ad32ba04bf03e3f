//! Revision policy: how many retry cycles a group gets.

use serde::{Deserialize, Serialize};

/// Retry ceiling for task groups.
///
/// A revision is one retry cycle after a failed review, failed tests or a
/// failed invocation. The group may be revised `max_revisions` times; the
/// next revision forces it to `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionPolicy {
    pub max_revisions: u32,
}

impl Default for RevisionPolicy {
    fn default() -> Self {
        Self { max_revisions: 3 }
    }
}

impl RevisionPolicy {
    pub fn new(max_revisions: u32) -> Self {
        Self { max_revisions }
    }

    /// Whether a group that has been revised `revision_count` times may keep going.
    pub fn allows(&self, revision_count: u32) -> bool {
        revision_count <= self.max_revisions
    }
}
