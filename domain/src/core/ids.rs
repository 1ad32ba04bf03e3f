//! Identifier value objects.
//!
//! - [`SessionId`]: one orchestration run, generated as a UUID v4
//! - [`GroupId`]: one task group, numbered by the registry (`g1`, `g2`, ...)

use serde::{Deserialize, Serialize};

/// Unique identifier for an orchestration session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a SessionId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a new random SessionId.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for log lines and console output.
    pub fn short(&self) -> &str {
        crate::util::truncate_str(&self.0, 8)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a task group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the identifier for the `sequence`-th group created by a registry.
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("g{}", sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_session_ids_differ() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn test_group_id_from_sequence() {
        assert_eq!(GroupId::from_sequence(1).as_str(), "g1");
        assert_eq!(GroupId::from_sequence(12).to_string(), "g12");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = GroupId::new("g3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"g3\"");
        let session: SessionId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(session.as_str(), "abc");
    }
}
