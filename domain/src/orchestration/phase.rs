//! Coordinator phase machine.

use serde::{Deserialize, Serialize};

/// Phase of a coordinator run over a whole session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorPhase {
    /// Turning the scope into task groups
    #[default]
    Planning,
    /// Dispatching groups to agents
    Executing,
    /// Checking finished work against the original scope
    Validating,
    /// Session marked completed
    Completed,
}

impl CoordinatorPhase {
    pub fn as_str(&self) -> &str {
        match self {
            CoordinatorPhase::Planning => "planning",
            CoordinatorPhase::Executing => "executing",
            CoordinatorPhase::Validating => "validating",
            CoordinatorPhase::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            CoordinatorPhase::Planning => "Planning",
            CoordinatorPhase::Executing => "Executing",
            CoordinatorPhase::Validating => "Validating",
            CoordinatorPhase::Completed => "Completed",
        }
    }

    /// Validating may loop back to Executing when gaps are found.
    pub fn can_advance_to(&self, next: CoordinatorPhase) -> bool {
        matches!(
            (self, next),
            (CoordinatorPhase::Planning, CoordinatorPhase::Executing)
                | (CoordinatorPhase::Executing, CoordinatorPhase::Validating)
                | (CoordinatorPhase::Validating, CoordinatorPhase::Executing)
                | (CoordinatorPhase::Validating, CoordinatorPhase::Completed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        *self == CoordinatorPhase::Completed
    }
}

impl std::fmt::Display for CoordinatorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_edges() {
        use CoordinatorPhase::*;
        assert!(Planning.can_advance_to(Executing));
        assert!(Executing.can_advance_to(Validating));
        assert!(Validating.can_advance_to(Completed));
        assert!(Validating.can_advance_to(Executing));
    }

    #[test]
    fn test_no_shortcuts() {
        use CoordinatorPhase::*;
        assert!(!Planning.can_advance_to(Completed));
        assert!(!Executing.can_advance_to(Completed));
        assert!(!Completed.can_advance_to(Executing));
        assert!(Completed.is_terminal());
    }
}
