//! Planner port
//!
//! The project-manager step: turns a session's scope into task group
//! descriptions, and later proposes groups for gaps that completion
//! validation finds.

use async_trait::async_trait;
use orchestra_domain::{ExecutionMode, Scope, TaskGroup};
use thiserror::Error;

/// Errors that can occur while planning
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("Planner produced no task groups")]
    EmptyPlan,

    #[error("Planner failed: {0}")]
    Failed(String),
}

/// Output of the planning step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    /// One entry per task group, in dispatch order
    pub groups: Vec<String>,
    pub rationale: String,
}

/// Project-manager port
#[async_trait]
pub trait Planner: Send + Sync {
    /// Splits the scope into task group descriptions.
    ///
    /// `mode` is informational; the concurrency cap is enforced by the
    /// dispatch queue regardless of how the plan is shaped.
    async fn plan(&self, scope: &Scope, mode: ExecutionMode) -> Result<GroupPlan, PlanningError>;

    /// Proposes `missing` new groups after validation found a shortfall.
    async fn plan_gaps(
        &self,
        scope: &Scope,
        existing: &[TaskGroup],
        missing: usize,
    ) -> Result<Vec<String>, PlanningError> {
        Ok(gap_descriptions(scope, existing, missing))
    }
}

/// Gap groups for scope items no existing group covers, then numbered
/// fallbacks for whatever is still missing.
pub fn gap_descriptions(scope: &Scope, existing: &[TaskGroup], missing: usize) -> Vec<String> {
    let mut gaps: Vec<String> = scope
        .items()
        .iter()
        .filter(|item| !existing.iter().any(|g| g.description == **item))
        .take(missing)
        .cloned()
        .collect();

    let offset = existing.len();
    while gaps.len() < missing {
        gaps.push(format!(
            "{} (remaining item {})",
            scope.description(),
            offset + gaps.len() + 1
        ));
    }
    gaps
}

/// Default planner: derives groups mechanically from the scope.
///
/// - itemized scope: one group per item
/// - estimated count: that many numbered slices of the description
/// - otherwise: a single group for the whole description
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopePlanner;

#[async_trait]
impl Planner for ScopePlanner {
    async fn plan(&self, scope: &Scope, mode: ExecutionMode) -> Result<GroupPlan, PlanningError> {
        let (groups, rationale) = if !scope.items().is_empty() {
            (
                scope.items().to_vec(),
                format!("{} itemized deliverables, one group each", scope.items().len()),
            )
        } else if let Some(count) = scope.estimated_items() {
            let groups = (1..=count)
                .map(|i| format!("{} (part {} of {})", scope.description(), i, count))
                .collect();
            (groups, format!("scope estimated at {} items", count))
        } else {
            (
                vec![scope.description().to_string()],
                "unsized scope handled as a single group".to_string(),
            )
        };

        if groups.is_empty() {
            return Err(PlanningError::EmptyPlan);
        }
        Ok(GroupPlan {
            groups,
            rationale: format!("{} ({} mode)", rationale, mode.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestra_domain::{GroupId, GroupOrigin, SessionId};

    #[tokio::test]
    async fn test_itemized_scope_plans_one_group_per_item() {
        let scope = Scope::new("Auth")
            .unwrap()
            .with_item("Login")
            .unwrap()
            .with_item("Logout")
            .unwrap();
        let plan = ScopePlanner.plan(&scope, ExecutionMode::Parallel).await.unwrap();
        assert_eq!(plan.groups, vec!["Login", "Logout"]);
        assert!(plan.rationale.contains("parallel"));
    }

    #[tokio::test]
    async fn test_estimated_scope_plans_numbered_slices() {
        let scope = Scope::new("Migrate endpoints")
            .unwrap()
            .with_estimated_items(3)
            .unwrap();
        let plan = ScopePlanner.plan(&scope, ExecutionMode::Simple).await.unwrap();
        assert_eq!(plan.groups.len(), 3);
        assert_eq!(plan.groups[2], "Migrate endpoints (part 3 of 3)");
    }

    #[tokio::test]
    async fn test_unsized_scope_is_single_group() {
        let scope = Scope::new("Fix flaky test").unwrap();
        let plan = ScopePlanner.plan(&scope, ExecutionMode::Simple).await.unwrap();
        assert_eq!(plan.groups, vec!["Fix flaky test"]);
    }

    #[test]
    fn test_gap_descriptions_prefer_uncovered_items() {
        let scope = Scope::new("Auth")
            .unwrap()
            .with_item("Login")
            .unwrap()
            .with_item("Logout")
            .unwrap()
            .with_item("Reset")
            .unwrap();
        let existing = vec![TaskGroup::new(
            GroupId::new("g1"),
            SessionId::new("s1"),
            "Login",
            1,
            GroupOrigin::Planned,
        )];

        let gaps = gap_descriptions(&scope, &existing, 3);
        assert_eq!(gaps[0], "Logout");
        assert_eq!(gaps[1], "Reset");
        assert_eq!(gaps[2], "Auth (remaining item 4)");
    }
}
