//! Planning phase: scope to task groups, and gap groups after validation.

use super::{Coordinator, CoordinatorError};
use crate::ports::agent_gateway::AgentGateway;
use crate::ports::invocation_logger::AuditEvent;
use crate::ports::planner::PlanningError;
use crate::ports::progress::CoordinatorProgressNotifier;
use chrono::Utc;
use orchestra_domain::{PmState, Scope, SessionId, StateSnapshot};
use serde_json::json;
use tracing::info;

impl<G: AgentGateway + 'static> Coordinator<G> {
    pub(super) async fn plan(
        &self,
        session_id: &SessionId,
        progress: &dyn CoordinatorProgressNotifier,
    ) -> Result<(), CoordinatorError> {
        let scope = self.sessions.get_scope(session_id)?;
        let mode = self.params.execution_mode();
        info!(
            "Planning session {} ({} mode): {}",
            session_id.short(),
            mode.as_str(),
            scope.description()
        );

        let plan = self.planner.plan(&scope, mode).await?;
        if plan.groups.is_empty() {
            return Err(PlanningError::EmptyPlan.into());
        }

        let mut planned = Vec::with_capacity(plan.groups.len());
        for description in &plan.groups {
            planned.push(self.registry.create_group(session_id, description.clone())?);
        }
        let groups = self.registry.groups_for_session(session_id);
        info!("Planned {} group(s) for session {}", groups.len(), session_id.short());

        self.persist(StateSnapshot::Pm(PmState {
            session_id: session_id.clone(),
            mode,
            planned_groups: planned,
            rationale: plan.rationale.clone(),
            updated_at: Utc::now(),
        }));
        for group in &groups {
            self.persist(StateSnapshot::from(group.clone()));
        }
        self.audit.log(AuditEvent::new(
            "plan",
            json!({
                "session_id": session_id,
                "mode": mode,
                "groups": plan.groups,
                "rationale": plan.rationale,
            }),
        ));
        progress.on_groups_planned(session_id, &groups);
        Ok(())
    }

    /// Creates up to `missing` gap groups proposed by the planner.
    pub(super) async fn fill_gaps(
        &self,
        session_id: &SessionId,
        scope: &Scope,
        missing: usize,
        progress: &dyn CoordinatorProgressNotifier,
    ) -> Result<(), CoordinatorError> {
        let existing = self.registry.groups_for_session(session_id);
        let descriptions = self.planner.plan_gaps(scope, &existing, missing).await?;
        if descriptions.is_empty() {
            return Err(PlanningError::EmptyPlan.into());
        }

        let mut created = Vec::with_capacity(missing);
        for description in descriptions.into_iter().take(missing) {
            let group_id = self.registry.create_gap_group(session_id, description)?;
            let group = self.registry.get(&group_id)?;
            self.persist(StateSnapshot::from(group.clone()));
            created.push(group);
        }
        info!(
            "Created {} gap group(s) for session {}",
            created.len(),
            session_id.short()
        );

        self.audit.log(AuditEvent::new(
            "gap_groups",
            json!({
                "session_id": session_id,
                "missing": missing,
                "groups": created.iter().map(|g| g.id.as_str()).collect::<Vec<_>>(),
            }),
        ));
        progress.on_gap_groups_created(session_id, &created);
        Ok(())
    }
}
