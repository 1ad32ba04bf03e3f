//! Validation phase: compare finished work with the original scope.

use super::types::ValidationStep;
use super::{Coordinator, CoordinatorError};
use crate::ports::agent_gateway::AgentGateway;
use crate::ports::invocation_logger::AuditEvent;
use crate::ports::progress::CoordinatorProgressNotifier;
use orchestra_domain::{ScopeCheck, ScopeVerdict, SessionId};
use serde_json::json;
use tracing::{info, warn};

impl<G: AgentGateway + 'static> Coordinator<G> {
    /// One validation round. Reads the scope recorded at session creation,
    /// never the plan, so an under-delivering plan shows up as a gap.
    pub(super) async fn validate(
        &self,
        session_id: &SessionId,
        round: u32,
        progress: &dyn CoordinatorProgressNotifier,
    ) -> Result<ValidationStep, CoordinatorError> {
        let scope = self.sessions.get_scope(session_id)?;
        let counts = self.registry.counts(session_id);
        let verdict =
            ScopeCheck::new(scope.expected_items(), self.params.failure_policy).evaluate(&counts);

        info!(
            "Validation round {} for session {}: {}/{} completed, {} failed, expected {:?}",
            round,
            session_id.short(),
            counts.completed,
            counts.total,
            counts.failed,
            scope.expected_items()
        );
        self.audit.log(AuditEvent::new(
            "validation",
            json!({
                "session_id": session_id,
                "round": round,
                "verdict": verdict_label(&verdict),
                "expected_items": scope.expected_items(),
                "counts": counts,
            }),
        ));
        progress.on_validation(session_id, round, &verdict);

        let step = match verdict {
            ScopeVerdict::NotDrained => ValidationStep::Refill,
            ScopeVerdict::Gap { missing } if round > self.params.max_validation_rounds => {
                warn!(
                    "Session {} still misses {} item(s) after {} validation rounds",
                    session_id.short(),
                    missing,
                    round
                );
                ValidationStep::GapUnfilled { missing }
            }
            ScopeVerdict::Gap { missing } => {
                self.fill_gaps(session_id, &scope, missing, progress).await?;
                ValidationStep::Refill
            }
            ScopeVerdict::BlockedByFailures { failed } => {
                warn!(
                    "Session {} has {} failed group(s); completion requires a tolerant failure policy",
                    session_id.short(),
                    failed
                );
                ValidationStep::Blocked
            }
            ScopeVerdict::Satisfied { failed } => ValidationStep::Complete { failed },
        };
        Ok(step)
    }
}

fn verdict_label(verdict: &ScopeVerdict) -> String {
    match verdict {
        ScopeVerdict::NotDrained => "not_drained".to_string(),
        ScopeVerdict::Gap { missing } => format!("gap ({} missing)", missing),
        ScopeVerdict::BlockedByFailures { failed } => format!("blocked ({} failed)", failed),
        ScopeVerdict::Satisfied { failed: 0 } => "satisfied".to_string(),
        ScopeVerdict::Satisfied { failed } => format!("satisfied ({} failed tolerated)", failed),
    }
}
