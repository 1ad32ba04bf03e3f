//! Coordinator use case
//!
//! Drives one session through its phases:
//!
//! | Phase      | What happens                                               |
//! |------------|------------------------------------------------------------|
//! | Planning   | the [`Planner`] turns the scope into task groups           |
//! | Executing  | groups are dispatched to agents, fan-out/fan-in            |
//! | Validating | finished work is checked against the original scope       |
//! | Completed  | the session is marked completed                            |
//!
//! Validation may send the session back to Executing with new gap groups.
//! The coordinator only holds ports and stores: agents do the work, the
//! registry owns every status change.

mod execution;
mod planning;
mod types;
mod validation;

pub use types::{CoordinatorError, SessionOutcome, SessionReport};

use types::{ExecutionEnd, RunState, ValidationStep};

use crate::config::CoordinatorParams;
use crate::dispatch::DispatchQueue;
use crate::ports::agent_gateway::AgentGateway;
use crate::ports::invocation_logger::{AuditEvent, InvocationLogger, NoInvocationLogger};
use crate::ports::planner::{Planner, ScopePlanner};
use crate::ports::progress::{CoordinatorProgressNotifier, NoProgress};
use crate::ports::state_repository::{NoStateRepository, StateRepository};
use crate::stores::{InvocationLog, SessionStore, TaskGroupRegistry};
use chrono::Utc;
use orchestra_domain::{
    CoordinatorPhase, GroupCounts, OrchestratorState, Scope, SessionId, StateSnapshot,
};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Use case for running an orchestration session
pub struct Coordinator<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    planner: Arc<dyn Planner>,
    sessions: Arc<SessionStore>,
    registry: Arc<TaskGroupRegistry>,
    invocations: Arc<InvocationLog>,
    queue: DispatchQueue,
    params: CoordinatorParams,
    state: Arc<dyn StateRepository>,
    audit: Arc<dyn InvocationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: AgentGateway + 'static> Coordinator<G> {
    /// Creates a coordinator with fresh in-memory stores.
    pub fn new(gateway: Arc<G>, params: CoordinatorParams) -> Self {
        let sessions = Arc::new(SessionStore::new());
        let invocations = Arc::new(InvocationLog::new());
        let registry = Arc::new(TaskGroupRegistry::new(
            Arc::clone(&sessions),
            Arc::clone(&invocations),
            params.revision_policy,
        ));
        let queue = DispatchQueue::new(Arc::clone(&registry), params.max_parallel);
        Self {
            gateway,
            planner: Arc::new(ScopePlanner),
            sessions,
            registry,
            invocations,
            queue,
            params,
            state: Arc::new(NoStateRepository),
            audit: Arc::new(NoInvocationLogger),
            cancellation_token: None,
        }
    }

    /// Shares existing stores, e.g. to resume a session set up by hand.
    ///
    /// The registry keeps its own revision policy and invocation log.
    pub fn with_stores(mut self, sessions: Arc<SessionStore>, registry: Arc<TaskGroupRegistry>) -> Self {
        self.queue = DispatchQueue::new(Arc::clone(&registry), self.params.max_parallel);
        self.invocations = Arc::clone(registry.invocations());
        self.sessions = sessions;
        self.registry = registry;
        self
    }

    pub fn with_planner(mut self, planner: Arc<dyn Planner>) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_state_repository(mut self, state: Arc<dyn StateRepository>) -> Self {
        self.state = state;
        self
    }

    pub fn with_invocation_logger(mut self, audit: Arc<dyn InvocationLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn registry(&self) -> &Arc<TaskGroupRegistry> {
        &self.registry
    }

    pub fn invocations(&self) -> &Arc<InvocationLog> {
        &self.invocations
    }

    pub fn params(&self) -> &CoordinatorParams {
        &self.params
    }

    /// Creates a session for `scope` and runs it to the end.
    pub async fn run(&self, scope: Scope) -> Result<SessionReport, CoordinatorError> {
        self.run_with_progress(scope, &NoProgress).await
    }

    pub async fn run_with_progress(
        &self,
        scope: Scope,
        progress: &dyn CoordinatorProgressNotifier,
    ) -> Result<SessionReport, CoordinatorError> {
        let session_id = self.sessions.create_session(scope)?;
        let scope = self.sessions.get_scope(&session_id)?;
        self.audit.log(AuditEvent::new(
            "session_started",
            json!({
                "session_id": session_id,
                "scope": scope,
                "max_parallel": self.queue.max_parallel(),
                "failure_policy": self.params.failure_policy,
            }),
        ));
        self.drive(&session_id, progress).await
    }

    /// Runs an existing session.
    ///
    /// Planning is skipped when the session already has groups. A session
    /// that is already completed is reported as such without dispatching.
    pub async fn resume(&self, session_id: &SessionId) -> Result<SessionReport, CoordinatorError> {
        self.resume_with_progress(session_id, &NoProgress).await
    }

    pub async fn resume_with_progress(
        &self,
        session_id: &SessionId,
        progress: &dyn CoordinatorProgressNotifier,
    ) -> Result<SessionReport, CoordinatorError> {
        let session = self.sessions.get(session_id)?;
        if session.is_completed() {
            let mut run = RunState::new();
            run.phase = CoordinatorPhase::Completed;
            return Ok(self.finish(session_id, &run, SessionOutcome::Completed));
        }
        self.drive(session_id, progress).await
    }

    async fn drive(
        &self,
        session_id: &SessionId,
        progress: &dyn CoordinatorProgressNotifier,
    ) -> Result<SessionReport, CoordinatorError> {
        let mut run = RunState::new();
        progress.on_phase_change(session_id, run.phase);

        if self.is_cancelled() {
            return Ok(self.finish(session_id, &run, SessionOutcome::Abandoned));
        }
        if self.registry.groups_for_session(session_id).is_empty() {
            self.plan(session_id, progress).await?;
        }
        self.advance(session_id, &mut run, CoordinatorPhase::Executing, progress)?;

        loop {
            if self.execute(session_id, progress).await? == ExecutionEnd::Cancelled {
                return Ok(self.finish(session_id, &run, SessionOutcome::Abandoned));
            }

            self.advance(session_id, &mut run, CoordinatorPhase::Validating, progress)?;
            run.validation_rounds += 1;

            match self.validate(session_id, run.validation_rounds, progress).await? {
                ValidationStep::Complete { failed } => {
                    self.sessions.mark_completed(session_id)?;
                    self.advance(session_id, &mut run, CoordinatorPhase::Completed, progress)?;
                    let outcome = if failed == 0 {
                        SessionOutcome::Completed
                    } else {
                        SessionOutcome::CompletedWithFailures
                    };
                    return Ok(self.finish(session_id, &run, outcome));
                }
                ValidationStep::Refill => {
                    self.advance(session_id, &mut run, CoordinatorPhase::Executing, progress)?;
                }
                ValidationStep::Blocked => {
                    return Ok(self.finish(session_id, &run, SessionOutcome::Partial));
                }
                ValidationStep::GapUnfilled { missing } => {
                    run.unfilled_gap = Some(missing);
                    return Ok(self.finish(session_id, &run, SessionOutcome::Partial));
                }
            }
        }
    }

    fn advance(
        &self,
        session_id: &SessionId,
        run: &mut RunState,
        next: CoordinatorPhase,
        progress: &dyn CoordinatorProgressNotifier,
    ) -> Result<(), CoordinatorError> {
        if !run.phase.can_advance_to(next) {
            return Err(CoordinatorError::InvalidPhase {
                from: run.phase,
                to: next,
            });
        }
        info!("Session {}: {} -> {}", session_id.short(), run.phase, next);
        run.phase = next;
        progress.on_phase_change(session_id, next);
        self.save_orchestrator_state(session_id, run);
        Ok(())
    }

    fn finish(&self, session_id: &SessionId, run: &RunState, outcome: SessionOutcome) -> SessionReport {
        let groups = self.registry.groups_for_session(session_id);
        let report = SessionReport {
            session_id: session_id.clone(),
            outcome,
            phase: run.phase,
            mode: self.params.execution_mode(),
            counts: GroupCounts::from_groups(&groups),
            groups,
            invocations: self.invocations.for_session(session_id).len(),
            validation_rounds: run.validation_rounds,
            unfilled_gap: run.unfilled_gap,
        };

        self.save_orchestrator_state(session_id, run);
        self.audit.log(AuditEvent::new(
            "session_finished",
            json!({
                "session_id": session_id,
                "outcome": outcome,
                "counts": report.counts,
                "validation_rounds": run.validation_rounds,
                "unfilled_gap": run.unfilled_gap,
            }),
        ));

        match outcome {
            SessionOutcome::Completed | SessionOutcome::CompletedWithFailures => info!(
                "Session {} {} ({}/{} groups completed)",
                session_id.short(),
                outcome,
                report.counts.completed,
                report.counts.total
            ),
            SessionOutcome::Partial => warn!(
                "Session {} needs attention: {} failed group(s), unfilled gap {:?}",
                session_id.short(),
                report.counts.failed,
                run.unfilled_gap
            ),
            SessionOutcome::Abandoned => warn!(
                "Session {} abandoned after {} invocation(s)",
                session_id.short(),
                report.invocations
            ),
        }
        report
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn save_orchestrator_state(&self, session_id: &SessionId, run: &RunState) {
        self.persist(StateSnapshot::Orchestrator(OrchestratorState {
            session_id: session_id.clone(),
            phase: run.phase,
            validation_rounds: run.validation_rounds,
            counts: self.registry.counts(session_id),
            in_flight: self.registry.in_flight_count(session_id),
            updated_at: Utc::now(),
        }));
    }

    /// Snapshot persistence is best-effort; the in-memory stores stay
    /// authoritative for the run.
    fn persist(&self, snapshot: StateSnapshot) {
        if let Err(e) = self.state.save(&snapshot) {
            warn!(
                "Failed to persist {} state for session {}: {}",
                snapshot.kind(),
                snapshot.session_id(),
                e
            );
        }
    }
}
