//! Execution phase: fan out dispatches, fan in completions.

use super::types::{DispatchResult, ExecutionEnd};
use super::{Coordinator, CoordinatorError};
use crate::dispatch::NextAction;
use crate::ports::agent_gateway::{AgentGateway, AgentReply, AgentRequest, GatewayError};
use crate::ports::invocation_logger::AuditEvent;
use crate::ports::progress::CoordinatorProgressNotifier;
use orchestra_domain::agent::Route;
use orchestra_domain::{
    AgentInvocation, AgentRole, GroupId, GroupStatus, InvocationOutcome, Scope, SessionId,
    StateSnapshot,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, info, warn};

impl<G: AgentGateway + 'static> Coordinator<G> {
    /// Runs dispatches until every group is terminal or cancellation has
    /// drained the in-flight work.
    pub(super) async fn execute(
        &self,
        session_id: &SessionId,
        progress: &dyn CoordinatorProgressNotifier,
    ) -> Result<ExecutionEnd, CoordinatorError> {
        let scope = self.sessions.get_scope(session_id)?;
        let mut join_set: JoinSet<DispatchResult> = JoinSet::new();
        // Request of every running task, to record the ones that panic.
        let mut running: HashMap<Id, AgentRequest> = HashMap::new();

        loop {
            let cancelled = self.is_cancelled();
            if !cancelled {
                match self.queue.next_action(session_id)? {
                    NextAction::Dispatch { group_id, role } => {
                        let (id, request) =
                            self.dispatch(&mut join_set, &scope, &group_id, role, progress)?;
                        running.insert(id, request);
                        continue;
                    }
                    NextAction::Drained => return Ok(ExecutionEnd::Drained),
                    NextAction::Saturated | NextAction::AwaitingInFlight => {}
                }
            }

            let joined = match (&self.cancellation_token, cancelled) {
                (Some(token), false) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            info!(
                                "Cancellation requested, draining {} in-flight invocation(s)",
                                join_set.len()
                            );
                            continue;
                        }
                        joined = join_set.join_next_with_id() => joined,
                    }
                }
                _ => join_set.join_next_with_id().await,
            };

            match joined {
                Some(Ok((id, done))) => {
                    running.remove(&id);
                    self.complete_invocation(done, progress)?;
                }
                Some(Err(e)) => {
                    let done = Self::failed_task(&mut running, e)?;
                    self.complete_invocation(done, progress)?;
                }
                None if cancelled => return Ok(ExecutionEnd::Cancelled),
                None => return Err(CoordinatorError::Stalled(session_id.clone())),
            }
        }
    }

    fn dispatch(
        &self,
        join_set: &mut JoinSet<DispatchResult>,
        scope: &Scope,
        group_id: &GroupId,
        role: AgentRole,
        progress: &dyn CoordinatorProgressNotifier,
    ) -> Result<(Id, AgentRequest), CoordinatorError> {
        let group = self.registry.begin_dispatch(group_id, role)?;
        let request = AgentRequest {
            session_id: group.session_id.clone(),
            group_id: group.id.clone(),
            role,
            group_description: group.description.clone(),
            scope: scope.clone(),
            revision: group.revision_count,
            feedback: group.last_feedback.clone(),
            skills: self.params.skills.enabled_for(role),
        };
        info!(
            "Dispatching group {} to {} (revision {})",
            group.id,
            role.display_name(),
            group.revision_count
        );
        progress.on_dispatch(&group, role);
        self.persist(StateSnapshot::from(group));

        let gateway = Arc::clone(&self.gateway);
        let timeout = self.params.agent_timeout;
        let task_request = request.clone();
        let handle = join_set.spawn(async move {
            let result = invoke_agent(gateway.as_ref(), &task_request, timeout).await;
            DispatchResult {
                request: task_request,
                result,
            }
        });
        Ok((handle.id(), request))
    }

    /// Turns a task that panicked into an errored result for its request, so
    /// it is recorded and spends a revision like any other agent failure.
    fn failed_task(
        running: &mut HashMap<Id, AgentRequest>,
        error: JoinError,
    ) -> Result<DispatchResult, CoordinatorError> {
        let Some(request) = running.remove(&error.id()) else {
            return Err(CoordinatorError::AgentTask(error.to_string()));
        };
        warn!(
            "{} task for group {} failed: {}",
            request.role.display_name(),
            request.group_id,
            error
        );
        Ok(DispatchResult {
            request,
            result: Err(GatewayError::Other(format!("agent task failed: {}", error))),
        })
    }

    /// Records a finished invocation and applies the resulting transitions.
    fn complete_invocation(
        &self,
        done: DispatchResult,
        progress: &dyn CoordinatorProgressNotifier,
    ) -> Result<(), CoordinatorError> {
        let DispatchResult { request, result } = done;
        let role = request.role;
        let group_id = &request.group_id;

        let (outcome, transcript) = match result {
            Ok(reply) if reply.outcome.valid_for(role) => (reply.outcome, reply.transcript),
            Ok(reply) => {
                warn!(
                    "{} reported {} for group {}, which that role cannot report",
                    role.display_name(),
                    reply.outcome.as_str(),
                    group_id
                );
                (
                    InvocationOutcome::Errored(format!(
                        "{} cannot report {}",
                        role.display_name(),
                        reply.outcome.as_str()
                    )),
                    reply.transcript,
                )
            }
            Err(e) => {
                warn!("{} invocation for group {} failed: {}", role.display_name(), group_id, e);
                (InvocationOutcome::Errored(e.to_string()), String::new())
            }
        };

        let (invocation, route) = self.registry.record_invocation(AgentInvocation::new(
            request.session_id.clone(),
            group_id.clone(),
            role,
            request.revision,
            &transcript,
            outcome.clone(),
        ))?;
        self.audit.log(AuditEvent::new("invocation", json!(invocation)));
        progress.on_invocation_complete(&invocation);

        match route {
            Route::Forward(next) => {
                debug!("Group {} goes to {}", group_id, next.display_name());
            }
            Route::Complete => {
                self.registry
                    .transition(group_id, GroupStatus::InProgress, GroupStatus::Completed)?;
            }
            Route::Revise(next) => match self.registry.increment_revision(group_id) {
                Ok(revision) => {
                    if next == AgentRole::Developer {
                        self.registry
                            .transition(group_id, GroupStatus::InProgress, GroupStatus::Pending)?;
                    }
                    info!(
                        "Group {} revision {}: back to {} ({})",
                        group_id,
                        revision,
                        next.display_name(),
                        outcome.as_str()
                    );
                }
                // The group is now failed; validation surfaces it.
                Err(e) if e.is_revision_limit() => {}
                Err(e) => return Err(e.into()),
            },
        }

        let group = self.registry.get(group_id)?;
        self.persist(StateSnapshot::from(group.clone()));
        if group.is_terminal() {
            self.audit.log(AuditEvent::new(
                "group_finished",
                json!({
                    "session_id": group.session_id,
                    "group_id": group.id,
                    "status": group.status,
                    "revisions": group.revision_count,
                    "failure": group.failure,
                }),
            ));
            progress.on_group_finished(&group);
        }
        Ok(())
    }
}

/// Invokes the agent, mapping an elapsed timeout to [`GatewayError::Timeout`].
async fn invoke_agent<G: AgentGateway + ?Sized>(
    gateway: &G,
    request: &AgentRequest,
    timeout: Option<Duration>,
) -> Result<AgentReply, GatewayError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, gateway.invoke(request))
            .await
            .unwrap_or_else(|_| Err(GatewayError::Timeout)),
        None => gateway.invoke(request).await,
    }
}
