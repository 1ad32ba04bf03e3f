//! Shared test doubles for coordinator integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use orchestra_application::{
    AgentGateway, AgentReply, AgentRequest, AuditEvent, CoordinatorProgressNotifier,
    GatewayError, InvocationLogger, StateRepository, StateRepositoryError, TaskGroupRegistry,
};
use orchestra_domain::{
    AgentInvocation, AgentRole, CoordinatorPhase, GroupId, GroupStatus, InvocationOutcome, SessionId,
    StateSnapshot, TaskGroup,
};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Script = Box<dyn Fn(&AgentRequest, usize) -> InvocationOutcome + Send + Sync>;
type Delay = Box<dyn Fn(&AgentRequest) -> Duration + Send + Sync>;
type Hook = Box<dyn Fn(&AgentRequest) + Send + Sync>;

/// Outcome an agent reports when everything goes well.
pub fn happy_outcome(role: AgentRole) -> InvocationOutcome {
    match role {
        AgentRole::Developer => InvocationOutcome::ReadyForQa,
        AgentRole::Qa => InvocationOutcome::TestsPassed,
        _ => InvocationOutcome::Approved,
    }
}

/// Walks a group through review and approval directly on the registry.
pub fn complete_by_hand(registry: &TaskGroupRegistry, group_id: &GroupId) {
    for (role, outcome) in [
        (AgentRole::Developer, InvocationOutcome::ReadyForReview),
        (AgentRole::TechLead, InvocationOutcome::Approved),
    ] {
        let group = registry.begin_dispatch(group_id, role).unwrap();
        registry
            .record_invocation(AgentInvocation::new(
                group.session_id,
                group_id.clone(),
                role,
                group.revision_count,
                "done by hand",
                outcome,
            ))
            .unwrap();
    }
    registry
        .transition(group_id, GroupStatus::InProgress, GroupStatus::Completed)
        .unwrap();
}

/// Gateway whose outcomes come from a closure.
///
/// The closure also receives how many times this (group, role) pair has
/// been invoked before. The gateway tracks concurrency and flags any
/// overlapping invocations for the same group.
pub struct ScriptedGateway {
    script: Script,
    delay: Option<Delay>,
    hook: Option<Hook>,
    calls: Mutex<Vec<AgentRequest>>,
    open_groups: Mutex<HashSet<GroupId>>,
    double_dispatches: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new(
        script: impl Fn(&AgentRequest, usize) -> InvocationOutcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            delay: None,
            hook: None,
            calls: Mutex::new(Vec::new()),
            open_groups: Mutex::new(HashSet::new()),
            double_dispatches: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Developer -> QA -> Tech Lead, approving everything.
    pub fn happy_path() -> Self {
        Self::new(|request, _| happy_outcome(request.role))
    }

    pub fn with_delay(mut self, delay: impl Fn(&AgentRequest) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Some(Box::new(delay));
        self
    }

    pub fn with_hook(mut self, hook: impl Fn(&AgentRequest) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<AgentRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_roles(&self) -> Vec<(String, AgentRole)> {
        self.calls()
            .into_iter()
            .map(|r| (r.group_id.to_string(), r.role))
            .collect()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn double_dispatches(&self) -> usize {
        self.double_dispatches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentGateway for ScriptedGateway {
    async fn invoke(&self, request: &AgentRequest) -> Result<AgentReply, GatewayError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            let attempt = calls
                .iter()
                .filter(|c| c.group_id == request.group_id && c.role == request.role)
                .count();
            calls.push(request.clone());
            attempt
        };
        if !self.open_groups.lock().unwrap().insert(request.group_id.clone()) {
            self.double_dispatches.fetch_add(1, Ordering::SeqCst);
        }
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(hook) = &self.hook {
            hook(request);
        }
        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(request)).await;
        }
        let outcome = (self.script)(request, attempt);

        self.active.fetch_sub(1, Ordering::SeqCst);
        self.open_groups.lock().unwrap().remove(&request.group_id);
        let transcript = format!("work on {}\nSTATUS: {}", request.group_id, outcome.as_str());
        Ok(AgentReply::new(outcome, transcript))
    }
}

/// Audit logger that keeps every event in memory.
#[derive(Default)]
pub struct RecordingLogger {
    pub events: Mutex<Vec<AuditEvent>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.event_type).collect()
    }

    pub fn events_of(&self, event_type: &str) -> Vec<serde_json::Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.event_type == event_type)
            .map(|e| e.payload.clone())
            .collect()
    }
}

impl InvocationLogger for RecordingLogger {
    fn log(&self, event: AuditEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// State repository that keeps every saved snapshot in memory.
#[derive(Default)]
pub struct MemoryStateRepository {
    pub saved: Mutex<Vec<StateSnapshot>>,
}

impl StateRepository for MemoryStateRepository {
    fn save(&self, snapshot: &StateSnapshot) -> Result<(), StateRepositoryError> {
        self.saved.lock().unwrap().push(snapshot.clone());
        Ok(())
    }

    fn load_session(&self, session_id: &SessionId) -> Result<Vec<StateSnapshot>, StateRepositoryError> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.session_id() == session_id)
            .cloned()
            .collect())
    }
}

/// Progress notifier that records phase changes and finished groups.
#[derive(Default)]
pub struct RecordingProgress {
    pub phases: Mutex<Vec<CoordinatorPhase>>,
    pub finished: Mutex<Vec<(GroupId, GroupStatus)>>,
}

impl CoordinatorProgressNotifier for RecordingProgress {
    fn on_phase_change(&self, _session_id: &SessionId, phase: CoordinatorPhase) {
        self.phases.lock().unwrap().push(phase);
    }

    fn on_group_finished(&self, group: &TaskGroup) {
        self.finished
            .lock()
            .unwrap()
            .push((group.id.clone(), group.status));
    }
}
