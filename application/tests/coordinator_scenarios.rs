//! End-to-end coordinator scenarios: completion, scope gaps and revision
//! exhaustion.

mod common;

use async_trait::async_trait;
use common::{
    MemoryStateRepository, RecordingLogger, RecordingProgress, ScriptedGateway, complete_by_hand,
};
use orchestra_application::{
    Coordinator, CoordinatorParams, GroupPlan, InvocationLog, Planner, PlanningError,
    SessionOutcome, SessionStore, TaskGroupRegistry,
};
use orchestra_domain::{
    AgentRole, CoordinatorPhase, ExecutionMode, FailurePolicy, FailureReason, GroupOrigin,
    GroupStatus, InvocationOutcome, RevisionPolicy, Scope, SessionStatus, SkillConfig, SkillMode,
};
use std::sync::Arc;

/// Planner that always returns the same fixed groups.
struct FixedPlanner(Vec<&'static str>);

#[async_trait]
impl Planner for FixedPlanner {
    async fn plan(&self, _scope: &Scope, _mode: ExecutionMode) -> Result<GroupPlan, PlanningError> {
        Ok(GroupPlan {
            groups: self.0.iter().map(|s| s.to_string()).collect(),
            rationale: "fixed".to_string(),
        })
    }
}

fn scope_of(items: usize) -> Scope {
    Scope::new("Implement the billing module")
        .unwrap()
        .with_estimated_items(items)
        .unwrap()
}

fn shared_stores() -> (Arc<SessionStore>, Arc<TaskGroupRegistry>) {
    let sessions = Arc::new(SessionStore::new());
    let registry = Arc::new(TaskGroupRegistry::new(
        sessions.clone(),
        Arc::new(InvocationLog::new()),
        RevisionPolicy::default(),
    ));
    (sessions, registry)
}

// ==================== Scenario 1: all items completed ====================

#[tokio::test]
async fn completed_groups_matching_scope_complete_the_session() {
    let (sessions, registry) = shared_stores();
    let sid = sessions.create_session(scope_of(3)).unwrap();
    for i in 1..=3 {
        let g = registry.create_group(&sid, format!("invoice part {}", i)).unwrap();
        complete_by_hand(&registry, &g);
    }

    let gateway = Arc::new(ScriptedGateway::happy_path());
    let coordinator = Coordinator::new(gateway.clone(), CoordinatorParams::default())
        .with_stores(sessions.clone(), registry);
    let report = coordinator.resume(&sid).await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.phase, CoordinatorPhase::Completed);
    assert_eq!(report.validation_rounds, 1);
    assert_eq!(report.counts.completed, 3);
    assert!(gateway.calls().is_empty());
    assert_eq!(sessions.get(&sid).unwrap().status(), SessionStatus::Completed);
}

#[tokio::test]
async fn planned_run_walks_every_group_through_three_roles() {
    let gateway = Arc::new(ScriptedGateway::happy_path());
    let progress = RecordingProgress::default();
    let coordinator = Coordinator::new(gateway.clone(), CoordinatorParams::default());

    let report = coordinator
        .run_with_progress(scope_of(3), &progress)
        .await
        .unwrap();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.counts.total, 3);
    assert_eq!(report.counts.completed, 3);
    assert_eq!(report.invocations, 9);
    assert!(report.groups.iter().all(|g| g.approved));
    assert_eq!(
        *progress.phases.lock().unwrap(),
        vec![
            CoordinatorPhase::Planning,
            CoordinatorPhase::Executing,
            CoordinatorPhase::Validating,
            CoordinatorPhase::Completed,
        ]
    );

    for group in &report.groups {
        let roles: Vec<AgentRole> = coordinator
            .invocations()
            .for_group(&group.id)
            .iter()
            .map(|i| i.role)
            .collect();
        assert_eq!(roles, vec![AgentRole::Developer, AgentRole::Qa, AgentRole::TechLead]);
    }
}

#[tokio::test]
async fn resuming_a_completed_session_dispatches_nothing() {
    let gateway = Arc::new(ScriptedGateway::happy_path());
    let coordinator = Coordinator::new(gateway.clone(), CoordinatorParams::default());
    let first = coordinator.run(scope_of(1)).await.unwrap();
    let calls = gateway.calls().len();

    let second = coordinator.resume(&first.session_id).await.unwrap();
    assert_eq!(second.outcome, SessionOutcome::Completed);
    assert_eq!(gateway.calls().len(), calls);
}

// ==================== Scenario 2: scope gap ====================

#[tokio::test]
async fn shortfall_creates_gap_group_instead_of_completing() {
    let (sessions, registry) = shared_stores();
    let sid = sessions.create_session(scope_of(3)).unwrap();
    for name in ["invoices", "refunds"] {
        let g = registry.create_group(&sid, name).unwrap();
        complete_by_hand(&registry, &g);
    }

    let gateway = Arc::new(ScriptedGateway::happy_path());
    let audit = Arc::new(RecordingLogger::default());
    let coordinator = Coordinator::new(gateway.clone(), CoordinatorParams::default())
        .with_stores(sessions.clone(), registry.clone())
        .with_invocation_logger(audit.clone());
    let report = coordinator.resume(&sid).await.unwrap();

    let validations = audit.events_of("validation");
    assert_eq!(validations.len(), 2);
    assert_eq!(validations[0]["verdict"], "gap (1 missing)");
    assert_eq!(validations[1]["verdict"], "satisfied");

    let gap_groups: Vec<_> = report
        .groups
        .iter()
        .filter(|g| g.origin == GroupOrigin::ScopeGap)
        .collect();
    assert_eq!(gap_groups.len(), 1);
    assert_eq!(gap_groups[0].status, GroupStatus::Completed);
    assert!(
        gateway
            .calls()
            .iter()
            .all(|c| c.group_id == gap_groups[0].id)
    );

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.validation_rounds, 2);
    assert_eq!(report.counts.total, 3);
}

#[tokio::test]
async fn under_delivering_plan_is_caught_by_validation() {
    let gateway = Arc::new(ScriptedGateway::happy_path());
    let coordinator = Coordinator::new(gateway, CoordinatorParams::default())
        .with_planner(Arc::new(FixedPlanner(vec!["invoices", "refunds"])));

    let report = coordinator.run(scope_of(3)).await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.counts.completed, 3);
    assert_eq!(report.validation_rounds, 2);
    assert_eq!(report.groups[2].origin, GroupOrigin::ScopeGap);
}

#[tokio::test]
async fn unfilled_gap_leaves_session_active() {
    let gateway = Arc::new(ScriptedGateway::happy_path());
    let params = CoordinatorParams::default().with_max_validation_rounds(0);
    let coordinator = Coordinator::new(gateway, params)
        .with_planner(Arc::new(FixedPlanner(vec!["invoices", "refunds"])));

    let report = coordinator.run(scope_of(3)).await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::Partial);
    assert_eq!(report.unfilled_gap, Some(1));
    assert_eq!(report.phase, CoordinatorPhase::Validating);
    let session = coordinator.sessions().get(&report.session_id).unwrap();
    assert_eq!(session.status(), SessionStatus::Active);
}

// ==================== Scenario 3: revision ceiling ====================

fn stubborn_tech_lead() -> ScriptedGateway {
    ScriptedGateway::new(|request, _| match request.role {
        AgentRole::TechLead => InvocationOutcome::ChangesRequested("split the module".into()),
        role => common::happy_outcome(role),
    })
}

#[tokio::test]
async fn exhausted_revisions_fail_group_and_block_strict_completion() {
    let gateway = Arc::new(stubborn_tech_lead());
    let coordinator = Coordinator::new(gateway.clone(), CoordinatorParams::default());

    let report = coordinator.run(scope_of(1)).await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::Partial);
    let failed = report.failed_groups();
    assert_eq!(failed.len(), 1);
    assert!(matches!(
        failed[0].failure,
        Some(FailureReason::RevisionLimitExceeded { revisions: 4, .. })
    ));
    // Four full Developer -> QA -> Tech Lead cycles.
    assert_eq!(report.invocations, 12);
    assert_eq!(
        coordinator.sessions().get(&report.session_id).unwrap().status(),
        SessionStatus::Active
    );
}

#[tokio::test]
async fn tolerant_policy_completes_with_failures() {
    let gateway = Arc::new(stubborn_tech_lead());
    let params = CoordinatorParams::default().with_failure_policy(FailurePolicy::TolerateFailed);
    let coordinator = Coordinator::new(gateway, params);

    let report = coordinator.run(scope_of(1)).await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::CompletedWithFailures);
    assert_eq!(report.counts.failed, 1);
    assert!(report.is_completed());
    assert_eq!(
        coordinator.sessions().get(&report.session_id).unwrap().status(),
        SessionStatus::Completed
    );
}

#[tokio::test]
async fn rejected_work_returns_to_developer_with_feedback() {
    let gateway = Arc::new(ScriptedGateway::new(|request, attempt| match request.role {
        AgentRole::Qa if attempt == 0 => InvocationOutcome::TestsFailed("refund rounding".into()),
        role => common::happy_outcome(role),
    }));
    let coordinator = Coordinator::new(gateway.clone(), CoordinatorParams::default());

    let report = coordinator.run(scope_of(1)).await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.groups[0].revision_count, 1);
    let calls = gateway.calls();
    let roles: Vec<AgentRole> = calls.iter().map(|c| c.role).collect();
    assert_eq!(
        roles,
        vec![
            AgentRole::Developer,
            AgentRole::Qa,
            AgentRole::Developer,
            AgentRole::Qa,
            AgentRole::TechLead,
        ]
    );
    assert_eq!(calls[2].revision, 1);
    assert_eq!(calls[2].feedback.as_deref(), Some("refund rounding"));
}

#[tokio::test]
async fn errored_review_is_retried_by_the_same_role() {
    let gateway = Arc::new(ScriptedGateway::new(|request, attempt| match request.role {
        AgentRole::Qa if attempt == 0 => InvocationOutcome::Errored("runner crashed".into()),
        role => common::happy_outcome(role),
    }));
    let coordinator = Coordinator::new(gateway.clone(), CoordinatorParams::default());

    let report = coordinator.run(scope_of(1)).await.unwrap();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    let roles: Vec<AgentRole> = gateway.calls().iter().map(|c| c.role).collect();
    assert_eq!(
        roles,
        vec![
            AgentRole::Developer,
            AgentRole::Qa,
            AgentRole::Qa,
            AgentRole::TechLead,
        ]
    );
}

#[tokio::test]
async fn outcome_illegal_for_role_counts_as_error() {
    // A developer claiming approval must not complete the group.
    let gateway = Arc::new(ScriptedGateway::new(|request, attempt| match request.role {
        AgentRole::Developer if attempt == 0 => InvocationOutcome::Approved,
        role => common::happy_outcome(role),
    }));
    let coordinator = Coordinator::new(gateway.clone(), CoordinatorParams::default());

    let report = coordinator.run(scope_of(1)).await.unwrap();

    let first = &coordinator.invocations().for_group(&report.groups[0].id)[0];
    assert!(matches!(first.outcome, InvocationOutcome::Errored(_)));
    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.groups[0].revision_count, 1);
}

// ==================== Persistence and audit ====================

#[tokio::test]
async fn run_persists_typed_snapshots_and_audit_events() {
    let gateway = Arc::new(ScriptedGateway::happy_path());
    let state = Arc::new(MemoryStateRepository::default());
    let audit = Arc::new(RecordingLogger::default());
    let coordinator = Coordinator::new(gateway, CoordinatorParams::default())
        .with_state_repository(state.clone())
        .with_invocation_logger(audit.clone());

    let report = coordinator.run(scope_of(2)).await.unwrap();

    let kinds: Vec<String> = state
        .saved
        .lock()
        .unwrap()
        .iter()
        .map(|s| s.kind().to_string())
        .collect();
    assert!(kinds.contains(&"pm".to_string()));
    assert!(kinds.contains(&"orchestrator".to_string()));
    assert!(kinds.contains(&"task_group".to_string()));

    let types = audit.event_types();
    assert_eq!(types.first(), Some(&"session_started"));
    assert_eq!(types.last(), Some(&"session_finished"));
    assert_eq!(audit.events_of("invocation").len(), report.invocations);
    assert_eq!(audit.events_of("group_finished").len(), 2);
}

#[tokio::test]
async fn requests_carry_the_enabled_skills_for_each_role() {
    let skills = SkillConfig::new()
        .with_skill(AgentRole::Developer, "lint", SkillMode::Mandatory)
        .with_skill(AgentRole::Qa, "coverage", SkillMode::Mandatory)
        .with_skill(AgentRole::Qa, "fuzz", SkillMode::Disabled);
    let gateway = Arc::new(ScriptedGateway::happy_path());
    let coordinator =
        Coordinator::new(gateway.clone(), CoordinatorParams::default().with_skills(skills));

    coordinator.run(scope_of(1)).await.unwrap();

    let calls = gateway.calls();
    assert_eq!(calls[0].skills, vec!["lint".to_string()]);
    assert_eq!(calls[1].skills, vec!["coverage".to_string()]);
    assert!(calls[2].skills.is_empty());
    assert!(calls.iter().all(|c| c.scope.description() == "Implement the billing module"));
}
