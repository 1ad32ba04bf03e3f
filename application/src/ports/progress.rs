//! Progress notification port
//!
//! Defines the interface for reporting progress while the coordinator runs
//! a session.

use orchestra_domain::{
    AgentInvocation, AgentRole, CoordinatorPhase, ScopeVerdict, SessionId, TaskGroup,
};

/// Callback for progress updates during a coordinator run
///
/// Implementations live in the presentation layer and can display progress
/// in various ways (progress bars, plain lines). Every callback has a no-op
/// default so implementations only override what they display.
pub trait CoordinatorProgressNotifier: Send + Sync {
    /// Called when the coordinator enters a new phase
    fn on_phase_change(&self, _session_id: &SessionId, _phase: CoordinatorPhase) {}

    /// Called once planning has created the initial groups
    fn on_groups_planned(&self, _session_id: &SessionId, _groups: &[TaskGroup]) {}

    /// Called when a group is handed to an agent
    fn on_dispatch(&self, _group: &TaskGroup, _role: AgentRole) {}

    /// Called when an agent invocation finishes and has been recorded
    fn on_invocation_complete(&self, _invocation: &AgentInvocation) {}

    /// Called when a group reaches `completed` or `failed`
    fn on_group_finished(&self, _group: &TaskGroup) {}

    /// Called after each completion check against the scope
    fn on_validation(&self, _session_id: &SessionId, _round: u32, _verdict: &ScopeVerdict) {}

    /// Called when validation adds groups to cover a shortfall
    fn on_gap_groups_created(&self, _session_id: &SessionId, _groups: &[TaskGroup]) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CoordinatorProgressNotifier for NoProgress {}
