//! Domain layer for orchestra
//!
//! This crate contains the entities, value objects and state machines of a
//! multi-agent orchestration session. It has no dependencies on
//! infrastructure or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! One end-to-end orchestration run with a fixed original [`Scope`]. The scope
//! is recorded once and only ever read afterwards: completion is validated
//! against it.
//!
//! ## Task Group
//!
//! One schedulable unit of work inside a session. Groups move through
//! [`GroupStatus`] (`pending -> in_progress -> {completed, pending, failed}`)
//! and are handed between agent roles:
//!
//! - **Developer** implements
//! - **QA** tests
//! - **Tech Lead** reviews and approves
//!
//! ## Agent Invocation
//!
//! An append-only audit record of one dispatch to an external agent and the
//! outcome it reported.

pub mod agent;
pub mod config;
pub mod core;
pub mod group;
pub mod orchestration;
pub mod session;
pub mod skills;
pub mod state;
pub mod util;

// Re-export commonly used types
pub use agent::{
    invocation::AgentInvocation,
    outcome::{InvocationOutcome, ReviewOutcome, parse_status_report},
    role::AgentRole,
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{
    error::DomainError,
    ids::{GroupId, SessionId},
};
pub use group::{
    entities::{FailureReason, GroupOrigin, TaskGroup},
    policy::RevisionPolicy,
    status::GroupStatus,
};
pub use orchestration::{
    phase::CoordinatorPhase,
    policy::{ExecutionMode, FailurePolicy},
    validation::{GroupCounts, ScopeCheck, ScopeVerdict},
};
pub use session::{
    entities::{Session, SessionStatus},
    scope::Scope,
};
pub use skills::{SkillConfig, SkillMode};
pub use state::{OrchestratorState, PmState, StateSnapshot, TaskGroupState};
