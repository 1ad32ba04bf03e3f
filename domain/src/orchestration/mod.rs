//! Orchestration domain
//!
//! Session-wide rules the coordinator follows:
//!
//! - [`phase::CoordinatorPhase`]: Planning → Executing → Validating → Completed
//! - [`policy::FailurePolicy`]: whether failed groups may be accepted
//! - [`policy::ExecutionMode`]: simple vs. parallel dispatch
//! - [`validation::ScopeCheck`]: completion check against the original scope

pub mod phase;
pub mod policy;
pub mod validation;
