//! Agent domain module
//!
//! Roles the coordinator dispatches to, the outcomes they report and the
//! audit record written for every invocation.

pub mod invocation;
pub mod outcome;
pub mod role;

pub use invocation::AgentInvocation;
pub use outcome::{InvocationOutcome, ReviewOutcome, Route, parse_status_report};
pub use role::AgentRole;
