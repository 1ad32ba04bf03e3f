//! Application layer for orchestra
//!
//! This crate contains the in-memory stores, the dispatch queue, the
//! coordinator use case and the port definitions its adapters implement.
//! It depends only on the domain layer.

pub mod config;
pub mod dispatch;
pub mod ports;
pub mod stores;
pub mod use_cases;

// Re-export commonly used types
pub use config::CoordinatorParams;
pub use dispatch::{DispatchQueue, NextAction};
pub use ports::{
    agent_gateway::{AgentGateway, AgentReply, AgentRequest, GatewayError},
    invocation_logger::{AuditEvent, InvocationLogger, NoInvocationLogger},
    planner::{GroupPlan, Planner, PlanningError, ScopePlanner},
    progress::{CoordinatorProgressNotifier, NoProgress},
    state_repository::{NoStateRepository, StateRepository, StateRepositoryError},
};
pub use stores::{InvocationLog, SessionStore, TaskGroupRegistry};
pub use use_cases::coordinator::{Coordinator, CoordinatorError, SessionOutcome, SessionReport};
