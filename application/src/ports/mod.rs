//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! implement. The coordinator only ever talks to agents, planners and
//! persistence through these traits.

pub mod agent_gateway;
pub mod invocation_logger;
pub mod planner;
pub mod progress;
pub mod state_repository;
