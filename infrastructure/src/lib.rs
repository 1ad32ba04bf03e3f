//! Infrastructure layer for orchestra
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: agent processes, the JSONL audit trail, JSON state
//! snapshots, plus configuration and skill map loading.

pub mod agents;
pub mod config;
pub mod logging;
pub mod skills;
pub mod state;

// Re-export commonly used types
pub use agents::{AgentCommand, CommandAgentGateway, SimulatedAgentGateway};
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentsConfig, FileConfig, FileCoordinatorConfig,
};
pub use logging::JsonlInvocationLogger;
pub use skills::{SkillConfigError, load_skill_config};
pub use state::JsonStateRepository;
