//! Agent gateway adapters.
//!
//! - [`CommandAgentGateway`] runs a configured process per invocation
//! - [`SimulatedAgentGateway`] answers with canned replies (`--dry-run`)

mod brief;
mod command;
mod simulated;

pub use brief::render_brief;
pub use command::{AgentCommand, CommandAgentGateway};
pub use simulated::SimulatedAgentGateway;
