//! Agent gateway port
//!
//! Defines how the coordinator hands one task group to one agent role and
//! gets a classified outcome back. The coordinator never performs work
//! itself; everything an agent does happens behind this trait.

use async_trait::async_trait;
use orchestra_domain::{
    AgentRole, GroupId, InvocationOutcome, Scope, SessionId, parse_status_report,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while invoking an agent
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No agent configured for role {0}")]
    NotConfigured(AgentRole),

    #[error("Failed to start agent: {0}")]
    SpawnFailed(String),

    #[error("Agent I/O error: {0}")]
    Io(String),

    #[error("Agent exited with status {code:?}: {stderr}")]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Everything an agent needs to work on one group
#[derive(Debug, Clone, Serialize)]
pub struct AgentRequest {
    pub session_id: SessionId,
    pub group_id: GroupId,
    pub role: AgentRole,
    pub group_description: String,
    /// The session's original scope, for context
    pub scope: Scope,
    /// Revisions spent on the group before this dispatch
    pub revision: u32,
    /// Feedback from the previous QA or review step, if any
    pub feedback: Option<String>,
    /// Mandatory skills for this role
    pub skills: Vec<String>,
}

/// What an agent reported back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub outcome: InvocationOutcome,
    /// Raw reply text; summarized into the audit trail
    pub transcript: String,
}

impl AgentReply {
    pub fn new(outcome: InvocationOutcome, transcript: impl Into<String>) -> Self {
        Self {
            outcome,
            transcript: transcript.into(),
        }
    }

    /// Classifies a free-text reply by its `STATUS:` marker.
    pub fn from_text(role: AgentRole, text: impl Into<String>) -> Self {
        let transcript = text.into();
        Self {
            outcome: parse_status_report(role, &transcript),
            transcript,
        }
    }
}

/// Gateway to external agents
///
/// Implementations (adapters) live in the infrastructure layer. Invocations
/// for different groups run concurrently, so implementations must not
/// assume exclusive access.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    async fn invoke(&self, request: &AgentRequest) -> Result<AgentReply, GatewayError>;
}
