//! Dry-run agent gateway.
//!
//! Answers every request with a canned reply carrying the success status for
//! the role. Rejections can be scripted per role to demonstrate revision
//! loops without any real agent.

use async_trait::async_trait;
use orchestra_application::{AgentGateway, AgentReply, AgentRequest, GatewayError};
use orchestra_domain::{AgentRole, GroupId};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Agent gateway that simulates agents
#[derive(Debug, Default)]
pub struct SimulatedAgentGateway {
    /// Rejections each group receives from a role before it succeeds
    rejections: HashMap<AgentRole, usize>,
    latency: Option<Duration>,
    seen: Mutex<HashMap<(GroupId, AgentRole), usize>>,
}

impl SimulatedAgentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first `count` invocations of `role` on each group report failure.
    ///
    /// Only QA and Tech Lead can reject; a developer rejection reports
    /// `BLOCKED`.
    pub fn with_rejections(mut self, role: AgentRole, count: usize) -> Self {
        self.rejections.insert(role, count);
        self
    }

    /// Sleeps this long before each reply.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn attempt(&self, request: &AgentRequest) -> usize {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        let count = seen
            .entry((request.group_id.clone(), request.role))
            .or_insert(0);
        let attempt = *count;
        *count += 1;
        attempt
    }

    fn reply_text(request: &AgentRequest, reject: bool) -> String {
        let status = match (request.role, reject) {
            (AgentRole::Developer, false) => "READY_FOR_QA",
            (AgentRole::Developer, true) => "BLOCKED",
            (AgentRole::Qa, false) => "PASS",
            (AgentRole::Qa, true) => "FAIL",
            (AgentRole::TechLead, false) => "APPROVED",
            (AgentRole::TechLead, true) => "CHANGES_REQUESTED",
            (AgentRole::ProjectManager, _) => "UNSUPPORTED",
        };
        format!(
            "[simulated {}] {} (revision {})\nSTATUS: {}",
            request.role.as_str(),
            request.group_description,
            request.revision,
            status
        )
    }
}

#[async_trait]
impl AgentGateway for SimulatedAgentGateway {
    async fn invoke(&self, request: &AgentRequest) -> Result<AgentReply, GatewayError> {
        let attempt = self.attempt(request);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let reject = attempt < self.rejections.get(&request.role).copied().unwrap_or(0);
        Ok(AgentReply::from_text(
            request.role,
            Self::reply_text(request, reject),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestra_domain::{InvocationOutcome, Scope, SessionId};

    fn request(group: &str, role: AgentRole) -> AgentRequest {
        AgentRequest {
            session_id: SessionId::new("s-1"),
            group_id: GroupId::new(group),
            role,
            group_description: "Export CSV".to_string(),
            scope: Scope::new("Reports").unwrap(),
            revision: 0,
            feedback: None,
            skills: vec![],
        }
    }

    #[tokio::test]
    async fn test_happy_path_outcomes() {
        let gateway = SimulatedAgentGateway::new();
        let outcomes = [
            (AgentRole::Developer, InvocationOutcome::ReadyForQa),
            (AgentRole::Qa, InvocationOutcome::TestsPassed),
            (AgentRole::TechLead, InvocationOutcome::Approved),
        ];
        for (role, expected) in outcomes {
            let reply = gateway.invoke(&request("g1", role)).await.unwrap();
            assert_eq!(reply.outcome, expected);
            assert!(reply.transcript.contains("Export CSV"));
        }
    }

    #[tokio::test]
    async fn test_scripted_rejections_are_per_group() {
        let gateway = SimulatedAgentGateway::new().with_rejections(AgentRole::TechLead, 1);

        let first = gateway.invoke(&request("g1", AgentRole::TechLead)).await.unwrap();
        assert!(matches!(first.outcome, InvocationOutcome::ChangesRequested(_)));
        let second = gateway.invoke(&request("g1", AgentRole::TechLead)).await.unwrap();
        assert_eq!(second.outcome, InvocationOutcome::Approved);

        let other = gateway.invoke(&request("g2", AgentRole::TechLead)).await.unwrap();
        assert!(matches!(other.outcome, InvocationOutcome::ChangesRequested(_)));
    }
}
