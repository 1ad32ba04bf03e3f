//! Plain-text work brief handed to agent processes on stdin.

use orchestra_application::AgentRequest;
use orchestra_domain::AgentRole;
use std::fmt::Write;

/// Status keywords each role may answer with
fn status_keywords(role: AgentRole) -> &'static str {
    match role {
        AgentRole::Developer => "READY_FOR_QA, READY_FOR_REVIEW or BLOCKED",
        AgentRole::Qa => "PASS or FAIL",
        AgentRole::TechLead => "APPROVED or CHANGES_REQUESTED",
        AgentRole::ProjectManager => "none",
    }
}

/// Renders the request as the agent's brief.
///
/// The format is line-oriented `Key: value` headers followed by free-text
/// sections, ending with the status marker the reply must carry.
pub fn render_brief(request: &AgentRequest) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Role: {}", request.role.as_str());
    let _ = writeln!(out, "Session: {}", request.session_id);
    let _ = writeln!(out, "Group: {}", request.group_id);
    let _ = writeln!(out, "Revision: {}", request.revision);
    if !request.skills.is_empty() {
        let _ = writeln!(out, "Skills: {}", request.skills.join(", "));
    }

    let _ = writeln!(out, "\n## Task\n{}", request.group_description);
    let _ = writeln!(out, "\n## Session scope\n{}", request.scope.description());
    for item in request.scope.items() {
        let _ = writeln!(out, "- {}", item);
    }
    if let Some(feedback) = &request.feedback {
        let _ = writeln!(out, "\n## Feedback from the previous step\n{}", feedback);
    }

    let _ = writeln!(
        out,
        "\nEnd your reply with a line `STATUS: <keyword>` where keyword is {}.",
        status_keywords(request.role)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestra_domain::{GroupId, Scope, SessionId};

    fn request(role: AgentRole, feedback: Option<&str>) -> AgentRequest {
        AgentRequest {
            session_id: SessionId::new("s-1"),
            group_id: GroupId::new("g2"),
            role,
            group_description: "Refund endpoint".to_string(),
            scope: Scope::new("Billing")
                .unwrap()
                .with_item("Invoices")
                .unwrap()
                .with_item("Refund endpoint")
                .unwrap(),
            revision: 1,
            feedback: feedback.map(str::to_string),
            skills: vec!["lint-check".to_string()],
        }
    }

    #[test]
    fn test_brief_headers_and_sections() {
        let brief = render_brief(&request(AgentRole::Developer, Some("rounding is off")));
        assert!(brief.starts_with("Role: developer\nSession: s-1\nGroup: g2\nRevision: 1\n"));
        assert!(brief.contains("Skills: lint-check"));
        assert!(brief.contains("## Task\nRefund endpoint"));
        assert!(brief.contains("- Invoices"));
        assert!(brief.contains("## Feedback from the previous step\nrounding is off"));
        assert!(brief.trim_end().ends_with("READY_FOR_QA, READY_FOR_REVIEW or BLOCKED."));
    }

    #[test]
    fn test_brief_without_feedback() {
        let brief = render_brief(&request(AgentRole::TechLead, None));
        assert!(!brief.contains("Feedback"));
        assert!(brief.contains("APPROVED or CHANGES_REQUESTED"));
    }
}
