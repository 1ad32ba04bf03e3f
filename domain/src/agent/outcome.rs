//! Invocation outcomes and status-report parsing.
//!
//! Agents answer in free text. The only structured part the coordinator
//! relies on is a status marker line:
//!
//! ```text
//! STATUS: READY_FOR_QA
//! ```
//!
//! | Role | Keywords |
//! |------|----------|
//! | Developer | `READY_FOR_QA`, `READY_FOR_REVIEW`, `BLOCKED` |
//! | QA | `PASS` / `TESTS_PASSED`, `FAIL` / `TESTS_FAILED` |
//! | Tech Lead | `APPROVED`, `CHANGES_REQUESTED` |
//!
//! Parsing is conservative: a missing marker, an unknown keyword or a keyword
//! the role is not allowed to report all classify as [`InvocationOutcome::Errored`].

use super::role::AgentRole;
use serde::{Deserialize, Serialize};

/// Classified result of one agent invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// Developer finished; QA should test next
    ReadyForQa,
    /// Developer finished; go straight to review
    ReadyForReview,
    /// Developer cannot proceed
    Blocked(String),
    /// QA: tests pass
    TestsPassed,
    /// QA: tests fail, with feedback for the developer
    TestsFailed(String),
    /// Tech Lead approved the group
    Approved,
    /// Tech Lead wants changes, with feedback for the developer
    ChangesRequested(String),
    /// The invocation itself failed, timed out or produced no usable status
    Errored(String),
}

/// Review verdict kept on a task group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    TestsPassed,
    TestsFailed,
    Approved,
    ChangesRequested,
}

impl ReviewOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            ReviewOutcome::TestsPassed => "tests_passed",
            ReviewOutcome::TestsFailed => "tests_failed",
            ReviewOutcome::Approved => "approved",
            ReviewOutcome::ChangesRequested => "changes_requested",
        }
    }
}

impl std::fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a group goes after an outcome is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Hand the group to the next role; it stays in progress
    Forward(AgentRole),
    /// The group is approved and can complete
    Complete,
    /// Spend a revision and retry with the given role
    Revise(AgentRole),
}

impl InvocationOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            InvocationOutcome::ReadyForQa => "ready_for_qa",
            InvocationOutcome::ReadyForReview => "ready_for_review",
            InvocationOutcome::Blocked(_) => "blocked",
            InvocationOutcome::TestsPassed => "tests_passed",
            InvocationOutcome::TestsFailed(_) => "tests_failed",
            InvocationOutcome::Approved => "approved",
            InvocationOutcome::ChangesRequested(_) => "changes_requested",
            InvocationOutcome::Errored(_) => "errored",
        }
    }

    /// Feedback text carried by the outcome, if any.
    pub fn feedback(&self) -> Option<&str> {
        match self {
            InvocationOutcome::Blocked(s)
            | InvocationOutcome::TestsFailed(s)
            | InvocationOutcome::ChangesRequested(s)
            | InvocationOutcome::Errored(s) => Some(s),
            _ => None,
        }
    }

    pub fn review_outcome(&self) -> Option<ReviewOutcome> {
        match self {
            InvocationOutcome::TestsPassed => Some(ReviewOutcome::TestsPassed),
            InvocationOutcome::TestsFailed(_) => Some(ReviewOutcome::TestsFailed),
            InvocationOutcome::Approved => Some(ReviewOutcome::Approved),
            InvocationOutcome::ChangesRequested(_) => Some(ReviewOutcome::ChangesRequested),
            _ => None,
        }
    }

    /// Whether `role` is allowed to report this outcome.
    pub fn valid_for(&self, role: AgentRole) -> bool {
        match self {
            InvocationOutcome::ReadyForQa
            | InvocationOutcome::ReadyForReview
            | InvocationOutcome::Blocked(_) => role == AgentRole::Developer,
            InvocationOutcome::TestsPassed | InvocationOutcome::TestsFailed(_) => {
                role == AgentRole::Qa
            }
            InvocationOutcome::Approved | InvocationOutcome::ChangesRequested(_) => {
                role == AgentRole::TechLead
            }
            InvocationOutcome::Errored(_) => true,
        }
    }

    /// Routing decision for an outcome reported by `role`.
    pub fn route(&self, role: AgentRole) -> Route {
        match self {
            InvocationOutcome::ReadyForQa => Route::Forward(AgentRole::Qa),
            InvocationOutcome::ReadyForReview | InvocationOutcome::TestsPassed => {
                Route::Forward(AgentRole::TechLead)
            }
            InvocationOutcome::Approved => Route::Complete,
            InvocationOutcome::Blocked(_)
            | InvocationOutcome::TestsFailed(_)
            | InvocationOutcome::ChangesRequested(_) => Route::Revise(AgentRole::Developer),
            InvocationOutcome::Errored(_) => Route::Revise(role),
        }
    }
}

impl std::fmt::Display for InvocationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.feedback() {
            Some(feedback) => write!(f, "{} ({})", self.as_str(), feedback),
            None => write!(f, "{}", self.as_str()),
        }
    }
}

/// Parse an agent reply into an outcome for `role`.
///
/// The last `STATUS:` line wins. Feedback-carrying outcomes keep the whole
/// reply (trimmed) as feedback for the next attempt.
///
/// # Examples
///
/// ```
/// use orchestra_domain::{AgentRole, InvocationOutcome, parse_status_report};
///
/// let reply = "Added the login endpoint.\nSTATUS: READY_FOR_QA";
/// assert_eq!(
///     parse_status_report(AgentRole::Developer, reply),
///     InvocationOutcome::ReadyForQa
/// );
/// assert!(matches!(
///     parse_status_report(AgentRole::Qa, "no marker here"),
///     InvocationOutcome::Errored(_)
/// ));
/// ```
pub fn parse_status_report(role: AgentRole, reply: &str) -> InvocationOutcome {
    let Some(keyword) = last_status_keyword(reply) else {
        return InvocationOutcome::Errored("agent reply contained no STATUS line".to_string());
    };

    let feedback = reply.trim().to_string();
    let outcome = match keyword.as_str() {
        "READY_FOR_QA" => InvocationOutcome::ReadyForQa,
        "READY_FOR_REVIEW" => InvocationOutcome::ReadyForReview,
        "BLOCKED" => InvocationOutcome::Blocked(feedback),
        "PASS" | "PASSED" | "TESTS_PASSED" => InvocationOutcome::TestsPassed,
        "FAIL" | "FAILED" | "TESTS_FAILED" => InvocationOutcome::TestsFailed(feedback),
        "APPROVED" | "APPROVE" => InvocationOutcome::Approved,
        "CHANGES_REQUESTED" | "REQUEST_CHANGES" => InvocationOutcome::ChangesRequested(feedback),
        other => {
            return InvocationOutcome::Errored(format!("unknown status keyword '{}'", other));
        }
    };

    if !outcome.valid_for(role) {
        return InvocationOutcome::Errored(format!(
            "status '{}' is not valid for role {}",
            keyword,
            role.as_str()
        ));
    }
    outcome
}

fn last_status_keyword(reply: &str) -> Option<String> {
    reply.lines().rev().find_map(|line| {
        let trimmed = line.trim().trim_start_matches(['*', '#', '-', '>', ' ']);
        let upper = trimmed.to_uppercase();
        let rest = upper.strip_prefix("STATUS")?;
        let rest = rest.trim_start_matches('*').trim_start();
        let rest = rest.strip_prefix(':')?;
        let keyword: String = rest
            .trim_start_matches(['*', ' '])
            .split(|c: char| c.is_whitespace() || c == '*' || c == '.' || c == ',')
            .next()?
            .replace('-', "_");
        (!keyword.is_empty()).then_some(keyword)
    })
}
