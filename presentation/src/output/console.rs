//! Console output formatter for session reports

use crate::cli::commands::OutputFormat;
use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use orchestra_application::{SessionOutcome, SessionReport};
use orchestra_domain::util::truncate_str;
use orchestra_domain::{GroupOrigin, GroupStatus, StateSnapshot, TaskGroup};

const DESCRIPTION_WIDTH: usize = 48;

/// Formats session reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a report in the requested format
    pub fn render(report: &SessionReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(report),
            OutputFormat::Summary => Self::format_summary(report),
            OutputFormat::Json => Self::format_json(report),
        }
    }

    /// Format persisted state in the requested format
    pub fn render_snapshots(snapshots: &[StateSnapshot], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(snapshots).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Full | OutputFormat::Summary => Self::format_snapshots(snapshots),
        }
    }

    /// Format the complete report
    pub fn format(report: &SessionReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Session Report"));
        output.push('\n');
        output.push_str(&Self::overview(report));

        output.push_str(&Self::section_header("Task Groups"));
        for group in &report.groups {
            output.push_str(&Self::group_line(group));
        }

        let failed = report.failed_groups();
        if !failed.is_empty() {
            output.push_str(&Self::section_header("Needs Attention"));
            for group in failed {
                output.push_str(&format!(
                    "  {} {}\n",
                    group.id.as_str().red().bold(),
                    group
                        .failure
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| "failed".to_string())
                ));
                if let Some(feedback) = &group.last_feedback {
                    output.push_str(&Self::indent(feedback.trim(), "      "));
                    output.push('\n');
                }
            }
        }

        if let Some(missing) = report.unfilled_gap {
            output.push_str(&format!(
                "\n{} {} scope item(s) were never delivered\n",
                "Gap:".yellow().bold(),
                missing
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &SessionReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format outcome and counts only (concise output)
    pub fn format_summary(report: &SessionReport) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n",
            "=== Session".cyan().bold(),
            format!("{} ===", report.session_id).cyan().bold()
        ));
        output.push_str(&Self::overview(report));
        output
    }

    /// Format persisted state records
    pub fn format_snapshots(snapshots: &[StateSnapshot]) -> String {
        let mut output = String::new();
        for snapshot in snapshots {
            match snapshot {
                StateSnapshot::Pm(pm) => {
                    output.push_str(&Self::section_header("Plan"));
                    output.push_str(&format!("  {} {}\n", "Mode:".dimmed(), pm.mode.as_str()));
                    output.push_str(&format!(
                        "  {} {}\n",
                        "Groups:".dimmed(),
                        pm.planned_groups
                            .iter()
                            .map(|g| g.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ));
                    output.push_str(&format!("  {} {}\n", "Rationale:".dimmed(), pm.rationale));
                }
                StateSnapshot::Orchestrator(state) => {
                    output.push_str(&Self::section_header("Coordinator"));
                    output.push_str(&format!("  {} {}\n", "Phase:".dimmed(), state.phase));
                    output.push_str(&format!(
                        "  {} {}/{} completed, {} failed, {} in flight\n",
                        "Groups:".dimmed(),
                        state.counts.completed,
                        state.counts.total,
                        state.counts.failed,
                        state.in_flight
                    ));
                    output.push_str(&format!(
                        "  {} {} (updated {})\n",
                        "Validation rounds:".dimmed(),
                        state.validation_rounds,
                        state.updated_at.format("%Y-%m-%d %H:%M:%S")
                    ));
                }
                StateSnapshot::TaskGroup(state) => output.push_str(&Self::group_line(&state.0)),
            }
        }
        if output.is_empty() {
            output.push_str("No state recorded for this session\n");
        }
        output
    }

    fn overview(report: &SessionReport) -> String {
        let counts = &report.counts;
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n",
            "Outcome:".cyan().bold(),
            Self::outcome_label(report.outcome)
        ));
        output.push_str(&format!(
            "{} {} ({} mode), stopped in {}\n",
            "Session:".cyan().bold(),
            report.session_id,
            report.mode.as_str(),
            report.phase
        ));
        output.push_str(&format!(
            "{} {}/{} completed, {} failed, {} pending\n",
            "Groups:".cyan().bold(),
            counts.completed,
            counts.total,
            counts.failed,
            counts.pending + counts.in_progress
        ));
        output.push_str(&format!(
            "{} {} invocation(s), {} validation round(s)\n",
            "Work:".cyan().bold(),
            report.invocations,
            report.validation_rounds
        ));
        output
    }

    fn outcome_label(outcome: SessionOutcome) -> ColoredString {
        match outcome {
            SessionOutcome::Completed => outcome.as_str().green().bold(),
            SessionOutcome::CompletedWithFailures => outcome.as_str().yellow().bold(),
            SessionOutcome::Partial => outcome.as_str().red().bold(),
            SessionOutcome::Abandoned => outcome.as_str().dimmed(),
        }
    }

    fn status_label(status: GroupStatus) -> ColoredString {
        let text = format!("{:<11}", status.to_string());
        match status {
            GroupStatus::Completed => text.green(),
            GroupStatus::Failed => text.red(),
            GroupStatus::InProgress => text.yellow(),
            GroupStatus::Pending => text.dimmed(),
        }
    }

    fn group_line(group: &TaskGroup) -> String {
        let origin = match group.origin {
            GroupOrigin::Planned => "",
            GroupOrigin::ScopeGap => " [gap]",
        };
        format!(
            "  {:<5} {} rev {} {}{}\n",
            group.id.as_str(),
            Self::status_label(group.status),
            group.revision_count,
            truncate_str(&group.description, DESCRIPTION_WIDTH),
            origin.yellow()
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &SessionReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &SessionReport) -> String {
        Self::format_json(report)
    }

    fn format_summary(&self, report: &SessionReport) -> String {
        Self::format_summary(report)
    }

    fn format_snapshots(&self, snapshots: &[StateSnapshot]) -> String {
        Self::format_snapshots(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestra_domain::{
        CoordinatorPhase, ExecutionMode, FailureReason, GroupCounts, GroupId, SessionId,
    };

    fn report() -> SessionReport {
        colored::control::set_override(false);
        let sid = SessionId::new("s-1");
        let done = TaskGroup::new(GroupId::new("g1"), sid.clone(), "CSV export", 1, GroupOrigin::Planned);
        let mut failed = TaskGroup::new(
            GroupId::new("g2"),
            sid.clone(),
            "PDF export",
            2,
            GroupOrigin::ScopeGap,
        );
        failed.status = GroupStatus::Failed;
        failed.last_feedback = Some("fonts missing".to_string());
        failed.failure = Some(FailureReason::RevisionLimitExceeded {
            revisions: 4,
            last_feedback: failed.last_feedback.clone(),
        });
        let groups = vec![done, failed];
        SessionReport {
            session_id: sid,
            outcome: SessionOutcome::Partial,
            phase: CoordinatorPhase::Validating,
            mode: ExecutionMode::Parallel,
            counts: GroupCounts::from_groups(&groups),
            groups,
            invocations: 14,
            validation_rounds: 2,
            unfilled_gap: None,
        }
    }

    #[test]
    fn test_full_report_lists_groups_and_failures() {
        let output = ConsoleFormatter::format(&report());
        assert!(output.contains("Outcome: partial"));
        assert!(output.contains("g1"));
        assert!(output.contains("PDF export [gap]"));
        assert!(output.contains("Needs Attention"));
        assert!(output.contains("revision limit exceeded after 4 revisions"));
        assert!(output.contains("      fonts missing"));
    }

    #[test]
    fn test_summary_has_counts_only() {
        let output = ConsoleFormatter::format_summary(&report());
        assert!(output.contains("0/2 completed, 1 failed, 1 pending"));
        assert!(!output.contains("Task Groups"));
    }

    #[test]
    fn test_json_report() {
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::render(&report(), OutputFormat::Json)).unwrap();
        assert_eq!(value["outcome"], "partial");
        assert_eq!(value["groups"][1]["failure"]["reason"], "revision_limit_exceeded");
    }

    #[test]
    fn test_snapshots_as_json_keep_their_kind() {
        let report = report();
        let snapshots: Vec<StateSnapshot> = report.groups.into_iter().map(Into::into).collect();
        let value: serde_json::Value = serde_json::from_str(&ConsoleFormatter::render_snapshots(
            &snapshots,
            OutputFormat::Json,
        ))
        .unwrap();
        assert_eq!(value[0]["kind"], "task_group");
        assert_eq!(value[1]["id"], "g2");

        let text = ConsoleFormatter::render_snapshots(&snapshots, OutputFormat::Full);
        assert!(text.contains("CSV export"));
    }

    #[test]
    fn test_empty_snapshots() {
        assert!(ConsoleFormatter::format_snapshots(&[]).contains("No state recorded"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
