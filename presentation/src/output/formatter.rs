//! Output formatter trait

use orchestra_application::SessionReport;
use orchestra_domain::StateSnapshot;

/// Trait for formatting session results
pub trait OutputFormatter {
    /// Format the complete report
    fn format(&self, report: &SessionReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &SessionReport) -> String;

    /// Format outcome and counts only (concise output)
    fn format_summary(&self, report: &SessionReport) -> String;

    /// Format persisted state records of a session
    fn format_snapshots(&self, snapshots: &[StateSnapshot]) -> String;
}
