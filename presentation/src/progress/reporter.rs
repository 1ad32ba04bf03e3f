//! Progress reporting for coordinator runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use orchestra_application::CoordinatorProgressNotifier;
use orchestra_domain::{
    AgentInvocation, AgentRole, CoordinatorPhase, GroupStatus, ScopeVerdict, SessionId, TaskGroup,
};
use std::sync::{Mutex, PoisonError};

/// Reports progress with a bar over the session's task groups
pub struct ProgressReporter {
    multi: MultiProgress,
    groups_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            groups_bar: Mutex::new(None),
        }
    }

    fn groups_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: CoordinatorPhase) -> &'static str {
        match phase {
            CoordinatorPhase::Planning => "Planning task groups",
            CoordinatorPhase::Executing => "Executing task groups",
            CoordinatorPhase::Validating => "Validating against scope",
            CoordinatorPhase::Completed => "Session completed",
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let guard = self
            .groups_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = guard.as_ref() {
            f(pb);
        }
    }

    fn println(&self, line: String) {
        // Falls back to stderr when the terminal is not attached
        if self.multi.println(&line).is_err() {
            eprintln!("{}", line);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinatorProgressNotifier for ProgressReporter {
    fn on_phase_change(&self, _session_id: &SessionId, phase: CoordinatorPhase) {
        if phase == CoordinatorPhase::Completed {
            let taken = self
                .groups_bar
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            if let Some(pb) = taken {
                pb.finish_with_message(format!("{}", "done".green()));
            }
        } else {
            self.with_bar(|pb| pb.set_message(Self::phase_display_name(phase).to_string()));
        }
    }

    fn on_groups_planned(&self, session_id: &SessionId, groups: &[TaskGroup]) {
        let pb = self.multi.add(ProgressBar::new(groups.len() as u64));
        pb.set_style(Self::groups_style());
        pb.set_prefix(format!("Session {}", session_id));
        pb.set_message("Starting...");

        *self
            .groups_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_dispatch(&self, group: &TaskGroup, role: AgentRole) {
        self.with_bar(|pb| pb.set_message(format!("{} -> {}", group.id, role)));
    }

    fn on_group_finished(&self, group: &TaskGroup) {
        self.with_bar(|pb| {
            let status = match group.status {
                GroupStatus::Completed => format!("{} {}", "v".green(), group.id),
                _ => format!("{} {}", "x".red(), group.id),
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_validation(&self, _session_id: &SessionId, round: u32, verdict: &ScopeVerdict) {
        if let ScopeVerdict::Gap { missing } = verdict {
            self.println(format!(
                "{} validation round {}: {} scope item(s) missing",
                "!".yellow(),
                round,
                missing
            ));
        }
    }

    fn on_gap_groups_created(&self, _session_id: &SessionId, groups: &[TaskGroup]) {
        self.with_bar(|pb| pb.inc_length(groups.len() as u64));
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Writes to stderr so report output on stdout stays machine-readable.
pub struct SimpleProgress;

impl CoordinatorProgressNotifier for SimpleProgress {
    fn on_phase_change(&self, _session_id: &SessionId, phase: CoordinatorPhase) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            ProgressReporter::phase_display_name(phase).bold()
        );
    }

    fn on_groups_planned(&self, _session_id: &SessionId, groups: &[TaskGroup]) {
        for group in groups {
            eprintln!("  {} {}", group.id.as_str().cyan(), group.description);
        }
    }

    fn on_invocation_complete(&self, invocation: &AgentInvocation) {
        eprintln!(
            "  {} {} {}",
            invocation.group_id,
            invocation.role,
            invocation.outcome.as_str().dimmed()
        );
    }

    fn on_group_finished(&self, group: &TaskGroup) {
        match group.status {
            GroupStatus::Completed => eprintln!("  {} {} completed", "v".green(), group.id),
            _ => eprintln!("  {} {} failed", "x".red(), group.id),
        }
    }

    fn on_validation(&self, _session_id: &SessionId, round: u32, verdict: &ScopeVerdict) {
        let text = match verdict {
            ScopeVerdict::NotDrained => return,
            ScopeVerdict::Gap { missing } => format!("{} item(s) missing", missing),
            ScopeVerdict::BlockedByFailures { failed } => {
                format!("blocked by {} failed group(s)", failed)
            }
            ScopeVerdict::Satisfied { failed: 0 } => "scope satisfied".to_string(),
            ScopeVerdict::Satisfied { failed } => {
                format!("scope satisfied, {} failure(s) tolerated", failed)
            }
        };
        eprintln!("  validation round {}: {}", round, text);
    }

    fn on_gap_groups_created(&self, _session_id: &SessionId, groups: &[TaskGroup]) {
        for group in groups {
            eprintln!(
                "  {} {} {}",
                "+".yellow(),
                group.id.as_str().cyan(),
                group.description
            );
        }
    }
}
