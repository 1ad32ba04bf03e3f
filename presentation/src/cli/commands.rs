//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for session reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full report with every task group
    Full,
    /// Outcome and counts only
    Summary,
    /// JSON output
    Json,
}

/// CLI arguments for orchestra
#[derive(Parser, Debug)]
#[command(name = "orchestra")]
#[command(author, version, about = "Multi-agent session coordinator")]
#[command(long_about = r#"
Orchestra splits a scope of work into task groups and walks each group through
Developer -> QA -> Tech Lead agents, in parallel up to a concurrency cap.
A session only completes once the finished work covers the original scope.

Configuration files are loaded from (in priority order):
1. ORCHESTRA_* environment variables (e.g. ORCHESTRA_COORDINATOR__MAX_PARALLEL=2)
2. --config <path>       Explicit config file
3. ./orchestra.toml      Project-level config
4. ~/.config/orchestra/config.toml   Global config

Example:
  orchestra run "Add CSV and PDF export" --item "CSV export" --item "PDF export"
  orchestra run "Migrate reporting jobs" --items 5 --max-parallel 2 --dry-run
  orchestra status 3f2a9c1e-... --state-dir .orchestra/state
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a new session for a scope of work
    Run(RunArgs),
    /// Show the persisted state of a session
    Status(StatusArgs),
}

/// Arguments of `orchestra run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Description of the work to deliver
    pub scope: String,

    /// Number of items the scope is expected to produce
    #[arg(long, value_name = "N", conflicts_with = "item")]
    pub items: Option<usize>,

    /// An explicit scope item (can be specified multiple times)
    #[arg(long, value_name = "TEXT")]
    pub item: Vec<String>,

    /// Maximum number of groups dispatched at once
    #[arg(long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Revision cycles a group gets before it fails
    #[arg(long, value_name = "N")]
    pub max_revisions: Option<u32>,

    /// Complete the session even when some groups failed
    #[arg(long)]
    pub tolerate_failed: bool,

    /// Skill map JSON file
    #[arg(long, value_name = "PATH")]
    pub skills: Option<PathBuf>,

    /// Directory for session state snapshots
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Use simulated agents instead of the configured commands
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,
}

/// Arguments of `orchestra status`
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Session id printed by `orchestra run`
    pub session_id: String,

    /// Directory for session state snapshots
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "orchestra",
            "-vv",
            "run",
            "Add export",
            "--item",
            "CSV",
            "--item",
            "PDF",
            "--max-parallel",
            "2",
            "--tolerate-failed",
            "--dry-run",
            "-o",
            "json",
        ]);
        assert_eq!(cli.verbose, 2);
        let Some(Command::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.scope, "Add export");
        assert_eq!(args.item, vec!["CSV", "PDF"]);
        assert_eq!(args.max_parallel, Some(2));
        assert!(args.tolerate_failed);
        assert!(args.dry_run);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_items_conflicts_with_item() {
        let result = Cli::try_parse_from(["orchestra", "run", "x", "--items", "2", "--item", "a"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["orchestra", "status", "abc", "--quiet", "--no-config"]);
        assert!(cli.quiet);
        assert!(cli.no_config);
        assert!(matches!(cli.command, Some(Command::Status(ref s)) if s.session_id == "abc"));
    }
}
