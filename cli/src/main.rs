//! CLI entrypoint for orchestra
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use orchestra_application::{
    AgentGateway, CoordinatorParams, CoordinatorProgressNotifier, Coordinator, NoProgress,
    SessionOutcome, SessionReport, StateRepository,
};
use orchestra_domain::{Scope, SessionId};
use orchestra_infrastructure::skills::load_optional;
use orchestra_infrastructure::{
    CommandAgentGateway, ConfigLoader, FileConfig, JsonStateRepository, JsonlInvocationLogger,
    SimulatedAgentGateway,
};
use orchestra_presentation::{
    Cli, Command, ConsoleFormatter, ProgressReporter, RunArgs, SimpleProgress, StatusArgs,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Exit code for a session left active for human attention.
const EXIT_PARTIAL: u8 = 2;
/// Exit code for a session interrupted with Ctrl-C.
const EXIT_ABANDONED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let _log_guard = init_tracing(cli.verbose, &config);
    info!("Starting orchestra");

    match cli.command {
        Some(Command::Run(args)) => run(args, config, cli.quiet).await,
        Some(Command::Status(args)) => status(args, &config),
        None => bail!("No command given. Try `orchestra run --help`."),
    }
}

/// Console logging by verbosity (or `RUST_LOG`), plus a daily-rotated file
/// when `[logging] dir` is set. The returned guard flushes the file writer.
fn init_tracing(verbose: u8, config: &FileConfig) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file, guard) = match &config.logging.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "orchestra.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}

async fn run(args: RunArgs, mut config: FileConfig, quiet: bool) -> Result<ExitCode> {
    // CLI flags override the merged configuration before it is validated
    if let Some(max) = args.max_parallel {
        config.coordinator.max_parallel = max;
    }
    if let Some(max) = args.max_revisions {
        config.coordinator.max_revisions = max;
    }
    if args.tolerate_failed {
        config.coordinator.failure_policy = "tolerate_failed".to_string();
    }

    for issue in config.check()? {
        warn!("{}", issue);
    }

    let skills_path = args.skills.as_ref().or(config.skills.path.as_ref());
    let skills = load_optional(skills_path.map(PathBuf::as_path))?;
    let params = config.to_params(skills);

    let mut scope = Scope::new(args.scope)?;
    for item in args.item {
        scope = scope.with_item(item)?;
    }
    if let Some(count) = args.items {
        scope = scope.with_estimated_items(count)?;
    }

    let state_dir = args.state_dir.or_else(|| config.state.dir.clone());
    let state = state_dir.map(|dir| Arc::new(JsonStateRepository::new(dir)));
    let audit = config
        .logging
        .audit_path()
        .and_then(JsonlInvocationLogger::new)
        .map(Arc::new);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; waiting for running agents to finish");
            on_signal.cancel();
        }
    });

    let progress: Box<dyn CoordinatorProgressNotifier> = if quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let wiring = Wiring {
        params,
        state,
        audit,
        cancel,
    };
    let report = if args.dry_run {
        info!("Dry run: using simulated agents");
        execute(Arc::new(SimulatedAgentGateway::new()), wiring, scope, progress.as_ref()).await?
    } else {
        let gateway = CommandAgentGateway::from_config(&config.agents);
        if gateway.configured_roles().is_empty() {
            bail!("No agent command configured. Set [agents] command or use --dry-run.");
        }
        execute(Arc::new(gateway), wiring, scope, progress.as_ref()).await?
    };

    println!("{}", ConsoleFormatter::render(&report, args.output));

    Ok(match report.outcome {
        SessionOutcome::Completed | SessionOutcome::CompletedWithFailures => ExitCode::SUCCESS,
        SessionOutcome::Partial => ExitCode::from(EXIT_PARTIAL),
        SessionOutcome::Abandoned => ExitCode::from(EXIT_ABANDONED),
    })
}

/// Adapters shared by both gateway kinds
struct Wiring {
    params: CoordinatorParams,
    state: Option<Arc<JsonStateRepository>>,
    audit: Option<Arc<JsonlInvocationLogger>>,
    cancel: CancellationToken,
}

async fn execute<G: AgentGateway + 'static>(
    gateway: Arc<G>,
    wiring: Wiring,
    scope: Scope,
    progress: &dyn CoordinatorProgressNotifier,
) -> Result<SessionReport> {
    let mut coordinator =
        Coordinator::new(gateway, wiring.params).with_cancellation(wiring.cancel);
    if let Some(state) = wiring.state {
        coordinator = coordinator.with_state_repository(state);
    }
    if let Some(audit) = wiring.audit {
        coordinator = coordinator.with_invocation_logger(audit);
    }

    let report = coordinator.run_with_progress(scope, progress).await?;
    info!(
        "Session {} finished: {} ({} invocations)",
        report.session_id, report.outcome, report.invocations
    );
    Ok(report)
}

fn status(args: StatusArgs, config: &FileConfig) -> Result<ExitCode> {
    let Some(dir) = args.state_dir.or_else(|| config.state.dir.clone()) else {
        bail!("No state directory. Pass --state-dir or set [state] dir.");
    };
    let repository = JsonStateRepository::new(dir);
    let snapshots = repository.load_session(&SessionId::new(args.session_id.clone()))?;
    if snapshots.is_empty() {
        bail!("No state recorded for session {}", args.session_id);
    }

    println!(
        "{}",
        ConsoleFormatter::render_snapshots(&snapshots, args.output)
    );
    Ok(ExitCode::SUCCESS)
}
