//! loadgate: Neptune bulk-load pre-flight and orchestration CLI
//!
//! Checks that a principal may query the graph and read the staging bucket,
//! then runs input generation and the bulk load, printing a per-step summary.
//!
//! Usage:
//!   loadgate --config loadgate.toml run
//!   loadgate --config loadgate.toml run --json --journal run.json
//!   loadgate --config loadgate.toml --offline policies/offline.toml run
//!   loadgate --config loadgate.toml check-graph
//!   loadgate --config loadgate.toml actions
//!   loadgate whoami

mod app;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use loadgate_aws::AwsSession;
use loadgate_contracts::{
    error::{LoadgateError, LoadgateResult},
    summary::RunSummary,
};
use loadgate_core::traits::RunReporter;
use loadgate_policy::PolicyDocument;
use loadgate_report::{FanoutReporter, JournalReporter, TracingReporter};

use crate::{
    app::{build_checker, build_orchestrator, Backend},
    settings::Settings,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Pre-flight IAM and S3 checks for Neptune bulk loads.
#[derive(Parser)]
#[command(
    name = "loadgate",
    about = "Neptune bulk-load pre-flight checks and orchestration",
    long_about = "Simulates the IAM permissions a Neptune bulk load needs, probes the\n\
                  staging bucket, then runs input generation and the load itself."
)]
struct Cli {
    /// Settings file.
    #[arg(short, long, global = true, default_value = "loadgate.toml")]
    config: PathBuf,

    /// Use an offline policy file instead of calling AWS.
    #[arg(long, global = true, value_name = "POLICY_TOML")]
    offline: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every step: checks, input generation, bulk load.
    Run {
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
        /// Write the hash-chained event journal to this path.
        #[arg(long)]
        journal: Option<PathBuf>,
    },
    /// Simulate the graph query permissions only.
    CheckGraph,
    /// Simulate storage permissions and probe the bucket only.
    CheckStorage,
    /// Print the action set and resource scopes that would be simulated.
    Actions,
    /// Print the identity the AWS credentials resolve to.
    Whoami,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Set RUST_LOG=debug for collaborator-level detail.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Run { json, journal } => run(&cli, *json, journal.as_ref()),
        Command::CheckGraph => check(&cli, Check::Graph),
        Command::CheckStorage => check(&cli, Check::Storage),
        Command::Actions => actions(&cli),
        Command::Whoami => whoami(&cli),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("loadgate: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn connect(cli: &Cli) -> impl FnOnce(&Settings) -> LoadgateResult<Backend> + '_ {
    move |settings| match &cli.offline {
        Some(path) => Ok(Backend::Offline(PolicyDocument::from_file(path)?)),
        None => Ok(Backend::Aws(AwsSession::connect(&settings.session_options())?)),
    }
}

fn run(cli: &Cli, json: bool, journal_path: Option<&PathBuf>) -> LoadgateResult<bool> {
    let settings = Settings::from_file(&cli.config)?;

    let journal = JournalReporter::new();
    let reporter: Box<dyn RunReporter> = match journal_path {
        Some(_) => Box::new(FanoutReporter::new().with(TracingReporter).with(journal.clone())),
        None => Box::new(TracingReporter),
    };

    let orchestrator = build_orchestrator(&settings, connect(cli), reporter)?;
    let summary = orchestrator.run();

    if json {
        print_json(&summary);
    } else {
        print_summary(&summary);
    }

    if let Some(path) = journal_path {
        journal.write_to(path)?;
    }

    Ok(summary.all_ok())
}

enum Check {
    Graph,
    Storage,
}

fn check(cli: &Cli, which: Check) -> LoadgateResult<bool> {
    let settings = Settings::from_file(&cli.config)?;
    let orchestrator = build_checker(&settings, connect(cli), Box::new(TracingReporter))?;

    let (label, ok) = match which {
        Check::Graph => ("graph permissions", orchestrator.check_graph_permissions()?),
        Check::Storage => ("storage permissions", orchestrator.check_storage_permissions()?),
    };
    println!("{label}: {}", if ok { "ok" } else { "DENIED" });
    Ok(ok)
}

fn actions(cli: &Cli) -> LoadgateResult<bool> {
    let settings = Settings::from_file(&cli.config)?;
    let config = settings.agent_config()?;

    println!("principal: {}", config.principal_arn());
    println!("mode:      {}", config.mode());
    println!();
    println!("graph actions (against {}):", config.graph_resources().join(", "));
    for action in &config.actions().graph {
        println!("  {action}");
    }
    println!();
    println!("storage actions (against {}):", config.storage_resources().join(", "));
    for action in &config.actions().storage {
        println!("  {action}");
    }
    Ok(true)
}

fn whoami(cli: &Cli) -> LoadgateResult<bool> {
    if cli.offline.is_some() {
        return Err(LoadgateError::config(
            "whoami needs AWS credentials and is not available with --offline",
        ));
    }

    // The settings file is optional here; only its [aws] table is used.
    let options = Settings::from_optional_file(&cli.config)?
        .map(|settings| settings.session_options())
        .unwrap_or_default();

    let identity = AwsSession::connect(&options)?.caller_identity()?;
    println!("account: {}", identity.account.as_deref().unwrap_or("-"));
    println!("arn:     {}", identity.arn.as_deref().unwrap_or("-"));
    println!("user id: {}", identity.user_id.as_deref().unwrap_or("-"));
    Ok(true)
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_summary(summary: &RunSummary) {
    println!();
    println!("SUMMARY:");
    for (step, report) in summary.iter() {
        println!("- {step}: {report}");
    }
}

fn print_json(summary: &RunSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("loadgate: cannot serialize summary: {e}"),
    }
}
