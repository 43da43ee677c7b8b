//! mvn-updates - Maven dependency update report CLI tool
//!
//! Reads a project's pom.xml, looks up the published versions of every
//! declared dependency and writes a report of the available updates.

use anyhow::Context;
use clap::Parser;
use mvn_updates::cli::CliArgs;
use mvn_updates::config::ReportConfig;
use mvn_updates::manifest::PomProject;
use mvn_updates::orchestrator::Orchestrator;
use mvn_updates::output::{create_formatter, write_report, Report, TextFormatter};
use mvn_updates::progress::Progress;
use mvn_updates::registry::{HttpClient, MavenRepositoryAdapter};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    if args.skip {
        info!("skipping update report");
        return ExitCode::SUCCESS;
    }

    // Run the main logic and handle errors
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber; `RUST_LOG` takes precedence over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Cancel `token` on Ctrl-C
fn interrupt_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("interrupt received, stopping retrieval");
                token.cancel();
            }
            Err(e) => warn!("cannot listen for Ctrl-C: {}", e),
        }
    });
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = ReportConfig::from_cli(&args)?;

    if config.verbose {
        eprintln!("mvn-updates v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Project: {}", config.pom_path.display());
    }

    let mut progress = Progress::new(config.show_summary && io::stderr().is_terminal());
    progress.reading(&config.pom_path);
    let project = PomProject::read(&config.pom_path);
    progress.finish();
    let project = project?;
    info!(
        project = %project.name(),
        dependencies = project.dependencies.len(),
        "project read"
    );

    let client = HttpClient::new()?;
    let source = MavenRepositoryAdapter::with_repositories(client, config.repositories.clone());
    let orchestrator = Orchestrator::new(Arc::new(source), Arc::new(config.policy.clone()))
        .with_config(config.orchestrator.clone());

    let interrupt = CancellationToken::new();
    interrupt_on_ctrl_c(interrupt.clone());

    progress.checking(project.dependencies.len());
    let retrieved = orchestrator
        .retrieve_with_progress(&project.dependencies, &interrupt, &progress)
        .await;
    progress.finish();
    let result = retrieved?;

    let report = Report::new(&result)?;
    let contents = create_formatter(config.format).render(&report)?;
    write_report(&config.output, &contents)?;
    info!(path = %config.output.display(), "report written");

    if config.show_summary {
        let formatter = TextFormatter::new(config.verbose);
        let mut stdout = io::stdout().lock();
        formatter
            .format(&report, Some(&config.output), &mut stdout)
            .context("cannot print summary")?;
        stdout.flush()?;
    }

    Ok(())
}
