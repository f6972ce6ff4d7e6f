use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use txwatch::{
    broadcast::{self, BroadcastError},
    reporter::{ConsoleReporter, Report, Reporter},
    tracker::TrackerError,
    utils::logging,
    HttpStatusClient, Poller, PollerOutcome, StatusTracker,
};

mod cli;

use cli::Cli;

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
/// Conventional exit status after SIGINT
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.debug) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let result = run(cli).await;
    match &result {
        Ok(PollerOutcome::Completed) => {}
        Ok(PollerOutcome::Cancelled) => eprintln!("Monitoring cancelled before all transactions completed."),
        Err(e) => {
            for line in failure_lines(e) {
                eprintln!("{}", line);
            }
        }
    }
    ExitCode::from(exit_status(&result))
}

async fn run(cli: Cli) -> Result<PollerOutcome> {
    let config = cli.resolve_config().context("Invalid configuration")?;
    tracing::debug!(?config, "Resolved configuration");

    let path = broadcast::broadcast_path(&config.broadcast_dir, &cli.script_name, config.chain_id);
    let hashes = broadcast::load_transaction_hashes(&path)?;

    let mut reporter = ConsoleReporter;
    reporter.report(Report::Found { count: hashes.len() });

    let client = HttpStatusClient::new(config.endpoint()?, config.request_timeout())
        .context("Failed to build status client")?;
    let tracker = StatusTracker::new(hashes, config.chain_id, Box::new(ConsoleReporter));

    let cancel = CancellationToken::new();
    let mut poller = Poller::new(tracker, Arc::new(client), config.poll_interval()).with_cancellation(cancel.clone());
    tokio::spawn(cancel_on_ctrl_c(cancel));

    reporter.report(Report::MonitoringStarted);
    Ok(poller.run().await?)
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
                return;
            }
            cancel.cancel();
        }
    }
}

/// Process exit status for the outcome of a run
fn exit_status(result: &Result<PollerOutcome>) -> u8 {
    match result {
        Ok(PollerOutcome::Completed) => EXIT_SUCCESS,
        Ok(PollerOutcome::Cancelled) => EXIT_INTERRUPTED,
        Err(_) => EXIT_FAILURE,
    }
}

/// Lines to print for a fatal error; empty when the reporter already showed it
fn failure_lines(error: &anyhow::Error) -> Vec<String> {
    if let Some(TrackerError::ForwarderNotDeployed(_)) = error.downcast_ref::<TrackerError>() {
        return Vec::new();
    }

    let mut lines = vec![format!("Error: {:#}", error)];
    if let Some(BroadcastError::NotFound(_)) = error.downcast_ref::<BroadcastError>() {
        lines.push("Ensure you have run the Forge script with --broadcast".to_string());
        lines.push("Use --help for more information".to_string());
    }
    lines
}
