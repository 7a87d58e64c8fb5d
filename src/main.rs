//! Runs a dialogue script against a bot reachable through a broker.
//!
//! Exit status is 0 when every test passes, 1 when a test fails and 2 when
//! the run cannot start.

mod cli;

use std::{process::ExitCode, sync::Arc, time::Duration};

use botrunner::{ConsoleReporter, LineTransport, RunConfig, RunnerError, ScriptDocument, SuiteReport};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    match run(cli).await {
        Ok(report) if report.all_passed() => ExitCode::SUCCESS,
        Ok(report) => {
            for (test, failure) in report.failures() {
                error!(%test, %failure, "test failed");
            }
            ExitCode::from(1)
        }
        Err(error) => {
            error!(%error, "run aborted");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: cli::Cli) -> Result<SuiteReport, RunnerError> {
    let document = ScriptDocument::from_path(&cli.script)?;
    let transport = LineTransport::connect(cli.endpoint.as_str())
        .await
        .map_err(RunnerError::Connect)?;
    info!(endpoint = %cli.endpoint, "broker connection ok");

    let timeout = (cli.reply_timeout_secs > 0).then(|| Duration::from_secs(cli.reply_timeout_secs));
    let config = RunConfig::default()
        .reply_timeout(timeout)
        .keep_going(cli.keep_going)
        .queue_capacity(cli.queue_capacity);
    botrunner::run(&document, Arc::new(transport), ConsoleReporter::stdout(), config).await
}
