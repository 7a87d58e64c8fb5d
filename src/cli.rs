//! Command line interface for the `botrunner` binary.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for the `botrunner` binary.
#[derive(Debug, Parser)]
#[command(
    name = "botrunner",
    version,
    about = "Drive a chat bot through scripted conversations"
)]
pub struct Cli {
    /// Script document describing the tests.
    #[arg(short, long, default_value = "tests.json")]
    pub script: PathBuf,
    /// Broker address as `host:port`.
    #[arg(short, long, default_value = "127.0.0.1:2443")]
    pub endpoint: String,
    /// Seconds to wait for each bot turn. 0 waits forever; set a bound to
    /// fail tests against a bot that stops answering.
    #[arg(long, default_value_t = 0)]
    pub reply_timeout_secs: u64,
    /// Run remaining tests after a failure.
    #[arg(long)]
    pub keep_going: bool,
    /// Capacity of the inbound event queue.
    #[arg(long, default_value_t = 64)]
    pub queue_capacity: usize,
}
