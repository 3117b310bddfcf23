//! scport CLI - report the StarCraft client's PID and web API port.
//!
//! Prints one line on success and exits 0; any stage failure prints one
//! error line and exits 1. A client that simply isn't running is not a
//! failure (the PID is reported as -1).

use clap::Parser;
use scport_core::{ConfigStore, DiscoveryEngine};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scport")]
#[command(author, version, about = "Find the StarCraft client's local web API port")]
struct Cli {
    /// Only report the process ID; skip socket enumeration and probing
    #[arg(long)]
    pid_only: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Replace the executable path fragments to match (repeatable)
    #[arg(long = "match", value_name = "FRAGMENT")]
    matchers: Vec<String>,

    /// Per-port HTTP probe timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ConfigStore::new()?.load().await?;
    if !cli.matchers.is_empty() {
        config.matchers = cli.matchers;
    }
    if let Some(secs) = cli.timeout {
        config.probe_timeout_secs = secs;
    }

    let info = DiscoveryEngine::new(config)?.discover(cli.pid_only).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info);
    }

    Ok(())
}
