use clap::Parser;
use std::path::PathBuf;
use txwatch::config::{ConfigError, WatcherConfig};

const AFTER_HELP: &str = "\
Examples:
  1. Deploying Counters:
     # First, run the Forge script
     forge script script/counter/DeployOnchainCounters.s.sol \\
       --broadcast --skip-simulation --legacy --with-gas-price 0

     # Then check transaction status
     txwatch DeployOnchainCounters

  2. Incrementing Counters:
     # First, run the Forge script
     forge script script/counter/IncrementCountersFromApp.s.sol \\
       --broadcast --skip-simulation --legacy --with-gas-price 0

     # Then check transaction status
     txwatch IncrementCountersFromApp

Notes:
  - Ensure you have run the Forge script with --broadcast before
    running this transaction status checker
  - The checker reads the transactions of the latest broadcast run
    for the specified script";

#[derive(Debug, Parser)]
#[command(name = "txwatch")]
#[command(about = "Transaction Status Checker for Forge Scripts")]
#[command(version)]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// The name of the Forge script without file extension; this should match the script you ran with forge
    pub script_name: String,

    /// Network id of the broadcast run
    #[arg(long, env = "TXWATCH_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Status endpoint queried with ?txHash=<hash>
    #[arg(long, env = "TXWATCH_API_URL")]
    pub api_url: Option<String>,

    /// Milliseconds between poll passes
    #[arg(long, env = "TXWATCH_INTERVAL_MS")]
    pub interval_ms: Option<u64>,

    /// Root directory of the Forge broadcast output
    #[arg(long, env = "TXWATCH_BROADCAST_DIR")]
    pub broadcast_dir: Option<PathBuf>,

    /// Per-request timeout in seconds, 0 disables it
    #[arg(long, env = "TXWATCH_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// TOML config file
    #[arg(long, env = "TXWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write diagnostics to stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags and environment
    pub fn resolve_config(&self) -> Result<WatcherConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => WatcherConfig::from_file(path)?,
            None => WatcherConfig::default(),
        };
        if let Some(chain_id) = self.chain_id {
            config.chain_id = chain_id;
        }
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            config.poll_interval_ms = interval_ms;
        }
        if let Some(broadcast_dir) = &self.broadcast_dir {
            config.broadcast_dir = broadcast_dir.clone();
        }
        if let Some(request_timeout) = self.request_timeout {
            config.request_timeout_secs = request_timeout;
        }
        config.validate()?;
        Ok(config)
    }
}
