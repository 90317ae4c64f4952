//! `runtally sync` command

use clap::Parser;
use runtally_config::{Credentials, SyncBounds};
use runtally_leaderboard::{leaderboard, DEFAULT_TOP};
use runtally_rpc::RpcLedgerClient;
use runtally_sync::{RetryPolicy, RunCache, SyncDriver, DEFAULT_BATCH_SIZE};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

/// `runtally sync` command
#[derive(Debug, Parser)]
pub struct Command {
    /// The path to the credentials file.
    ///
    /// Defaults to `.wallet` in the home directory.
    #[arg(long, value_name = "FILE")]
    credentials: Option<PathBuf>,

    /// The path to the sync bounds file.
    #[arg(long, value_name = "FILE", default_value = "data/bounds.json")]
    bounds_file: PathBuf,

    /// The path to the run cache file.
    #[arg(long, value_name = "FILE", default_value = "data/runs.json")]
    cache_file: PathBuf,

    /// JSON-RPC endpoint to sync from.
    ///
    /// Defaults to the Alchemy Polygon endpoint for the configured key.
    #[arg(long, value_name = "URL")]
    rpc_url: Option<String>,

    /// The number of blocks per event query.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: u64,

    /// Give up on a run after this many failed lookups instead of retrying
    /// forever.
    #[arg(long, value_name = "COUNT")]
    max_retries: Option<u64>,

    /// Number of leaderboard entries to print.
    #[arg(long, default_value_t = DEFAULT_TOP)]
    top: usize,
}

impl Command {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let url = match self.rpc_url {
            Some(url) => url,
            None => {
                let path = self.credentials.unwrap_or_else(Credentials::default_path);
                let credentials = Credentials::load(&path)?;
                alchemy_url(&credentials.polygon_alchemy_key)
            }
        };
        let bounds = SyncBounds::load(&self.bounds_file)?;

        let client = Arc::new(RpcLedgerClient::new(&url)?);
        let mut policy = RetryPolicy::default();
        if let Some(max_attempts) = self.max_retries {
            policy = policy.with_max_attempts(max_attempts);
        }
        let driver =
            SyncDriver::new(client).with_batch_size(self.batch_size).with_retry_policy(policy);

        let mut cache = RunCache::load(self.cache_file);
        driver.run(&mut cache, bounds.start, bounds.end).await?;
        info!(target: "cli", runs = cache.len(), "Sync pass complete");

        let standings = leaderboard(cache.runs(), self.top);
        println!("{}", serde_json::to_string_pretty(&standings)?);
        Ok(())
    }
}

/// The Alchemy Polygon mainnet endpoint for an API key.
fn alchemy_url(key: &str) -> String {
    format!("https://polygon-mainnet.g.alchemy.com/v2/{key}")
}
