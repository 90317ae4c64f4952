//! `runtally leaderboard` command

use clap::Parser;
use runtally_leaderboard::{leaderboard, DEFAULT_TOP};
use runtally_sync::RunCache;
use std::path::PathBuf;

/// `runtally leaderboard` command
#[derive(Debug, Parser)]
pub struct Command {
    /// The path to the run cache file.
    #[arg(long, value_name = "FILE", default_value = "data/runs.json")]
    cache_file: PathBuf,

    /// Number of leaderboard entries to print.
    #[arg(long, default_value_t = DEFAULT_TOP)]
    top: usize,
}

impl Command {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let cache = RunCache::load(self.cache_file);
        let standings = leaderboard(cache.runs(), self.top);
        println!("{}", serde_json::to_string_pretty(&standings)?);
        Ok(())
    }
}
