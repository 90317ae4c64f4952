//! CLI definition and entrypoint to executable

use crate::{leaderboard, sync};
use clap::{ArgAction, Args, Parser, Subcommand};
use runtally_config::ConfigError;
use tracing::{metadata::LevelFilter, Level};
use tracing_subscriber::EnvFilter;

/// Parse CLI options, set up logging and run the chosen command.
pub async fn run() -> eyre::Result<()> {
    let opt = Cli::parse();
    init_tracing(opt.verbosity.filter());

    let result = match opt.command {
        Commands::Sync(command) => command.execute().await,
        Commands::Leaderboard(command) => command.execute().await,
    };

    // A missing credentials file is a setup problem, not a failure: point at
    // the expected path and exit cleanly.
    if let Err(err) = &result {
        if let Some(ConfigError::MissingCredentials { path }) = err.downcast_ref::<ConfigError>() {
            println!("config file missing, please place it at: {}", path.display());
            return Ok(())
        }
    }
    result
}

fn init_tracing(level: LevelFilter) {
    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Commands to be executed
#[derive(Subcommand)]
pub enum Commands {
    /// Sync run events from the ledger and print the leaderboard.
    #[command(name = "sync")]
    Sync(sync::Command),
    /// Print the leaderboard from the existing cache without syncing.
    #[command(name = "leaderboard")]
    Leaderboard(leaderboard::Command),
}

#[derive(Parser)]
#[command(author, version = "0.1", about = "Runtally", long_about = None)]
struct Cli {
    /// The command to run
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    verbosity: Verbosity,
}

#[derive(Args)]
#[command(next_help_heading = "Display")]
struct Verbosity {
    /// Set the minimum log level.
    ///
    /// -v      Errors
    /// -vv     Warnings
    /// -vvv    Info
    /// -vvvv   Debug
    /// -vvvvv  Traces (warning: very verbose!)
    #[clap(short, long, action = ArgAction::Count, global = true, default_value_t = 3, verbatim_doc_comment, help_heading = "Display")]
    verbosity: u8,

    /// Silence all log output.
    #[clap(long, alias = "silent", short = 'q', global = true, help_heading = "Display")]
    quiet: bool,
}

impl Verbosity {
    /// The default log level for the given verbosity, or off if quiet.
    fn filter(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::OFF
        } else {
            match self.verbosity.saturating_sub(1) {
                0 => Level::ERROR,
                1 => Level::WARN,
                2 => Level::INFO,
                3 => Level::DEBUG,
                _ => Level::TRACE,
            }
            .into()
        }
    }
}
