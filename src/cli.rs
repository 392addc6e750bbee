use clap::{Args, Parser, Subcommand};

use crate::config;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Defaults to `check` with its default arguments when omitted,
    /// so a bare scheduled invocation needs no flags.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the monitored page once and notify on a new screening.
    Check(CheckArgs),
    /// Print the stored last-seen state.
    State(StateArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Page to monitor (must be http/https).
    #[arg(long, default_value = config::DEFAULT_URL)]
    pub url: String,

    /// Path to the JSON state file.
    #[arg(long, default_value = config::DEFAULT_STATE_FILE)]
    pub state: String,

    /// Directory for consent-failure page dumps.
    #[arg(long)]
    pub debug_dir: Option<String>,

    /// Extract and persist but skip the webhook notification.
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            url: config::DEFAULT_URL.to_owned(),
            state: config::DEFAULT_STATE_FILE.to_owned(),
            debug_dir: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Args)]
pub struct StateArgs {
    /// Path to the JSON state file.
    #[arg(long, default_value = config::DEFAULT_STATE_FILE)]
    pub state: String,
}
