use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `cityping` - weekly Copenhagen weather and things to do, by SMS.
#[derive(Parser, Debug)]
#[command(name = "cityping")]
#[command(version)]
#[command(about = "Weekly Copenhagen weather and events by SMS.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.cityping/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at DEBUG instead of INFO
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `run`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Decide once and send whatever is due (what the scheduler invokes)
    Run,

    /// Generate and preview a message without waiting for the schedule
    Smoke {
        /// Also deliver the previewed message (dry_run is still honoured)
        #[arg(long)]
        send: bool,

        /// Preview the welcome message instead of the weekly one
        #[arg(long)]
        welcome: bool,
    },

    /// Inspect the persisted send state
    State {
        #[command(subcommand)]
        state_command: StateCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum StateCommands {
    /// Print the stored flags and timestamps
    Show,
}
