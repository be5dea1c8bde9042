pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::app_config::DEFAULT_CONFIG_FILE;

/// Record stream chat focus messages to a monthly rotating CSV log.
#[derive(Parser, Debug)]
#[command(name = "focuslog", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file
    #[arg(long, global = true, env = "FOCUSLOG_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Path to the .env file holding ACCESS_TOKEN and CLIENT_ID
    #[arg(long, global = true, default_value = ".env")]
    pub dotenv: PathBuf,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default focuslog.toml
    Init,

    /// Record one focus event (skipped while the stream is offline)
    Record {
        /// Chat login of the user
        author: String,
        /// What they are focusing on
        message: String,
        /// Event time (ISO 8601, e.g. 2022-10-01T07:01:00-07:00). Default: now
        #[arg(long)]
        at: Option<String>,
    },

    /// Join the Twitch channel and record focus commands from chat
    Listen,

    /// Show the tally rows for a month
    Summary {
        /// Month as YYYY-MM
        period: String,
    },

    /// Show settings and the current log
    Status,
}
