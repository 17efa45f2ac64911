// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use fr_core::Status;

pub use args::ReportArgs;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Id,
}

#[derive(Parser)]
#[command(name = "fr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first incident reporting with store-and-forward sync")]
#[command(
    long_about = "Offline-first incident reporting with store-and-forward sync.\n\n\
    Reports are saved locally first and forwarded to the remote server in \
    prioritized batches whenever it is reachable."
)]
pub struct Cli {
    /// Run as if fr was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a report store in the current directory
    Init {
        /// WebSocket URL of the remote server
        #[arg(long, value_name = "URL")]
        remote: Option<String>,
    },

    /// File a new incident report
    #[command(after_help = "\
Examples:
  fr new -n Amina -l \"Central Market\" -c emergency -d \"Road blocked\"
  fr new -n Joe -l \"12.97,77.59\" -c medical -d \"Injured person\" --attachment
  fr new -n Kim -l Depot -c food -d \"Supplies low\" --no-sync -o id")]
    New {
        #[command(flatten)]
        report: ReportArgs,

        /// Save locally without attempting a sync
        #[arg(long)]
        no_sync: bool,

        /// Output format (text, json, id)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List reports, newest first
    List {
        /// Only show reports with this status (pending, synced)
        #[arg(long, short)]
        status: Option<Status>,

        /// Output format (text, json, id)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Send pending reports to the remote server
    Sync {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Watch the remote and sync whenever it comes back online
    Watch {
        /// Seconds between reachability probes (overrides config)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
