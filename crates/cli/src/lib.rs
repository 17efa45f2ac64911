// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! frrs - Offline-first incident reporting library.
//!
//! This crate provides the functionality behind the `fr` CLI: reports are
//! saved to a local SQLite store first and forwarded to a remote server by
//! the [`fr_core`] sync engine whenever the server is reachable.
//!
//! # Main Components
//!
//! - [`Config`] - Project configuration (remote URL, timeouts, batch size)
//! - [`Command`] - Parsed CLI commands, executed with [`run`]
//! - [`Error`] - Error types for all operations

mod cli;
mod commands;

pub mod config;
pub mod error;
pub mod logging;

pub use cli::{Cli, Command, OutputFormat, ReportArgs};
pub use config::{
    find_work_dir, get_db_path, get_lock_path, init_work_dir, Config, RemoteConfig, SyncConfig};
pub use error::{Error, Result};

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { remote } => commands::init::run(remote),
        Command::New {
            report,
            no_sync,
            output,
        } => commands::new::run(report, no_sync, output),
        Command::List { status, output } => commands::list::run(status, output),
        Command::Sync { output } => commands::sync::run(output),
        Command::Watch { interval } => commands::watch::run(interval),
    }
}
