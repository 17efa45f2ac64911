// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fr-remote: WebSocket server that receives fieldrep incident reports.
//!
//! Every accepted report is stored in the data directory and acknowledged
//! with a server-assigned id. A configurable share of submissions can be
//! rejected to exercise client retry paths.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// fr-remote: incident report collection server
#[derive(Parser, Debug)]
#[command(name = "fr-remote")]
#[command(about = "WebSocket server that receives fieldrep incident reports")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Directory for the report database
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Fraction of submissions to reject (0.0 to 1.0)
    #[arg(long, default_value = "0", value_parser = parse_fail_rate)]
    fail_rate: f64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_fail_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err("must be between 0.0 and 1.0".to_string())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting fr-remote server");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());

    let state = state::ServerState::new(&args.data, args.fail_rate)?;
    if state.fail_rate() > 0.0 {
        info!("  Simulated failure rate: {}", state.fail_rate());
    }

    server::run(args.bind, state).await?;

    Ok(())
}
