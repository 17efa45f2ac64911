// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use clap::Parser;

#[test]
fn parse_sync() {
    let cli = Cli::try_parse_from(["fr", "sync", "-o", "json"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Sync {
            output: OutputFormat::Json
        }
    ));
}

#[test]
fn parse_watch_interval() {
    let cli = Cli::try_parse_from(["fr", "watch", "--interval", "2"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Watch { interval: Some(2) }
    ));
}

#[test]
fn parse_watch_rejects_non_numeric_interval() {
    assert!(Cli::try_parse_from(["fr", "watch", "--interval", "soon"]).is_err());
}
