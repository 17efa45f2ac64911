// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use clap::Parser;

#[test]
fn parse_init_defaults() {
    let cli = Cli::try_parse_from(["fr", "init"]).unwrap();
    assert!(matches!(cli.command, Command::Init { remote: None }));
}

#[test]
fn parse_init_with_remote() {
    let cli = Cli::try_parse_from(["fr", "init", "--remote", "ws://10.0.0.2:7890"]).unwrap();
    let Command::Init { remote } = cli.command else {
        unreachable!("expected init");
    };
    assert_eq!(remote.as_deref(), Some("ws://10.0.0.2:7890"));
}
