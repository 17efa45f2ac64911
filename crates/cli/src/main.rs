// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use frrs::Cli;

fn main() {
    let cli = Cli::parse();
    frrs::logging::init(cli.verbose);

    if let Some(dir) = &cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("error: cannot change to directory '{}': {}", dir, e);
            std::process::exit(1);
        }
    }

    if let Err(e) = frrs::run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
