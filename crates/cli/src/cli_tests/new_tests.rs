// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use clap::Parser;
use fr_core::Category;
use yare::parameterized;

const BASE: [&str; 10] = [
    "fr",
    "new",
    "--name",
    "Amina",
    "--location",
    "Central Market",
    "--category",
    "emergency",
    "--description",
    "Road blocked",
];

fn parse_new(extra: &[&str]) -> (ReportArgs, bool, OutputFormat) {
    let args: Vec<&str> = BASE.iter().chain(extra.iter()).copied().collect();
    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Command::New {
            report,
            no_sync,
            output,
        } => (report, no_sync, output),
        _ => unreachable!("expected new"),
    }
}

#[test]
fn parse_new_required_fields() {
    let (report, no_sync, output) = parse_new(&[]);
    assert_eq!(report.name, "Amina");
    assert_eq!(report.location, "Central Market");
    assert_eq!(report.category, Category::Emergency);
    assert_eq!(report.description, "Road blocked");
    assert!(!report.attachment);
    assert!(!no_sync);
    assert_eq!(output, OutputFormat::Text);
}

#[test]
fn parse_new_flags() {
    let (report, no_sync, output) = parse_new(&["--attachment", "--no-sync", "-o", "id"]);
    assert!(report.attachment);
    assert!(no_sync);
    assert_eq!(output, OutputFormat::Id);
}

#[test]
fn parse_new_short_flags() {
    let cli = Cli::try_parse_from([
        "fr", "new", "-n", "Joe", "-l", "Depot", "-c", "food", "-d", "Low", "-a",
    ])
    .unwrap();
    let Command::New { report, .. } = cli.command else {
        unreachable!("expected new");
    };
    assert_eq!(report.category, Category::Food);
    assert!(report.attachment);
}

#[parameterized(
    missing_name = { &["fr", "new", "-l", "x", "-c", "food", "-d", "y"] },
    missing_category = { &["fr", "new", "-n", "a", "-l", "x", "-d", "y"] },
    blank_name = { &["fr", "new", "-n", "  ", "-l", "x", "-c", "food", "-d", "y"] },
    bad_category = { &["fr", "new", "-n", "a", "-l", "x", "-c", "fire", "-d", "y"] },
)]
fn parse_new_rejects(args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn payload_trims_text_fields() {
    let cli = Cli::try_parse_from([
        "fr", "new", "-n", " Amina ", "-l", "Market ", "-c", "shelter", "-d", " Roof gone",
    ])
    .unwrap();
    let Command::New { report, .. } = cli.command else {
        unreachable!("expected new");
    };
    let payload = report.payload();
    assert_eq!(payload.name, "Amina");
    assert_eq!(payload.location, "Market");
    assert_eq!(payload.description, "Roof gone");
}
