// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use fr_core::{Category, Status};
use yare::parameterized;

fn args(name: &str, attachment: bool) -> ReportArgs {
    ReportArgs {
        name: name.to_string(),
        location: "Central Market".to_string(),
        category: Category::Medical,
        description: "Injured person".to_string(),
        attachment,
    }
}

#[test]
fn create_saves_pending_report() {
    let store = SqliteStore::open_in_memory().unwrap();
    let report = create_impl(&store, &args("Amina", true)).unwrap();

    assert_eq!(report.status, Status::Pending);
    assert_eq!(report.remote_id, None);
    assert_eq!(report.last_error, None);
    assert!(report.has_attachment);
    assert_eq!(report.payload.name, "Amina");
    assert_eq!(store.get(report.id).unwrap(), report);
}

#[test]
fn create_assigns_increasing_ids() {
    let store = SqliteStore::open_in_memory().unwrap();
    let a = create_impl(&store, &args("a", false)).unwrap();
    let b = create_impl(&store, &args("b", false)).unwrap();
    assert!(b.id > a.id);
}

#[parameterized(
    blank_name = { "   " },
    empty_name = { "" },
)]
fn create_rejects_blank_fields(name: &str) {
    let store = SqliteStore::open_in_memory().unwrap();
    let err = create_impl(&store, &args(name, false)).unwrap_err();

    assert!(err.to_string().contains("name cannot be empty"));
    assert_eq!(store.count_by_status(Status::Pending).unwrap(), 0);
}

#[parameterized(
    text_only = { false, "Saved report #1 [medical] (pending)" },
    with_photo = { true, "Saved report #1 [medical] (pending) (with attachment)" },
)]
fn created_line(attachment: bool, expected: &str) {
    let store = SqliteStore::open_in_memory().unwrap();
    let report = create_impl(&store, &args("a", attachment)).unwrap();
    assert_eq!(format_created(&report), expected);
}
