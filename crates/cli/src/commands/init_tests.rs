// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::Error;
use fr_core::{RecordStore, Status};
use tempfile::TempDir;

#[test]
fn init_creates_config_and_database() {
    let temp = TempDir::new().unwrap();
    let (work_dir, config) = init_impl(temp.path(), None).unwrap();

    assert!(work_dir.join("config.toml").exists());
    assert!(work_dir.join("reports.db").exists());
    assert_eq!(config, Config::default());

    let store = SqliteStore::open(&get_db_path(&work_dir)).unwrap();
    assert_eq!(store.count_by_status(Status::Pending).unwrap(), 0);
}

#[test]
fn init_with_remote_saves_url() {
    let temp = TempDir::new().unwrap();
    let (work_dir, _) = init_impl(temp.path(), Some("ws://10.1.1.1:7890")).unwrap();

    let config = Config::load(&work_dir).unwrap();
    assert_eq!(config.remote.url, "ws://10.1.1.1:7890");
}

#[test]
fn init_rejects_bad_remote_without_creating_anything() {
    let temp = TempDir::new().unwrap();
    let err = init_impl(temp.path(), Some("ftp://x")).unwrap_err();

    assert!(matches!(err, Error::InvalidRemoteUrl(_)));
    assert!(!temp.path().join(".fieldrep").exists());
}

#[test]
fn init_twice_fails() {
    let temp = TempDir::new().unwrap();
    init_impl(temp.path(), None).unwrap();

    let err = init_impl(temp.path(), None).unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized(_)));
}
