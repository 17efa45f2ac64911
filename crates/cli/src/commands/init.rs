// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use fr_core::SqliteStore;

use crate::config::{get_db_path, init_work_dir, Config};
use crate::error::Result;

pub fn run(remote: Option<String>) -> Result<()> {
    let target_path = std::env::current_dir()?;
    let (work_dir, config) = init_impl(&target_path, remote.as_deref())?;

    println!("Initialized report store at {}", work_dir.display());
    println!("Remote: {}", config.remote.url);
    Ok(())
}

/// Create `.fieldrep/` with its config and an empty database.
pub(crate) fn init_impl(path: &Path, remote: Option<&str>) -> Result<(PathBuf, Config)> {
    let config = match remote {
        Some(url) => Config::with_remote(url)?,
        None => Config::default(),
    };

    let work_dir = init_work_dir(path, &config)?;
    SqliteStore::open(&get_db_path(&work_dir))?;
    tracing::info!(work_dir = %work_dir.display(), remote = %config.remote.url, "initialized");

    Ok((work_dir, config))
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
