// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.fieldrep/config.toml`:
//! - `[remote]`: where reports are forwarded and how long to wait for it
//! - `[sync]`: batch size and how often `fr watch` probes the remote
//!
//! Every key has a default, so an empty file is a valid config.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".fieldrep";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "reports.db";
const LOCK_FILE_NAME: &str = "sync.lock";

/// Project configuration stored in `.fieldrep/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Remote server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL (`ws://...` or `wss://...`).
    #[serde(default = "default_url")]
    pub url: String,
    /// Max time to wait for the server to acknowledge one report.
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,
    /// Max time a reachability probe may take to connect.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Sync engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Reports submitted concurrently per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Seconds between reachability probes in `fr watch`.
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
}

fn default_url() -> String {
    "ws://localhost:7890".to_string()
}

fn default_submit_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    3
}

fn default_batch_size() -> usize {
    fr_core::SYNC_BATCH_SIZE
}

fn default_probe_interval_secs() -> u64 {
    5
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            url: default_url(),
            submit_timeout_secs: default_submit_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    /// Returns true if the URL uses a WebSocket scheme.
    pub fn is_valid_url(url: &str) -> bool {
        let rest = url
            .strip_prefix("ws://")
            .or_else(|| url.strip_prefix("wss://"));
        matches!(rest, Some(host) if !host.is_empty())
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            batch_size: default_batch_size(),
            probe_interval_secs: default_probe_interval_secs(),
        }
    }
}

impl SyncConfig {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }
}

impl Config {
    /// Creates a config pointing at the given remote, other keys defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRemoteUrl`] unless the URL is `ws://` or `wss://`.
    pub fn with_remote(url: &str) -> Result<Self> {
        if !RemoteConfig::is_valid_url(url) {
            return Err(Error::InvalidRemoteUrl(url.to_string()));
        }
        Ok(Config {
            remote: RemoteConfig {
                url: url.to_string(),
                ..RemoteConfig::default()
            },
            sync: SyncConfig::default(),
        })
    }

    /// Loads configuration from the given `.fieldrep/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if !RemoteConfig::is_valid_url(&config.remote.url) {
            return Err(Error::InvalidRemoteUrl(config.remote.url));
        }
        Ok(config)
    }

    /// Saves configuration to the given `.fieldrep/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .fieldrep directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Get the report database path inside a work directory
pub fn get_db_path(work_dir: &Path) -> PathBuf {
    work_dir.join(DB_FILE_NAME)
}

/// Lock file held by whichever process is currently syncing this store.
pub fn get_lock_path(work_dir: &Path) -> PathBuf {
    work_dir.join(LOCK_FILE_NAME)
}

/// Initialize a new .fieldrep directory at the given path
///
/// A `.fieldrep/` directory without a config file is treated as not yet
/// initialized and is filled in.
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
