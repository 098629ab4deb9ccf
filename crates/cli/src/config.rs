// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML configuration.
//!
//! ```toml
//! records = "records.json"
//!
//! [runner]
//! program = "/usr/local/bin/hk-runner"
//! timeout_ms = 60000
//!
//! [poll]
//! interval_ms = 3000
//! max_attempts = 100
//!
//! [[infra]]
//! id = "inf-edge"
//! name = "edge host"
//! family = "engine"
//! storage_link = "s3://backups/edge"
//! hops = [{ host = "bastion" }, { host = "edge-01", port = 2222 }]
//!
//! [[credentials]]
//! host = "bastion"
//! port = 22
//! username = "ops"
//! password = "..."
//! ```

use hk_core::{Credential, HopSpec, InfraId, RuntimeFamily};
use hk_engine::PollConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
    #[error("infrastructure {0} is declared twice")]
    DuplicateInfra(InfraId),
    #[error("unknown infrastructure: {0}")]
    UnknownInfra(String),
    #[error("no runner configured (set [runner].program or HK_RUNNER)")]
    NoRunner,
    #[error("no record snapshot configured (pass --records, set HK_RECORDS, or `records` in config)")]
    NoRecords,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,
    /// JSON record snapshot, relative to the config file.
    #[serde(default)]
    pub records: Option<PathBuf>,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default, rename = "infra")]
    pub infras: Vec<InfraConfig>,
    /// Seeds for the credential cache.
    #[serde(default)]
    pub credentials: Vec<Credential>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub program: Option<PathBuf>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { program: None, args: Vec::new(), timeout_ms: default_timeout_ms() }
    }
}

fn default_timeout_ms() -> u64 {
    60_000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSettings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self { interval_ms: default_interval_ms(), max_attempts: default_max_attempts() }
    }
}

fn default_interval_ms() -> u64 {
    3_000
}

fn default_max_attempts() -> u32 {
    100
}

/// One backup target and the hops that reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraConfig {
    pub id: InfraId,
    #[serde(default)]
    pub name: String,
    pub family: RuntimeFamily,
    #[serde(default)]
    pub hops: Vec<HopSpec>,
    /// External storage for engine backups.
    #[serde(default)]
    pub storage_link: Option<String>,
}

impl InfraConfig {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            self.name.as_str()
        }
    }
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(text)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })?;
        config.validate()?;
        if let (Some(records), Some(dir)) = (&config.records, path.parent()) {
            if records.is_relative() {
                config.records = Some(dir.join(records));
            }
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        let config = Self::parse(&text, path)?;
        tracing::debug!(path = %path.display(), infras = config.infras.len(), "loaded config");
        Ok(config)
    }

    /// Load an explicit path, or the default location when it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match crate::env::config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for infra in &self.infras {
            if !seen.insert(&infra.id) {
                return Err(ConfigError::DuplicateInfra(infra.id.clone()));
            }
        }
        Ok(())
    }

    pub fn infra(&self, id: &str) -> Result<&InfraConfig, ConfigError> {
        self.infras
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| ConfigError::UnknownInfra(id.to_string()))
    }

    /// Runner program and timeout, with environment overrides applied.
    pub fn runner(&self) -> Result<(PathBuf, Duration), ConfigError> {
        let program =
            crate::env::runner().or_else(|| self.runner.program.clone()).ok_or(ConfigError::NoRunner)?;
        let timeout = crate::env::runner_timeout()
            .unwrap_or_else(|| Duration::from_millis(self.runner.timeout_ms));
        Ok((program, timeout))
    }

    pub fn poll_config(&self) -> PollConfig {
        let interval = crate::env::poll_interval()
            .unwrap_or_else(|| Duration::from_millis(self.poll.interval_ms));
        PollConfig::new(interval, self.poll.max_attempts)
    }

    /// Record snapshot path: flag > HK_RECORDS > config.
    pub fn records_path(&self, flag: Option<&Path>) -> Result<PathBuf, ConfigError> {
        flag.map(Path::to_path_buf)
            .or_else(crate::env::records_path)
            .or_else(|| self.records.clone())
            .ok_or(ConfigError::NoRecords)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
