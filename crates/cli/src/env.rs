// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use std::time::Duration;

/// Config file path: HK_CONFIG > config_dir/hopkeep/config.toml
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("HK_CONFIG").filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("hopkeep").join("config.toml"))
}

/// Runner program override
pub fn runner() -> Option<PathBuf> {
    std::env::var_os("HK_RUNNER").filter(|p| !p.is_empty()).map(PathBuf::from)
}

/// Runner call timeout override
pub fn runner_timeout() -> Option<Duration> {
    millis("HK_RUNNER_TIMEOUT_MS")
}

/// Status poll interval override
pub fn poll_interval() -> Option<Duration> {
    millis("HK_POLL_INTERVAL_MS")
}

/// Record snapshot path override
pub fn records_path() -> Option<PathBuf> {
    std::env::var_os("HK_RECORDS").filter(|p| !p.is_empty()).map(PathBuf::from)
}

/// Log filter directive (default `warn`)
pub fn log_filter() -> String {
    std::env::var("HK_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "warn".to_string())
}

/// Directory for daily log files, when file logging is wanted
pub fn log_dir() -> Option<PathBuf> {
    std::env::var_os("HK_LOG_DIR").filter(|p| !p.is_empty()).map(PathBuf::from)
}

fn millis(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
