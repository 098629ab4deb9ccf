// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-interval status polling.
//!
//! Long-running remote work (agent install, backup runs, restores) is
//! tracked by re-asking at a fixed interval. Every poll stops itself at a
//! terminal status or when its attempt budget runs out.

use crate::error::ExternalFailure;
use hk_adapters::{ExecRequest, ExecutionAdapter, Operation, RecordError, RecordStore};
use hk_core::{BackupRecord, BackupStatus, CredentialChain, RestoreRecord, RestoreStatus};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::MissedTickBehavior;

/// Interval and attempt budget of a poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(3), max_attempts: 100 }
    }
}

impl PollConfig {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, max_attempts }
    }
}

/// How a poll loop ended. Both variants carry the last observed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Settled(T),
    Exhausted(T),
}

impl<T> PollOutcome<T> {
    pub fn is_settled(&self) -> bool {
        matches!(self, PollOutcome::Settled(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            PollOutcome::Settled(v) | PollOutcome::Exhausted(v) => v,
        }
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    External(#[from] ExternalFailure),
    #[error("record store error: {0}")]
    Records(#[from] RecordError),
}

/// Call `fetch` every `config.interval` until `done` accepts a value.
///
/// The first fetch happens immediately. An error from `fetch` ends the loop.
pub async fn poll_until<T, E, F, Fut, D>(
    config: &PollConfig,
    mut fetch: F,
    mut done: D,
) -> Result<PollOutcome<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    D: FnMut(&T) -> bool,
{
    let mut ticker = tokio::time::interval(config.interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let budget = config.max_attempts.max(1);

    let mut attempt = 0;
    loop {
        ticker.tick().await;
        attempt += 1;
        let value = fetch().await?;
        if done(&value) {
            return Ok(PollOutcome::Settled(value));
        }
        if attempt >= budget {
            tracing::debug!(attempt, "poll budget exhausted");
            return Ok(PollOutcome::Exhausted(value));
        }
    }
}

fn id_params(key: &str, id: &str) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), Value::from(id));
    Value::Object(map)
}

#[derive(Deserialize)]
struct BackupStatusReply {
    status: BackupStatus,
    #[serde(default)]
    completed_at_ms: Option<u64>,
    #[serde(default)]
    size_bytes: Option<u64>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct RestoreStatusReply {
    status: RestoreStatus,
    #[serde(default)]
    completed_at_ms: Option<u64>,
    #[serde(default)]
    error_message: Option<String>,
}

fn decode<T: for<'de> Deserialize<'de>>(data: Value, what: &str) -> Result<T, ExternalFailure> {
    serde_json::from_value(data).map_err(|e| ExternalFailure::Malformed(format!("{}: {}", what, e)))
}

async fn refresh_backup<E: ExecutionAdapter, R: RecordStore>(
    exec: &E,
    records: &R,
    chain: &CredentialChain,
    backup: &BackupRecord,
) -> Result<BackupStatus, PollError> {
    let request = ExecRequest::new(backup.infra_id.clone(), chain.clone(), Operation::BackupStatus)
        .with_params(id_params("backup_id", &backup.id));
    let data = exec.execute(request).await.map_err(ExternalFailure::from)?;
    let reply: BackupStatusReply = decode(data, "backup status")?;

    let mut updated = backup.clone();
    updated.status = reply.status;
    updated.completed_at_ms = reply.completed_at_ms.or(backup.completed_at_ms);
    updated.size_bytes = reply.size_bytes.or(backup.size_bytes);
    updated.error_message = reply.error_message.or_else(|| backup.error_message.clone());
    records.put_backup(updated).await?;
    Ok(reply.status)
}

/// Poll a backup's status, refreshing its record, until it is terminal.
pub async fn poll_backup<E: ExecutionAdapter, R: RecordStore>(
    exec: &E,
    records: &R,
    chain: &CredentialChain,
    backup: &BackupRecord,
    config: &PollConfig,
) -> Result<PollOutcome<BackupStatus>, PollError> {
    tracing::info!(backup = %backup.id, infra = %backup.infra_id, "polling backup status");
    let outcome = poll_until(
        config,
        move || async move { refresh_backup(exec, records, chain, backup).await },
        |status| status.is_terminal(),
    )
    .await?;
    tracing::info!(backup = %backup.id, settled = outcome.is_settled(), "backup poll finished");
    Ok(outcome)
}

async fn refresh_restore<E: ExecutionAdapter, R: RecordStore>(
    exec: &E,
    records: &R,
    chain: &CredentialChain,
    infra: &hk_core::InfraId,
    restore: &RestoreRecord,
) -> Result<RestoreStatus, PollError> {
    let request = ExecRequest::new(infra.clone(), chain.clone(), Operation::RestoreStatus)
        .with_params(id_params("restore_id", &restore.id));
    let data = exec.execute(request).await.map_err(ExternalFailure::from)?;
    let reply: RestoreStatusReply = decode(data, "restore status")?;

    let mut updated = restore.clone();
    updated.status = reply.status;
    updated.completed_at_ms = reply.completed_at_ms.or(restore.completed_at_ms);
    updated.error_message = reply.error_message.or_else(|| restore.error_message.clone());
    records.put_restore(updated).await?;
    Ok(reply.status)
}

/// Poll a restore's status, refreshing its record, until it is terminal.
pub async fn poll_restore<E: ExecutionAdapter, R: RecordStore>(
    exec: &E,
    records: &R,
    chain: &CredentialChain,
    infra: &hk_core::InfraId,
    restore: &RestoreRecord,
    config: &PollConfig,
) -> Result<PollOutcome<RestoreStatus>, PollError> {
    tracing::info!(restore = %restore.id, backup = %restore.backup_id, "polling restore status");
    poll_until(
        config,
        move || async move { refresh_restore(exec, records, chain, infra, restore).await },
        |status| status.is_terminal(),
    )
    .await
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
