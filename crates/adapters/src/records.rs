// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backup and restore record store.
//!
//! hopkeep reads records to build its views and writes them when a workflow
//! submits. Persistence is somebody else's job; the in-memory store can be
//! seeded from a JSON snapshot:
//!
//! ```text
//! { "backups": [BackupRecord...], "restores": [RestoreRecord...] }
//! ```

use async_trait::async_trait;
use hk_core::{BackupId, BackupRecord, RestoreRecord};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors from record store operations
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to read snapshot {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid snapshot {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error("ambiguous backup id prefix: {0}")]
    Ambiguous(String),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Serialized contents of a record store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    #[serde(default)]
    pub backups: Vec<BackupRecord>,
    #[serde(default)]
    pub restores: Vec<RestoreRecord>,
}

impl RecordSnapshot {
    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|source| RecordError::Read { path: display.clone(), source })?;
        serde_json::from_str(&content).map_err(|source| RecordError::Parse { path: display, source })
    }
}

/// Adapter for backup and restore records
#[async_trait]
pub trait RecordStore: Clone + Send + Sync + 'static {
    async fn list_backups(&self) -> Result<Vec<BackupRecord>, RecordError>;

    async fn list_restores(&self) -> Result<Vec<RestoreRecord>, RecordError>;

    /// Look up a backup by full id or unique id prefix.
    async fn get_backup(&self, id: &str) -> Result<Option<BackupRecord>, RecordError>;

    /// Insert or replace a backup by id.
    async fn put_backup(&self, record: BackupRecord) -> Result<(), RecordError>;

    /// Insert or replace a restore by id.
    async fn put_restore(&self, record: RestoreRecord) -> Result<(), RecordError>;

    /// Remove a backup. Returns false when it was not present.
    async fn delete_backup(&self, id: &BackupId) -> Result<bool, RecordError>;
}

/// Process-local record store.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    inner: Arc<Mutex<RecordSnapshot>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: RecordSnapshot) -> Self {
        Self { inner: Arc::new(Mutex::new(snapshot)) }
    }

    /// Load a store from a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let snapshot = RecordSnapshot::load(path)?;
        tracing::info!(
            path = %path.display(),
            backups = snapshot.backups.len(),
            restores = snapshot.restores.len(),
            "loaded record snapshot"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn snapshot(&self) -> RecordSnapshot {
        self.inner.lock().clone()
    }
}

fn find_by_prefix<'a>(
    backups: &'a [BackupRecord],
    id: &str,
) -> Result<Option<&'a BackupRecord>, RecordError> {
    if let Some(exact) = backups.iter().find(|b| b.id == id) {
        return Ok(Some(exact));
    }
    let mut matches = backups.iter().filter(|b| b.id.as_str().starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(Some(only)),
        (Some(_), Some(_)) => Err(RecordError::Ambiguous(id.to_string())),
        (None, _) => Ok(None),
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_backups(&self) -> Result<Vec<BackupRecord>, RecordError> {
        Ok(self.inner.lock().backups.clone())
    }

    async fn list_restores(&self) -> Result<Vec<RestoreRecord>, RecordError> {
        Ok(self.inner.lock().restores.clone())
    }

    async fn get_backup(&self, id: &str) -> Result<Option<BackupRecord>, RecordError> {
        if id.is_empty() {
            return Ok(None);
        }
        let state = self.inner.lock();
        Ok(find_by_prefix(&state.backups, id)?.cloned())
    }

    async fn put_backup(&self, record: BackupRecord) -> Result<(), RecordError> {
        let mut state = self.inner.lock();
        match state.backups.iter_mut().find(|b| b.id == record.id) {
            Some(existing) => *existing = record,
            None => state.backups.push(record),
        }
        Ok(())
    }

    async fn put_restore(&self, record: RestoreRecord) -> Result<(), RecordError> {
        let mut state = self.inner.lock();
        match state.restores.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => state.restores.push(record),
        }
        Ok(())
    }

    async fn delete_backup(&self, id: &BackupId) -> Result<bool, RecordError> {
        let mut state = self.inner.lock();
        let before = state.backups.len();
        state.backups.retain(|b| &b.id != id);
        Ok(state.backups.len() != before)
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
