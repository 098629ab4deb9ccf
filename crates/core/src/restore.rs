// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restore records and their family-specific options.

use crate::backup::{BackupId, RuntimeFamily};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of one restore run.
    pub struct RestoreId("rs-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreStatus {
    #[serde(alias = "Pending", alias = "New")]
    Pending,
    #[serde(alias = "InProgress", alias = "inProgress")]
    InProgress,
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "Failed", alias = "PartiallyFailed")]
    Failed,
}

impl RestoreStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RestoreStatus::Completed | RestoreStatus::Failed)
    }
}

crate::simple_display! {
    RestoreStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Failed => "failed",
    }
}

/// Which containers of an engine backup get restored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreScope {
    #[default]
    All,
    Selected,
}

crate::simple_display! {
    RestoreScope {
        All => "all",
        Selected => "selected",
    }
}

/// Options for restoring an engine-host backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRestoreOptions {
    pub restore_volumes: bool,
    pub restore_config: bool,
    pub redeploy: bool,
    pub stop_existing: bool,
    pub restore_scope: RestoreScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<String>>,
}

impl Default for EngineRestoreOptions {
    fn default() -> Self {
        Self {
            restore_volumes: true,
            restore_config: true,
            redeploy: true,
            stop_existing: true,
            restore_scope: RestoreScope::All,
            containers: None,
        }
    }
}

impl EngineRestoreOptions {
    crate::setters! {
        set {
            restore_volumes: bool,
            restore_config: bool,
            redeploy: bool,
            stop_existing: bool,
            restore_scope: RestoreScope,
        }
        option {
            containers: Vec<String>,
        }
    }
}

/// Family-specific restore options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "runtime_family", rename_all = "snake_case")]
pub enum RestoreOptions {
    Orchestrated {
        /// Restore into this namespace instead of the original one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_namespace: Option<String>,
    },
    Engine(EngineRestoreOptions),
}

impl RestoreOptions {
    pub fn family(&self) -> RuntimeFamily {
        match self {
            RestoreOptions::Orchestrated { .. } => RuntimeFamily::Orchestrated,
            RestoreOptions::Engine(_) => RuntimeFamily::Engine,
        }
    }
}

/// One restore run against a backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreRecord {
    pub id: RestoreId,
    pub backup_id: BackupId,
    pub status: RestoreStatus,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    pub options: RestoreOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

crate::builder! {
    pub struct RestoreRecordBuilder => RestoreRecord {
        into {
            id: RestoreId = "rs-test",
            backup_id: BackupId = "bk-test",
        }
        set {
            status: RestoreStatus = RestoreStatus::Completed,
            created_at_ms: u64 = 2_000_000,
            options: RestoreOptions = RestoreOptions::Engine(EngineRestoreOptions::default()),
        }
        option {
            completed_at_ms: u64 = None,
            error_message: String = None,
        }
    }
}

#[cfg(test)]
#[path = "restore_tests.rs"]
mod tests;
