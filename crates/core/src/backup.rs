// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backup records as reported by the record store.
//!
//! Records are created when the workflow submits a backup and are only ever
//! mutated by status refreshes from the execution layer. This crate never
//! changes them; it derives views from them.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of one backup snapshot.
    pub struct BackupId("bk-");
}

crate::define_id! {
    /// Identifier of an infrastructure (cluster or engine host).
    pub struct InfraId("inf-");
}

/// The two supported infrastructure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeFamily {
    /// Container-orchestrated cluster; backups are namespace-scoped.
    Orchestrated,
    /// Standalone container-engine host; backups are container-scoped.
    Engine,
}

crate::simple_display! {
    RuntimeFamily {
        Orchestrated => "orchestrated",
        Engine => "engine",
    }
}

/// Whether a backup is a recurring definition or a one-off snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupKind {
    /// Maps to many point-in-time versions that must be listed remotely.
    Scheduled,
    /// The backup's identity is its only version.
    #[default]
    Immediate,
}

crate::simple_display! {
    BackupKind {
        Scheduled => "scheduled",
        Immediate => "immediate",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupStatus {
    #[serde(alias = "Creating", alias = "InProgress", alias = "in_progress")]
    Creating,
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "Failed")]
    Failed,
    #[serde(alias = "Restoring")]
    Restoring,
    #[serde(alias = "Deleted", alias = "Deleting")]
    Deleted,
    #[serde(alias = "PartiallyFailed", alias = "partiallyFailed")]
    PartiallyFailed,
}

impl BackupStatus {
    /// No further status refreshes are expected.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BackupStatus::Completed
                | BackupStatus::Failed
                | BackupStatus::Deleted
                | BackupStatus::PartiallyFailed
        )
    }

    /// Failure for summary counts. A partial failure counts as a failure
    /// here while keeping its own status for display.
    pub fn counts_as_failed(self) -> bool {
        matches!(self, BackupStatus::Failed | BackupStatus::PartiallyFailed)
    }

    pub fn is_in_progress(self) -> bool {
        matches!(self, BackupStatus::Creating | BackupStatus::Restoring)
    }
}

crate::simple_display! {
    BackupStatus {
        Creating => "creating",
        Completed => "completed",
        Failed => "failed",
        Restoring => "restoring",
        Deleted => "deleted",
        PartiallyFailed => "partially_failed",
    }
}

/// What a backup covers. The variant is the runtime family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "runtime_family", rename_all = "snake_case")]
pub enum ScopeSelector {
    Orchestrated {
        namespace: String,
    },
    Engine {
        /// Empty means the whole host.
        #[serde(default)]
        containers: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        compose_project: Option<String>,
    },
}

impl ScopeSelector {
    pub fn namespace(namespace: impl Into<String>) -> Self {
        ScopeSelector::Orchestrated { namespace: namespace.into() }
    }

    pub fn containers<I, S>(containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScopeSelector::Engine {
            containers: containers.into_iter().map(Into::into).collect(),
            compose_project: None,
        }
    }

    pub fn family(&self) -> RuntimeFamily {
        match self {
            ScopeSelector::Orchestrated { .. } => RuntimeFamily::Orchestrated,
            ScopeSelector::Engine { .. } => RuntimeFamily::Engine,
        }
    }
}

/// One backup snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub id: BackupId,
    pub name: String,
    pub infra_id: InfraId,
    #[serde(default)]
    pub infra_name: String,
    pub status: BackupStatus,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub kind: BackupKind,
    #[serde(flatten)]
    pub scope: ScopeSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl BackupRecord {
    pub fn family(&self) -> RuntimeFamily {
        self.scope.family()
    }

    /// Container names for engine backups; empty for orchestrated ones.
    pub fn containers(&self) -> &[String] {
        match &self.scope {
            ScopeSelector::Engine { containers, .. } => containers,
            ScopeSelector::Orchestrated { .. } => &[],
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match &self.scope {
            ScopeSelector::Orchestrated { namespace } => Some(namespace),
            ScopeSelector::Engine { .. } => None,
        }
    }

    /// The single version an immediate backup stands for.
    pub fn own_version(&self) -> BackupVersion {
        BackupVersion { name: self.name.clone(), created_at_ms: self.created_at_ms }
    }
}

crate::builder! {
    pub struct BackupRecordBuilder => BackupRecord {
        into {
            id: BackupId = "bk-test",
            name: String = "nightly",
            infra_id: InfraId = "inf-test",
            infra_name: String = "test-infra",
        }
        set {
            status: BackupStatus = BackupStatus::Completed,
            created_at_ms: u64 = 1_000_000,
            kind: BackupKind = BackupKind::Immediate,
            scope: ScopeSelector = ScopeSelector::Engine { containers: Vec::new(), compose_project: None },
        }
        option {
            completed_at_ms: u64 = None,
            size_bytes: u64 = None,
            error_message: String = None,
        }
    }
}

/// One restorable point in time of a backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupVersion {
    pub name: String,
    pub created_at_ms: u64,
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
