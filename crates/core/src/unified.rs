// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flat cross-family view of backups.
//!
//! Both families project into one [`UnifiedItem`] shape. The `family`
//! discriminant is always kept because delete and restore dispatch branch
//! on it.

use crate::aggregate::{scope_key, RestoreIndex};
use crate::backup::{
    BackupId, BackupKind, BackupRecord, BackupStatus, InfraId, RuntimeFamily, ScopeSelector,
};
use crate::restore::RestoreStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedItem {
    pub id: BackupId,
    pub name: String,
    pub family: RuntimeFamily,
    pub infra_id: InfraId,
    pub infra_name: String,
    pub status: BackupStatus,
    pub kind: BackupKind,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Orchestrated only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Engine only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_project: Option<String>,
    /// Engine only; empty for a full host backup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<String>>,
    pub scope_key: String,
    pub restore_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_restore_status: Option<RestoreStatus>,
}

impl UnifiedItem {
    fn project(record: &BackupRecord, restores: &RestoreIndex<'_>) -> Self {
        let (namespace, compose_project, containers) = match &record.scope {
            ScopeSelector::Orchestrated { namespace } => (Some(namespace.clone()), None, None),
            ScopeSelector::Engine { containers, compose_project } => {
                (None, compose_project.clone(), Some(containers.clone()))
            }
        };
        let history = restores.for_backup(&record.id);
        UnifiedItem {
            id: record.id.clone(),
            name: record.name.clone(),
            family: record.family(),
            infra_id: record.infra_id.clone(),
            infra_name: record.infra_name.clone(),
            status: record.status,
            kind: record.kind,
            created_at_ms: record.created_at_ms,
            completed_at_ms: record.completed_at_ms,
            size_bytes: record.size_bytes,
            namespace,
            compose_project,
            scope_key: match &containers {
                Some(c) => scope_key(c),
                None => record.scope.group_key(),
            },
            containers,
            restore_count: history.len(),
            last_restore_status: history.first().map(|r| r.status),
        }
    }

    /// Family-specific fields searched by free text.
    fn scope_fields(&self) -> impl Iterator<Item = &str> {
        self.namespace
            .as_deref()
            .into_iter()
            .chain(self.compose_project.as_deref())
            .chain(self.containers.iter().flatten().map(String::as_str))
    }

    fn matches_text(&self, needle: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(needle);
        hit(&self.name) || hit(&self.infra_name) || self.scope_fields().any(hit)
    }

    /// Where a delete for this item is dispatched.
    pub fn delete_target(&self) -> DeleteTarget {
        match self.family {
            RuntimeFamily::Orchestrated => DeleteTarget::Orchestrated {
                infra_id: self.infra_id.clone(),
                backup_name: self.name.clone(),
            },
            RuntimeFamily::Engine => {
                DeleteTarget::Engine { infra_id: self.infra_id.clone(), backup_id: self.id.clone() }
            }
        }
    }
}

pub(crate) fn project_all(backups: &[BackupRecord], restores: &RestoreIndex<'_>) -> Vec<UnifiedItem> {
    let mut items: Vec<UnifiedItem> =
        backups.iter().map(|r| UnifiedItem::project(r, restores)).collect();
    items.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms).then_with(|| a.id.cmp(&b.id)));
    items
}

/// Conjunctive filter over unified items. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedFilter {
    #[serde(default)]
    pub family: Option<RuntimeFamily>,
    /// Case-insensitive substring over name, infra name, and scope fields.
    #[serde(default)]
    pub text: Option<String>,
    /// Exact status; `failed` does not pull in `partially_failed` here.
    #[serde(default)]
    pub status: Option<BackupStatus>,
    #[serde(default)]
    pub infra_id: Option<InfraId>,
}

impl UnifiedFilter {
    pub fn matches(&self, item: &UnifiedItem) -> bool {
        if self.family.is_some_and(|f| f != item.family) {
            return false;
        }
        if self.status.is_some_and(|s| s != item.status) {
            return false;
        }
        if self.infra_id.as_ref().is_some_and(|id| id != &item.infra_id) {
            return false;
        }
        match self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => item.matches_text(&text.to_lowercase()),
            None => true,
        }
    }
}

/// Items matching every set filter field, in input order.
pub fn filter_unified(items: &[UnifiedItem], filter: &UnifiedFilter) -> Vec<UnifiedItem> {
    items.iter().filter(|i| filter.matches(i)).cloned().collect()
}

/// Delete call for one backup, shaped by family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "runtime_family", rename_all = "snake_case")]
pub enum DeleteTarget {
    /// Cluster backups are deleted by name through the cluster's backup tool.
    Orchestrated { infra_id: InfraId, backup_name: String },
    /// Engine backups are deleted by record id through the runner.
    Engine { infra_id: InfraId, backup_id: BackupId },
}

/// One selected record and the remote call that deletes it.
///
/// Several cluster records can share a backup name, so the record id is
/// kept next to the target rather than recovered from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedDelete {
    pub record_id: BackupId,
    #[serde(flatten)]
    pub target: DeleteTarget,
}

/// A bulk delete split by dispatch family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeletePlan {
    pub orchestrated: Vec<PlannedDelete>,
    pub engine: Vec<PlannedDelete>,
    /// Selected ids that are unknown, still running, or already deleted.
    pub skipped: Vec<BackupId>,
}

impl BulkDeletePlan {
    pub fn is_empty(&self) -> bool {
        self.orchestrated.is_empty() && self.engine.is_empty()
    }

    /// Cluster deletes first, then engine deletes.
    pub fn deletes(&self) -> impl Iterator<Item = &PlannedDelete> {
        self.orchestrated.iter().chain(&self.engine)
    }
}

/// Split a selection of backup ids into per-family delete calls.
pub fn plan_bulk_delete(items: &[UnifiedItem], selected: &[BackupId]) -> BulkDeletePlan {
    let mut plan = BulkDeletePlan::default();
    let mut seen = HashSet::new();
    for id in selected {
        if !seen.insert(id) {
            continue;
        }
        let Some(item) = items.iter().find(|i| &i.id == id) else {
            plan.skipped.push(id.clone());
            continue;
        };
        if item.status.is_in_progress() || item.status == BackupStatus::Deleted {
            plan.skipped.push(id.clone());
            continue;
        }
        let planned = PlannedDelete { record_id: item.id.clone(), target: item.delete_target() };
        match item.family {
            RuntimeFamily::Orchestrated => plan.orchestrated.push(planned),
            RuntimeFamily::Engine => plan.engine.push(planned),
        }
    }
    plan
}

#[cfg(test)]
#[path = "unified_tests.rs"]
mod tests;
