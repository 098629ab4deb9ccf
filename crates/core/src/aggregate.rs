// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hierarchical grouping of backup records.
//!
//! Everything here is rebuilt from the full record set on every call. A
//! record's group is only known after its scope is parsed, so incremental
//! maintenance is not attempted.
//!
//! ```text
//! InfraGroup (family, infra_id)
//!   ├── engine:        ScopeGroup  keyed by sorted container set ("full" when empty)
//!   └── orchestrated:  NamespaceGroup keyed by namespace
//! ```

use crate::backup::{BackupId, BackupRecord, InfraId, RuntimeFamily, ScopeSelector};
use crate::restore::RestoreRecord;
use crate::unified::{self, UnifiedItem};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Group key of a backup that covers the whole host.
pub const FULL_SCOPE_KEY: &str = "full";
/// Display label of the whole-host group.
pub const FULL_SCOPE_LABEL: &str = "Full scope";

/// Names beyond this count collapse into a `+N more` suffix.
const LABEL_MAX_NAMES: usize = 3;
/// Names shown before the suffix once a label collapses.
const LABEL_HEAD_NAMES: usize = 2;

fn normalized(containers: &[String]) -> Vec<&str> {
    let mut names: Vec<&str> = containers.iter().map(String::as_str).collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Group key for a container set. Input order does not matter.
pub fn scope_key(containers: &[String]) -> String {
    let names = normalized(containers);
    if names.is_empty() {
        FULL_SCOPE_KEY.to_string()
    } else {
        names.join(",")
    }
}

/// Display label for a container set.
pub fn scope_label(containers: &[String]) -> String {
    let names = normalized(containers);
    match names.len() {
        0 => FULL_SCOPE_LABEL.to_string(),
        n if n <= LABEL_MAX_NAMES => names.join(", "),
        n => format!("{} +{} more", names[..LABEL_HEAD_NAMES].join(", "), n - LABEL_HEAD_NAMES),
    }
}

/// Per-group status tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounts {
    pub total: usize,
    pub completed: usize,
    /// Includes partial failures.
    pub failed: usize,
}

impl GroupCounts {
    fn tally(members: &[BackupRecord]) -> Self {
        members.iter().fold(Self::default(), |mut c, r| {
            c.total += 1;
            if r.status == crate::BackupStatus::Completed {
                c.completed += 1;
            }
            if r.status.counts_as_failed() {
                c.failed += 1;
            }
            c
        })
    }
}

/// Engine backups sharing one container set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeGroup {
    pub key: String,
    pub label: String,
    pub is_full_scope: bool,
    pub container_count: usize,
    pub members: Vec<BackupRecord>,
    pub counts: GroupCounts,
    pub restore_count: usize,
}

/// Orchestrated backups of one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceGroup {
    pub namespace: String,
    pub members: Vec<BackupRecord>,
    pub counts: GroupCounts,
    pub restore_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "runtime_family", content = "groups", rename_all = "snake_case")]
pub enum InfraScopes {
    Orchestrated(Vec<NamespaceGroup>),
    Engine(Vec<ScopeGroup>),
}

/// Statistics over a set of backups and their restores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub in_progress: usize,
    pub restores: usize,
    pub total_size_bytes: u64,
    pub latest_backup_at_ms: Option<u64>,
}

impl InfraSummary {
    fn add(&mut self, record: &BackupRecord, restores: usize) {
        self.total += 1;
        if record.status == crate::BackupStatus::Completed {
            self.completed += 1;
        }
        if record.status.counts_as_failed() {
            self.failed += 1;
        }
        if record.status.is_in_progress() {
            self.in_progress += 1;
        }
        self.restores += restores;
        self.total_size_bytes += record.size_bytes.unwrap_or(0);
        self.latest_backup_at_ms = self.latest_backup_at_ms.max(Some(record.created_at_ms));
    }

    fn merge(&mut self, other: &InfraSummary) {
        self.total += other.total;
        self.completed += other.completed;
        self.failed += other.failed;
        self.in_progress += other.in_progress;
        self.restores += other.restores;
        self.total_size_bytes += other.total_size_bytes;
        self.latest_backup_at_ms = self.latest_backup_at_ms.max(other.latest_backup_at_ms);
    }
}

/// All backups of one infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraGroup {
    pub infra_id: InfraId,
    pub infra_name: String,
    pub family: RuntimeFamily,
    pub scopes: InfraScopes,
    pub summary: InfraSummary,
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateView {
    pub infra_groups: Vec<InfraGroup>,
    pub unified: Vec<UnifiedItem>,
    pub summary: InfraSummary,
    /// Restores whose backup is not in the record set.
    pub unmatched_restores: usize,
}

impl AggregateView {
    /// Narrow the view to one infrastructure, recomputing the totals.
    pub fn only_infra(mut self, infra_id: &str) -> Self {
        self.infra_groups.retain(|g| g.infra_id == infra_id);
        self.unified.retain(|i| i.infra_id == infra_id);
        self.summary = InfraSummary::default();
        for group in &self.infra_groups {
            self.summary.merge(&group.summary);
        }
        self
    }
}

/// Restores indexed by backup, newest first.
pub(crate) struct RestoreIndex<'a> {
    by_backup: HashMap<&'a BackupId, Vec<&'a RestoreRecord>>,
}

impl<'a> RestoreIndex<'a> {
    pub(crate) fn new(restores: &'a [RestoreRecord]) -> Self {
        let mut by_backup: HashMap<&BackupId, Vec<&RestoreRecord>> = HashMap::new();
        for r in restores {
            by_backup.entry(&r.backup_id).or_default().push(r);
        }
        for list in by_backup.values_mut() {
            list.sort_by(|a, b| {
                b.created_at_ms.cmp(&a.created_at_ms).then_with(|| a.id.cmp(&b.id))
            });
        }
        Self { by_backup }
    }

    pub(crate) fn for_backup(&self, id: &BackupId) -> &[&'a RestoreRecord] {
        self.by_backup.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    fn count(&self, members: &[BackupRecord]) -> usize {
        members.iter().map(|m| self.for_backup(&m.id).len()).sum()
    }

    fn unmatched(&self, backups: &[BackupRecord]) -> usize {
        let known: HashSet<&BackupId> = backups.iter().map(|b| &b.id).collect();
        self.by_backup
            .iter()
            .filter(|(id, _)| !known.contains(*id))
            .map(|(_, list)| list.len())
            .sum()
    }
}

fn newest_first(members: &mut [BackupRecord]) {
    members.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms).then_with(|| a.id.cmp(&b.id)));
}

fn engine_groups(records: Vec<BackupRecord>, restores: &RestoreIndex<'_>) -> Vec<ScopeGroup> {
    let mut by_key: BTreeMap<String, Vec<BackupRecord>> = BTreeMap::new();
    for record in records {
        by_key.entry(scope_key(record.containers())).or_default().push(record);
    }

    let mut groups: Vec<ScopeGroup> = by_key
        .into_iter()
        .map(|(key, mut members)| {
            newest_first(&mut members);
            let containers = members.first().map(|m| m.containers().to_vec()).unwrap_or_default();
            let container_count = normalized(&containers).len();
            ScopeGroup {
                is_full_scope: key == FULL_SCOPE_KEY,
                label: scope_label(&containers),
                key,
                container_count,
                counts: GroupCounts::tally(&members),
                restore_count: restores.count(&members),
                members,
            }
        })
        .collect();

    // Full scope first, then widest sets, then by label
    groups.sort_by(|a, b| {
        b.is_full_scope
            .cmp(&a.is_full_scope)
            .then_with(|| b.container_count.cmp(&a.container_count))
            .then_with(|| a.label.cmp(&b.label))
    });
    groups
}

fn namespace_groups(records: Vec<BackupRecord>, restores: &RestoreIndex<'_>) -> Vec<NamespaceGroup> {
    let mut by_ns: BTreeMap<String, Vec<BackupRecord>> = BTreeMap::new();
    for record in records {
        let ns = record.namespace().unwrap_or_default().to_string();
        by_ns.entry(ns).or_default().push(record);
    }
    by_ns
        .into_iter()
        .map(|(namespace, mut members)| {
            newest_first(&mut members);
            NamespaceGroup {
                namespace,
                counts: GroupCounts::tally(&members),
                restore_count: restores.count(&members),
                members,
            }
        })
        .collect()
}

/// Build the grouped and unified views from the current record set.
pub fn aggregate(backups: &[BackupRecord], restores: &[RestoreRecord]) -> AggregateView {
    let index = RestoreIndex::new(restores);

    let mut by_infra: BTreeMap<(RuntimeFamily, InfraId), Vec<BackupRecord>> = BTreeMap::new();
    let mut summary = InfraSummary::default();
    for record in backups {
        summary.add(record, index.for_backup(&record.id).len());
        by_infra.entry((record.family(), record.infra_id.clone())).or_default().push(record.clone());
    }

    let mut infra_groups: Vec<InfraGroup> = by_infra
        .into_iter()
        .map(|((family, infra_id), records)| {
            let mut infra_summary = InfraSummary::default();
            for r in &records {
                infra_summary.add(r, index.for_backup(&r.id).len());
            }
            let infra_name = records
                .iter()
                .map(|r| r.infra_name.as_str())
                .find(|n| !n.is_empty())
                .unwrap_or(infra_id.as_str())
                .to_string();
            let scopes = match family {
                RuntimeFamily::Engine => InfraScopes::Engine(engine_groups(records, &index)),
                RuntimeFamily::Orchestrated => {
                    InfraScopes::Orchestrated(namespace_groups(records, &index))
                }
            };
            InfraGroup { infra_id, infra_name, family, scopes, summary: infra_summary }
        })
        .collect();

    infra_groups.sort_by(|a, b| {
        a.infra_name
            .cmp(&b.infra_name)
            .then_with(|| a.infra_id.cmp(&b.infra_id))
            .then_with(|| a.family.cmp(&b.family))
    });

    let unified = unified::project_all(backups, &index);

    AggregateView { infra_groups, unified, summary, unmatched_restores: index.unmatched(backups) }
}

impl AggregateView {
    /// Engine scope groups across all infrastructures, in display order.
    pub fn scope_groups(&self) -> impl Iterator<Item = &ScopeGroup> {
        self.infra_groups.iter().flat_map(|g| match &g.scopes {
            InfraScopes::Engine(groups) => groups.as_slice(),
            InfraScopes::Orchestrated(_) => &[],
        })
    }
}

impl ScopeSelector {
    /// Group key this scope lands in (namespace for orchestrated backups).
    pub fn group_key(&self) -> String {
        match self {
            ScopeSelector::Orchestrated { namespace } => namespace.clone(),
            ScopeSelector::Engine { containers, .. } => scope_key(containers),
        }
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
