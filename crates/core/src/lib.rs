// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hk-core: pure domain model for hopkeep backup/restore orchestration.
//!
//! Nothing in this crate performs I/O. Credential merging, health
//! derivation, list parsing and aggregation are total functions over plain
//! values; the async seams live in `hk-adapters` and `hk-engine`.

pub mod macros;

pub mod aggregate;
pub mod backup;
pub mod credential;
pub mod health;
pub mod hop;
pub mod id;
pub mod listing;
pub mod restore;
pub mod time_fmt;
pub mod unified;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use aggregate::{
    aggregate, scope_key, scope_label, AggregateView, GroupCounts, InfraGroup, InfraScopes,
    InfraSummary, NamespaceGroup, ScopeGroup, FULL_SCOPE_KEY, FULL_SCOPE_LABEL,
};
#[cfg(any(test, feature = "test-support"))]
pub use backup::BackupRecordBuilder;
pub use backup::{
    BackupId, BackupKind, BackupRecord, BackupStatus, BackupVersion, InfraId, RuntimeFamily,
    ScopeSelector,
};
pub use credential::{is_complete, merge_chain};
pub use health::{derive_health, EngineKind, ProbeResponse, ProbeResult, RuntimeHealth, NOT_INSTALLED};
pub use hop::{Credential, CredentialChain, HopSpec};
pub use listing::{
    classify_status, parse_container_lines, parse_containers, parse_image_lines, ContainerEntry,
    ContainerState, ImageEntry,
};
#[cfg(any(test, feature = "test-support"))]
pub use restore::RestoreRecordBuilder;
pub use restore::{
    EngineRestoreOptions, RestoreId, RestoreOptions, RestoreRecord, RestoreScope, RestoreStatus,
};
pub use time_fmt::{format_bytes, format_elapsed};
pub use unified::{
    filter_unified, plan_bulk_delete, BulkDeletePlan, DeleteTarget, PlannedDelete, UnifiedFilter,
    UnifiedItem,
};
