// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn engine_record_from_store_json() {
    let record: BackupRecord = serde_json::from_value(json!({
        "id": "17",
        "name": "web-stack",
        "infra_id": "host-a",
        "infra_name": "Host A",
        "status": "partially_failed",
        "created_at_ms": 1_700_000_000_000u64,
        "runtime_family": "engine",
        "containers": ["web", "db"],
        "compose_project": "shop",
    }))
    .unwrap();

    assert_eq!(record.family(), RuntimeFamily::Engine);
    assert_eq!(record.containers(), ["web".to_string(), "db".to_string()]);
    assert_eq!(record.status, BackupStatus::PartiallyFailed);
    assert_eq!(record.kind, BackupKind::Immediate);
    assert_eq!(record.namespace(), None);
}

#[test]
fn orchestrated_record_keeps_family_tag_on_serialize() {
    let record = BackupRecord::builder()
        .scope(ScopeSelector::namespace("payments"))
        .kind(BackupKind::Scheduled)
        .build();

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["runtime_family"], "orchestrated");
    assert_eq!(value["namespace"], "payments");
    assert_eq!(value["kind"], "scheduled");

    let back: BackupRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}

#[test]
fn engine_record_without_containers_is_full_host() {
    let record: BackupRecord = serde_json::from_value(json!({
        "id": "1", "name": "all", "infra_id": "h", "status": "completed",
        "created_at_ms": 5, "runtime_family": "engine",
    }))
    .unwrap();
    assert!(record.containers().is_empty());
}

#[yare::parameterized(
    snake      = { "\"partially_failed\"", BackupStatus::PartiallyFailed },
    pascal     = { "\"PartiallyFailed\"", BackupStatus::PartiallyFailed },
    camel      = { "\"partiallyFailed\"", BackupStatus::PartiallyFailed },
    in_progress = { "\"InProgress\"", BackupStatus::Creating },
    completed  = { "\"Completed\"", BackupStatus::Completed },
)]
fn status_aliases(raw: &str, expected: BackupStatus) {
    assert_eq!(serde_json::from_str::<BackupStatus>(raw).unwrap(), expected);
}

#[yare::parameterized(
    creating         = { BackupStatus::Creating,        false, false },
    completed        = { BackupStatus::Completed,       true,  false },
    failed           = { BackupStatus::Failed,          true,  true },
    restoring        = { BackupStatus::Restoring,       false, false },
    deleted          = { BackupStatus::Deleted,         true,  false },
    partially_failed = { BackupStatus::PartiallyFailed, true,  true },
)]
fn status_predicates(status: BackupStatus, terminal: bool, failed: bool) {
    assert_eq!(status.is_terminal(), terminal);
    assert_eq!(status.counts_as_failed(), failed);
}

#[test]
fn own_version_uses_name_and_creation_time() {
    let record = BackupRecord::builder().name("adhoc-1").created_at_ms(42).build();
    assert_eq!(record.own_version(), BackupVersion { name: "adhoc-1".into(), created_at_ms: 42 });
}
