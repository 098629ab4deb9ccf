// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn engine_options_default_to_full_restore() {
    let opts = EngineRestoreOptions::default();
    assert!(opts.restore_volumes && opts.restore_config && opts.redeploy && opts.stop_existing);
    assert_eq!(opts.restore_scope, RestoreScope::All);
    assert_eq!(opts.containers, None);
}

#[test]
fn setters_chain() {
    let opts = EngineRestoreOptions::default()
        .redeploy(false)
        .restore_scope(RestoreScope::Selected)
        .containers(vec!["web".to_string()]);
    assert!(!opts.redeploy);
    assert_eq!(opts.containers.as_deref(), Some(&["web".to_string()][..]));
}

#[test]
fn engine_restore_json_shape() {
    let record: RestoreRecord = serde_json::from_value(json!({
        "id": "r1",
        "backup_id": "b1",
        "status": "InProgress",
        "created_at_ms": 10,
        "options": {
            "runtime_family": "engine",
            "restore_volumes": true,
            "restore_config": false,
            "redeploy": true,
            "stop_existing": false,
            "restore_scope": "selected",
            "containers": ["db"],
        },
    }))
    .unwrap();
    assert_eq!(record.status, RestoreStatus::InProgress);
    assert_eq!(record.options.family(), RuntimeFamily::Engine);
}

#[test]
fn orchestrated_restore_json_shape() {
    let record = RestoreRecord::builder()
        .options(RestoreOptions::Orchestrated { target_namespace: Some("staging".into()) })
        .build();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["options"]["runtime_family"], "orchestrated");
    assert_eq!(value["options"]["target_namespace"], "staging");
}

#[yare::parameterized(
    pending     = { RestoreStatus::Pending, false },
    in_progress = { RestoreStatus::InProgress, false },
    completed   = { RestoreStatus::Completed, true },
    failed      = { RestoreStatus::Failed, true },
)]
fn terminal_statuses(status: RestoreStatus, terminal: bool) {
    assert_eq!(status.is_terminal(), terminal);
}
