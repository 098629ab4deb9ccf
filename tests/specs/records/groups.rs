// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk backups groups` aggregation.

use crate::prelude::*;

#[test]
fn same_container_sets_share_a_group_and_full_scope_leads() {
    let temp = Project::empty();
    temp.records(&json!({
        "backups": [
            engine_record("bk-1", &[], 100, "completed"),
            engine_record("bk-2", &["svc-a"], 200, "completed"),
            engine_record("bk-3", &["svc-a"], 300, "failed"),
        ]
    }));

    let out = temp.hk().args(&["-o", "json", "backups", "groups"]).passes().json();

    let groups = &out[0]["scopes"]["groups"];
    assert_eq!(groups.as_array().map(Vec::len), Some(2));
    assert_eq!(groups[0]["key"], "full");
    assert_eq!(groups[0]["is_full_scope"], true);
    assert_eq!(groups[0]["members"].as_array().map(Vec::len), Some(1));
    assert_eq!(groups[1]["key"], "svc-a");
    assert_eq!(groups[1]["members"].as_array().map(Vec::len), Some(2));
    assert_eq!(groups[1]["counts"]["failed"], 1);
}

#[test]
fn partial_failures_count_as_failed_in_totals() {
    let temp = Project::empty();
    temp.records(&json!({
        "backups": [
            cluster_record("bk-1", "payments", 100, "partially_failed"),
            cluster_record("bk-2", "payments", 200, "completed"),
        ],
        "restores": [{
            "id": "rs-1",
            "backup_id": "bk-2",
            "status": "completed",
            "created_at_ms": 300,
            "options": {"runtime_family": "orchestrated"}
        }]
    }));

    temp.hk()
        .args(&["backups", "groups"])
        .passes()
        .stdout_has("prod cluster")
        .stdout_has("payments  1/2 completed, 1 failed, 1 restores")
        .stdout_has("Total: 2 backups, 1 completed, 1 failed, 1 restores");
}

#[test]
fn no_records_says_so() {
    let temp = Project::empty();
    temp.hk().args(&["backups", "groups"]).passes().stdout_eq("No backups\n");
}
