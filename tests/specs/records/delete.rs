// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk backups delete` per-family dispatch.

use crate::prelude::*;

fn seed(temp: &Project) {
    temp.records(&json!({
        "backups": [
            engine_record("bk-web", &["web"], 100, "completed"),
            engine_record("bk-busy", &["db"], 300, "creating"),
            cluster_record("bk-pay", "payments", 200, "failed"),
        ]
    }));
}

#[test]
fn dry_run_splits_by_family_and_skips_running() {
    let temp = Project::empty();
    seed(&temp);

    let plan = temp
        .hk()
        .args(&["-o", "json", "backups", "delete", "bk-web", "bk-pay", "bk-busy", "--dry-run"])
        .passes()
        .json();

    assert_eq!(plan["engine"][0]["backup_id"], "bk-web");
    assert_eq!(plan["orchestrated"][0]["backup_name"], "bk-pay-name");
    assert_eq!(plan["skipped"], json!(["bk-busy"]));
}

#[cfg(unix)]
#[test]
fn delete_calls_the_runner_and_drops_records() {
    let temp = Project::empty();
    seed(&temp);
    let runner = temp.runner(&reply("delete_backup", "null"));
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["backups", "delete", "bk-web", "bk-pay"])
        .passes()
        .stdout_has("Deleted engine backup bk-web on inf-edge")
        .stdout_has("Deleted cluster backup bk-pay-name on inf-prod");

    let left: Vec<Value> = temp.records_json()["backups"].as_array().cloned().unwrap_or_default();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0]["id"], "bk-busy");

    let params: Vec<Value> = temp.requests().iter().map(|r| r["params"].clone()).collect();
    let cluster = json!({
        "runtime_family": "orchestrated",
        "infra_id": "inf-prod",
        "backup_name": "bk-pay-name",
    });
    assert!(params.contains(&cluster), "{params:?}");
}

#[cfg(unix)]
#[test]
fn failed_deletes_keep_records_and_exit_non_zero() {
    let temp = Project::empty();
    seed(&temp);
    let runner = temp.runner(&refuse("delete_backup", "locked", "rejected"));
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["backups", "delete", "bk-web"])
        .exits(1)
        .stderr_has("locked");

    assert_eq!(temp.records_json()["backups"].as_array().map(Vec::len), Some(3));
}

#[cfg(unix)]
#[test]
fn same_named_cluster_backups_are_all_removed() {
    let temp = Project::empty();
    let mut first = cluster_record("bk-a", "payments", 100, "completed");
    let mut second = cluster_record("bk-b", "payments", 200, "completed");
    first["name"] = json!("nightly");
    second["name"] = json!("nightly");
    temp.records(&json!({ "backups": [first, second] }));
    let runner = temp.runner(&reply("delete_backup", "null"));
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["backups", "delete", "bk-a", "bk-b"])
        .passes()
        .stdout_has("Deleted cluster backup nightly on inf-prod (record bk-a)")
        .stdout_has("Deleted cluster backup nightly on inf-prod (record bk-b)");

    assert_eq!(temp.records_json()["backups"].as_array().map(Vec::len), Some(0));
    assert_eq!(temp.requests().len(), 1);
}
