// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk backups list` / `show` over the unified view.

use crate::prelude::*;

fn mixed(temp: &Project) {
    temp.records(&json!({
        "backups": [
            engine_record("bk-web", &["web"], 100, "completed"),
            engine_record("bk-db", &["db"], 300, "partially_failed"),
            cluster_record("bk-pay", "payments", 200, "failed"),
        ]
    }));
}

fn ids(out: &Value) -> Vec<String> {
    out.as_array()
        .map(|items| items.iter().filter_map(|i| i["id"].as_str().map(String::from)).collect())
        .unwrap_or_default()
}

#[test]
fn list_is_newest_first_across_families() {
    let temp = Project::empty();
    mixed(&temp);

    let out = temp.hk().args(&["-o", "json", "backups", "list"]).passes().json();

    assert_eq!(ids(&out), vec!["bk-db", "bk-pay", "bk-web"]);
}

#[test]
fn status_filter_is_exact() {
    let temp = Project::empty();
    mixed(&temp);

    let out = temp.hk().args(&["-o", "json", "backups", "list", "--status", "failed"]).passes().json();

    assert_eq!(ids(&out), vec!["bk-pay"]);
}

#[test]
fn family_and_search_filters_combine() {
    let temp = Project::empty();
    mixed(&temp);

    let out = temp
        .hk()
        .args(&["-o", "json", "backups", "list", "--family", "engine", "--search", "WEB"])
        .passes()
        .json();

    assert_eq!(ids(&out), vec!["bk-web"]);
}

#[test]
fn show_accepts_a_unique_prefix() {
    let temp = Project::empty();
    mixed(&temp);

    temp.hk()
        .args(&["backups", "show", "bk-p"])
        .passes()
        .stdout_has("Backup: bk-pay")
        .stdout_has("Namespace: payments")
        .stdout_has("Status: failed");
}

#[test]
fn show_unknown_backup_fails() {
    let temp = Project::empty();
    mixed(&temp);

    temp.hk().args(&["backups", "show", "bk-zzz"]).fails().stderr_has("backup not found");
}
