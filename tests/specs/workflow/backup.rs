// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk backup create` and `hk backups wait` through a runner.

use crate::prelude::*;

fn operations(temp: &Project) -> Vec<String> {
    temp.requests()
        .iter()
        .filter_map(|r| r["operation"].as_str().map(String::from))
        .collect()
}

#[cfg(unix)]
#[test]
fn engine_backup_is_submitted_recorded_and_awaited() {
    let temp = Project::empty();
    let runner = temp.runner(
        &[
            reply("authenticate", "null"),
            reply("create_backup", "null"),
            reply("backup_status", r#"{"status":"completed","size_bytes":2048}"#),
        ]
        .join("\n"),
    );
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&[
            "backup", "create", "--infra", "inf-edge", "--name", "nightly", "--container", "web",
            "--cred", ":", "--cred", "root:pw",
        ])
        .passes()
        .stdout_has("succeeded on edge host");

    let records = temp.records_json();
    let id = records["backups"][0]["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(records["backups"][0]["status"], "creating");
    assert_eq!(records["backups"][0]["containers"], json!(["web"]));

    let create = &temp.requests()[1];
    assert_eq!(create["params"]["storage_link"], "s3://backups/edge");
    assert_eq!(create["hops"][1]["username"], "root");

    temp.hk()
        .args(&["backups", "wait", &id, "--cred", ":", "--cred", "root:pw"])
        .passes()
        .stdout_has("completed");

    let records = temp.records_json();
    assert_eq!(records["backups"][0]["status"], "completed");
    assert_eq!(records["backups"][0]["size_bytes"], 2048);
    assert_eq!(operations(&temp), vec!["authenticate", "create_backup", "backup_status"]);
}

#[cfg(unix)]
#[test]
fn missing_credentials_stop_before_any_call() {
    let temp = Project::empty();
    let runner = temp.runner(&reply("authenticate", "null"));
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["backup", "create", "--infra", "inf-edge", "--name", "nightly"])
        .exits(2)
        .stderr_has("credentials incomplete for hop(s) 2");

    assert!(temp.requests().is_empty());
}

#[cfg(unix)]
#[test]
fn empty_namespace_is_refused_after_login() {
    let temp = Project::empty();
    let runner = temp.runner(&reply("authenticate", "null"));
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["backup", "create", "--infra", "inf-prod", "--name", "nightly", "--cred", "admin:pw"])
        .exits(2)
        .stderr_has("namespace is empty");

    assert_eq!(operations(&temp), vec!["authenticate"]);
}

#[cfg(unix)]
#[test]
fn rejected_submission_exits_with_rejected_code() {
    let temp = Project::empty();
    let runner = temp.runner(
        &[reply("authenticate", "null"), refuse("create_backup", "disk full", "rejected")].join("\n"),
    );
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&[
            "backup", "create", "--infra", "inf-prod", "--name", "nightly", "--namespace", "payments",
            "--cred", "admin:pw",
        ])
        .exits(3)
        .stderr_has("rejected by remote system: disk full");

    assert!(!temp.path().join("records.json").exists());
}

#[cfg(unix)]
#[test]
fn unreachable_runner_exits_with_unreachable_code() {
    let temp = Project::empty();
    let runner = temp.runner(&refuse("authenticate", "bastion down", "unreachable"));
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["backup", "create", "--infra", "inf-prod", "--name", "n", "--namespace", "p", "--cred", "a:b"])
        .exits(4)
        .stderr_has("bastion down");
}
