// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk agent` health derivation and lifecycle.

use crate::prelude::*;

#[test]
fn not_installed_wins_over_other_fields() {
    let temp = Project::empty();
    let probe = temp.file(
        "probe.json",
        r#"{"version": "not installed", "service_status": "running", "daemon_status": "normal"}"#,
    );

    temp.hk()
        .args(&["agent", "status", "--from-file", probe.to_str().unwrap()])
        .passes()
        .stdout_has("Health: uninstalled");
}

#[test]
fn running_service_with_normal_daemon_is_active() {
    let temp = Project::empty();
    let probe = temp.file("probe.txt", "Version: 2.4.1\nService Status: Running\nDaemon Status: Normal\n");

    let out = temp
        .hk()
        .args(&["-o", "json", "agent", "status", "--from-file", probe.to_str().unwrap()])
        .passes()
        .json();

    assert_eq!(out["health"], "active");
    assert_eq!(out["probe"]["version"], "2.4.1");
}

#[test]
fn unrecognized_probe_output_is_unknown() {
    let temp = Project::empty();
    let probe = temp.file("probe.txt", "connection banner only\n");

    temp.hk()
        .args(&["agent", "status", "--from-file", probe.to_str().unwrap()])
        .passes()
        .stdout_has("Health: unknown");
}

#[cfg(unix)]
#[test]
fn install_waits_until_active() {
    let temp = Project::empty();
    let runner = temp.runner(&[
        reply("install_agent", "null"),
        reply("probe_health", r#"{"version":"2.4.1","service_status":"running","daemon_status":"normal"}"#),
    ]
    .join("\n"));
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["agent", "install", "--infra", "inf-edge", "--cred", "", "--cred", "root:pw"])
        .passes()
        .stdout_has("Health: active");

    let operations: Vec<Value> = temp.requests().iter().map(|r| r["operation"].clone()).collect();
    assert_eq!(operations, vec![json!("install_agent"), json!("probe_health")]);
}

#[test]
fn agents_only_run_on_engine_hosts() {
    let temp = Project::empty();
    temp.config(&config_with_runner(std::path::Path::new("/bin/false")));

    temp.hk()
        .args(&["agent", "install", "--infra", "inf-prod"])
        .fails()
        .stderr_has("engine hosts");
}
