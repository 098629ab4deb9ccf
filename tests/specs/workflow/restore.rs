// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk restore` and `hk restores` through a runner.

use crate::prelude::*;

const ACTIVE_PROBE: &str = r#"{"version":"2.4.1","service_status":"running","daemon_status":"normal"}"#;

fn request(temp: &Project, operation: &str) -> Value {
    temp.requests()
        .into_iter()
        .find(|r| r["operation"] == operation)
        .unwrap_or(Value::Null)
}

#[cfg(unix)]
#[test]
fn engine_restore_defaults_and_wait() {
    let temp = Project::empty();
    temp.records(&json!({ "backups": [engine_record("bk-web", &["web"], 100, "completed")] }));
    let runner = temp.runner(
        &[
            reply("authenticate", "null"),
            reply("restore", "null"),
            reply("restore_status", r#"{"status":"completed","completed_at_ms":500}"#),
        ]
        .join("\n"),
    );
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["restore", "bk-web", "--skip-config", "--cred", ":", "--cred", "root:pw"])
        .passes()
        .stdout_has("of bk-web-name (bk-web-name) succeeded");

    let params = &request(&temp, "restore")["params"];
    assert_eq!(params["backup_id"], "bk-web");
    assert_eq!(params["version"], "bk-web-name");
    assert_eq!(params["options"]["restore_scope"], "all");
    assert_eq!(params["options"]["restore_config"], false);
    assert_eq!(params["options"]["restore_volumes"], true);

    let restore_id = temp.records_json()["restores"][0]["id"].as_str().unwrap_or_default().to_string();
    temp.hk()
        .args(&["restores", "wait", &restore_id, "--cred", ":", "--cred", "root:pw"])
        .passes()
        .stdout_has("completed");

    let restores = temp.hk().args(&["-o", "json", "restores", "list", "--backup", "bk-web"]).passes().json();
    assert_eq!(restores[0]["status"], "completed");
    assert_eq!(restores[0]["completed_at_ms"], 500);
}

#[cfg(unix)]
#[test]
fn selected_containers_are_checked_against_the_host() {
    let temp = Project::empty();
    temp.records(&json!({ "backups": [engine_record("bk-web", &["web", "db"], 100, "completed")] }));
    let runner = temp.runner(
        &[
            reply("authenticate", "null"),
            reply("probe_health", ACTIVE_PROBE),
            reply("list_containers", r#"[{"ID":"a1","Names":"web","Image":"nginx","Status":"Up 1 hour"}]"#),
            reply("restore", "null"),
        ]
        .join("\n"),
    );
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["restore", "bk-web", "--container", "db", "--cred", ":", "--cred", "root:pw"])
        .fails()
        .stderr_has("unknown container(s): db");
    assert_eq!(request(&temp, "restore"), Value::Null);

    temp.hk()
        .args(&["restore", "bk-web", "--container", "web", "--cred", ":", "--cred", "root:pw"])
        .passes();
    let options = &request(&temp, "restore")["params"]["options"];
    assert_eq!(options["restore_scope"], "selected");
    assert_eq!(options["containers"], json!(["web"]));
}

#[cfg(unix)]
#[test]
fn inactive_agent_blocks_container_selection() {
    let temp = Project::empty();
    temp.records(&json!({ "backups": [engine_record("bk-web", &["web"], 100, "completed")] }));
    let runner = temp.runner(
        &[reply("authenticate", "null"), reply("probe_health", r#"{"version":"not installed"}"#)]
            .join("\n"),
    );
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["restore", "bk-web", "--container", "web", "--cred", ":", "--cred", "root:pw"])
        .exits(1)
        .stderr_has("agent is uninstalled");
}

#[cfg(unix)]
#[test]
fn unknown_agent_state_still_restores_named_containers() {
    let temp = Project::empty();
    temp.records(&json!({ "backups": [engine_record("bk-web", &["web"], 100, "completed")] }));
    let runner = temp.runner(
        &[
            reply("authenticate", "null"),
            reply("probe_health", r#"{"version":"1.2"}"#),
            reply("restore", "null"),
        ]
        .join("\n"),
    );
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["restore", "bk-web", "--container", "web", "--cred", ":", "--cred", "root:pw"])
        .passes()
        .stderr_has("agent state is unknown");

    let options = &request(&temp, "restore")["params"]["options"];
    assert_eq!(options["restore_scope"], "selected");
    assert_eq!(options["containers"], json!(["web"]));
}

#[cfg(unix)]
#[test]
fn scheduled_cluster_restore_picks_newest_version() {
    let temp = Project::empty();
    let mut record = cluster_record("bk-pay", "payments", 100, "completed");
    record["kind"] = json!("scheduled");
    temp.records(&json!({ "backups": [record] }));
    let runner = temp.runner(
        &[
            reply("authenticate", "null"),
            reply(
                "list_versions",
                r#"{"versions":[{"name":"mon","created_at_ms":1},{"name":"tue","created_at_ms":2}]}"#,
            ),
            reply("restore", "null"),
        ]
        .join("\n"),
    );
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["restore", "bk-pay", "--target-namespace", "payments-copy", "--cred", "admin:pw"])
        .passes();

    let listed = &request(&temp, "list_versions")["params"];
    assert_eq!(listed["namespace"], "payments");
    let params = &request(&temp, "restore")["params"];
    assert_eq!(params["version"], "tue");
    assert_eq!(params["options"]["target_namespace"], "payments-copy");
}

#[cfg(unix)]
#[test]
fn unknown_version_is_refused_before_submission() {
    let temp = Project::empty();
    let mut record = cluster_record("bk-pay", "payments", 100, "completed");
    record["kind"] = json!("scheduled");
    temp.records(&json!({ "backups": [record] }));
    let runner = temp.runner(
        &[
            reply("authenticate", "null"),
            reply("list_versions", r#"[{"name":"mon","created_at_ms":1}]"#),
        ]
        .join("\n"),
    );
    temp.config(&config_with_runner(&runner));

    temp.hk()
        .args(&["restore", "bk-pay", "--version", "sun", "--cred", "admin:pw"])
        .exits(2)
        .stderr_has("version sun is not among the listed versions");
}
