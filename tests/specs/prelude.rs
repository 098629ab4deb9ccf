// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for specs: a fluent wrapper over `assert_cmd` and a temp
//! project holding config, records and runner scripts.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
pub use serde_json::{json, Value};

/// Environment variables that would leak the caller's setup into a spec.
const HK_ENV: &[&str] = &[
    "HK_CONFIG",
    "HK_RECORDS",
    "HK_RUNNER",
    "HK_RUNNER_TIMEOUT_MS",
    "HK_POLL_INTERVAL_MS",
    "HK_LOG",
    "HK_LOG_DIR",
];

/// `hk` with a clean environment and no user config.
pub fn cli() -> CliBuilder {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hk"));
    for key in HK_ENV {
        cmd.env_remove(key);
    }
    cmd.env("NO_COLOR", "1").env("XDG_CONFIG_HOME", "/nonexistent/hk-specs");
    CliBuilder { cmd }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    fn run(mut self) -> (Option<i32>, RunAssert) {
        let output = match self.cmd.output() {
            Ok(output) => output,
            Err(e) => panic!("failed to run hk: {e}"),
        };
        let run = RunAssert {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        (output.status.code(), run)
    }

    /// Run and require exit code 0.
    pub fn passes(self) -> RunAssert {
        let (code, run) = self.run();
        assert!(code == Some(0), "expected success, got {code:?}\n{run}");
        run
    }

    /// Run and require a non-zero exit.
    pub fn fails(self) -> RunAssert {
        let (code, run) = self.run();
        assert!(code != Some(0), "expected failure, got success\n{run}");
        run
    }

    /// Run and require a specific exit code.
    pub fn exits(self, expected: i32) -> RunAssert {
        let (code, run) = self.run();
        assert!(code == Some(expected), "expected exit {expected}, got {code:?}\n{run}");
        run
    }
}

pub struct RunAssert {
    stdout: String,
    stderr: String,
}

impl std::fmt::Display for RunAssert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "--- stdout\n{}--- stderr\n{}", self.stdout, self.stderr)
    }
}

impl RunAssert {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {needle:?}\n{self}");
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout has {needle:?}\n{self}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {needle:?}\n{self}");
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn json(&self) -> Value {
        match serde_json::from_str(&self.stdout) {
            Ok(value) => value,
            Err(e) => panic!("stdout is not JSON: {e}\n{self}"),
        }
    }
}

/// A temp directory with `config.toml` and `records.json` next to each other.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        match tempfile::tempdir() {
            Ok(dir) => Self { dir },
            Err(e) => panic!("tempdir: {e}"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                panic!("mkdir {}: {e}", parent.display());
            }
        }
        if let Err(e) = std::fs::write(&path, content) {
            panic!("write {}: {e}", path.display());
        }
        path
    }

    pub fn read(&self, rel: &str) -> String {
        match std::fs::read_to_string(self.dir.path().join(rel)) {
            Ok(text) => text,
            Err(e) => panic!("read {rel}: {e}"),
        }
    }

    pub fn config(&self, content: &str) {
        self.file("config.toml", content);
    }

    pub fn records(&self, snapshot: &Value) {
        self.file("records.json", &snapshot.to_string());
    }

    pub fn records_json(&self) -> Value {
        match serde_json::from_str(&self.read("records.json")) {
            Ok(value) => value,
            Err(e) => panic!("records.json: {e}"),
        }
    }

    /// Install an executable `sh` runner. `cases` is the body of a `case`
    /// over the request JSON read from stdin.
    #[cfg(unix)]
    pub fn runner(&self, cases: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = format!(
            "#!/bin/sh\nreq=$(cat)\nprintf '%s\\n' \"$req\" >> \"$(dirname \"$0\")/requests.log\"\ncase \"$req\" in\n{cases}\n  *) echo '{{\"success\":false,\"error\":\"unsupported\"}}' ;;\nesac\n"
        );
        let path = self.file("runner.sh", &script);
        if let Err(e) = std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)) {
            panic!("chmod runner: {e}");
        }
        path
    }

    /// Requests the runner received, one JSON object per call.
    pub fn requests(&self) -> Vec<Value> {
        let Ok(log) = std::fs::read_to_string(self.dir.path().join("requests.log")) else {
            return Vec::new();
        };
        log.lines().filter_map(|line| serde_json::from_str(line).ok()).collect()
    }

    /// `hk` pointed at this project's config and records.
    pub fn hk(&self) -> CliBuilder {
        cli()
            .env("HK_CONFIG", self.dir.path().join("config.toml"))
            .env("HK_RECORDS", self.dir.path().join("records.json"))
            .env("HK_POLL_INTERVAL_MS", "10")
    }
}

/// Match arm answering one operation with a successful reply.
pub fn reply(operation: &str, data: &str) -> String {
    format!("  *'\"operation\":\"{operation}\"'*) echo '{{\"success\":true,\"data\":{data}}}' ;;")
}

/// Match arm failing one operation.
pub fn refuse(operation: &str, error: &str, kind: &str) -> String {
    format!(
        "  *'\"operation\":\"{operation}\"'*) echo '{{\"success\":false,\"error\":\"{error}\",\"kind\":\"{kind}\"}}' ;;"
    )
}

/// Config with one engine host behind a bastion and one cluster, with the
/// bastion login cached.
pub fn config_with_runner(runner: &Path) -> String {
    format!(
        r#"
[runner]
program = "{}"

[[infra]]
id = "inf-edge"
name = "edge host"
family = "engine"
storage_link = "s3://backups/edge"
hops = [{{ host = "bastion" }}, {{ host = "edge-01" }}]

[[infra]]
id = "inf-prod"
name = "prod cluster"
family = "orchestrated"
hops = [{{ host = "master" }}]

[[credentials]]
host = "bastion"
port = 22
username = "ops"
password = "secret"
"#,
        runner.display()
    )
}

pub fn engine_record(id: &str, containers: &[&str], created_at_ms: u64, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("{id}-name"),
        "infra_id": "inf-edge",
        "infra_name": "edge host",
        "status": status,
        "created_at_ms": created_at_ms,
        "runtime_family": "engine",
        "containers": containers,
    })
}

pub fn cluster_record(id: &str, namespace: &str, created_at_ms: u64, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("{id}-name"),
        "infra_id": "inf-prod",
        "infra_name": "prod cluster",
        "status": status,
        "created_at_ms": created_at_ms,
        "runtime_family": "orchestrated",
        "namespace": namespace,
    })
}
