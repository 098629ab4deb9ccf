// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution layer: carries one remote operation across an SSH hop chain.
//!
//! hopkeep never opens connections itself. An external runner receives the
//! request as JSON on stdin and answers with a [`RunnerReply`] on stdout:
//!
//! ```text
//! {"success": true,  "data": {...}}
//! {"success": false, "error": "permission denied", "kind": "rejected"}
//! {"success": false, "error": "no route to host",  "kind": "unreachable"}
//! ```

use async_trait::async_trait;
use hk_core::{CredentialChain, InfraId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Errors from the execution layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The remote side answered and refused (bad login, bad request).
    #[error("rejected: {0}")]
    Rejected(String),
    /// No answer: a hop is down, the runner died, or the call timed out.
    #[error("unreachable: {0}")]
    Unreachable(String),
    /// An answer arrived but could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Remote operations the runner understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Log in along the chain without doing anything else.
    Authenticate,
    ProbeHealth,
    InstallAgent,
    UninstallAgent,
    ListContainers,
    ListImages,
    ListVersions,
    CreateBackup,
    Restore,
    DeleteBackup,
    BackupStatus,
    RestoreStatus,
}

hk_core::simple_display! {
    Operation {
        Authenticate => "authenticate",
        ProbeHealth => "probe_health",
        InstallAgent => "install_agent",
        UninstallAgent => "uninstall_agent",
        ListContainers => "list_containers",
        ListImages => "list_images",
        ListVersions => "list_versions",
        CreateBackup => "create_backup",
        Restore => "restore",
        DeleteBackup => "delete_backup",
        BackupStatus => "backup_status",
        RestoreStatus => "restore_status",
    }
}

/// One authenticated call against an infrastructure.
#[derive(Clone, Serialize, Deserialize)]
pub struct ExecRequest {
    pub infra_id: InfraId,
    /// Credentials for every hop, outermost first.
    pub hops: CredentialChain,
    pub operation: Operation,
    #[serde(default)]
    pub params: Value,
}

impl ExecRequest {
    pub fn new(infra_id: InfraId, hops: CredentialChain, operation: Operation) -> Self {
        Self { infra_id, hops, operation, params: Value::Null }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }
}

impl std::fmt::Debug for ExecRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecRequest")
            .field("infra_id", &self.infra_id)
            .field("hops", &self.hops.len())
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

/// How the runner classifies a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    #[default]
    Rejected,
    Unreachable,
}

/// Reply envelope written by the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerReply {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub kind: FailureKind,
}

impl RunnerReply {
    pub fn into_result(self) -> Result<Value, ExecError> {
        if self.success {
            return Ok(self.data);
        }
        let message = self.error.unwrap_or_else(|| "runner reported failure".to_string());
        Err(match self.kind {
            FailureKind::Rejected => ExecError::Rejected(message),
            FailureKind::Unreachable => ExecError::Unreachable(message),
        })
    }
}

/// Adapter that executes remote operations through a hop chain
#[async_trait]
pub trait ExecutionAdapter: Clone + Send + Sync + 'static {
    async fn execute(&self, request: ExecRequest) -> Result<Value, ExecError>;
}

/// Runs an external runner process per request.
#[derive(Debug, Clone)]
pub struct ProcessExecutionAdapter {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessExecutionAdapter {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { program: program.into(), args: Vec::new(), timeout }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    async fn run(&self, payload: Vec<u8>) -> Result<std::process::Output, ExecError> {
        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ExecError::Unreachable(format!(
                    "failed to start runner {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&payload)
                .await
                .map_err(|e| ExecError::Unreachable(format!("write to runner failed: {}", e)))?;
        }

        child
            .wait_with_output()
            .await
            .map_err(|e| ExecError::Unreachable(format!("runner wait failed: {}", e)))
    }
}

#[async_trait]
impl ExecutionAdapter for ProcessExecutionAdapter {
    async fn execute(&self, request: ExecRequest) -> Result<Value, ExecError> {
        let operation = request.operation;
        let infra = request.infra_id.clone();
        let payload = serde_json::to_vec(&request)
            .map_err(|e| ExecError::Malformed(format!("request encode failed: {}", e)))?;

        let start = std::time::Instant::now();
        let output = tokio::time::timeout(self.timeout, self.run(payload))
            .await
            .map_err(|_| {
                ExecError::Unreachable(format!("runner timed out after {:?}", self.timeout))
            })??;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match serde_json::from_str::<RunnerReply>(stdout.trim()) {
            Ok(reply) => {
                tracing::info!(%infra, %operation, elapsed_ms, success = reply.success, "runner replied");
                reply.into_result()
            }
            Err(_) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                tracing::warn!(%infra, %operation, code = ?output.status.code(), %stderr, "runner exited");
                Err(ExecError::Unreachable(if stderr.is_empty() {
                    format!("runner exited with {}", output.status)
                } else {
                    stderr
                }))
            }
            Err(e) => {
                tracing::warn!(%infra, %operation, error = %e, "unreadable runner reply");
                Err(ExecError::Malformed(e.to_string()))
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ExecError, ExecRequest, ExecutionAdapter, Operation};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeExecState {
        scripted: HashMap<Operation, VecDeque<Result<Value, ExecError>>>,
        sticky: HashMap<Operation, Result<Value, ExecError>>,
        calls: Vec<ExecRequest>,
    }

    /// Fake execution adapter with scripted replies per operation.
    ///
    /// Queued replies are consumed in order; once a queue is empty the
    /// sticky reply for that operation is used, then `Ok(null)`.
    #[derive(Clone, Default)]
    pub struct FakeExecutionAdapter {
        inner: Arc<Mutex<FakeExecState>>,
    }

    impl FakeExecutionAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue one reply for `operation`.
        pub fn push(&self, operation: Operation, reply: Result<Value, ExecError>) {
            self.inner.lock().scripted.entry(operation).or_default().push_back(reply);
        }

        /// Reply to every `operation` call with `reply` once the queue is drained.
        pub fn always(&self, operation: Operation, reply: Result<Value, ExecError>) {
            self.inner.lock().sticky.insert(operation, reply);
        }

        pub fn calls(&self) -> Vec<ExecRequest> {
            self.inner.lock().calls.clone()
        }

        pub fn operations(&self) -> Vec<Operation> {
            self.inner.lock().calls.iter().map(|c| c.operation).collect()
        }
    }

    #[async_trait]
    impl ExecutionAdapter for FakeExecutionAdapter {
        async fn execute(&self, request: ExecRequest) -> Result<Value, ExecError> {
            let mut state = self.inner.lock();
            let operation = request.operation;
            state.calls.push(request);
            if let Some(reply) = state.scripted.get_mut(&operation).and_then(VecDeque::pop_front) {
                return reply;
            }
            state.sticky.get(&operation).cloned().unwrap_or(Ok(Value::Null))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeExecutionAdapter;

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
