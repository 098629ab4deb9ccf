// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Async workflow driver.
//!
//! [`Workflow`] owns one [`WorkflowState`] and performs the remote calls
//! around it. Every response is committed only while the instance that
//! issued it is still live, so a cancelled workflow never applies a late
//! reply.

use super::state::{missing_slots, submission_plan, Stage, WorkflowEvent, WorkflowIntent, WorkflowState};
use crate::agent::probe_health;
use crate::error::{ExternalFailure, WorkflowError};
use crate::resolve::{remember_credentials, resolve_credentials};
use hk_adapters::{CredentialStore, ExecRequest, ExecutionAdapter, Operation};
use hk_core::{
    parse_containers, BackupRecord, BackupVersion, ContainerEntry, Credential, HopSpec,
    RuntimeFamily, RuntimeHealth,
};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

hk_core::define_id! {
    /// Identity of one workflow instance.
    pub struct WorkflowToken("wf-");
}

/// Result of a discovery call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// Versions offered for selection, newest first.
    Versions(Vec<BackupVersion>),
    Containers(Vec<ContainerEntry>),
    /// The engine agent is not active, so nothing can be listed.
    ListingUnavailable(RuntimeHealth),
    /// The current stage has nothing to discover.
    NotApplicable,
}

struct Shared {
    state: WorkflowState,
    live: Option<WorkflowToken>,
}

/// A running backup or restore workflow.
#[derive(Clone)]
pub struct Workflow<E, S> {
    exec: E,
    store: S,
    token: WorkflowToken,
    shared: Arc<Mutex<Shared>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionsReply {
    Bare(Vec<BackupVersion>),
    Wrapped { versions: Vec<BackupVersion> },
}

fn backup_params(backup: &BackupRecord) -> Value {
    let mut map = Map::new();
    map.insert("backup_id".to_string(), Value::from(backup.id.as_str()));
    map.insert("backup_name".to_string(), Value::from(backup.name.as_str()));
    if let Some(namespace) = backup.namespace() {
        map.insert("namespace".to_string(), Value::from(namespace));
    }
    Value::Object(map)
}

impl<E: ExecutionAdapter, S: CredentialStore> Workflow<E, S> {
    /// Start a workflow, filling the credential chain from the cache.
    pub async fn new(exec: E, store: S, intent: WorkflowIntent, hops: Vec<HopSpec>) -> Self {
        let chain = resolve_credentials(&store, &hops, None).await;
        let state = WorkflowState::new(intent, hops, chain);
        let token = WorkflowToken::new();
        tracing::info!(
            workflow = %token,
            infra = %state.intent.infra_id(),
            stage = %state.stage,
            "workflow started"
        );
        Self {
            exec,
            store,
            token: token.clone(),
            shared: Arc::new(Mutex::new(Shared { state, live: Some(token) })),
        }
    }

    pub fn token(&self) -> &WorkflowToken {
        &self.token
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WorkflowState {
        self.shared.lock().state.clone()
    }

    pub fn stage(&self) -> Stage {
        self.shared.lock().state.stage
    }

    fn is_live(&self) -> bool {
        self.shared.lock().live.as_ref() == Some(&self.token)
    }

    /// Apply `event` if this instance is still live.
    fn commit(&self, event: WorkflowEvent) -> Result<WorkflowState, WorkflowError> {
        let mut shared = self.shared.lock();
        if shared.live.as_ref() != Some(&self.token) {
            return Err(WorkflowError::Discarded);
        }
        let next = shared.state.advance(event)?;
        shared.state = next.clone();
        Ok(next)
    }

    /// Return `Discarded` when a response arrives after cancellation.
    fn guard(&self, what: &str) -> Result<(), WorkflowError> {
        if self.is_live() {
            return Ok(());
        }
        tracing::info!(workflow = %self.token, what, "discarding response for cancelled workflow");
        Err(WorkflowError::Discarded)
    }

    /// Resolve credentials with `overrides`, verify them remotely, and
    /// cache them once accepted.
    pub async fn authenticate(
        &self,
        overrides: &[Credential],
    ) -> Result<WorkflowState, WorkflowError> {
        let (hops, infra_id, stage) = {
            let shared = self.shared.lock();
            let state = &shared.state;
            (state.hops.clone(), state.intent.infra_id().clone(), state.stage)
        };
        if !stage.before_submit() {
            return Err(WorkflowError::InvalidTransition { stage, event: "accept credentials" });
        }

        let chain = resolve_credentials(&self.store, &hops, Some(overrides)).await;
        let missing = missing_slots(&hops, &chain);
        if !missing.is_empty() {
            return Err(WorkflowError::IncompleteCredentials { missing });
        }

        let reply = self
            .exec
            .execute(ExecRequest::new(infra_id.clone(), chain.clone(), Operation::Authenticate))
            .await;
        self.guard("authenticate")?;
        if let Err(e) = reply {
            tracing::warn!(workflow = %self.token, infra = %infra_id, error = %e, "credentials rejected");
            return Err(e.into());
        }

        let next = self.commit(WorkflowEvent::CredentialsAccepted(chain.clone()))?;
        let cached = remember_credentials(&self.store, &chain).await;
        tracing::info!(workflow = %self.token, stage = %next.stage, cached, "credentials accepted");
        Ok(next)
    }

    /// Fetch what the current stage needs: versions of a scheduled cluster
    /// backup, or the containers of an engine backup being restored.
    ///
    /// A failed call leaves the state untouched.
    pub async fn discover(&self) -> Result<Discovery, WorkflowError> {
        let state = self.state();
        let WorkflowIntent::Restore { backup } = &state.intent else {
            return Ok(Discovery::NotApplicable);
        };
        let infra_id = backup.infra_id.clone();

        match state.stage {
            Stage::VersionSelection => {
                let request = ExecRequest::new(infra_id, state.chain.clone(), Operation::ListVersions)
                    .with_params(backup_params(backup));
                let reply = self.exec.execute(request).await;
                self.guard("list versions")?;
                let versions = match serde_json::from_value::<VersionsReply>(reply?) {
                    Ok(VersionsReply::Bare(v)) | Ok(VersionsReply::Wrapped { versions: v }) => v,
                    Err(e) => {
                        return Err(ExternalFailure::Malformed(format!("version list: {}", e)).into())
                    }
                };
                let next = self.commit(WorkflowEvent::VersionsListed(versions))?;
                tracing::info!(workflow = %self.token, count = next.versions.len(), "listed versions");
                Ok(Discovery::Versions(next.versions))
            }
            Stage::ReadyToSubmit if backup.family() == RuntimeFamily::Engine => {
                let report = probe_health(&self.exec, &infra_id, &state.chain).await;
                self.guard("probe health")?;
                let report = report?;
                if !report.health.allows_listing() {
                    tracing::info!(workflow = %self.token, health = %report.health, "agent cannot list containers");
                    return Ok(Discovery::ListingUnavailable(report.health));
                }

                let request =
                    ExecRequest::new(infra_id, state.chain.clone(), Operation::ListContainers)
                        .with_params(backup_params(backup));
                let reply = self.exec.execute(request).await;
                self.guard("list containers")?;
                let entries = parse_containers(&reply?);
                let names = entries.iter().map(|e| e.name.clone()).collect();
                self.commit(WorkflowEvent::ContainersListed(names))?;
                tracing::info!(workflow = %self.token, count = entries.len(), "listed containers");
                Ok(Discovery::Containers(entries))
            }
            _ => Ok(Discovery::NotApplicable),
        }
    }

    /// Apply a caller-driven event such as a version pick or new restore
    /// options. Credentials and submission go through
    /// [`authenticate`](Self::authenticate) and [`submit`](Self::submit).
    pub fn advance(&self, event: WorkflowEvent) -> Result<WorkflowState, WorkflowError> {
        match event {
            WorkflowEvent::CredentialsAccepted(_)
            | WorkflowEvent::SubmissionStarted
            | WorkflowEvent::SubmissionAccepted
            | WorkflowEvent::SubmissionFailed(_) => Err(WorkflowError::InvalidTransition {
                stage: self.stage(),
                event: event.label(),
            }),
            WorkflowEvent::Cancel => self.cancel(),
            other => self.commit(other),
        }
    }

    /// Validate and send the single submission call.
    ///
    /// A failed gate returns before any remote call. A rejected call moves
    /// the workflow to `Failed`.
    pub async fn submit(&self) -> Result<WorkflowState, WorkflowError> {
        let plan = {
            let shared = self.shared.lock();
            if shared.live.as_ref() != Some(&self.token) {
                return Err(WorkflowError::Discarded);
            }
            submission_plan(&shared.state)?
        };
        let params = serde_json::to_value(&plan.params)
            .map_err(|e| ExternalFailure::Malformed(format!("submission params: {}", e)))?;

        let submitted = self.commit(WorkflowEvent::SubmissionStarted)?;
        tracing::info!(
            workflow = %self.token,
            infra = %plan.infra_id,
            operation = %plan.operation,
            "submitting"
        );

        let request = ExecRequest::new(plan.infra_id.clone(), submitted.chain.clone(), plan.operation)
            .with_params(params);
        let reply = self.exec.execute(request).await;
        self.guard("submit")?;

        match reply {
            Ok(_) => {
                let next = self.commit(WorkflowEvent::SubmissionAccepted)?;
                remember_credentials(&self.store, &next.chain).await;
                tracing::info!(workflow = %self.token, operation = %plan.operation, "submission accepted");
                Ok(next)
            }
            Err(e) => {
                let failure = ExternalFailure::from(e);
                tracing::warn!(workflow = %self.token, error = %failure, "submission failed");
                self.commit(WorkflowEvent::SubmissionFailed(failure.to_string()))?;
                Err(failure.into())
            }
        }
    }

    /// Cancel the workflow. Responses still in flight are discarded.
    pub fn cancel(&self) -> Result<WorkflowState, WorkflowError> {
        let mut shared = self.shared.lock();
        let next = shared.state.advance(WorkflowEvent::Cancel)?;
        shared.state = next.clone();
        shared.live = None;
        tracing::info!(workflow = %self.token, "workflow cancelled");
        Ok(next)
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
