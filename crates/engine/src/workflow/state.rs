// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure workflow state and transitions.
//!
//! [`WorkflowState`] is an immutable value. [`WorkflowState::advance`]
//! returns the next value or the reason the event was refused; the caller
//! keeps whichever state it holds when a transition fails.

use crate::error::{Precondition, WorkflowError};
use hk_adapters::Operation;
use hk_core::{
    BackupId, BackupKind, BackupRecord, BackupVersion, CredentialChain, EngineRestoreOptions,
    HopSpec, InfraId, RestoreOptions, RestoreScope, RuntimeFamily, ScopeSelector,
};
use serde::{Deserialize, Serialize};

/// What a workflow is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WorkflowIntent {
    CreateBackup {
        infra_id: InfraId,
        name: String,
        #[serde(default)]
        kind: BackupKind,
        scope: ScopeSelector,
        /// External storage the engine host uploads to. Required for engine backups.
        #[serde(default)]
        storage_link: Option<String>,
    },
    Restore {
        backup: BackupRecord,
    },
}

impl WorkflowIntent {
    pub fn family(&self) -> RuntimeFamily {
        match self {
            WorkflowIntent::CreateBackup { scope, .. } => scope.family(),
            WorkflowIntent::Restore { backup } => backup.family(),
        }
    }

    pub fn kind(&self) -> BackupKind {
        match self {
            WorkflowIntent::CreateBackup { kind, .. } => *kind,
            WorkflowIntent::Restore { backup } => backup.kind,
        }
    }

    pub fn infra_id(&self) -> &InfraId {
        match self {
            WorkflowIntent::CreateBackup { infra_id, .. } => infra_id,
            WorkflowIntent::Restore { backup } => &backup.infra_id,
        }
    }

    pub fn is_restore(&self) -> bool {
        matches!(self, WorkflowIntent::Restore { .. })
    }

    /// Only scheduled cluster backups have several versions to pick from.
    pub fn needs_version_selection(&self) -> bool {
        self.is_restore()
            && self.family() == RuntimeFamily::Orchestrated
            && self.kind() == BackupKind::Scheduled
    }

    fn default_restore_options(&self) -> Option<RestoreOptions> {
        match self {
            WorkflowIntent::Restore { backup } => Some(restore_defaults(backup.family())),
            WorkflowIntent::CreateBackup { .. } => None,
        }
    }
}

fn restore_defaults(family: RuntimeFamily) -> RestoreOptions {
    match family {
        RuntimeFamily::Orchestrated => RestoreOptions::Orchestrated { target_namespace: None },
        RuntimeFamily::Engine => RestoreOptions::Engine(EngineRestoreOptions::default()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NeedsAuth,
    VersionSelection,
    ReadyToSubmit,
    Submitted,
    Succeeded,
    Failed,
    Cancelled,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Succeeded | Stage::Failed | Stage::Cancelled)
    }

    pub(crate) fn before_submit(self) -> bool {
        matches!(self, Stage::NeedsAuth | Stage::VersionSelection | Stage::ReadyToSubmit)
    }
}

hk_core::simple_display! {
    Stage {
        NeedsAuth => "needs_auth",
        VersionSelection => "version_selection",
        ReadyToSubmit => "ready_to_submit",
        Submitted => "submitted",
        Succeeded => "succeeded",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// Inputs that move a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// A complete chain was accepted by the remote side.
    CredentialsAccepted(CredentialChain),
    VersionsListed(Vec<BackupVersion>),
    VersionSelected(String),
    /// Containers captured by the engine backup being restored.
    ContainersListed(Vec<String>),
    RestoreOptionsChanged(RestoreOptions),
    SubmissionStarted,
    SubmissionAccepted,
    SubmissionFailed(String),
    Cancel,
}

impl WorkflowEvent {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            WorkflowEvent::CredentialsAccepted(_) => "accept credentials",
            WorkflowEvent::VersionsListed(_) => "list versions",
            WorkflowEvent::VersionSelected(_) => "select a version",
            WorkflowEvent::ContainersListed(_) => "list containers",
            WorkflowEvent::RestoreOptionsChanged(_) => "change restore options",
            WorkflowEvent::SubmissionStarted => "submit",
            WorkflowEvent::SubmissionAccepted => "accept a submission",
            WorkflowEvent::SubmissionFailed(_) => "fail a submission",
            WorkflowEvent::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    pub intent: WorkflowIntent,
    pub hops: Vec<HopSpec>,
    pub chain: CredentialChain,
    pub stage: Stage,
    /// Versions offered for selection, newest first.
    pub versions: Vec<BackupVersion>,
    pub selected_version: Option<BackupVersion>,
    /// Containers the caller may narrow an engine restore to, once listed.
    pub available_containers: Option<Vec<String>>,
    pub restore_options: Option<RestoreOptions>,
    /// Reason recorded when the submission failed.
    pub failure: Option<String>,
}

impl WorkflowState {
    /// Start a workflow. A complete chain skips authentication.
    pub fn new(intent: WorkflowIntent, hops: Vec<HopSpec>, chain: CredentialChain) -> Self {
        let mut state = WorkflowState {
            restore_options: intent.default_restore_options(),
            intent,
            hops,
            chain: CredentialChain::default(),
            stage: Stage::NeedsAuth,
            versions: Vec::new(),
            selected_version: None,
            available_containers: None,
            failure: None,
        };
        if let WorkflowIntent::Restore { backup } = &state.intent {
            if !state.intent.needs_version_selection() {
                // The backup is its own single version
                let own = backup.own_version();
                state.versions = vec![own.clone()];
                state.selected_version = Some(own);
            }
        }
        if missing_slots(&state.hops, &chain).is_empty() {
            state.stage = state.after_auth();
        }
        state.chain = chain;
        state
    }

    fn after_auth(&self) -> Stage {
        if self.intent.needs_version_selection() {
            Stage::VersionSelection
        } else {
            Stage::ReadyToSubmit
        }
    }

    fn invalid(&self, event: &'static str) -> WorkflowError {
        WorkflowError::InvalidTransition { stage: self.stage, event }
    }

    fn is_engine_restore(&self) -> bool {
        self.intent.is_restore() && self.intent.family() == RuntimeFamily::Engine
    }

    /// Apply `event`, returning the next state.
    pub fn advance(&self, event: WorkflowEvent) -> Result<WorkflowState, WorkflowError> {
        let label = event.label();
        if self.stage.is_terminal() {
            return Err(self.invalid(label));
        }

        let mut next = self.clone();
        match (self.stage, event) {
            (stage, WorkflowEvent::CredentialsAccepted(chain)) if stage.before_submit() => {
                let missing = missing_slots(&self.hops, &chain);
                if !missing.is_empty() {
                    return Err(WorkflowError::IncompleteCredentials { missing });
                }
                next.chain = chain;
                if stage == Stage::NeedsAuth {
                    next.stage = self.after_auth();
                }
            }
            (Stage::VersionSelection, WorkflowEvent::VersionsListed(mut versions)) => {
                versions.sort_by(|a, b| {
                    b.created_at_ms.cmp(&a.created_at_ms).then_with(|| a.name.cmp(&b.name))
                });
                next.versions = versions;
                next.selected_version = None;
            }
            (Stage::VersionSelection, WorkflowEvent::VersionSelected(name)) => {
                let version = self
                    .versions
                    .iter()
                    .find(|v| v.name == name)
                    .cloned()
                    .ok_or(Precondition::UnknownVersion(name))?;
                next.selected_version = Some(version);
                next.stage = Stage::ReadyToSubmit;
            }
            (Stage::ReadyToSubmit, WorkflowEvent::ContainersListed(names))
                if self.is_engine_restore() =>
            {
                next.available_containers = Some(names);
            }
            (stage, WorkflowEvent::RestoreOptionsChanged(options))
                if stage.before_submit() && self.intent.is_restore() =>
            {
                let expected = self.intent.family();
                if options.family() != expected {
                    return Err(Precondition::FamilyMismatch { expected, got: options.family() }.into());
                }
                next.restore_options = Some(options);
            }
            (Stage::ReadyToSubmit, WorkflowEvent::SubmissionStarted) => {
                submission_plan(self)?;
                next.stage = Stage::Submitted;
            }
            (Stage::Submitted, WorkflowEvent::SubmissionAccepted) => {
                next.stage = Stage::Succeeded;
            }
            (Stage::Submitted, WorkflowEvent::SubmissionFailed(reason)) => {
                next.stage = Stage::Failed;
                next.failure = Some(reason);
            }
            (_, WorkflowEvent::Cancel) => {
                next.stage = Stage::Cancelled;
            }
            _ => return Err(self.invalid(label)),
        }
        Ok(next)
    }
}

/// Indices of hops whose slot is absent, for another host, or unfilled.
pub(crate) fn missing_slots(hops: &[HopSpec], chain: &CredentialChain) -> Vec<usize> {
    hops.iter()
        .enumerate()
        .filter(|(i, hop)| !chain.get(*i).is_some_and(|c| c.host == hop.host && c.is_filled()))
        .map(|(i, _)| i)
        .collect()
}

/// Parameters of the single submission call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubmitParams {
    Backup {
        name: String,
        kind: BackupKind,
        scope: ScopeSelector,
        #[serde(skip_serializing_if = "Option::is_none")]
        storage_link: Option<String>,
    },
    Restore {
        backup_id: BackupId,
        backup_name: String,
        version: String,
        options: RestoreOptions,
    },
}

/// A validated submission, ready to hand to the execution layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub infra_id: InfraId,
    pub operation: Operation,
    pub params: SubmitParams,
}

/// Check every submission gate and build the call. Performs no I/O.
pub fn submission_plan(state: &WorkflowState) -> Result<Submission, WorkflowError> {
    if state.stage != Stage::ReadyToSubmit {
        return Err(state.invalid("submit"));
    }
    let missing = missing_slots(&state.hops, &state.chain);
    if !missing.is_empty() {
        return Err(WorkflowError::IncompleteCredentials { missing });
    }

    match &state.intent {
        WorkflowIntent::CreateBackup { infra_id, name, kind, scope, storage_link } => {
            match scope {
                ScopeSelector::Orchestrated { namespace } if namespace.trim().is_empty() => {
                    return Err(Precondition::EmptyNamespace.into());
                }
                ScopeSelector::Engine { .. }
                    if storage_link.as_deref().is_none_or(|l| l.trim().is_empty()) =>
                {
                    return Err(Precondition::MissingStorageLink(infra_id.clone()).into());
                }
                _ => {}
            }
            Ok(Submission {
                infra_id: infra_id.clone(),
                operation: Operation::CreateBackup,
                params: SubmitParams::Backup {
                    name: name.clone(),
                    kind: *kind,
                    scope: scope.clone(),
                    storage_link: storage_link.clone(),
                },
            })
        }
        WorkflowIntent::Restore { backup } => {
            let version = state.selected_version.as_ref().ok_or(Precondition::NoVersionSelected)?;
            let options =
                state.restore_options.clone().unwrap_or_else(|| restore_defaults(backup.family()));
            if options.family() != backup.family() {
                return Err(Precondition::FamilyMismatch {
                    expected: backup.family(),
                    got: options.family(),
                }
                .into());
            }
            if let RestoreOptions::Engine(engine) = &options {
                let nothing_selected = engine.containers.as_ref().is_none_or(Vec::is_empty);
                if engine.restore_scope == RestoreScope::Selected && nothing_selected {
                    return Err(Precondition::EmptyContainerSelection.into());
                }
            }
            Ok(Submission {
                infra_id: backup.infra_id.clone(),
                operation: Operation::Restore,
                params: SubmitParams::Restore {
                    backup_id: backup.id.clone(),
                    backup_name: backup.name.clone(),
                    version: version.name.clone(),
                    options,
                },
            })
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
