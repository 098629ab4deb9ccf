// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow error taxonomy.
//!
//! Every blocked transition carries a reason. [`WorkflowError::category`]
//! tells a caller which remediation applies: supply more input, fix what
//! the remote side refused, or wait for the remote side to come back.

use crate::workflow::Stage;
use hk_adapters::ExecError;
use hk_core::InfraId;
use thiserror::Error;

/// A requirement that must hold before a workflow can submit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("no external storage link configured for {0}")]
    MissingStorageLink(InfraId),
    #[error("restore scope is `selected` but no containers are selected")]
    EmptyContainerSelection,
    #[error("no backup version selected")]
    NoVersionSelected,
    #[error("version {0} is not among the listed versions")]
    UnknownVersion(String),
    #[error("backup target namespace is empty")]
    EmptyNamespace,
    #[error("restore options are for {got} but the backup is {expected}")]
    FamilyMismatch { expected: hk_core::RuntimeFamily, got: hk_core::RuntimeFamily },
}

/// Failure reported by, or on the way to, the remote system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalFailure {
    #[error("rejected by remote system: {0}")]
    Rejected(String),
    #[error("remote system unreachable: {0}")]
    Unreachable(String),
    #[error("unreadable reply from remote system: {0}")]
    Malformed(String),
}

impl From<ExecError> for ExternalFailure {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::Rejected(m) => ExternalFailure::Rejected(m),
            ExecError::Unreachable(m) => ExternalFailure::Unreachable(m),
            ExecError::Malformed(m) => ExternalFailure::Malformed(m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("credentials incomplete for hop(s) {}", join_indices(missing))]
    IncompleteCredentials { missing: Vec<usize> },
    #[error("precondition failed: {0}")]
    PreconditionFailed(Precondition),
    #[error(transparent)]
    External(#[from] ExternalFailure),
    #[error("cannot {event} while {stage}")]
    InvalidTransition { stage: Stage, event: &'static str },
    #[error("workflow was cancelled; result discarded")]
    Discarded,
}

impl From<ExecError> for WorkflowError {
    fn from(e: ExecError) -> Self {
        WorkflowError::External(e.into())
    }
}

impl From<Precondition> for WorkflowError {
    fn from(p: Precondition) -> Self {
        WorkflowError::PreconditionFailed(p)
    }
}

fn join_indices(missing: &[usize]) -> String {
    missing.iter().map(|i| (i + 1).to_string()).collect::<Vec<_>>().join(", ")
}

/// What the caller has to do about an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Collect more input and retry.
    MissingInput,
    /// The remote system refused or answered nonsense.
    Rejected,
    /// The remote system could not be reached.
    Unreachable,
    /// The workflow is not in a state that allows the action.
    InvalidState,
}

hk_core::simple_display! {
    ErrorCategory {
        MissingInput => "missing input",
        Rejected => "rejected by remote system",
        Unreachable => "remote system unreachable",
        InvalidState => "invalid state",
    }
}

impl WorkflowError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WorkflowError::IncompleteCredentials { .. } | WorkflowError::PreconditionFailed(_) => {
                ErrorCategory::MissingInput
            }
            WorkflowError::External(ExternalFailure::Unreachable(_)) => ErrorCategory::Unreachable,
            WorkflowError::External(_) => ErrorCategory::Rejected,
            WorkflowError::InvalidTransition { .. } | WorkflowError::Discarded => {
                ErrorCategory::InvalidState
            }
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
