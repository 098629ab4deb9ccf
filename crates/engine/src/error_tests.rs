// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    incomplete = { WorkflowError::IncompleteCredentials { missing: vec![1] }, ErrorCategory::MissingInput },
    precondition = { Precondition::EmptyContainerSelection.into(), ErrorCategory::MissingInput },
    rejected = { ExecError::Rejected("denied".into()).into(), ErrorCategory::Rejected },
    malformed = { ExecError::Malformed("eof".into()).into(), ErrorCategory::Rejected },
    unreachable = { ExecError::Unreachable("timeout".into()).into(), ErrorCategory::Unreachable },
    transition = {
        WorkflowError::InvalidTransition { stage: Stage::Succeeded, event: "submit" },
        ErrorCategory::InvalidState
    },
    discarded = { WorkflowError::Discarded, ErrorCategory::InvalidState },
)]
fn categories(error: WorkflowError, expected: ErrorCategory) {
    assert_eq!(error.category(), expected);
}

#[test]
fn messages_name_the_missing_piece() {
    let incomplete = WorkflowError::IncompleteCredentials { missing: vec![0, 2] };
    assert_eq!(incomplete.to_string(), "credentials incomplete for hop(s) 1, 3");

    let link: WorkflowError = Precondition::MissingStorageLink(InfraId::from("inf-edge")).into();
    assert_eq!(
        link.to_string(),
        "precondition failed: no external storage link configured for inf-edge"
    );

    let transition = WorkflowError::InvalidTransition { stage: Stage::Cancelled, event: "submit" };
    assert_eq!(transition.to_string(), "cannot submit while cancelled");
}

#[test]
fn external_messages_distinguish_remediation() {
    let rejected: WorkflowError = ExecError::Rejected("bad password".into()).into();
    let unreachable: WorkflowError = ExecError::Unreachable("no route".into()).into();

    assert_eq!(rejected.to_string(), "rejected by remote system: bad password");
    assert_eq!(unreachable.to_string(), "remote system unreachable: no route");
}
