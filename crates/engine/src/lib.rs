// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hk-engine: drives backup and restore workflows against the adapters.
//!
//! The workflow itself is a pure state value advanced by events
//! ([`WorkflowState::advance`]); [`Workflow`] is the async handle that
//! performs the external calls and feeds their results back in.

pub mod agent;
pub mod error;
pub mod poll;
pub mod resolve;
pub mod workflow;

pub use agent::{install_agent, probe_health, uninstall_agent, AgentError, HealthReport};
pub use error::{ErrorCategory, ExternalFailure, Precondition, WorkflowError};
pub use poll::{poll_backup, poll_restore, poll_until, PollConfig, PollError, PollOutcome};
pub use resolve::{remember_credentials, resolve_credentials};
pub use workflow::{
    submission_plan, Discovery, Stage, Submission, Workflow, WorkflowEvent, WorkflowIntent,
    WorkflowState, WorkflowToken,
};
