// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backup and restore workflows.
//!
//! ```text
//! NeedsAuth ──credentials──► VersionSelection ──select──► ReadyToSubmit ──submit──► Submitted
//!     │        (orchestrated scheduled restores only)          ▲                      │
//!     └──────────────────────── credentials ───────────────────┘          Succeeded ◄─┴─► Failed
//!
//! any non-terminal stage ──cancel──► Cancelled
//! ```

mod handle;
mod state;

pub use handle::{Discovery, Workflow, WorkflowToken};
pub use state::{
    submission_plan, Stage, Submission, SubmitParams, WorkflowEvent, WorkflowIntent, WorkflowState,
};
