// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination. Workflow
//! errors map to a code per category so scripts can tell "needs input"
//! from "remote said no" from "remote is down".

use hk_engine::{ErrorCategory, WorkflowError};
use std::fmt;

pub mod code {
    pub const FAILURE: i32 = 1;
    pub const MISSING_INPUT: i32 = 2;
    pub const REJECTED: i32 = 3;
    pub const UNREACHABLE: i32 = 4;
    pub const INVALID_STATE: i32 = 5;
}

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<WorkflowError> for ExitError {
    fn from(err: WorkflowError) -> Self {
        let code = match err.category() {
            ErrorCategory::MissingInput => code::MISSING_INPUT,
            ErrorCategory::Rejected => code::REJECTED,
            ErrorCategory::Unreachable => code::UNREACHABLE,
            ErrorCategory::InvalidState => code::INVALID_STATE,
        };
        Self::new(code, err.to_string())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
