// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the external systems hopkeep talks to.
//!
//! Each seam is an `async_trait` with one production implementation and a
//! fake behind the `test-support` feature.

pub mod credential;
pub mod exec;
pub mod records;

pub use credential::{CredentialStore, MemoryCredentialStore, StoreError};
pub use exec::{
    ExecError, ExecRequest, ExecutionAdapter, FailureKind, Operation, ProcessExecutionAdapter,
    RunnerReply,
};
pub use records::{MemoryRecordStore, RecordError, RecordSnapshot, RecordStore};

#[cfg(any(test, feature = "test-support"))]
pub use credential::{CredentialCall, FakeCredentialStore};
#[cfg(any(test, feature = "test-support"))]
pub use exec::FakeExecutionAdapter;
