// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral specs for the `hk` binary.
//!
//! Each spec runs the built binary in a temp project with its own config,
//! record file and, where a remote is needed, a shell-script runner.

#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

mod prelude;

mod cli {
    mod agent;
    mod help;
    mod listing;
    mod resolve;
}

mod records {
    mod delete;
    mod groups;
    mod list;
}

mod workflow {
    mod backup;
    mod restore;
}
