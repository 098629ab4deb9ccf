// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output.

use crate::prelude::*;

#[test]
fn hk_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn hk_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("agent")
        .stdout_has("backups")
        .stdout_has("restore")
        .stdout_has("resolve");
}

#[test]
fn hk_backups_help_shows_subcommands() {
    cli()
        .args(&["backups", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("groups")
        .stdout_has("wait")
        .stdout_has("delete");
}

#[test]
fn hk_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn hk_without_command_fails() {
    cli().fails().stderr_has("Usage:");
}
