// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk resolve` credential chains.

use crate::prelude::*;

#[test]
fn cached_first_hop_leaves_the_chain_incomplete() {
    let temp = Project::empty();
    temp.config(&config_with_runner(std::path::Path::new("/bin/false")));

    let out = temp.hk().args(&["-o", "json", "resolve", "--infra", "inf-edge"]).passes().json();

    assert_eq!(out["complete"], false);
    assert_eq!(out["slots"][0]["username"], "ops");
    assert_eq!(out["slots"][0]["complete"], true);
    assert_eq!(out["slots"][1]["host"], "edge-01");
    assert_eq!(out["slots"][1]["complete"], false);
    assert!(!out.to_string().contains("secret"));
}

#[test]
fn check_exits_with_missing_input_code() {
    let temp = Project::empty();
    temp.config(&config_with_runner(std::path::Path::new("/bin/false")));

    temp.hk()
        .args(&["resolve", "--infra", "inf-edge", "--check"])
        .exits(2)
        .stderr_has("hop");
}

#[test]
fn overrides_complete_the_chain() {
    let temp = Project::empty();
    temp.config(&config_with_runner(std::path::Path::new("/bin/false")));

    temp.hk()
        .args(&["resolve", "--infra", "inf-edge", "--check", "--cred", ":", "--cred", "root:pw"])
        .passes()
        .stdout_has("edge-01:22")
        .stdout_lacks("pw");
}

#[test]
fn unknown_infra_fails() {
    let temp = Project::empty();
    temp.config(&config_with_runner(std::path::Path::new("/bin/false")));

    temp.hk().args(&["resolve", "--infra", "inf-nope"]).fails().stderr_has("inf-nope");
}
