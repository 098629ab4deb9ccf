// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk containers` / `hk images` listing parsers.

use crate::prelude::*;

#[test]
fn text_listing_renders_a_table() {
    let temp = Project::empty();
    let listing = temp.file(
        "ps.txt",
        "abc123 web nginx:1.25 Up 2 hours\ndef456 db postgres:16 Exited (0) 3 days ago\n",
    );

    temp.hk()
        .args(&["containers", "--from-file", listing.to_str().unwrap()])
        .passes()
        .stdout_has("NAME")
        .stdout_has("web")
        .stdout_has("running")
        .stdout_has("exited");
}

#[test]
fn json_listing_keeps_status_text() {
    let temp = Project::empty();
    let listing = temp.file(
        "ps.json",
        r#"{"containers": [{"ID": "abc", "Names": "web", "Image": "nginx", "Status": "Up 5 minutes"}]}"#,
    );

    let out = temp
        .hk()
        .args(&["-o", "json", "containers", "--from-file", listing.to_str().unwrap()])
        .passes()
        .json();

    assert_eq!(out[0]["name"], "web");
    assert_eq!(out[0]["status"], "Up 5 minutes");
}

#[test]
fn empty_listing_says_so() {
    let temp = Project::empty();
    let listing = temp.file("ps.txt", "\n");

    temp.hk()
        .args(&["containers", "--from-file", listing.to_str().unwrap()])
        .passes()
        .stdout_eq("No containers\n");
}

#[test]
fn image_listing_is_positional() {
    let temp = Project::empty();
    let listing = temp.file("images.txt", "nginx 1.25 sha256abc 187MB\n");

    temp.hk()
        .args(&["images", "--from-file", listing.to_str().unwrap()])
        .passes()
        .stdout_has("REPOSITORY")
        .stdout_has("nginx")
        .stdout_has("187MB");
}
