// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn debug_redacts_password() {
    let cred = Credential::new("bastion", 22, "ops", "hunter2");
    let debug = format!("{:?}", cred);
    assert!(debug.contains("ops"));
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn hop_port_defaults_to_ssh() {
    let hop: HopSpec = serde_json::from_str(r#"{"host": "h1"}"#).unwrap();
    assert_eq!(hop, HopSpec::new("h1", 22));
    assert_eq!(hop.to_string(), "h1:22");
}

#[test]
fn empty_for_copies_identity_only() {
    let cred = Credential::empty_for(&HopSpec::new("h2", 2222));
    assert_eq!(cred.host, "h2");
    assert_eq!(cred.port, 2222);
    assert!(!cred.is_filled());
}

#[test]
fn missing_lists_incomplete_slots() {
    let chain = CredentialChain::new(vec![
        Credential::new("h1", 22, "a", "p"),
        Credential::new("h2", 22, "b", ""),
        Credential::new("h3", 22, "", "p"),
    ]);
    assert!(!chain.is_complete());
    assert_eq!(chain.missing(), vec![1, 2]);
}

#[test]
fn empty_chain_is_complete() {
    assert!(CredentialChain::default().is_complete());
}

#[test]
fn aligned_with_checks_length_and_hosts() {
    let hops = vec![HopSpec::new("h1", 22), HopSpec::new("h2", 22)];
    let chain = CredentialChain::new(vec![Credential::empty_for(&hops[0])]);
    assert!(!chain.aligned_with(&hops));
    let chain = CredentialChain::new(hops.iter().map(Credential::empty_for).collect());
    assert!(chain.aligned_with(&hops));
}
