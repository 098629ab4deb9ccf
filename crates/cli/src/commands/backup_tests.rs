// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn args() -> CreateArgs {
    CreateArgs {
        infra: "inf-edge".into(),
        name: "nightly".into(),
        namespace: None,
        containers: Vec::new(),
        compose_project: None,
        scheduled: false,
        creds: Vec::new(),
    }
}

#[test]
fn engine_scope_keeps_container_order() {
    let args = CreateArgs {
        containers: vec!["web".into(), "db".into()],
        compose_project: Some("shop".into()),
        ..args()
    };

    let scope = scope_for(RuntimeFamily::Engine, &args).unwrap();

    assert_eq!(
        scope,
        ScopeSelector::Engine {
            containers: vec!["web".into(), "db".into()],
            compose_project: Some("shop".into()),
        }
    );
}

#[test]
fn no_containers_means_whole_host() {
    let scope = scope_for(RuntimeFamily::Engine, &args()).unwrap();
    assert_eq!(scope, ScopeSelector::Engine { containers: Vec::new(), compose_project: None });
}

#[test]
fn namespace_scope_for_clusters() {
    let args = CreateArgs { namespace: Some("payments".into()), ..args() };
    assert_eq!(
        scope_for(RuntimeFamily::Orchestrated, &args).unwrap(),
        ScopeSelector::namespace("payments")
    );
}

#[test]
fn cluster_without_namespace_is_left_for_the_submission_gate() {
    let scope = scope_for(RuntimeFamily::Orchestrated, &args()).unwrap();
    assert_eq!(scope, ScopeSelector::namespace(""));
}

#[test]
fn flags_of_the_other_family_are_refused() {
    let engine_flags = CreateArgs { containers: vec!["web".into()], ..args() };
    let cluster_flags = CreateArgs { namespace: Some("payments".into()), ..args() };

    assert!(scope_for(RuntimeFamily::Orchestrated, &engine_flags).is_err());
    assert!(scope_for(RuntimeFamily::Engine, &cluster_flags).is_err());
}
