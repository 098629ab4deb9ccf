// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hk_core::test_support::restore_of;
use hk_core::{EngineRestoreOptions, RestoreStatus};

fn restores() -> Vec<RestoreRecord> {
    vec![
        restore_of("rs-alpha1", "bk-1", RestoreStatus::Completed, 10),
        restore_of("rs-alpha2", "bk-1", RestoreStatus::Failed, 20),
        restore_of("rs-beta", "bk-2", RestoreStatus::Pending, 30),
    ]
}

#[test]
fn restores_are_found_by_prefix() {
    let all = restores();
    assert_eq!(find_restore(&all, "rs-beta").unwrap().backup_id, "bk-2");
    assert_eq!(find_restore(&all, "rs-b").unwrap().id, "rs-beta");
}

#[test]
fn ambiguous_or_unknown_prefix_is_an_error() {
    let all = restores();

    let ambiguous = find_restore(&all, "rs-alpha").unwrap_err().to_string();
    let unknown = find_restore(&all, "rs-gamma").unwrap_err().to_string();

    assert!(ambiguous.contains("ambiguous"), "{ambiguous}");
    assert!(unknown.contains("not found"), "{unknown}");
}

#[test]
fn options_describe_what_is_restored() {
    let selected = EngineRestoreOptions::default().containers(vec!["web".to_string(), "db".to_string()]);

    assert_eq!(describe_options(&RestoreOptions::Engine(selected)), "db, web");
    assert_eq!(describe_options(&RestoreOptions::Engine(EngineRestoreOptions::default())), "Full scope");
    assert_eq!(
        describe_options(&RestoreOptions::Orchestrated { target_namespace: Some("copy".into()) }),
        "into copy"
    );
}
