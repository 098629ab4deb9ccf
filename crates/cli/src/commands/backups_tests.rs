// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hk_core::test_support::{cluster_backup, engine_backup, restore_of, with_status};
use hk_core::RestoreStatus;
use yare::parameterized;

#[parameterized(
    orchestrated = { "orchestrated", RuntimeFamily::Orchestrated },
    engine = { "engine", RuntimeFamily::Engine },
)]
fn family_values(raw: &str, expected: RuntimeFamily) {
    assert_eq!(parse_family(raw), Ok(expected));
}

#[test]
fn unknown_family_is_refused() {
    let err = parse_family("swarm").unwrap_err();
    assert!(err.contains("swarm"));
}

#[parameterized(
    completed = { "completed", BackupStatus::Completed },
    partial = { "partially_failed", BackupStatus::PartiallyFailed },
    creating = { "creating", BackupStatus::Creating },
)]
fn status_values(raw: &str, expected: BackupStatus) {
    assert_eq!(parse_status(raw), Ok(expected));
}

#[test]
fn groups_render_scopes_and_totals() {
    let backups = vec![
        engine_backup("bk-1", "inf-edge", &["web", "db"], 10),
        with_status(engine_backup("bk-2", "inf-edge", &["db", "web"], 20), BackupStatus::Failed),
        cluster_backup("bk-3", "inf-prod", "payments", 30),
    ];
    let restores = vec![
        restore_of("rs-1", "bk-1", RestoreStatus::Completed, 40),
        restore_of("rs-2", "bk-gone", RestoreStatus::Failed, 50),
    ];
    let view = aggregate(&backups, &restores);

    let mut out = Vec::new();
    render_groups(&view, &mut out);
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("db, web  1/2 completed, 1 failed, 1 restores"), "{text}");
    assert!(text.contains("payments  1/1 completed, 0 failed, 0 restores"), "{text}");
    assert!(text.contains("3 backups, 2 completed, 1 failed"), "{text}");
    assert!(text.contains("1 restores reference unknown backups"), "{text}");
}

#[test]
fn infra_filter_narrows_the_total() {
    let backups = vec![
        engine_backup("bk-1", "inf-edge", &["web"], 10),
        engine_backup("bk-2", "inf-edge", &["web"], 20),
        cluster_backup("bk-3", "inf-prod", "payments", 30),
    ];
    let view = aggregate(&backups, &[]).only_infra("inf-prod");

    let mut out = Vec::new();
    render_groups(&view, &mut out);
    let text = String::from_utf8(out).unwrap();

    assert!(!text.contains("inf-edge"), "{text}");
    assert!(text.contains("1 backups, 1 completed, 0 failed"), "{text}");
    assert!(!text.contains("3 backups"), "{text}");
}

#[test]
fn empty_view_says_so() {
    let view = aggregate(&[], &[]);
    let mut out = Vec::new();
    render_groups(&view, &mut out);
    assert_eq!(String::from_utf8(out).unwrap(), "No backups\n");
}

#[test]
fn describe_names_the_dispatch() {
    let cluster = DeleteTarget::Orchestrated {
        infra_id: InfraId::from("inf-prod"),
        backup_name: "nightly".into(),
    };
    let engine =
        DeleteTarget::Engine { infra_id: InfraId::from("inf-edge"), backup_id: BackupId::from("bk-9") };

    assert_eq!(describe(&cluster), "cluster backup nightly on inf-prod");
    assert_eq!(describe(&engine), "engine backup bk-9 on inf-edge");
}
