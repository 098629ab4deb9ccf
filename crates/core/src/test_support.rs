// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    BackupRecord, BackupStatus, Credential, HopSpec, ProbeResult, RestoreRecord, RestoreStatus,
    ScopeSelector,
};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for hop chains, probes and records.
pub mod strategies {
    use crate::{
        BackupRecord, BackupStatus, Credential, CredentialChain, HopSpec, ProbeResult,
        ScopeSelector,
    };
    use proptest::prelude::*;

    fn arb_host() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[a-c][0-9]".prop_map(String::from)]
    }

    fn arb_field() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[a-z]{1,6}".prop_map(String::from)]
    }

    pub fn arb_hops() -> impl Strategy<Value = Vec<HopSpec>> {
        prop::collection::vec(
            (arb_host(), prop_oneof![Just(22u16), Just(2222u16)])
                .prop_map(|(host, port)| HopSpec::new(host, port)),
            0..5,
        )
    }

    pub fn arb_credential() -> impl Strategy<Value = Credential> {
        (arb_host(), prop_oneof![Just(22u16), Just(2222u16)], arb_field(), arb_field())
            .prop_map(|(host, port, user, pass)| Credential::new(host, port, user, pass))
    }

    /// Override lists may be shorter or longer than the hop list.
    pub fn arb_overrides() -> impl Strategy<Value = Vec<Credential>> {
        prop::collection::vec(arb_credential(), 0..6)
    }

    pub fn arb_chain() -> impl Strategy<Value = CredentialChain> {
        prop::collection::vec(arb_credential(), 0..5).prop_map(CredentialChain::new)
    }

    /// Probe fields drawn from the values derivation distinguishes.
    pub fn arb_probe_result() -> impl Strategy<Value = ProbeResult> {
        let version = prop_oneof![
            Just(None),
            Just(Some("not installed".to_string())),
            Just(Some("1.2".to_string())),
        ];
        let service = prop_oneof![
            Just(None),
            Just(Some("running".to_string())),
            Just(Some("stopped".to_string())),
            Just(Some("other".to_string())),
        ];
        let daemon = prop_oneof![
            Just(None),
            Just(Some("normal".to_string())),
            Just(Some("abnormal".to_string())),
            Just(Some("other".to_string())),
        ];
        (version, service, daemon).prop_map(|(version, service_status, daemon_status)| {
            ProbeResult { version, service_status, daemon_status, engine: None }
        })
    }

    pub fn arb_backup_status() -> impl Strategy<Value = BackupStatus> {
        prop_oneof![
            Just(BackupStatus::Creating),
            Just(BackupStatus::Completed),
            Just(BackupStatus::Failed),
            Just(BackupStatus::Restoring),
            Just(BackupStatus::Deleted),
            Just(BackupStatus::PartiallyFailed),
        ]
    }

    /// Engine backups over a small container pool so groups collide.
    pub fn arb_engine_backups() -> impl Strategy<Value = Vec<BackupRecord>> {
        prop::collection::vec(
            (
                prop::sample::subsequence(vec!["api", "db", "web", "cache"], 0..=4),
                arb_backup_status(),
                0u64..1_000,
                prop_oneof![Just("inf-a"), Just("inf-b")],
            ),
            0..12,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (mut containers, status, created, infra))| {
                    containers.reverse();
                    BackupRecord::builder()
                        .id(format!("bk-{i}"))
                        .infra_id(infra)
                        .infra_name(infra)
                        .status(status)
                        .created_at_ms(created)
                        .scope(ScopeSelector::containers(containers))
                        .build()
                })
                .collect()
        })
    }
}

// ── Record factory functions ────────────────────────────────────────────

pub fn hops(hosts: &[&str]) -> Vec<HopSpec> {
    hosts.iter().map(|h| HopSpec::new(*h, 22)).collect()
}

pub fn filled(host: &str, user: &str, pass: &str) -> Credential {
    Credential::new(host, 22, user, pass)
}

pub fn engine_backup(id: &str, infra: &str, containers: &[&str], created_at_ms: u64) -> BackupRecord {
    BackupRecord::builder()
        .id(id)
        .infra_id(infra)
        .infra_name(infra)
        .created_at_ms(created_at_ms)
        .scope(ScopeSelector::containers(containers.iter().copied()))
        .build()
}

pub fn cluster_backup(id: &str, infra: &str, namespace: &str, created_at_ms: u64) -> BackupRecord {
    BackupRecord::builder()
        .id(id)
        .infra_id(infra)
        .infra_name(infra)
        .created_at_ms(created_at_ms)
        .scope(ScopeSelector::namespace(namespace))
        .build()
}

pub fn with_status(mut record: BackupRecord, status: BackupStatus) -> BackupRecord {
    record.status = status;
    record
}

pub fn restore_of(id: &str, backup: &str, status: RestoreStatus, created_at_ms: u64) -> RestoreRecord {
    RestoreRecord::builder()
        .id(id)
        .backup_id(backup)
        .status(status)
        .created_at_ms(created_at_ms)
        .build()
}

pub fn probe(version: Option<&str>, service: Option<&str>, daemon: Option<&str>) -> ProbeResult {
    ProbeResult {
        version: version.map(String::from),
        service_status: service.map(String::from),
        daemon_status: daemon.map(String::from),
        engine: None,
    }
}
