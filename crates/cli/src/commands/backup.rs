// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk backup` - Start a backup on one infrastructure

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use hk_adapters::RecordStore;
use hk_core::{BackupId, BackupKind, BackupRecord, BackupStatus, RuntimeFamily, ScopeSelector};
use hk_engine::{Workflow, WorkflowIntent};

use super::{ensure_authenticated, parse_cred, save_records, Context};
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, now_ms};

#[derive(Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(Subcommand)]
pub enum BackupCommand {
    /// Submit a new backup
    Create(CreateArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    /// Infrastructure id from the config
    #[arg(long)]
    pub infra: String,
    /// Backup name
    #[arg(long)]
    pub name: String,
    /// Cluster namespace to back up (orchestrated infrastructures)
    #[arg(long, conflicts_with_all = ["containers", "compose_project"])]
    pub namespace: Option<String>,
    /// Container to include (engine hosts; repeatable, none means the whole host)
    #[arg(long = "container")]
    pub containers: Vec<String>,
    /// Compose project the containers belong to (engine hosts)
    #[arg(long)]
    pub compose_project: Option<String>,
    /// Register a recurring backup instead of a one-off snapshot
    #[arg(long)]
    pub scheduled: bool,
    #[arg(long = "cred", value_name = "USER:PASS", value_parser = parse_cred)]
    pub creds: Vec<(String, String)>,
}

/// Scope from the flags, checked against the infrastructure's family.
pub fn scope_for(family: RuntimeFamily, args: &CreateArgs) -> Result<ScopeSelector> {
    match family {
        RuntimeFamily::Orchestrated => {
            if !args.containers.is_empty() || args.compose_project.is_some() {
                bail!("--container and --compose-project apply to engine hosts");
            }
            Ok(ScopeSelector::namespace(args.namespace.clone().unwrap_or_default()))
        }
        RuntimeFamily::Engine => {
            if args.namespace.is_some() {
                bail!("--namespace applies to orchestrated infrastructures");
            }
            Ok(ScopeSelector::Engine {
                containers: args.containers.clone(),
                compose_project: args.compose_project.clone(),
            })
        }
    }
}

pub async fn handle(command: BackupCommand, ctx: &Context) -> Result<()> {
    match command {
        BackupCommand::Create(args) => create(args, ctx).await,
    }
}

async fn create(args: CreateArgs, ctx: &Context) -> Result<()> {
    let infra = ctx.config.infra(&args.infra)?;
    let scope = scope_for(infra.family, &args)?;
    // Fail on a missing records file before anything is submitted
    let (records, path) = ctx.records()?;
    let kind = if args.scheduled { BackupKind::Scheduled } else { BackupKind::Immediate };

    let intent = WorkflowIntent::CreateBackup {
        infra_id: infra.id.clone(),
        name: args.name.clone(),
        kind,
        scope: scope.clone(),
        storage_link: infra.storage_link.clone(),
    };
    let workflow =
        Workflow::new(ctx.exec()?, ctx.credential_store(), intent, infra.hops.clone()).await;
    tracing::info!(workflow = %workflow.token(), infra = %infra.id, name = %args.name, "creating backup");

    ensure_authenticated(&workflow, &infra.hops, &args.creds).await?;
    let state = workflow.submit().await.map_err(ExitError::from)?;

    let record = BackupRecord {
        id: BackupId::new(),
        name: args.name,
        infra_id: infra.id.clone(),
        infra_name: infra.display_name().to_string(),
        status: BackupStatus::Creating,
        created_at_ms: now_ms(),
        completed_at_ms: None,
        size_bytes: None,
        kind,
        scope,
        error_message: None,
    };
    records.put_backup(record.clone()).await?;
    save_records(&path, &records.snapshot())?;

    format_or_json(ctx.format, &record, || {
        println!(
            "Backup {} {} on {} ({})",
            record.id,
            color::status(&state.stage.to_string()),
            infra.display_name(),
            record.kind
        );
        println!("{}", color::muted(&format!("hk backups wait {}", record.id)));
    })
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
