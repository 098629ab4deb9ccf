// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk restore` - Restore a recorded backup

use anyhow::{anyhow, bail, Result};
use clap::Args;
use hk_adapters::RecordStore;
use hk_core::{
    BackupRecord, EngineRestoreOptions, RestoreId, RestoreOptions, RestoreRecord, RestoreScope,
    RestoreStatus, RuntimeFamily, RuntimeHealth,
};
use hk_engine::{Discovery, Precondition, Stage, Workflow, WorkflowError, WorkflowEvent, WorkflowIntent};

use super::{ensure_authenticated, parse_cred, save_records, Context};
use crate::color;
use crate::exit_error::{code, ExitError};
use crate::output::{format_or_json, now_ms};

#[derive(Args)]
pub struct RestoreArgs {
    /// Backup id or unique prefix
    pub backup: String,
    /// Version to restore (scheduled cluster backups; newest when omitted)
    #[arg(long)]
    pub version: Option<String>,
    /// Restore only these containers (engine hosts; repeatable)
    #[arg(long = "container")]
    pub containers: Vec<String>,
    /// Restore into another namespace (orchestrated infrastructures)
    #[arg(long)]
    pub target_namespace: Option<String>,
    /// Leave volumes untouched
    #[arg(long)]
    pub skip_volumes: bool,
    /// Leave container configuration untouched
    #[arg(long)]
    pub skip_config: bool,
    /// Do not redeploy restored containers
    #[arg(long)]
    pub no_redeploy: bool,
    /// Keep existing containers running during the restore
    #[arg(long)]
    pub keep_existing: bool,
    #[arg(long = "cred", value_name = "USER:PASS", value_parser = parse_cred)]
    pub creds: Vec<(String, String)>,
}

/// Restore options from the flags, checked against the backup's family.
pub fn restore_options(backup: &BackupRecord, args: &RestoreArgs) -> Result<RestoreOptions> {
    match backup.family() {
        RuntimeFamily::Orchestrated => {
            let engine_flags = !args.containers.is_empty()
                || args.skip_volumes
                || args.skip_config
                || args.no_redeploy
                || args.keep_existing;
            if engine_flags {
                bail!("{} is a cluster backup; container flags do not apply", backup.id);
            }
            Ok(RestoreOptions::Orchestrated { target_namespace: args.target_namespace.clone() })
        }
        RuntimeFamily::Engine => {
            if args.target_namespace.is_some() {
                bail!("{} is an engine backup; --target-namespace does not apply", backup.id);
            }
            let mut options = EngineRestoreOptions::default()
                .restore_volumes(!args.skip_volumes)
                .restore_config(!args.skip_config)
                .redeploy(!args.no_redeploy)
                .stop_existing(!args.keep_existing);
            if !args.containers.is_empty() {
                options = options
                    .restore_scope(RestoreScope::Selected)
                    .containers(args.containers.clone());
            }
            Ok(RestoreOptions::Engine(options))
        }
    }
}

/// Pick `requested`, or the newest listed version.
pub fn pick_version(listed: &[hk_core::BackupVersion], requested: Option<&str>) -> Option<String> {
    match requested {
        Some(name) => Some(name.to_string()),
        None => listed.first().map(|v| v.name.clone()),
    }
}

pub async fn handle(args: RestoreArgs, ctx: &Context) -> Result<()> {
    let (records, path) = ctx.records()?;
    let backup = records
        .get_backup(&args.backup)
        .await?
        .ok_or_else(|| anyhow!("backup not found: {}", args.backup))?;
    let infra = ctx.config.infra(&backup.infra_id)?;
    let options = restore_options(&backup, &args)?;

    let intent = WorkflowIntent::Restore { backup: backup.clone() };
    if args.version.is_some() && !intent.needs_version_selection() {
        bail!("{} has a single version; --version applies to scheduled cluster backups", backup.id);
    }
    let workflow =
        Workflow::new(ctx.exec()?, ctx.credential_store(), intent, infra.hops.clone()).await;
    tracing::info!(workflow = %workflow.token(), backup = %backup.id, "restoring backup");

    ensure_authenticated(&workflow, &infra.hops, &args.creds).await?;

    if workflow.stage() == Stage::VersionSelection {
        let versions = match workflow.discover().await.map_err(ExitError::from)? {
            Discovery::Versions(versions) => versions,
            _ => Vec::new(),
        };
        let Some(version) = pick_version(&versions, args.version.as_deref()) else {
            return Err(ExitError::from(WorkflowError::from(Precondition::NoVersionSelected)).into());
        };
        workflow.advance(WorkflowEvent::VersionSelected(version)).map_err(ExitError::from)?;
    }

    if !args.containers.is_empty() {
        check_containers(&workflow, &args.containers).await?;
    }

    workflow.advance(WorkflowEvent::RestoreOptionsChanged(options.clone())).map_err(ExitError::from)?;
    let state = workflow.submit().await.map_err(ExitError::from)?;

    let record = RestoreRecord {
        id: RestoreId::new(),
        backup_id: backup.id.clone(),
        status: RestoreStatus::Pending,
        created_at_ms: now_ms(),
        completed_at_ms: None,
        options,
        error_message: None,
    };
    records.put_restore(record.clone()).await?;
    save_records(&path, &records.snapshot())?;

    format_or_json(ctx.format, &record, || {
        let version = state.selected_version.as_ref().map(|v| v.name.as_str()).unwrap_or("-");
        println!(
            "Restore {} of {} ({}) {}",
            record.id,
            backup.name,
            version,
            color::status(&state.stage.to_string())
        );
        println!("{}", color::muted(&format!("hk restores wait {}", record.id)));
    })
}

/// Every requested container must be among those the host lists.
async fn check_containers<E, S>(workflow: &Workflow<E, S>, requested: &[String]) -> Result<()>
where
    E: hk_adapters::ExecutionAdapter,
    S: hk_adapters::CredentialStore,
{
    match workflow.discover().await.map_err(ExitError::from)? {
        Discovery::Containers(entries) => {
            let unknown: Vec<&str> = requested
                .iter()
                .filter(|name| !entries.iter().any(|e| &e.name == *name))
                .map(String::as_str)
                .collect();
            if !unknown.is_empty() {
                bail!("unknown container(s): {}", unknown.join(", "));
            }
            Ok(())
        }
        Discovery::ListingUnavailable(health) => unlisted_selection(health, requested),
        Discovery::Versions(_) | Discovery::NotApplicable => Ok(()),
    }
}

/// Decide whether a named selection may go ahead without a listing.
///
/// An agent in an unknown state may still be running, so the user's names
/// are trusted. A stopped or missing agent cannot restore containers.
pub fn unlisted_selection(health: RuntimeHealth, requested: &[String]) -> Result<()> {
    if health == RuntimeHealth::Unknown {
        tracing::warn!(containers = ?requested, "agent state unknown; restoring unverified selection");
        eprintln!(
            "{}",
            color::muted(&format!(
                "warning: agent state is unknown; restoring {} without checking it exists",
                requested.join(", ")
            ))
        );
        return Ok(());
    }
    Err(ExitError::new(code::FAILURE, format!("agent is {}; cannot list containers to restore", health))
        .into())
}

#[cfg(test)]
#[path = "restore_tests.rs"]
mod tests;
