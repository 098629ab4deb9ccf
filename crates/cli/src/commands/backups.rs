// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk backups` - Unified backup view, grouping, polling and deletion

use std::io::Write;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use hk_adapters::{ExecRequest, ExecutionAdapter, Operation, RecordStore};
use hk_core::{
    aggregate, format_bytes, plan_bulk_delete, AggregateView, BackupId, BackupStatus, DeleteTarget,
    InfraGroup, InfraId, InfraScopes, InfraSummary, RuntimeFamily, UnifiedFilter,
};
use hk_engine::{PollOutcome, WorkflowError};

use super::{chain_for, parse_cred, save_records, Context};
use crate::color;
use crate::exit_error::{code, ExitError};
use crate::output::{format_or_json, format_time_ago, format_timestamp, handle_list, now_ms};
use crate::table::{Column, Table};

#[derive(Args)]
pub struct BackupsArgs {
    #[command(subcommand)]
    pub command: BackupsCommand,
}

#[derive(Subcommand)]
pub enum BackupsCommand {
    /// List backups across all infrastructures, newest first
    List {
        /// Only this runtime family
        #[arg(long, value_parser = parse_family)]
        family: Option<RuntimeFamily>,
        /// Only this exact status
        #[arg(long, value_parser = parse_status)]
        status: Option<BackupStatus>,
        /// Only this infrastructure
        #[arg(long)]
        infra: Option<String>,
        /// Case-insensitive search over names, namespaces and containers
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Group backups by infrastructure and scope
    Groups {
        /// Only this infrastructure
        #[arg(long)]
        infra: Option<String>,
    },
    /// Show one backup (id or unique prefix)
    Show { id: String },
    /// Poll a running backup until it settles, updating the records
    Wait {
        id: String,
        #[arg(long = "cred", value_name = "USER:PASS", value_parser = parse_cred)]
        creds: Vec<(String, String)>,
    },
    /// Delete backups, dispatched per runtime family
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Show the plan without deleting anything
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn parse_family(s: &str) -> Result<RuntimeFamily, String> {
    serde_json::from_value(serde_json::Value::from(s))
        .map_err(|_| format!("unknown family `{}` (orchestrated, engine)", s))
}

pub fn parse_status(s: &str) -> Result<BackupStatus, String> {
    serde_json::from_value(serde_json::Value::from(s)).map_err(|_| format!("unknown status `{}`", s))
}

pub async fn handle(command: BackupsCommand, ctx: &Context) -> Result<()> {
    match command {
        BackupsCommand::List { family, status, infra, search } => {
            let view = load_view(ctx).await?;
            let filter = UnifiedFilter {
                family,
                text: search,
                status,
                infra_id: infra.map(InfraId::from),
            };
            let items = hk_core::filter_unified(&view.unified, &filter);
            let now = now_ms();

            handle_list(ctx.format, &items, "No backups", |items, out| {
                let mut table = Table::new(vec![
                    Column::muted("ID").with_max(12),
                    Column::left("NAME").with_max(32),
                    Column::left("INFRA"),
                    Column::left("FAMILY"),
                    Column::left("SCOPE").with_max(40),
                    Column::status("STATUS"),
                    Column::left("SIZE"),
                    Column::left("AGE"),
                ]);
                for item in items {
                    let scope = match (&item.namespace, &item.containers) {
                        (Some(ns), _) => ns.clone(),
                        (None, Some(c)) => hk_core::scope_label(c),
                        (None, None) => "-".to_string(),
                    };
                    table.row(vec![
                        item.id.to_string(),
                        item.name.clone(),
                        item.infra_name.clone(),
                        item.family.to_string(),
                        scope,
                        item.status.to_string(),
                        item.size_bytes.map(format_bytes).unwrap_or_else(|| "-".into()),
                        format_time_ago(item.created_at_ms, now),
                    ]);
                }
                table.render(out);
            })
        }
        BackupsCommand::Groups { infra } => {
            let mut view = load_view(ctx).await?;
            if let Some(id) = infra {
                view = view.only_infra(&id);
            }
            format_or_json(ctx.format, &view.infra_groups, || {
                let mut out = std::io::stdout();
                render_groups(&view, &mut out);
            })
        }
        BackupsCommand::Show { id } => {
            let (records, _) = ctx.records()?;
            let backup = records
                .get_backup(&id)
                .await?
                .ok_or_else(|| anyhow!("backup not found: {}", id))?;
            format_or_json(ctx.format, &backup, || {
                println!("{} {}", color::header("Backup:"), backup.id);
                println!("{} {}", color::context("Name:"), backup.name);
                println!("{} {} ({})", color::context("Infra:"), backup.infra_name, backup.infra_id);
                println!("{} {}", color::context("Family:"), backup.family());
                println!("{} {}", color::context("Kind:"), backup.kind);
                println!("{} {}", color::context("Status:"), color::status(&backup.status.to_string()));
                println!("{} {}", color::context("Created:"), format_timestamp(backup.created_at_ms));
                if let Some(done) = backup.completed_at_ms {
                    println!("{} {}", color::context("Completed:"), format_timestamp(done));
                }
                if let Some(size) = backup.size_bytes {
                    println!("{} {}", color::context("Size:"), format_bytes(size));
                }
                match backup.namespace() {
                    Some(ns) => println!("{} {}", color::context("Namespace:"), ns),
                    None => println!(
                        "{} {}",
                        color::context("Containers:"),
                        hk_core::scope_label(backup.containers())
                    ),
                }
                if let Some(err) = &backup.error_message {
                    println!("{} {}", color::context("Error:"), err);
                }
            })
        }
        BackupsCommand::Wait { id, creds } => wait(ctx, &id, &creds).await,
        BackupsCommand::Delete { ids, dry_run } => delete(ctx, ids, dry_run).await,
    }
}

async fn load_view(ctx: &Context) -> Result<AggregateView> {
    let (records, _) = ctx.records()?;
    let backups = records.list_backups().await?;
    let restores = records.list_restores().await?;
    Ok(aggregate(&backups, &restores))
}

fn summary_line(summary: &InfraSummary) -> String {
    let mut line = format!(
        "{} backups, {} completed, {} failed",
        summary.total, summary.completed, summary.failed
    );
    if summary.in_progress > 0 {
        line.push_str(&format!(", {} running", summary.in_progress));
    }
    if summary.restores > 0 {
        line.push_str(&format!(", {} restores", summary.restores));
    }
    if summary.total_size_bytes > 0 {
        line.push_str(&format!(", {}", format_bytes(summary.total_size_bytes)));
    }
    line
}

/// Text rendering of the grouped view.
pub fn render_groups(view: &AggregateView, out: &mut dyn Write) {
    if view.infra_groups.is_empty() {
        let _ = writeln!(out, "No backups");
        return;
    }
    for group in &view.infra_groups {
        render_infra(group, out);
    }
    let _ = writeln!(out, "{} {}", color::header("Total:"), summary_line(&view.summary));
    if view.unmatched_restores > 0 {
        let _ = writeln!(
            out,
            "{}",
            color::muted(&format!("{} restores reference unknown backups", view.unmatched_restores))
        );
    }
}

fn render_infra(group: &InfraGroup, out: &mut dyn Write) {
    let name = if group.infra_name.is_empty() {
        group.infra_id.as_str()
    } else {
        group.infra_name.as_str()
    };
    let _ = writeln!(
        out,
        "{} {} {}",
        color::header(name),
        color::muted(&format!("({})", group.family)),
        color::context(&summary_line(&group.summary))
    );
    match &group.scopes {
        InfraScopes::Engine(scopes) => {
            for scope in scopes {
                let _ = writeln!(
                    out,
                    "  {}  {}/{} completed, {} failed, {} restores",
                    scope.label,
                    scope.counts.completed,
                    scope.counts.total,
                    scope.counts.failed,
                    scope.restore_count
                );
            }
        }
        InfraScopes::Orchestrated(namespaces) => {
            for ns in namespaces {
                let _ = writeln!(
                    out,
                    "  {}  {}/{} completed, {} failed, {} restores",
                    ns.namespace,
                    ns.counts.completed,
                    ns.counts.total,
                    ns.counts.failed,
                    ns.restore_count
                );
            }
        }
    }
    let _ = writeln!(out);
}

async fn wait(ctx: &Context, id: &str, creds: &[(String, String)]) -> Result<()> {
    let (records, path) = ctx.records()?;
    let backup =
        records.get_backup(id).await?.ok_or_else(|| anyhow!("backup not found: {}", id))?;
    let infra = ctx.config.infra(&backup.infra_id)?;
    let chain = chain_for(ctx, infra, creds).await;

    let outcome = hk_engine::poll_backup(&ctx.exec()?, &records, &chain, &backup, &ctx.config.poll_config())
        .await;
    // Save whatever progress was recorded before reporting
    save_records(&path, &records.snapshot())?;

    match outcome {
        Ok(PollOutcome::Settled(status)) => {
            println!("Backup {} {}", backup.id, color::status(&status.to_string()));
            if status.counts_as_failed() {
                return Err(ExitError::new(code::FAILURE, format!("backup {} {}", backup.id, status)).into());
            }
            Ok(())
        }
        Ok(PollOutcome::Exhausted(status)) => Err(ExitError::new(
            code::FAILURE,
            format!("backup {} still {} after polling budget", backup.id, status),
        )
        .into()),
        Err(hk_engine::PollError::External(failure)) => {
            Err(ExitError::from(WorkflowError::from(failure)).into())
        }
        Err(err) => Err(err.into()),
    }
}

async fn delete(ctx: &Context, ids: Vec<String>, dry_run: bool) -> Result<()> {
    let (records, path) = ctx.records()?;
    let backups = records.list_backups().await?;
    let restores = records.list_restores().await?;
    let view = aggregate(&backups, &restores);

    // Accept unique prefixes like `backups show`
    let mut selected = Vec::with_capacity(ids.len());
    for id in &ids {
        match records.get_backup(id).await? {
            Some(b) => selected.push(b.id),
            None => selected.push(BackupId::from(id.as_str())),
        }
    }
    let plan = plan_bulk_delete(&view.unified, &selected);

    if dry_run {
        return format_or_json(ctx.format, &plan, || {
            for planned in plan.deletes() {
                println!("Would delete {}", describe(&planned.target));
            }
            for id in &plan.skipped {
                println!("Would skip {}", id);
            }
        });
    }

    if plan.is_empty() {
        return Err(ExitError::new(code::FAILURE, "nothing to delete").into());
    }

    let exec = ctx.exec()?;
    let mut failures = 0;
    // Same-named cluster records share one remote backup
    let mut removed: Vec<&DeleteTarget> = Vec::new();
    for planned in plan.deletes() {
        let target = &planned.target;
        if removed.contains(&target) {
            records.delete_backup(&planned.record_id).await?;
            println!("Deleted {} (record {})", describe(target), planned.record_id);
            continue;
        }
        let infra_id = match target {
            DeleteTarget::Orchestrated { infra_id, .. } | DeleteTarget::Engine { infra_id, .. } => {
                infra_id
            }
        };
        let infra = ctx.config.infra(infra_id)?;
        let chain = chain_for(ctx, infra, &[]).await;
        let request = ExecRequest::new(infra_id.clone(), chain, Operation::DeleteBackup)
            .with_params(serde_json::to_value(target)?);

        match exec.execute(request).await {
            Ok(_) => {
                records.delete_backup(&planned.record_id).await?;
                removed.push(target);
                println!("Deleted {} (record {})", describe(target), planned.record_id);
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(backup = %planned.record_id, error = %e, "delete failed");
                eprintln!("Failed to delete {}: {}", describe(target), e);
            }
        }
    }
    for id in &plan.skipped {
        println!("Skipped {}", id);
    }
    save_records(&path, &records.snapshot())?;

    if failures > 0 {
        return Err(ExitError::new(code::FAILURE, format!("{} deletion(s) failed", failures)).into());
    }
    Ok(())
}

fn describe(target: &DeleteTarget) -> String {
    match target {
        DeleteTarget::Orchestrated { infra_id, backup_name } => {
            format!("cluster backup {} on {}", backup_name, infra_id)
        }
        DeleteTarget::Engine { infra_id, backup_id } => {
            format!("engine backup {} on {}", backup_id, infra_id)
        }
    }
}

#[cfg(test)]
#[path = "backups_tests.rs"]
mod tests;
