// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk restores` - Recorded restores

use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};
use hk_adapters::RecordStore;
use hk_core::{RestoreOptions, RestoreRecord};
use hk_engine::{PollError, PollOutcome, WorkflowError};

use super::{chain_for, parse_cred, save_records, Context};
use crate::color;
use crate::exit_error::{code, ExitError};
use crate::output::{format_time_ago, handle_list, now_ms};
use crate::table::{Column, Table};

#[derive(Args)]
pub struct RestoresArgs {
    #[command(subcommand)]
    pub command: RestoresCommand,
}

#[derive(Subcommand)]
pub enum RestoresCommand {
    /// List restores, newest first
    List {
        /// Only restores of this backup (id or unique prefix)
        #[arg(long)]
        backup: Option<String>,
    },
    /// Poll a restore until it settles, updating the records
    Wait {
        id: String,
        #[arg(long = "cred", value_name = "USER:PASS", value_parser = parse_cred)]
        creds: Vec<(String, String)>,
    },
}

/// Find a restore by full id or unique prefix.
pub fn find_restore<'a>(restores: &'a [RestoreRecord], id: &str) -> Result<&'a RestoreRecord> {
    if let Some(exact) = restores.iter().find(|r| r.id == id) {
        return Ok(exact);
    }
    let mut matches = restores.iter().filter(|r| r.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only),
        (Some(_), Some(_)) => bail!("restore id prefix {} is ambiguous", id),
        _ => bail!("restore not found: {}", id),
    }
}

fn describe_options(options: &RestoreOptions) -> String {
    match options {
        RestoreOptions::Orchestrated { target_namespace: Some(ns) } => format!("into {}", ns),
        RestoreOptions::Orchestrated { target_namespace: None } => "original namespace".into(),
        RestoreOptions::Engine(opts) => match &opts.containers {
            Some(names) => hk_core::scope_label(names),
            None => hk_core::FULL_SCOPE_LABEL.to_string(),
        },
    }
}

pub async fn handle(command: RestoresCommand, ctx: &Context) -> Result<()> {
    match command {
        RestoresCommand::List { backup } => {
            let (records, _) = ctx.records()?;
            let mut restores = records.list_restores().await?;
            if let Some(id) = backup {
                let backup =
                    records.get_backup(&id).await?.ok_or_else(|| anyhow!("backup not found: {}", id))?;
                restores.retain(|r| r.backup_id == backup.id);
            }
            restores.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
            let now = now_ms();

            handle_list(ctx.format, &restores, "No restores", |items, out| {
                let mut table = Table::new(vec![
                    Column::muted("ID").with_max(12),
                    Column::left("BACKUP").with_max(12),
                    Column::left("SCOPE").with_max(40),
                    Column::status("STATUS"),
                    Column::left("AGE"),
                ]);
                for r in items {
                    table.row(vec![
                        r.id.to_string(),
                        r.backup_id.to_string(),
                        describe_options(&r.options),
                        r.status.to_string(),
                        format_time_ago(r.created_at_ms, now),
                    ]);
                }
                table.render(out);
            })
        }
        RestoresCommand::Wait { id, creds } => wait(ctx, &id, &creds).await,
    }
}

async fn wait(ctx: &Context, id: &str, creds: &[(String, String)]) -> Result<()> {
    let (records, path) = ctx.records()?;
    let restores = records.list_restores().await?;
    let restore = find_restore(&restores, id)?;
    let backup = records
        .get_backup(&restore.backup_id)
        .await?
        .ok_or_else(|| anyhow!("restore {} references unknown backup {}", restore.id, restore.backup_id))?;
    let infra = ctx.config.infra(&backup.infra_id)?;
    let chain = chain_for(ctx, infra, creds).await;

    let outcome = hk_engine::poll_restore(
        &ctx.exec()?,
        &records,
        &chain,
        &infra.id,
        restore,
        &ctx.config.poll_config(),
    )
    .await;
    save_records(&path, &records.snapshot())?;

    match outcome {
        Ok(PollOutcome::Settled(status)) => {
            println!("Restore {} {}", restore.id, color::status(&status.to_string()));
            if status == hk_core::RestoreStatus::Failed {
                return Err(ExitError::new(code::FAILURE, format!("restore {} failed", restore.id)).into());
            }
            Ok(())
        }
        Ok(PollOutcome::Exhausted(status)) => Err(ExitError::new(
            code::FAILURE,
            format!("restore {} still {} after polling budget", restore.id, status),
        )
        .into()),
        Err(PollError::External(failure)) => Err(ExitError::from(WorkflowError::from(failure)).into()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
#[path = "restores_tests.rs"]
mod tests;
