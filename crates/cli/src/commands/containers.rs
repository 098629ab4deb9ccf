// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk containers` / `hk images` - Listings from an engine host

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use hk_adapters::{ExecRequest, ExecutionAdapter, Operation};
use hk_core::{parse_containers, parse_image_lines, ContainerEntry, ImageEntry, RuntimeFamily};
use hk_engine::WorkflowError;
use serde_json::Value;

use super::{chain_for, parse_cred, Context};
use crate::exit_error::{code, ExitError};
use crate::output::handle_list;
use crate::table::{Column, Table};

#[derive(Args)]
pub struct ListingArgs {
    /// Infrastructure id from the config
    #[arg(long, required_unless_present = "from_file", conflicts_with = "from_file")]
    pub infra: Option<String>,
    /// Parse saved listing output (text or JSON) instead of asking the host
    #[arg(long)]
    pub from_file: Option<PathBuf>,
    #[arg(long = "cred", value_name = "USER:PASS", value_parser = parse_cred)]
    pub creds: Vec<(String, String)>,
}

/// Listing output is JSON when it parses as JSON, otherwise positional text.
pub fn parse_listing(raw: &str) -> Vec<ContainerEntry> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => parse_containers(&value),
        _ => parse_containers(&Value::String(raw.to_string())),
    }
}

/// Image listings are JSON arrays of objects or positional text.
pub fn parse_image_listing(raw: &str) -> Vec<ImageEntry> {
    match serde_json::from_str::<Vec<ImageEntry>>(raw.trim()) {
        Ok(images) => images,
        Err(_) => parse_image_lines(raw),
    }
}

pub async fn handle(args: ListingArgs, ctx: &Context) -> Result<()> {
    let entries = match (args.from_file, args.infra) {
        (Some(path), _) => parse_listing(&std::fs::read_to_string(&path)?),
        (None, Some(id)) => {
            parse_containers(&fetch(ctx, &id, &args.creds, Operation::ListContainers).await?)
        }
        (None, None) => bail!("--infra or --from-file is required"),
    };

    handle_list(ctx.format, &entries, "No containers", |items, out| {
        let mut table = Table::new(vec![
            Column::muted("ID").with_max(12),
            Column::left("NAME"),
            Column::left("IMAGE").with_max(40),
            Column::status("STATE"),
            Column::left("STATUS"),
        ]);
        for c in items {
            table.row(vec![
                c.id.clone(),
                c.name.clone(),
                c.image.clone(),
                c.state.to_string(),
                c.status.clone(),
            ]);
        }
        table.render(out);
    })
}

pub async fn handle_images(args: ListingArgs, ctx: &Context) -> Result<()> {
    let images = match (args.from_file, args.infra) {
        (Some(path), _) => parse_image_listing(&std::fs::read_to_string(&path)?),
        (None, Some(id)) => match fetch(ctx, &id, &args.creds, Operation::ListImages).await? {
            Value::String(text) => parse_image_lines(&text),
            other => serde_json::from_value(other)
                .map_err(|e| anyhow::anyhow!("unreadable image listing: {}", e))?,
        },
        (None, None) => bail!("--infra or --from-file is required"),
    };

    handle_list(ctx.format, &images, "No images", |items, out| {
        let mut table = Table::new(vec![
            Column::left("REPOSITORY").with_max(48),
            Column::left("TAG"),
            Column::muted("ID").with_max(12),
            Column::left("SIZE"),
        ]);
        for i in items {
            table.row(vec![i.repository.clone(), i.tag.clone(), i.id.clone(), i.size.clone()]);
        }
        table.render(out);
    })
}

/// Probe the agent, then run one listing operation.
async fn fetch(
    ctx: &Context,
    id: &str,
    creds: &[(String, String)],
    operation: Operation,
) -> Result<Value> {
    let infra = ctx.config.infra(id)?;
    if infra.family != RuntimeFamily::Engine {
        bail!("{} is {}; listings come from engine hosts", id, infra.family);
    }
    let chain = chain_for(ctx, infra, creds).await;
    let exec = ctx.exec()?;

    let report = hk_engine::probe_health(&exec, &infra.id, &chain)
        .await
        .map_err(|e| ExitError::from(WorkflowError::from(e)))?;
    if !report.health.allows_listing() {
        return Err(ExitError::new(
            code::FAILURE,
            format!("agent on {} is {}; cannot list", infra.display_name(), report.health),
        )
        .into());
    }

    let data = exec
        .execute(ExecRequest::new(infra.id.clone(), chain, operation))
        .await
        .map_err(|e| ExitError::from(WorkflowError::from(e)))?;
    Ok(data)
}

#[cfg(test)]
#[path = "containers_tests.rs"]
mod tests;
