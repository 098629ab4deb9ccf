// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk resolve` - Show the credential chain for an infrastructure

use anyhow::Result;
use clap::Args;
use hk_core::CredentialChain;
use serde::Serialize;

use super::{chain_for, parse_cred, Context};
use crate::color;
use crate::exit_error::ExitError;
use crate::output::format_or_json;
use crate::table::{Column, Table};

#[derive(Args)]
pub struct ResolveArgs {
    /// Infrastructure id from the config
    #[arg(long)]
    pub infra: String,
    /// Login for each hop, in hop order (USER:PASS; either side may be empty)
    #[arg(long = "cred", value_name = "USER:PASS", value_parser = parse_cred)]
    pub creds: Vec<(String, String)>,
    /// Exit non-zero when any hop lacks credentials
    #[arg(long)]
    pub check: bool,
}

/// Display form of one slot. Never carries the password.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SlotView {
    pub hop: usize,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub has_password: bool,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
struct ChainView {
    complete: bool,
    slots: Vec<SlotView>,
}

pub fn slot_views(chain: &CredentialChain) -> Vec<SlotView> {
    chain
        .slots()
        .iter()
        .enumerate()
        .map(|(i, c)| SlotView {
            hop: i + 1,
            host: c.host.clone(),
            port: c.port,
            username: c.username.clone(),
            has_password: !c.password.is_empty(),
            complete: c.is_filled(),
        })
        .collect()
}

pub async fn handle(args: ResolveArgs, ctx: &Context) -> Result<()> {
    let infra = ctx.config.infra(&args.infra)?;
    let chain = chain_for(ctx, infra, &args.creds).await;
    let view = ChainView { complete: chain.is_complete(), slots: slot_views(&chain) };

    format_or_json(ctx.format, &view, || {
        println!("{} {}", color::header("Infrastructure:"), infra.display_name());
        let mut table = Table::new(vec![
            Column::muted("HOP"),
            Column::left("HOST"),
            Column::left("USER"),
            Column::left("PASSWORD"),
            Column::status("STATE"),
        ]);
        for slot in &view.slots {
            table.row(vec![
                slot.hop.to_string(),
                format!("{}:{}", slot.host, slot.port),
                if slot.username.is_empty() { "-".into() } else { slot.username.clone() },
                if slot.has_password { "********".into() } else { "-".into() },
                if slot.complete { "completed".into() } else { "missing".into() },
            ]);
        }
        table.render(&mut std::io::stdout());
    })?;

    if args.check && !view.complete {
        return Err(ExitError::from(hk_engine::WorkflowError::IncompleteCredentials {
            missing: chain.missing(),
        })
        .into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
