// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hk agent` - Engine-host agent status and lifecycle

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use hk_core::{ProbeResponse, RuntimeFamily};
use hk_engine::{AgentError, HealthReport};

use super::{chain_for, parse_cred, Context};
use crate::color;
use crate::exit_error::{code, ExitError};
use crate::output::format_or_json;

#[derive(Args)]
pub struct AgentArgs {
    #[command(subcommand)]
    pub command: AgentCommand,
}

#[derive(Args)]
pub struct TargetArgs {
    /// Infrastructure id from the config
    #[arg(long)]
    pub infra: String,
    /// Login for each hop, in hop order (USER:PASS; either side may be empty)
    #[arg(long = "cred", value_name = "USER:PASS", value_parser = parse_cred)]
    pub creds: Vec<(String, String)>,
}

#[derive(Subcommand)]
pub enum AgentCommand {
    /// Probe the agent and show its derived health
    Status {
        /// Infrastructure id from the config
        #[arg(long, required_unless_present = "from_file", conflicts_with = "from_file")]
        infra: Option<String>,
        /// Derive health from saved probe output instead of probing
        #[arg(long)]
        from_file: Option<PathBuf>,
        #[arg(long = "cred", value_name = "USER:PASS", value_parser = parse_cred)]
        creds: Vec<(String, String)>,
    },
    /// Install the agent and wait until it is active
    Install(TargetArgs),
    /// Uninstall the agent and wait until it is gone
    Uninstall(TargetArgs),
}

fn print_report(ctx: &Context, report: &HealthReport) -> Result<()> {
    format_or_json(ctx.format, report, || {
        println!("{} {}", color::header("Health:"), color::status(&report.health.to_string()));
        let fields = [
            ("Version:", report.probe.version.clone()),
            ("Service:", report.probe.service_status.clone()),
            ("Daemon:", report.probe.daemon_status.clone()),
            ("Engine:", report.probe.engine.map(|e| e.to_string())),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                println!("{} {}", color::context(label), value);
            }
        }
    })
}

fn engine_infra<'a>(ctx: &'a Context, id: &str) -> Result<&'a crate::config::InfraConfig> {
    let infra = ctx.config.infra(id)?;
    if infra.family != RuntimeFamily::Engine {
        bail!("{} is {}; agents only run on engine hosts", id, infra.family);
    }
    Ok(infra)
}

pub async fn handle(command: AgentCommand, ctx: &Context) -> Result<()> {
    match command {
        AgentCommand::Status { from_file: Some(path), .. } => {
            let raw = std::fs::read_to_string(&path)?;
            let report = HealthReport::from_probe(ProbeResponse::from_text(&raw).into_result());
            print_report(ctx, &report)
        }
        AgentCommand::Status { infra, creds, .. } => {
            let Some(id) = infra else {
                bail!("--infra or --from-file is required");
            };
            let infra = engine_infra(ctx, &id)?;
            let chain = chain_for(ctx, infra, &creds).await;
            let report = hk_engine::probe_health(&ctx.exec()?, &infra.id, &chain)
                .await
                .map_err(hk_engine::WorkflowError::from)
                .map_err(ExitError::from)?;
            print_report(ctx, &report)
        }
        AgentCommand::Install(target) => lifecycle(ctx, target, true).await,
        AgentCommand::Uninstall(target) => lifecycle(ctx, target, false).await,
    }
}

async fn lifecycle(ctx: &Context, target: TargetArgs, install: bool) -> Result<()> {
    let infra = engine_infra(ctx, &target.infra)?;
    let chain = chain_for(ctx, infra, &target.creds).await;
    if !chain.is_complete() {
        return Err(ExitError::from(hk_engine::WorkflowError::IncompleteCredentials {
            missing: chain.missing(),
        })
        .into());
    }

    let exec = ctx.exec()?;
    let poll = ctx.config.poll_config();
    let result = if install {
        hk_engine::install_agent(&exec, &infra.id, &chain, &poll).await
    } else {
        hk_engine::uninstall_agent(&exec, &infra.id, &chain, &poll).await
    };

    match result {
        Ok(report) => print_report(ctx, &report),
        Err(AgentError::External(failure)) => {
            Err(ExitError::from(hk_engine::WorkflowError::from(failure)).into())
        }
        Err(err @ AgentError::NotSettled { .. }) => {
            Err(ExitError::new(code::FAILURE, err.to_string()).into())
        }
    }
}
