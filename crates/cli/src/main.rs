// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hk: backup and restore orchestration over hop chains

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod logging;
mod output;
mod table;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::{agent, backup, backups, containers, resolve, restore, restores, Context};
use crate::config::Config;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "hk", version, about = "Backup and restore orchestration over hop chains")]
#[command(styles = color::styles())]
struct Cli {
    /// Config file (default: $HK_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    /// Record snapshot file (default: $HK_RECORDS, then the config)
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Engine-host agent status and lifecycle
    Agent(agent::AgentArgs),
    /// List containers on an engine host
    Containers(containers::ListingArgs),
    /// List images on an engine host
    Images(containers::ListingArgs),
    /// Show the credential chain for an infrastructure
    Resolve(resolve::ResolveArgs),
    /// Start backups
    Backup(backup::BackupArgs),
    /// Recorded backups: list, group, wait, delete
    Backups(backups::BackupsArgs),
    /// Restore a recorded backup
    Restore(restore::RestoreArgs),
    /// Recorded restores
    Restores(restores::RestoresArgs),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context {
        config: Config::discover(cli.config.as_deref())?,
        format: cli.output,
        records_flag: cli.records,
    };

    match cli.command {
        Command::Agent(args) => agent::handle(args.command, &ctx).await,
        Command::Containers(args) => containers::handle(args, &ctx).await,
        Command::Images(args) => containers::handle_images(args, &ctx).await,
        Command::Resolve(args) => resolve::handle(args, &ctx).await,
        Command::Backup(args) => backup::handle(args.command, &ctx).await,
        Command::Backups(args) => backups::handle(args.command, &ctx).await,
        Command::Restore(args) => restore::handle(args, &ctx).await,
        Command::Restores(args) => restores::handle(args.command, &ctx).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _guard = logging::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = match err.downcast_ref::<ExitError>() {
                Some(exit) => exit.code,
                None => exit_error::code::FAILURE,
            };
            if !err.to_string().is_empty() {
                eprintln!("Error: {:#}", err);
            }
            tracing::debug!(code, error = ?err, "command failed");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
