// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod agent;
pub mod backup;
pub mod backups;
pub mod containers;
pub mod resolve;
pub mod restore;
pub mod restores;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use hk_adapters::{
    CredentialStore, ExecutionAdapter, MemoryCredentialStore, MemoryRecordStore,
    ProcessExecutionAdapter, RecordSnapshot,
};
use hk_core::{Credential, CredentialChain, HopSpec};
use hk_engine::{Stage, Workflow};

use crate::config::{Config, InfraConfig};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    pub records_flag: Option<PathBuf>,
}

impl Context {
    pub fn exec(&self) -> Result<ProcessExecutionAdapter> {
        let (program, timeout) = self.config.runner()?;
        tracing::debug!(program = %program.display(), ?timeout, "using runner");
        Ok(ProcessExecutionAdapter::new(program, timeout).with_args(self.config.runner.args.clone()))
    }

    /// Credential cache seeded from the config file.
    pub fn credential_store(&self) -> MemoryCredentialStore {
        MemoryCredentialStore::seeded(self.config.credentials.iter().cloned())
    }

    pub fn records_path(&self) -> Result<PathBuf> {
        Ok(self.config.records_path(self.records_flag.as_deref())?)
    }

    /// Record store loaded from the snapshot file. A file that does not
    /// exist yet is an empty store.
    pub fn records(&self) -> Result<(MemoryRecordStore, PathBuf)> {
        let path = self.records_path()?;
        let store =
            if path.exists() { MemoryRecordStore::load(&path)? } else { MemoryRecordStore::new() };
        Ok((store, path))
    }
}

/// Write a record snapshot back to disk.
pub fn save_records(path: &Path, snapshot: &RecordSnapshot) -> Result<()> {
    let text = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), backups = snapshot.backups.len(), "saved records");
    Ok(())
}

/// Parse a `--cred USER:PASS` argument. Either side may be empty to keep
/// the cached value.
pub fn parse_cred(arg: &str) -> Result<(String, String), String> {
    arg.split_once(':')
        .map(|(user, pass)| (user.to_string(), pass.to_string()))
        .ok_or_else(|| format!("expected USER:PASS, got `{}`", arg))
}

/// Turn positional `--cred` values into overrides aligned with `hops`.
pub fn overrides_for(hops: &[HopSpec], creds: &[(String, String)]) -> Vec<Credential> {
    hops.iter()
        .zip(creds)
        .map(|(hop, (user, pass))| Credential::new(hop.host.clone(), hop.port, user, pass))
        .collect()
}

/// Resolve a chain for `infra` from the cache and `--cred` overrides.
pub async fn chain_for(
    ctx: &Context,
    infra: &InfraConfig,
    creds: &[(String, String)],
) -> CredentialChain {
    let overrides = overrides_for(&infra.hops, creds);
    hk_engine::resolve_credentials(&ctx.credential_store(), &infra.hops, Some(&overrides)).await
}

/// Verify credentials when the cache could not fill the chain, or when the
/// caller passed `--cred` explicitly.
pub async fn ensure_authenticated<E: ExecutionAdapter, S: CredentialStore>(
    workflow: &Workflow<E, S>,
    hops: &[HopSpec],
    creds: &[(String, String)],
) -> Result<(), ExitError> {
    if workflow.stage() == Stage::NeedsAuth || !creds.is_empty() {
        workflow.authenticate(&overrides_for(hops, creds)).await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
