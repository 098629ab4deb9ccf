// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-host agent lifecycle: probe, install, uninstall.

use crate::error::ExternalFailure;
use crate::poll::{poll_until, PollConfig, PollOutcome};
use hk_adapters::{ExecRequest, ExecutionAdapter, Operation};
use hk_core::{derive_health, CredentialChain, InfraId, ProbeResponse, ProbeResult, RuntimeHealth};
use serde::Serialize;
use thiserror::Error;

/// One probe: the derived health plus the fields it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub health: RuntimeHealth,
    pub probe: ProbeResult,
}

impl HealthReport {
    pub fn from_probe(probe: ProbeResult) -> Self {
        Self { health: derive_health(&probe), probe }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    External(#[from] ExternalFailure),
    #[error("agent did not become {target} after {attempts} probes (last seen {last})")]
    NotSettled { target: RuntimeHealth, last: RuntimeHealth, attempts: u32 },
}

/// Probe the agent and derive its health.
pub async fn probe_health<E: ExecutionAdapter>(
    exec: &E,
    infra_id: &InfraId,
    chain: &CredentialChain,
) -> Result<HealthReport, ExternalFailure> {
    let request = ExecRequest::new(infra_id.clone(), chain.clone(), Operation::ProbeHealth);
    let data = exec.execute(request).await?;
    let response = ProbeResponse::from_value(data);
    if let ProbeResponse::Unrecognized(_) = &response {
        tracing::warn!(infra = %infra_id, "unrecognized probe reply");
    }
    let report = HealthReport::from_probe(response.into_result());
    tracing::info!(infra = %infra_id, health = %report.health, "probed agent");
    Ok(report)
}

async fn run_and_settle<E: ExecutionAdapter>(
    exec: &E,
    infra_id: &InfraId,
    chain: &CredentialChain,
    operation: Operation,
    target: RuntimeHealth,
    config: &PollConfig,
) -> Result<HealthReport, AgentError> {
    tracing::info!(infra = %infra_id, %operation, "agent lifecycle call");
    exec.execute(ExecRequest::new(infra_id.clone(), chain.clone(), operation))
        .await
        .map_err(ExternalFailure::from)?;

    let outcome = poll_until(
        config,
        move || async move { probe_health(exec, infra_id, chain).await },
        |report| report.health == target,
    )
    .await?;

    match outcome {
        PollOutcome::Settled(report) => Ok(report),
        PollOutcome::Exhausted(report) => {
            tracing::warn!(infra = %infra_id, %operation, last = %report.health, "agent did not settle");
            Err(AgentError::NotSettled {
                target,
                last: report.health,
                attempts: config.max_attempts.max(1),
            })
        }
    }
}

/// Install the agent and wait until it reports active.
pub async fn install_agent<E: ExecutionAdapter>(
    exec: &E,
    infra_id: &InfraId,
    chain: &CredentialChain,
    config: &PollConfig,
) -> Result<HealthReport, AgentError> {
    run_and_settle(exec, infra_id, chain, Operation::InstallAgent, RuntimeHealth::Active, config)
        .await
}

/// Uninstall the agent and wait until it reports uninstalled.
pub async fn uninstall_agent<E: ExecutionAdapter>(
    exec: &E,
    infra_id: &InfraId,
    chain: &CredentialChain,
    config: &PollConfig,
) -> Result<HealthReport, AgentError> {
    run_and_settle(
        exec,
        infra_id,
        chain,
        Operation::UninstallAgent,
        RuntimeHealth::Uninstalled,
        config,
    )
    .await
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
