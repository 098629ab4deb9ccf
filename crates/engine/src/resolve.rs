// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential resolution against the shared cache.

use hk_adapters::CredentialStore;
use hk_core::{merge_chain, Credential, CredentialChain, HopSpec};

/// Build a credential chain for `hops` from the cache and optional overrides.
///
/// Never fails: a cache read error is logged and treated as a miss.
pub async fn resolve_credentials<S: CredentialStore>(
    store: &S,
    hops: &[HopSpec],
    overrides: Option<&[Credential]>,
) -> CredentialChain {
    let mut cached = Vec::with_capacity(hops.len());
    for hop in hops {
        if hop.host.is_empty() {
            cached.push(None);
            continue;
        }
        match store.get(&hop.host, hop.port).await {
            Ok(hit) => cached.push(hit),
            Err(e) => {
                tracing::warn!(host = %hop.host, port = hop.port, error = %e, "credential cache read failed");
                cached.push(None);
            }
        }
    }

    let chain = merge_chain(hops, &cached, overrides);
    tracing::debug!(hops = hops.len(), missing = ?chain.missing(), "resolved credential chain");
    chain
}

/// Write every filled slot of `chain` back to the cache.
///
/// Call only after the chain was accepted by the remote side. Returns the
/// number of entries written; write failures are logged and skipped.
pub async fn remember_credentials<S: CredentialStore>(store: &S, chain: &CredentialChain) -> usize {
    let mut written = 0;
    for cred in chain.slots().iter().filter(|c| c.is_filled() && !c.host.is_empty()) {
        match store.set(cred.clone()).await {
            Ok(()) => written += 1,
            Err(e) => {
                tracing::warn!(host = %cred.host, port = cred.port, error = %e, "credential cache write failed");
            }
        }
    }
    written
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
