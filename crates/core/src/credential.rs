// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential chain resolution.
//!
//! Each hop's slot is filled from two sources, in increasing priority:
//!
//! ```text
//! 1. cache     last known-good login for (host, port, username)
//! 2. override  freshly entered by the user for the same index
//! ```
//!
//! Resolution never fails. An incomplete chain is an ordinary outcome that
//! callers branch on by asking for more input.

use crate::hop::{Credential, CredentialChain, HopSpec};

/// Merge cached credentials and overrides into a chain aligned with `hops`.
///
/// `cached[i]` is the cache lookup result for `hops[i]` (missing entries are
/// treated as cache misses). `overrides[i]`, when present, wins field by
/// field over the cache. A hop with an empty host always yields an empty
/// slot so the chain length still matches the hop count.
pub fn merge_chain(
    hops: &[HopSpec],
    cached: &[Option<Credential>],
    overrides: Option<&[Credential]>,
) -> CredentialChain {
    let slots = hops
        .iter()
        .enumerate()
        .map(|(i, hop)| {
            let cached = cached.get(i).and_then(Option::as_ref);
            let override_ = overrides.and_then(|o| o.get(i));
            resolve_slot(hop, cached, override_)
        })
        .collect();
    CredentialChain::new(slots)
}

fn resolve_slot(
    hop: &HopSpec,
    cached: Option<&Credential>,
    override_: Option<&Credential>,
) -> Credential {
    let mut slot = Credential::empty_for(hop);
    if hop.host.is_empty() {
        return slot;
    }

    let wanted_user = override_.map(|o| o.username.as_str()).filter(|u| !u.is_empty());

    if let Some(cached) = cached.filter(|c| cache_matches(c, hop, wanted_user)) {
        slot.username = cached.username.clone();
        slot.password = cached.password.clone();
    }

    if let Some(o) = override_ {
        if !o.username.is_empty() {
            slot.username = o.username.clone();
        }
        if !o.password.is_empty() {
            slot.password = o.password.clone();
        }
    }

    slot
}

/// A cache entry is usable when it is filled, belongs to this hop, and (if
/// the caller named a user) belongs to that user.
fn cache_matches(cached: &Credential, hop: &HopSpec, wanted_user: Option<&str>) -> bool {
    cached.is_filled()
        && cached.host == hop.host
        && cached.port == hop.port
        && wanted_user.is_none_or(|u| u == cached.username)
}

/// True iff no slot has an empty username or password.
pub fn is_complete(chain: &CredentialChain) -> bool {
    chain.is_complete()
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
