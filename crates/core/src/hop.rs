// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SSH hop declarations and the credentials that unlock them.
//!
//! A target host is reached through an ordered chain of jump hosts. The
//! infrastructure configuration declares the hops ([`HopSpec`]); a
//! [`CredentialChain`] holds one [`Credential`] per hop, index-aligned.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default SSH port used when configuration omits one.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Declared identity of one network hop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HopSpec {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

impl HopSpec {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for HopSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Login for one hop. Any field may be empty while the chain is being filled.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credential {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credential {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self { host: host.into(), port, username: username.into(), password: password.into() }
    }

    /// Empty slot for a hop: identity set, secrets blank.
    pub fn empty_for(hop: &HopSpec) -> Self {
        Self { host: hop.host.clone(), port: hop.port, ..Self::default() }
    }

    /// Username and password both present.
    pub fn is_filled(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}

/// Credentials for every hop in a chain, in hop order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialChain(Vec<Credential>);

impl CredentialChain {
    pub fn new(slots: Vec<Credential>) -> Self {
        Self(slots)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn slots(&self) -> &[Credential] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Credential> {
        self.0.get(index)
    }

    /// True iff no slot has an empty username or password.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Credential::is_filled)
    }

    /// Indices of slots that still need a username or password.
    pub fn missing(&self) -> Vec<usize> {
        self.0.iter().enumerate().filter(|(_, c)| !c.is_filled()).map(|(i, _)| i).collect()
    }

    /// True when every slot's host matches the hop at the same index.
    pub fn aligned_with(&self, hops: &[HopSpec]) -> bool {
        self.0.len() == hops.len() && self.0.iter().zip(hops).all(|(c, h)| c.host == h.host)
    }

    pub fn into_inner(self) -> Vec<Credential> {
        self.0
    }
}

impl IntoIterator for CredentialChain {
    type Item = Credential;
    type IntoIter = std::vec::IntoIter<Credential>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
#[path = "hop_tests.rs"]
mod tests;
