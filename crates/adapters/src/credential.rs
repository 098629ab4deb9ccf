// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential cache shared by every workflow instance.
//!
//! Entries are keyed by `(host, port, username)`. A lookup by `(host, port)`
//! returns the most recently written entry for that endpoint.

use async_trait::async_trait;
use hk_core::Credential;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors from credential store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for the credential cache
#[async_trait]
pub trait CredentialStore: Clone + Send + Sync + 'static {
    /// Most recent credential stored for this endpoint, if any.
    async fn get(&self, host: &str, port: u16) -> Result<Option<Credential>, StoreError>;

    /// Store a credential. Last write wins per `(host, port, username)`.
    async fn set(&self, credential: Credential) -> Result<(), StoreError>;
}

type EntryKey = (String, u16, String);

#[derive(Default)]
struct MemoryState {
    seq: u64,
    entries: HashMap<EntryKey, (u64, Credential)>,
}

impl MemoryState {
    fn latest(&self, host: &str, port: u16) -> Option<Credential> {
        self.entries
            .iter()
            .filter(|((h, p, _), _)| h == host && *p == port)
            .max_by_key(|(_, (seq, _))| *seq)
            .map(|(_, (_, cred))| cred.clone())
    }

    fn insert(&mut self, credential: Credential) {
        self.seq += 1;
        let key = (credential.host.clone(), credential.port, credential.username.clone());
        self.entries.insert(key, (self.seq, credential));
    }
}

/// Process-local credential cache.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-filled with `seeds`, later entries winning.
    pub fn seeded(seeds: impl IntoIterator<Item = Credential>) -> Self {
        let store = Self::new();
        {
            let mut state = store.inner.lock();
            for cred in seeds {
                state.insert(cred);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, host: &str, port: u16) -> Result<Option<Credential>, StoreError> {
        Ok(self.inner.lock().latest(host, port))
    }

    async fn set(&self, credential: Credential) -> Result<(), StoreError> {
        tracing::debug!(host = %credential.host, port = credential.port, "caching credential");
        self.inner.lock().insert(credential);
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{CredentialStore, MemoryCredentialStore, StoreError};
    use async_trait::async_trait;
    use hk_core::Credential;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded store call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum CredentialCall {
        Get { host: String, port: u16 },
        Set { host: String, port: u16, username: String },
    }

    #[derive(Default)]
    struct FakeStoreState {
        calls: Vec<CredentialCall>,
        fail_reads: bool,
        fail_writes: bool,
    }

    /// Fake credential store: memory-backed, records calls, injects failures.
    #[derive(Clone, Default)]
    pub struct FakeCredentialStore {
        backing: MemoryCredentialStore,
        inner: Arc<Mutex<FakeStoreState>>,
    }

    impl FakeCredentialStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seeded(seeds: impl IntoIterator<Item = Credential>) -> Self {
            Self { backing: MemoryCredentialStore::seeded(seeds), ..Self::default() }
        }

        pub fn fail_reads(&self, fail: bool) {
            self.inner.lock().fail_reads = fail;
        }

        pub fn fail_writes(&self, fail: bool) {
            self.inner.lock().fail_writes = fail;
        }

        pub fn calls(&self) -> Vec<CredentialCall> {
            self.inner.lock().calls.clone()
        }

        pub fn writes(&self) -> usize {
            self.calls().iter().filter(|c| matches!(c, CredentialCall::Set { .. })).count()
        }
    }

    #[async_trait]
    impl CredentialStore for FakeCredentialStore {
        async fn get(&self, host: &str, port: u16) -> Result<Option<Credential>, StoreError> {
            let fail = {
                let mut state = self.inner.lock();
                state.calls.push(CredentialCall::Get { host: host.to_string(), port });
                state.fail_reads
            };
            if fail {
                return Err(StoreError::Unavailable("injected read failure".into()));
            }
            self.backing.get(host, port).await
        }

        async fn set(&self, credential: Credential) -> Result<(), StoreError> {
            let fail = {
                let mut state = self.inner.lock();
                state.calls.push(CredentialCall::Set {
                    host: credential.host.clone(),
                    port: credential.port,
                    username: credential.username.clone(),
                });
                state.fail_writes
            };
            if fail {
                return Err(StoreError::Unavailable("injected write failure".into()));
            }
            self.backing.set(credential).await
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{CredentialCall, FakeCredentialStore};

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
