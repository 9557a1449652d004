//! Credential store trait and in-memory implementation.
//!
//! This module defines the [`CredentialStore`] trait the validator uses to
//! resolve an identifier into a [`Credential`], along with a
//! [`MemoryCredentialStore`] for tests and single-process deployments.

use async_trait::async_trait;
use dashmap::DashMap;
use httpmac_core::Credential;

use crate::error::StoreError;

/// Trait for looking up MAC credentials by identifier.
///
/// Implementations may back this with a database, configuration file, or any
/// other credential store. Expiry is checked by the validator, not the store.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Retrieve the credential for `identifier`, or `None` if it is unknown.
    async fn lookup(&self, identifier: &str) -> Result<Option<Credential>, StoreError>;

    /// Remember the clock skew observed on the credential's last accepted
    /// request (server time minus request `ts`, in seconds).
    async fn record_clock_offset(&self, identifier: &str, offset: i64) -> Result<(), StoreError>;
}

/// A simple in-memory credential store backed by a `DashMap`.
///
/// # Examples
///
/// ```
/// use httpmac_auth::credentials::MemoryCredentialStore;
/// use httpmac_core::Credential;
///
/// let store = MemoryCredentialStore::new();
/// let credential = Credential::issue(std::time::Duration::from_secs(3600)).unwrap();
/// store.insert(credential.clone());
/// assert!(store.get(credential.identifier.as_str()).is_some());
/// ```
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: DashMap<String, Credential>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a credential, keyed by its identifier.
    pub fn insert(&self, credential: Credential) {
        self.credentials
            .insert(credential.identifier.as_str().to_owned(), credential);
    }

    /// Snapshot of the credential for `identifier`.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<Credential> {
        self.credentials.get(identifier).map(|c| c.clone())
    }

    /// Number of stored credentials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl FromIterator<Credential> for MemoryCredentialStore {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        let store = Self::new();
        for credential in iter {
            store.insert(credential);
        }
        store
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn lookup(&self, identifier: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.get(identifier))
    }

    async fn record_clock_offset(&self, identifier: &str, offset: i64) -> Result<(), StoreError> {
        if let Some(mut credential) = self.credentials.get_mut(identifier) {
            credential.clock_offset = Some(offset);
        }
        Ok(())
    }
}
