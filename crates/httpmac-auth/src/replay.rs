//! Nonce replay protection.
//!
//! A request is identified by the triple (credential identifier, timestamp,
//! nonce). [`ReplayGuard::record_if_absent`] is an atomic check-and-set over
//! that triple: of any number of concurrent calls with the same triple,
//! exactly one observes [`NonceStatus::Fresh`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::error::StoreError;

/// Outcome of recording a nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceStatus {
    /// The triple had not been seen and is now recorded.
    Fresh,
    /// The triple was already recorded.
    Duplicate,
}

/// Trait for nonce uniqueness tracking.
///
/// Persistent implementations typically map this onto a unique-constraint
/// insert, treating a conflict as [`NonceStatus::Duplicate`].
#[async_trait]
pub trait ReplayGuard: Send + Sync {
    /// Record the triple unless it already exists.
    async fn record_if_absent(
        &self,
        identifier: &str,
        timestamp: i64,
        nonce: &str,
    ) -> Result<NonceStatus, StoreError>;
}

type NonceKey = (String, i64, String);

/// In-memory replay guard backed by a `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryReplayGuard {
    seen: DashMap<NonceKey, DateTime<Utc>>,
}

impl MemoryReplayGuard {
    /// Create an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record whose request timestamp is older than `cutoff`
    /// (Unix seconds). Returns the number of records removed.
    ///
    /// Nonces are never pruned by validation itself; an operator calls this
    /// with a cutoff further in the past than any tolerated clock skew.
    pub fn purge_older_than(&self, cutoff: i64) -> usize {
        let before = self.seen.len();
        self.seen.retain(|(_, timestamp, _), _| *timestamp >= cutoff);
        let removed = before.saturating_sub(self.seen.len());
        debug!(cutoff, removed, "Purged nonce records");
        removed
    }

    /// Number of recorded triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no triple has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[async_trait]
impl ReplayGuard for MemoryReplayGuard {
    async fn record_if_absent(
        &self,
        identifier: &str,
        timestamp: i64,
        nonce: &str,
    ) -> Result<NonceStatus, StoreError> {
        let key = (identifier.to_owned(), timestamp, nonce.to_owned());
        match self.seen.entry(key) {
            Entry::Occupied(_) => Ok(NonceStatus::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                Ok(NonceStatus::Fresh)
            }
        }
    }
}
