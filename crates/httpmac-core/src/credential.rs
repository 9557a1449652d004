//! MAC credential records.
//!
//! A [`Credential`] pairs a public [`CredentialId`] with a [`SecretKey`] and an
//! expiry. Signing and validation only need the narrow [`MacCredential`]
//! capability, so test doubles and foreign credential types can take part
//! without converting into [`Credential`].

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rand::RngExt;

use crate::error::{MacAuthError, MacAuthResult};
use crate::types::{CredentialId, SecretKey};

/// Number of random bytes behind an issued identifier or key (16 characters
/// once base64-encoded).
const ISSUED_TOKEN_BYTES: usize = 12;

/// The capability signing and validation need from a credential.
pub trait MacCredential {
    /// The public key identifier sent as `id`.
    fn identifier(&self) -> &str;

    /// Raw HMAC key bytes.
    fn key(&self) -> &[u8];

    /// Whether the credential can no longer be used at `now`.
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool;
}

/// An issued MAC credential.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Public identifier, unique across live credentials.
    pub identifier: CredentialId,
    /// Shared secret.
    pub key: SecretKey,
    /// Instant from which the credential is rejected.
    pub expiry: DateTime<Utc>,
    /// Last observed client clock skew in seconds (server time minus `ts`).
    pub clock_offset: Option<i64>,
}

impl Credential {
    /// Create a credential from existing parts.
    #[must_use]
    pub fn new(identifier: CredentialId, key: impl Into<SecretKey>, expiry: DateTime<Utc>) -> Self {
        Self {
            identifier,
            key: key.into(),
            expiry,
            clock_offset: None,
        }
    }

    /// Issue a credential with a random identifier and key, valid for
    /// `validity` from now.
    ///
    /// # Errors
    /// Returns [`MacAuthError::Config`] if `validity` does not fit a calendar
    /// duration.
    pub fn issue(validity: Duration) -> MacAuthResult<Self> {
        let validity = chrono::Duration::from_std(validity)
            .map_err(|e| MacAuthError::Config(format!("invalid credential validity: {e}")))?;
        let identifier = CredentialId::new(generate_token(ISSUED_TOKEN_BYTES))?;
        let key = SecretKey::from(generate_token(ISSUED_TOKEN_BYTES));
        Ok(Self::new(identifier, key, Utc::now() + validity))
    }

    /// Whether the credential is expired right now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl MacCredential for Credential {
    fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    fn key(&self) -> &[u8] {
        self.key.as_bytes()
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry
    }
}

/// Generate a random URL-safe token from `len` random bytes.
///
/// Used for issued identifiers and keys and for client nonces.
#[must_use]
pub fn generate_token(len: usize) -> String {
    let mut rng = rand::rng();
    let mut buf = vec![0u8; len];
    rng.fill(buf.as_mut_slice());
    URL_SAFE_NO_PAD.encode(buf)
}
