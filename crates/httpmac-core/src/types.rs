//! Identifier and key newtypes shared by signing and validation.

use std::fmt;

/// Whether `value` can travel verbatim inside a quoted `key="value"` header
/// parameter.
///
/// Double quotes, backslashes, control characters and U+FFFD (the trace of a
/// header that was not valid UTF-8) are not allowed.
#[must_use]
pub fn is_quotable(value: &str) -> bool {
    !value
        .chars()
        .any(|c| c == '"' || c == '\\' || c == char::REPLACEMENT_CHARACTER || c.is_control())
}

/// Public MAC key identifier (the `id` header parameter).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct CredentialId(String);

impl CredentialId {
    /// Create a new credential identifier.
    ///
    /// # Errors
    /// Returns an error if the identifier is empty or not [`is_quotable`].
    pub fn new(id: impl Into<String>) -> Result<Self, crate::MacAuthError> {
        let id = id.into();
        if id.is_empty() || !is_quotable(&id) {
            return Err(crate::MacAuthError::InvalidCredentialId(id));
        }
        Ok(Self(id))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CredentialId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Shared MAC secret. Raw bytes, used as the HMAC key without re-encoding.
///
/// The `Debug` implementation never prints the key material.
#[derive(Clone, Default)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Wrap raw key bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether the key has no material at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(<{} bytes redacted>)", self.0.len())
    }
}

impl From<&str> for SecretKey {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for SecretKey {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<Vec<u8>> for SecretKey {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}
