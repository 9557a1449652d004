//! Canonical (base) string construction for HTTP MAC signatures.
//!
//! The string that gets signed is seven newline-terminated fields:
//!
//! ```text
//! timestamp\n
//! nonce\n
//! METHOD\n
//! request-uri\n
//! host\n
//! port\n
//! ext\n
//! ```
//!
//! A [`SignatureContext`] is an immutable value built fresh for every signing
//! or validation attempt. Only the signing side may fill in a missing nonce
//! or timestamp; the validating side must use the values from the header.

use chrono::Utc;
use httpmac_core::{generate_token, is_quotable};

use crate::error::SignError;

/// Random bytes behind a generated nonce (8 characters once encoded).
const NONCE_BYTES: usize = 6;

/// Build the canonical string from its components.
///
/// The method is upper-cased; every other field is used verbatim.
///
/// # Examples
///
/// ```
/// use httpmac_auth::canonical::build_canonical_string;
///
/// let base = build_canonical_string(
///     1_336_363_200,
///     "dj83hs9s",
///     "get",
///     "/resource/1?b=1&a=2",
///     "example.com",
///     80,
///     "",
/// );
/// assert_eq!(base, "1336363200\ndj83hs9s\nGET\n/resource/1?b=1&a=2\nexample.com\n80\n\n");
/// ```
#[must_use]
pub fn build_canonical_string(
    timestamp: i64,
    nonce: &str,
    method: &str,
    uri: &str,
    host: &str,
    port: u16,
    ext: &str,
) -> String {
    let method = method.to_ascii_uppercase();
    format!("{timestamp}\n{nonce}\n{method}\n{uri}\n{host}\n{port}\n{ext}\n")
}

/// Everything that goes into one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureContext {
    timestamp: i64,
    nonce: String,
    method: String,
    uri: String,
    host: String,
    port: u16,
    ext: String,
}

impl SignatureContext {
    /// Start building a context.
    #[must_use]
    pub fn builder() -> SignatureContextBuilder {
        SignatureContextBuilder::default()
    }

    /// Unix timestamp in whole seconds.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Request nonce.
    #[must_use]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Upper-cased HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request URI (path and query).
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Destination host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Destination port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Extension string, possibly empty.
    #[must_use]
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// The canonical string covered by the MAC.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        build_canonical_string(
            self.timestamp,
            &self.nonce,
            &self.method,
            &self.uri,
            &self.host,
            self.port,
            &self.ext,
        )
    }
}

/// Builder for [`SignatureContext`].
#[derive(Debug, Clone, Default)]
pub struct SignatureContextBuilder {
    timestamp: Option<i64>,
    nonce: Option<String>,
    method: Option<String>,
    uri: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    ext: Option<String>,
}

impl SignatureContextBuilder {
    /// Set the Unix timestamp.
    #[must_use]
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the nonce.
    #[must_use]
    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the request URI (path and query).
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the destination host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the destination port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the extension string.
    #[must_use]
    pub fn ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }

    /// Build a context for signing a new request.
    ///
    /// A missing timestamp defaults to the current time and a missing nonce
    /// is generated. A nonce or ext that could not be carried in the
    /// `Authorization` header is refused.
    pub fn build_for_signing(mut self) -> Result<SignatureContext, SignError> {
        if self.timestamp.is_none() {
            self.timestamp = Some(Utc::now().timestamp());
        }
        if self.nonce.is_none() {
            self.nonce = Some(generate_token(NONCE_BYTES));
        }
        for (field, value) in [("nonce", &self.nonce), ("ext", &self.ext)] {
            if value.as_deref().is_some_and(|v| !is_quotable(v)) {
                return Err(SignError::UnquotableParameter(field));
            }
        }
        self.build_for_validation()
    }

    /// Build a context for checking a received request. Timestamp and nonce
    /// must come from the request itself.
    pub fn build_for_validation(self) -> Result<SignatureContext, SignError> {
        let timestamp = self
            .timestamp
            .ok_or(SignError::IncompleteSignatureInput("timestamp"))?;
        let nonce = self
            .nonce
            .ok_or(SignError::IncompleteSignatureInput("nonce"))?;
        let method = required(self.method, "method")?;
        let uri = required(self.uri, "uri")?;
        let host = required(self.host, "host")?;
        let port = self
            .port
            .ok_or(SignError::IncompleteSignatureInput("port"))?;

        Ok(SignatureContext {
            timestamp,
            nonce,
            method: method.to_ascii_uppercase(),
            uri,
            host,
            port,
            ext: self.ext.unwrap_or_default(),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, SignError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(SignError::IncompleteSignatureInput(field))
}
