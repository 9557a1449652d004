//! Configuration for MAC signing and validation.
//!
//! All configuration can be driven by environment variables.

use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::{MacAuthError, MacAuthResult};

/// Default credential validity window (24 hours).
const DEFAULT_CREDENTIAL_VALIDITY_SECS: u64 = 24 * 60 * 60;

/// Where the nonce check runs relative to signature verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplayCheckOrder {
    /// Record the nonce right after the credential lookup, before the
    /// signature is checked.
    BeforeSignature,
    /// Record the nonce only once the signature has been verified, so
    /// unauthenticated requests cannot consume a client's nonces.
    #[default]
    AfterSignature,
}

impl FromStr for ReplayCheckOrder {
    type Err = MacAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before-signature" | "before" => Ok(Self::BeforeSignature),
            "after-signature" | "after" => Ok(Self::AfterSignature),
            other => Err(MacAuthError::Config(format!(
                "unknown replay check order: {other}"
            ))),
        }
    }
}

/// Configuration for HTTP MAC authentication.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacAuthConfig {
    /// Validity window for newly issued credentials, in seconds.
    pub credential_validity_secs: u64,
    /// Port assumed when the request does not declare one.
    pub default_port: u16,
    /// Position of the nonce check in the validation pipeline.
    pub replay_check: ReplayCheckOrder,
    /// Attach the canonical string to signature mismatch rejections.
    pub expose_base_string: bool,
    /// Deadline for a whole validation pass, in milliseconds.
    pub validation_timeout_ms: Option<u64>,
    /// Log level.
    pub log_level: String,
}

impl Default for MacAuthConfig {
    fn default() -> Self {
        Self {
            credential_validity_secs: DEFAULT_CREDENTIAL_VALIDITY_SECS,
            default_port: 80,
            replay_check: ReplayCheckOrder::default(),
            expose_base_string: true,
            validation_timeout_ms: None,
            log_level: "info".to_owned(),
        }
    }
}

impl MacAuthConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Returns [`MacAuthError::Config`] if a variable is set to a value that
    /// cannot be parsed.
    pub fn from_env() -> MacAuthResult<Self> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("MAC_CREDENTIAL_VALIDITY_SECS") {
            config.credential_validity_secs = parse_var("MAC_CREDENTIAL_VALIDITY_SECS", &v)?;
        }
        if let Ok(v) = std::env::var("MAC_DEFAULT_PORT") {
            config.default_port = parse_var("MAC_DEFAULT_PORT", &v)?;
        }
        if let Ok(v) = std::env::var("MAC_REPLAY_CHECK") {
            config.replay_check = v.parse()?;
        }
        if let Ok(v) = std::env::var("MAC_EXPOSE_BASE_STRING") {
            config.expose_base_string = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Ok(v) = std::env::var("MAC_VALIDATION_TIMEOUT_MS") {
            config.validation_timeout_ms = Some(parse_var("MAC_VALIDATION_TIMEOUT_MS", &v)?);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        debug!(?config, "Loaded MAC authentication config");
        Ok(config)
    }

    /// Validity window for newly issued credentials.
    #[must_use]
    pub fn credential_validity(&self) -> Duration {
        Duration::from_secs(self.credential_validity_secs)
    }

    /// Deadline for a whole validation pass, if configured.
    #[must_use]
    pub fn validation_timeout(&self) -> Option<Duration> {
        self.validation_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> MacAuthResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| MacAuthError::Config(format!("{name}={value:?}: {e}")))
}
