//! HTTP MAC request validation.
//!
//! A single pass through [`Validator::validate`] runs these checks in order,
//! stopping at the first failure:
//!
//! 1. The request carries an `Authorization: MAC ...` header.
//! 2. The header parses.
//! 3. The identifier resolves to a credential that has not expired.
//! 4. The (identifier, ts, nonce) triple has not been used before.
//! 5. The transport supplied a destination host.
//! 6. The signature recomputed from the request matches `mac`, compared in
//!    constant time.
//!
//! With [`ReplayCheckOrder::AfterSignature`] step 4 runs after step 6, so a
//! request that cannot prove knowledge of the key never consumes a nonce.
//!
//! Security failures produce `Ok(Verdict::Rejected(..))`. Store failures, a
//! credential without a key, and deadline expiry produce
//! `Err(ValidationError)`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use httpmac_core::{Credential, MacAuthConfig, MacCredential, ReplayCheckOrder};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::canonical::SignatureContext;
use crate::credentials::CredentialStore;
use crate::error::{SignError, ValidationError};
use crate::header::{ParsedHeader, parse_authorization_header};
use crate::replay::{NonceStatus, ReplayGuard};
use crate::request::RequestContext;
use crate::signer::sign;
use crate::verdict::{RejectReason, Rejection, Verdict};

/// Validates MAC-signed requests against a credential store and a replay
/// guard.
#[derive(Clone)]
pub struct Validator {
    credentials: Arc<dyn CredentialStore>,
    replay: Arc<dyn ReplayGuard>,
    config: MacAuthConfig,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Create a validator.
    #[must_use]
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        replay: Arc<dyn ReplayGuard>,
        config: MacAuthConfig,
    ) -> Self {
        Self {
            credentials,
            replay,
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MacAuthConfig {
        &self.config
    }

    /// Validate a request, applying the configured deadline if there is one.
    pub async fn validate(&self, request: &RequestContext) -> Result<Verdict, ValidationError> {
        match self.config.validation_timeout() {
            Some(deadline) => self.validate_within(request, deadline).await,
            None => self.run(request).await,
        }
    }

    /// Validate a request, failing with [`ValidationError::Timeout`] if the
    /// pass does not finish within `deadline`.
    pub async fn validate_within(
        &self,
        request: &RequestContext,
        deadline: Duration,
    ) -> Result<Verdict, ValidationError> {
        tokio::time::timeout(deadline, self.run(request))
            .await
            .map_err(|_| {
                warn!(?deadline, "MAC validation deadline exceeded");
                ValidationError::Timeout(deadline)
            })?
    }

    /// Validate HTTP request parts, assuming the configured default port when
    /// the request declares none.
    pub async fn validate_parts(
        &self,
        parts: &http::request::Parts,
    ) -> Result<Verdict, ValidationError> {
        let request = RequestContext::from_parts(parts, self.config.default_port);
        self.validate(&request).await
    }

    /// Resolve the caller if the request is validly signed.
    ///
    /// Rejections of any kind yield `Ok(None)`, for endpoints where MAC
    /// authentication is optional. Infrastructure failures still surface.
    pub async fn identify(
        &self,
        request: &RequestContext,
    ) -> Result<Option<Credential>, ValidationError> {
        Ok(self.validate(request).await?.into_result().ok())
    }

    async fn run(&self, request: &RequestContext) -> Result<Verdict, ValidationError> {
        let Some(raw) = request.authorization.as_deref() else {
            debug!("No Authorization header");
            return Ok(RejectReason::NoCredentialsSupplied.into());
        };

        let parsed = match parse_authorization_header(raw) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => {
                debug!("Authorization header is not MAC scheme");
                return Ok(RejectReason::NoCredentialsSupplied.into());
            }
            Err(e) => {
                debug!(error = %e, "Malformed MAC Authorization header");
                return Ok(RejectReason::MalformedHeader(e).into());
            }
        };

        debug!(id = %parsed.id, ts = parsed.ts, "Verifying MAC signature");

        let Some(mut credential) = self.credentials.lookup(&parsed.id).await? else {
            debug!(id = %parsed.id, "Unknown MAC credential identifier");
            return Ok(RejectReason::InvalidCredentials.into());
        };

        let now = Utc::now();
        if credential.is_expired_at(now) {
            debug!(id = %parsed.id, expiry = %credential.expiry, "MAC credential expired");
            return Ok(RejectReason::CredentialsExpired.into());
        }

        if self.config.replay_check == ReplayCheckOrder::BeforeSignature {
            if let Some(rejection) = self.check_nonce(&parsed).await? {
                return Ok(rejection.into());
            }
        }

        let Some(host) = request.host.as_deref().filter(|h| !h.is_empty()) else {
            debug!(id = %parsed.id, "Request has no destination host");
            return Ok(RejectReason::MissingHost.into());
        };

        let context = SignatureContext::builder()
            .timestamp(parsed.ts)
            .nonce(parsed.nonce.as_str())
            .method(request.method.as_str())
            .uri(request.uri.as_str())
            .host(host)
            .port(request.port)
            .ext(parsed.ext.clone().unwrap_or_default())
            .build_for_validation()
            .map_err(|e| signing_failure(e, &parsed.id))?;

        let expected = sign(&credential, &context).map_err(|e| signing_failure(e, &parsed.id))?;

        if !signatures_match(&expected, &parsed.mac) {
            let base_string = context.canonical_string();
            debug!(
                id = %parsed.id,
                base_string = ?base_string,
                "MAC signature mismatch"
            );
            let body = self.config.expose_base_string.then_some(base_string);
            return Ok(Rejection::signature_mismatch(body).into());
        }

        if self.config.replay_check == ReplayCheckOrder::AfterSignature {
            if let Some(rejection) = self.check_nonce(&parsed).await? {
                return Ok(rejection.into());
            }
        }

        let offset = now.timestamp() - parsed.ts;
        if let Err(e) = self
            .credentials
            .record_clock_offset(credential.identifier(), offset)
            .await
        {
            warn!(id = %parsed.id, error = %e, "Failed to record MAC clock offset");
        }
        credential.clock_offset = Some(offset);

        debug!(id = %parsed.id, offset, "MAC verification succeeded");
        Ok(Verdict::Accepted { credential })
    }

    async fn check_nonce(&self, parsed: &ParsedHeader) -> Result<Option<Rejection>, ValidationError> {
        match self
            .replay
            .record_if_absent(&parsed.id, parsed.ts, &parsed.nonce)
            .await?
        {
            NonceStatus::Fresh => Ok(None),
            NonceStatus::Duplicate => {
                debug!(id = %parsed.id, ts = parsed.ts, nonce = %parsed.nonce, "Duplicate MAC nonce");
                Ok(Some(Rejection::new(RejectReason::DuplicateNonce)))
            }
        }
    }
}

/// Constant-time comparison of the expected and provided signatures.
///
/// Inputs of different length compare unequal without inspecting content.
fn signatures_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

fn signing_failure(error: SignError, identifier: &str) -> ValidationError {
    match error {
        SignError::MissingKey => ValidationError::MisconfiguredCredential(identifier.to_owned()),
        SignError::IncompleteSignatureInput(field) | SignError::UnquotableParameter(field) => {
            ValidationError::IncompleteRequest(field)
        }
    }
}
