//! Validation outcomes and their HTTP rendering.
//!
//! Every rejection maps to `401 Unauthorized` with a `WWW-Authenticate`
//! challenge. Requests that never attempted MAC authentication get the bare
//! `MAC` challenge; every other rejection carries `MAC error="<reason>"`.

use http::header::WWW_AUTHENTICATE;
use http::{HeaderValue, StatusCode};
use httpmac_core::Credential;

use crate::error::ParseError;

/// The bare challenge.
const BARE_CHALLENGE: &str = "MAC";

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// No `Authorization` header, or one of another scheme.
    #[error("No MAC credentials supplied")]
    NoCredentialsSupplied,

    /// The MAC header could not be parsed.
    #[error(transparent)]
    MalformedHeader(#[from] ParseError),

    /// Unknown credential identifier.
    #[error("Invalid MAC credentials")]
    InvalidCredentials,

    /// The credential is past its expiry.
    #[error("MAC credentials expired")]
    CredentialsExpired,

    /// The (identifier, timestamp, nonce) triple was already used.
    #[error("Duplicate nonce")]
    DuplicateNonce,

    /// The transport did not supply a destination host.
    #[error("Missing Host header")]
    MissingHost,

    /// The recomputed signature differs from the `mac` parameter.
    #[error("Invalid Signature")]
    SignatureMismatch,
}

/// A rejected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    reason: RejectReason,
    body: Option<String>,
}

impl Rejection {
    /// Reject for `reason` with no diagnostic body.
    #[must_use]
    pub fn new(reason: RejectReason) -> Self {
        Self { reason, body: None }
    }

    /// Reject for a signature mismatch, optionally exposing the canonical
    /// string the server computed.
    #[must_use]
    pub fn signature_mismatch(base_string: Option<String>) -> Self {
        Self {
            reason: RejectReason::SignatureMismatch,
            body: base_string,
        }
    }

    /// Why the request was rejected.
    #[must_use]
    pub fn reason(&self) -> &RejectReason {
        &self.reason
    }

    /// Diagnostic response body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Human-readable reason sent to the client, or `None` for the bare
    /// challenge.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self.reason {
            RejectReason::NoCredentialsSupplied => None,
            ref reason => Some(reason.to_string()),
        }
    }

    /// The `WWW-Authenticate` header value.
    #[must_use]
    pub fn challenge(&self) -> String {
        match self.error_message() {
            Some(error) => format!("{BARE_CHALLENGE} error=\"{error}\""),
            None => BARE_CHALLENGE.to_owned(),
        }
    }

    /// Render the rejection as a `401 Unauthorized` response.
    #[must_use]
    pub fn into_response(self) -> http::Response<String> {
        let challenge = HeaderValue::from_str(&self.challenge())
            .unwrap_or_else(|_| HeaderValue::from_static(BARE_CHALLENGE));
        let mut response = http::Response::new(self.body.unwrap_or_default());
        *response.status_mut() = StatusCode::UNAUTHORIZED;
        response.headers_mut().insert(WWW_AUTHENTICATE, challenge);
        response
    }
}

impl From<RejectReason> for Rejection {
    fn from(reason: RejectReason) -> Self {
        Self::new(reason)
    }
}

/// The outcome of one validation pass.
#[derive(Debug, Clone)]
pub enum Verdict {
    /// The request is authentic; the credential identifies the caller.
    Accepted {
        /// The credential that signed the request.
        credential: Credential,
    },
    /// The request failed a security check.
    Rejected(Rejection),
}

impl Verdict {
    /// Whether the request was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The accepted credential, if any.
    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Accepted { credential } => Some(credential),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    /// Convert into a `Result` for `?`-style handling.
    pub fn into_result(self) -> Result<Credential, Rejection> {
        match self {
            Self::Accepted { credential } => Ok(credential),
            Self::Rejected(rejection) => Err(rejection),
        }
    }
}

impl From<Rejection> for Verdict {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl From<RejectReason> for Verdict {
    fn from(reason: RejectReason) -> Self {
        Self::Rejected(Rejection::new(reason))
    }
}
