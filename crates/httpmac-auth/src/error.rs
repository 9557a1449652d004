//! Error types for MAC signing and validation.
//!
//! Security failures are not errors here: they are expressed as a
//! [`Rejection`](crate::verdict::Rejection) inside a
//! [`Verdict`](crate::verdict::Verdict). The types in this module cover
//! malformed signing input, header parse failures (which the validator folds
//! into a rejection), and infrastructure failures that must never be reported
//! as a MAC challenge.

use std::time::Duration;

use http::StatusCode;

/// Errors raised while building a signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    /// A field required by the canonical string was not supplied.
    #[error("incomplete signature input: missing {0}")]
    IncompleteSignatureInput(&'static str),

    /// A header parameter value that cannot be sent inside quotes.
    #[error("{0} contains characters not allowed in a quoted header parameter")]
    UnquotableParameter(&'static str),

    /// The credential carries no key material.
    #[error("credential has no secret key")]
    MissingKey,
}

/// Reasons an `Authorization: MAC ...` header fails to parse.
///
/// The `Display` text is sent back to the client in the
/// `WWW-Authenticate: MAC error="..."` challenge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A parameter outside `mac`, `nonce`, `id`, `ts`, `ext`.
    #[error("Unidentified parameter: {0}")]
    UnidentifiedParameter(String),

    /// A parameter that appears more than once.
    #[error("Duplicate parameter: {0}")]
    DuplicateParameter(String),

    /// One of the mandatory parameters is absent.
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// Text that is not a `key="value"` pair.
    #[error("Malformed MAC parameter list")]
    MalformedParameter,

    /// The `ts` parameter is not a base-10 integer.
    #[error("Invalid timestamp")]
    InvalidTimestamp,
}

/// Errors reported by a credential store or replay guard backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Infrastructure failures during validation.
///
/// These are distinct from security rejections so that an outage is never
/// reported to a client as an invalid signature.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A credential store or replay guard call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored credential cannot be used to sign (for example, it has no
    /// secret key).
    #[error("misconfigured MAC credential: {0}")]
    MisconfiguredCredential(String),

    /// The transport supplied a request without a method or URI.
    #[error("incomplete request context: missing {0}")]
    IncompleteRequest(&'static str),

    /// The validation pass did not finish within its deadline.
    #[error("MAC validation timed out after {0:?}")]
    Timeout(Duration),
}

impl ValidationError {
    /// HTTP status code for this failure.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::Unavailable(_)) | Self::Timeout(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Store(StoreError::Backend(_))
            | Self::MisconfiguredCredential(_)
            | Self::IncompleteRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the failure as a bodiless HTTP response without a MAC challenge.
    #[must_use]
    pub fn into_response(self) -> http::Response<String> {
        let mut response = http::Response::new(String::new());
        *response.status_mut() = self.status_code();
        response
    }
}
