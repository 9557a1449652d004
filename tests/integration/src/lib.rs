//! End-to-end tests for HTTP MAC authentication.
//!
//! These tests drive the signer and validator together over real
//! `http::Request` values, the way a server would see them. They run
//! in-process against the in-memory stores.
//!
//! ```text
//! cargo test -p httpmac-integration
//! ```

use std::sync::{Arc, Once};

use chrono::{Duration, Utc};
use httpmac_auth::{
    MemoryCredentialStore, MemoryReplayGuard, SignatureContext, SignedRequest, Validator,
};
use httpmac_core::{Credential, CredentialId, MacAuthConfig};

static INIT: Once = Once::new();

/// Identifier from the HTTP MAC draft examples.
pub const TEST_ID: &str = "h480djs93hd8";
/// Key from the HTTP MAC draft examples.
pub const TEST_KEY: &str = "489dks293j39";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// The draft example credential, valid for another day.
#[must_use]
pub fn test_credential() -> Credential {
    Credential::new(
        CredentialId::new(TEST_ID).expect("valid identifier"),
        TEST_KEY,
        Utc::now() + Duration::days(1),
    )
}

/// A validator over in-memory stores holding `credentials`.
///
/// Returns the credential store as well so tests can inspect it.
#[must_use]
pub fn test_validator(
    credentials: impl IntoIterator<Item = Credential>,
    config: MacAuthConfig,
) -> (Validator, Arc<MemoryCredentialStore>) {
    init_tracing();

    let store: Arc<MemoryCredentialStore> = Arc::new(credentials.into_iter().collect());
    let validator = Validator::new(store.clone(), Arc::new(MemoryReplayGuard::new()), config);
    (validator, store)
}

/// Sign a request for `method` + `path` on `example.com:80` and return its
/// parts with `Host` and `Authorization` headers set.
#[must_use]
pub fn signed_parts(
    credential: &Credential,
    method: &str,
    path: &str,
    nonce: Option<&str>,
) -> http::request::Parts {
    let mut builder = SignatureContext::builder()
        .method(method)
        .uri(path)
        .host("example.com")
        .port(80);
    if let Some(nonce) = nonce {
        builder = builder.nonce(nonce);
    }
    let context = builder.build_for_signing().expect("complete signing input");
    let signed = SignedRequest::new(credential, context).expect("credential has a key");

    request_parts(method, path, Some(signed.header_value().as_str()))
}

/// Build request parts for `example.com` with an optional `Authorization`
/// header.
#[must_use]
pub fn request_parts(method: &str, path: &str, authorization: Option<&str>) -> http::request::Parts {
    let mut builder = http::Request::builder()
        .method(method)
        .uri(path)
        .header(http::header::HOST, "example.com");
    if let Some(authorization) = authorization {
        builder = builder.header(http::header::AUTHORIZATION, authorization);
    }
    builder.body(()).expect("valid request").into_parts().0
}

/// The raw `Authorization` header of `parts`.
#[must_use]
pub fn authorization_of(parts: &http::request::Parts) -> String {
    parts.headers[http::header::AUTHORIZATION]
        .to_str()
        .expect("ascii header")
        .to_owned()
}

mod test_flow;
mod test_replay;
