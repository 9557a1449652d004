//! HTTP MAC access authentication.
//!
//! This crate implements both sides of the HTTP MAC scheme: a client signs
//! each request with `HMAC-SHA1(key, canonical_string)` and sends
//!
//! ```text
//! Authorization: MAC nonce="dj83hs9s", mac="<base64>", id="h480djs93hd8", ts="1336363200"
//! ```
//!
//! and the server recomputes the signature, checks the credential's expiry,
//! and rejects reused (id, ts, nonce) triples.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use httpmac_auth::canonical::SignatureContext;
//! use httpmac_auth::credentials::MemoryCredentialStore;
//! use httpmac_auth::replay::MemoryReplayGuard;
//! use httpmac_auth::request::RequestContext;
//! use httpmac_auth::signer::SignedRequest;
//! use httpmac_auth::validator::Validator;
//! use httpmac_core::{Credential, MacAuthConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = MacAuthConfig::default();
//! let credential = Credential::issue(config.credential_validity()).unwrap();
//! let store: MemoryCredentialStore = [credential.clone()].into_iter().collect();
//! let validator = Validator::new(Arc::new(store), Arc::new(MemoryReplayGuard::new()), config);
//!
//! // Client side.
//! let context = SignatureContext::builder()
//!     .method("GET")
//!     .uri("/protected_resource")
//!     .host("example.com")
//!     .port(80)
//!     .build_for_signing()
//!     .unwrap();
//! let signed = SignedRequest::new(&credential, context).unwrap();
//!
//! // Server side.
//! let request = RequestContext::new("GET", "/protected_resource", 80)
//!     .with_host("example.com")
//!     .with_authorization(signed.header_value());
//! let verdict = validator.validate(&request).await.unwrap();
//! assert!(verdict.is_accepted());
//! # }
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical string construction
//! - [`credentials`] - Credential store trait and in-memory implementation
//! - [`error`] - Signing, parsing, store, and infrastructure error types
//! - [`header`] - `Authorization: MAC` header parsing
//! - [`replay`] - Nonce replay guard trait and in-memory implementation
//! - [`request`] - Request facts taken from the transport layer
//! - [`signer`] - HMAC-SHA1 signing and header construction
//! - [`validator`] - The validation pipeline
//! - [`verdict`] - Validation outcomes and `401` rendering

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod header;
pub mod replay;
pub mod request;
pub mod signer;
pub mod validator;
pub mod verdict;

pub use canonical::{SignatureContext, SignatureContextBuilder};
pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use error::{ParseError, SignError, StoreError, ValidationError};
pub use header::{ParsedHeader, is_mac_scheme, parse_authorization_header};
pub use replay::{MemoryReplayGuard, NonceStatus, ReplayGuard};
pub use request::RequestContext;
pub use signer::{SignedRequest, authorization_header, sign};
pub use validator::Validator;
pub use verdict::{RejectReason, Rejection, Verdict};
