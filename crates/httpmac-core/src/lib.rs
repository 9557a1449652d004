//! Core types, configuration, and errors for HTTP MAC authentication.
//!
//! This crate provides the building blocks shared by the signing and
//! validation sides of the protocol: credential records and the
//! [`MacCredential`] capability trait, the validator configuration, and the
//! common error type.

mod config;
mod credential;
mod error;
mod types;

pub use config::{MacAuthConfig, ReplayCheckOrder};
pub use credential::{Credential, MacCredential, generate_token};
pub use error::{MacAuthError, MacAuthResult};
pub use types::{CredentialId, SecretKey, is_quotable};
