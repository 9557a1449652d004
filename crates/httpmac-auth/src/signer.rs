//! HMAC-SHA1 request signing.
//!
//! `mac = Base64(HMAC-SHA1(key, canonical_string))`, where the key is the
//! credential's raw secret bytes. The resulting `Authorization` header has a
//! fixed parameter order:
//!
//! ```text
//! MAC nonce="<nonce>", mac="<mac>", id="<id>", ts="<ts>"[, ext="<ext>"]
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use httpmac_core::MacCredential;
use sha1::Sha1;
use tracing::debug;

use crate::canonical::SignatureContext;
use crate::error::SignError;

type HmacSha1 = Hmac<Sha1>;

/// Compute `Base64(HMAC-SHA1(key, canonical))`.
///
/// # Examples
///
/// ```
/// use httpmac_auth::signer::compute_signature;
///
/// let base = "1336363200\ndj83hs9s\nGET\n/resource/1?b=1&a=2\nexample.com\n80\n\n";
/// let mac = compute_signature(b"489dks293j39", base).unwrap();
/// assert_eq!(mac, "6T3zZzy2Emppni6bzL7kdRxUWL4=");
/// ```
pub fn compute_signature(key: &[u8], canonical: &str) -> Result<String, SignError> {
    if key.is_empty() {
        return Err(SignError::MissingKey);
    }
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| SignError::MissingKey)?;
    mac.update(canonical.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Sign a context with a credential and return the base64 MAC.
pub fn sign(
    credential: &(impl MacCredential + ?Sized),
    context: &SignatureContext,
) -> Result<String, SignError> {
    let canonical = context.canonical_string();
    debug!(
        id = credential.identifier(),
        canonical = ?canonical,
        "Signing MAC canonical string"
    );
    compute_signature(credential.key(), &canonical)
}

/// Build the `Authorization` header value for a signed context.
///
/// # Examples
///
/// ```
/// use httpmac_auth::canonical::SignatureContext;
/// use httpmac_auth::signer::authorization_header;
///
/// let ctx = SignatureContext::builder()
///     .timestamp(1_336_363_200)
///     .nonce("dj83hs9s")
///     .method("GET")
///     .uri("/")
///     .host("example.com")
///     .port(80)
///     .build_for_validation()
///     .unwrap();
/// assert_eq!(
///     authorization_header("h480djs93hd8", &ctx, "abc="),
///     r#"MAC nonce="dj83hs9s", mac="abc=", id="h480djs93hd8", ts="1336363200""#
/// );
/// ```
#[must_use]
pub fn authorization_header(identifier: &str, context: &SignatureContext, mac: &str) -> String {
    let mut header = format!(
        "MAC nonce=\"{}\", mac=\"{mac}\", id=\"{identifier}\", ts=\"{}\"",
        context.nonce(),
        context.timestamp(),
    );
    if !context.ext().is_empty() {
        header.push_str(&format!(", ext=\"{}\"", context.ext()));
    }
    header
}

/// A signed request ready to be sent.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    identifier: String,
    context: SignatureContext,
    mac: String,
}

impl SignedRequest {
    /// Sign `context` with `credential`.
    pub fn new(
        credential: &(impl MacCredential + ?Sized),
        context: SignatureContext,
    ) -> Result<Self, SignError> {
        let mac = sign(credential, &context)?;
        Ok(Self {
            identifier: credential.identifier().to_owned(),
            context,
            mac,
        })
    }

    /// The signed context.
    #[must_use]
    pub fn context(&self) -> &SignatureContext {
        &self.context
    }

    /// The base64 MAC.
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// The canonical string that was signed.
    #[must_use]
    pub fn base_string(&self) -> String {
        self.context.canonical_string()
    }

    /// The `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        authorization_header(&self.identifier, &self.context, &self.mac)
    }

    /// The `Authorization` header value as an [`http::HeaderValue`].
    ///
    /// # Errors
    /// Fails if the nonce, identifier, or ext contain bytes not allowed in a
    /// header.
    pub fn to_header_value(&self) -> Result<http::HeaderValue, http::header::InvalidHeaderValue> {
        http::HeaderValue::from_str(&self.header_value())
    }
}
