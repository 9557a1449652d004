//! The request facts validation needs from the transport layer.

use http::header::{AUTHORIZATION, HOST};
use http::uri::Authority;

/// Method, target, destination and credentials of an incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// HTTP method.
    pub method: String,
    /// Request URI as signed: path plus query string.
    pub uri: String,
    /// Destination host, if the transport supplied one.
    pub host: Option<String>,
    /// Destination port.
    pub port: u16,
    /// Raw `Authorization` header value.
    pub authorization: Option<String>,
}

impl RequestContext {
    /// Create a context with no host and no credentials.
    #[must_use]
    pub fn new(method: impl Into<String>, uri: impl Into<String>, port: u16) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            host: None,
            port,
            authorization: None,
        }
    }

    /// Set the destination host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the raw `Authorization` header value.
    #[must_use]
    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }

    /// Extract the context from HTTP request parts.
    ///
    /// Host and port come from the `Host` header, falling back to the URI
    /// authority (HTTP/2 requests). A request that declares no port is
    /// assumed to target `default_port`.
    ///
    /// The `Authorization` value is decoded as UTF-8. Invalid sequences become
    /// U+FFFD, which the header parser refuses, so a broken `MAC` header is
    /// reported as malformed rather than absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use httpmac_auth::request::RequestContext;
    ///
    /// let (parts, ()) = http::Request::builder()
    ///     .method("GET")
    ///     .uri("/resource/1?b=1&a=2")
    ///     .header("host", "example.com:8080")
    ///     .body(())
    ///     .unwrap()
    ///     .into_parts();
    ///
    /// let ctx = RequestContext::from_parts(&parts, 80);
    /// assert_eq!(ctx.uri, "/resource/1?b=1&a=2");
    /// assert_eq!(ctx.host.as_deref(), Some("example.com"));
    /// assert_eq!(ctx.port, 8080);
    /// ```
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts, default_port: u16) -> Self {
        let authority = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<Authority>().ok())
            .or_else(|| parts.uri.authority().cloned());

        let host = authority
            .as_ref()
            .map(|a| a.host().to_owned())
            .filter(|h| !h.is_empty());
        let port = authority
            .as_ref()
            .and_then(Authority::port_u16)
            .unwrap_or(default_port);

        let uri = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_owned(), |pq| pq.as_str().to_owned());

        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        Self {
            method: parts.method.as_str().to_owned(),
            uri,
            host,
            port,
            authorization,
        }
    }
}
