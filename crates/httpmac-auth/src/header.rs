//! `Authorization: MAC ...` header parsing.
//!
//! ```text
//! MAC nonce="dj83hs9s", mac="6T3zZzy2Emppni6bzL7kdRxUWL4=", id="h480djs93hd8", ts="1336363200"
//! ```
//!
//! The scheme prefix is the literal, case-sensitive `"MAC "`. A header without
//! it is not a MAC header at all, which is reported as `Ok(None)` rather than
//! as an error so callers can answer with a bare challenge.

use httpmac_core::is_quotable;

use crate::error::ParseError;

/// The scheme prefix, including its single trailing space.
const SCHEME_PREFIX: &str = "MAC ";

/// Parameters of a MAC `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    /// Credential identifier (`id`).
    pub id: String,
    /// Request timestamp in Unix seconds (`ts`).
    pub ts: i64,
    /// Request nonce (`nonce`).
    pub nonce: String,
    /// Base64 signature (`mac`).
    pub mac: String,
    /// Extension string (`ext`), if supplied.
    pub ext: Option<String>,
}

/// Check whether the header value uses the MAC scheme.
#[must_use]
pub fn is_mac_scheme(header: &str) -> bool {
    header.starts_with(SCHEME_PREFIX)
}

/// Parse a raw `Authorization` header value.
///
/// Returns `Ok(None)` for headers of any other scheme.
///
/// # Examples
///
/// ```
/// use httpmac_auth::header::parse_authorization_header;
///
/// let parsed = parse_authorization_header(
///     r#"MAC nonce="dj83hs9s", mac="abc=", id="h480djs93hd8", ts="1336363200""#,
/// )
/// .unwrap()
/// .unwrap();
/// assert_eq!(parsed.id, "h480djs93hd8");
/// assert_eq!(parsed.ts, 1_336_363_200);
/// assert!(parsed.ext.is_none());
///
/// assert!(parse_authorization_header("Bearer token").unwrap().is_none());
/// ```
pub fn parse_authorization_header(header: &str) -> Result<Option<ParsedHeader>, ParseError> {
    let Some(params) = header.strip_prefix(SCHEME_PREFIX) else {
        return Ok(None);
    };

    let mut id = None;
    let mut ts = None;
    let mut nonce = None;
    let mut mac = None;
    let mut ext = None;

    for (key, value) in Params::new(params) {
        let (key, value) = (key?, value);
        let slot = match key {
            "id" => &mut id,
            "ts" => &mut ts,
            "nonce" => &mut nonce,
            "mac" => &mut mac,
            "ext" => &mut ext,
            other => return Err(ParseError::UnidentifiedParameter(other.to_owned())),
        };
        if slot.is_some() {
            return Err(ParseError::DuplicateParameter(key.to_owned()));
        }
        if !is_quotable(value) {
            return Err(ParseError::MalformedParameter);
        }
        *slot = Some(value.to_owned());
    }

    let mac = mac.ok_or(ParseError::MissingParameter("mac"))?;
    let nonce = nonce.ok_or(ParseError::MissingParameter("nonce"))?;
    let id = id.ok_or(ParseError::MissingParameter("id"))?;
    let ts = ts.ok_or(ParseError::MissingParameter("ts"))?;

    Ok(Some(ParsedHeader {
        id,
        ts: parse_timestamp(&ts)?,
        nonce,
        mac,
        ext,
    }))
}

/// `ts` is signed as the client wrote it, so only the canonical decimal form
/// is accepted: no sign and no leading zeros.
fn parse_timestamp(raw: &str) -> Result<i64, ParseError> {
    if raw.is_empty()
        || !raw.bytes().all(|b| b.is_ascii_digit())
        || (raw.len() > 1 && raw.starts_with('0'))
    {
        return Err(ParseError::InvalidTimestamp);
    }
    raw.parse().map_err(|_| ParseError::InvalidTimestamp)
}

/// Iterator over `key="value"` pairs separated by commas and whitespace.
///
/// Yields `(Err(MalformedParameter), "")` once and stops when the remaining
/// text is not a well-formed pair.
struct Params<'a> {
    rest: &'a str,
    failed: bool,
}

impl<'a> Params<'a> {
    fn new(params: &'a str) -> Self {
        Self {
            rest: params,
            failed: false,
        }
    }

    fn next_pair(&mut self) -> Option<(&'a str, &'a str)> {
        let (key, after) = self.rest.split_once('=')?;
        let key = key.trim();
        if key.is_empty()
            || !key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return None;
        }
        let quoted = after.trim_start().strip_prefix('"')?;
        let (value, remaining) = quoted.split_once('"')?;
        let remaining = remaining.trim_start();
        if !remaining.is_empty() && !remaining.starts_with(',') {
            return None;
        }
        self.rest = remaining;
        Some((key, value))
    }
}

impl<'a> Iterator for Params<'a> {
    type Item = (Result<&'a str, ParseError>, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.rest = self
            .rest
            .trim_start_matches(|c: char| c == ',' || c.is_ascii_whitespace());
        if self.rest.is_empty() {
            return None;
        }
        match self.next_pair() {
            Some((key, value)) => Some((Ok(key), value)),
            None => {
                self.failed = true;
                Some((Err(ParseError::MalformedParameter), ""))
            }
        }
    }
}
