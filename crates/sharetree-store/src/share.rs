//! Share tokens and share links.
//!
//! A share token is the exported tree state, percent-encoded and then
//! base64-encoded, so it survives being embedded in a URL query parameter.
//! Opening a token yields a read-only copy of the tree; nothing is sent
//! over the network.
//!
//! # Examples
//!
//! ```
//! use sharetree_store::share;
//!
//! let token = share::encode_token(r#"{"name":"root"}"#);
//! let url = share::share_url("https://example.test/", "share", &token);
//!
//! let found = share::token_from_url(&url, "share").unwrap();
//! assert_eq!(share::decode_token(&found).unwrap(), r#"{"name":"root"}"#);
//! ```

use crate::types::{Result, StoreError};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

/// Default query parameter carrying the token.
pub const DEFAULT_QUERY_PARAM: &str = "share";

/// Wraps exported state into a share token.
#[must_use]
pub fn encode_token(state: &str) -> String {
    BASE64.encode(urlencoding::encode(state).as_bytes())
}

/// Recovers exported state from a share token.
///
/// # Errors
///
/// Returns `StoreError::InvalidShareToken` if the token is not base64, or
/// does not percent-decode to UTF-8 text.
pub fn decode_token(token: &str) -> Result<String> {
    let bytes = BASE64
        .decode(token.trim())
        .map_err(|e| StoreError::InvalidShareToken {
            reason: format!("not base64: {e}"),
        })?;
    let encoded = String::from_utf8(bytes).map_err(|e| StoreError::InvalidShareToken {
        reason: format!("not UTF-8: {e}"),
    })?;
    urlencoding::decode(&encoded)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| StoreError::InvalidShareToken {
            reason: format!("bad percent-encoding: {e}"),
        })
}

/// Builds a share link by appending the token as a query parameter.
///
/// # Examples
///
/// ```
/// use sharetree_store::share;
///
/// assert_eq!(share::share_url("https://x.test/", "share", "a+b="), "https://x.test/?share=a%2Bb%3D");
/// assert_eq!(share::share_url("https://x.test/?v=1", "s", "t"), "https://x.test/?v=1&s=t");
/// ```
#[must_use]
pub fn share_url(base_url: &str, param: &str, token: &str) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!(
        "{base_url}{separator}{}={}",
        urlencoding::encode(param),
        urlencoding::encode(token)
    )
}

/// Extracts the token carried by `param` from a share link.
///
/// Input without a query string is taken to be a bare token.
///
/// # Examples
///
/// ```
/// use sharetree_store::share;
///
/// assert_eq!(share::token_from_url("https://x.test/?a=1&share=abc%3D#top", "share"), Some("abc=".to_string()));
/// assert_eq!(share::token_from_url("abc=", "share"), Some("abc=".to_string()));
/// assert_eq!(share::token_from_url("https://x.test/?a=1", "share"), None);
/// ```
#[must_use]
pub fn token_from_url(url: &str, param: &str) -> Option<String> {
    let Some((_, query)) = url.split_once('?') else {
        let bare = url.trim();
        return (!bare.is_empty()).then(|| bare.to_string());
    };
    let query = query.split_once('#').map_or(query, |(q, _)| q);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == param)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(std::borrow::Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip_unicode() {
        let state = r#"{"name":"root","note":"héllo wörld ✓ & = ?"}"#;
        assert_eq!(decode_token(&encode_token(state)).unwrap(), state);
    }

    #[test]
    fn test_token_is_url_embeddable_after_encoding() {
        let token = encode_token("{}");
        let url = share_url("https://x.test/", DEFAULT_QUERY_PARAM, &token);
        assert!(!url.contains('{'));
        assert_eq!(token_from_url(&url, DEFAULT_QUERY_PARAM).unwrap(), token);
    }

    #[test]
    fn test_decode_token_rejects_garbage() {
        assert!(decode_token("!!!").unwrap_err().is_malformed());
        // base64 of "%FF", which percent-decodes to invalid UTF-8
        assert!(decode_token("JUZG").unwrap_err().is_malformed());
    }

    #[test]
    fn test_decode_accepts_component_encoding() {
        // base64 of "%7B%22a%22%3A1%7D", i.e. {"a":1} percent-encoded
        let token = BASE64.encode("%7B%22a%22%3A1%7D");
        assert_eq!(decode_token(&token).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_token_from_url_missing_param() {
        assert_eq!(token_from_url("https://x.test/?other=1", "share"), None);
    }
}
