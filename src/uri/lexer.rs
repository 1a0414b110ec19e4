//! Raw-URI splitting and percent-decoding
//!
//! Splitting happens before decoding so that percent-encoded delimiters
//! (`%2F` in a key value, `%26` in an option text) stay literal.

use super::{UriParseError, UriResult};
use percent_encoding::percent_decode_str;

/// Split a raw resource path into decoded segment tokens. Leading and
/// trailing slashes are ignored; an empty path yields no tokens.
pub(crate) fn split_path(raw: &str) -> UriResult<Vec<String>> {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed.split('/').map(decode).collect()
}

/// Split a raw query string into decoded `(name, text)` pairs in input
/// order. Pairs split at the first `=`; a pair without `=` has empty text.
pub(crate) fn split_query(raw: &str) -> UriResult<Vec<(String, String)>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, text) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode(name)?, decode_query_value(text)?))
        })
        .collect()
}

fn decode(piece: &str) -> UriResult<String> {
    percent_decode_str(piece)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .map_err(|_| UriParseError::Syntax(piece.to_string()))
}

// Query values additionally use the historical `+` encoding for spaces.
fn decode_query_value(piece: &str) -> UriResult<String> {
    decode(&piece.replace('+', " "))
}
