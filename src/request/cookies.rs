//! Cookie header parsing
//!
//! Pure utility over the `Cookie:` request header. No decoding, no cookie
//! attributes; request cookie headers are plain `name=value` pairs.

use hyper::header::HeaderValue;
use std::collections::HashMap;

/// Parse a `Cookie:` header into a name -> value map.
///
/// Pairs are split on `;` and trimmed. Fragments without `=` or with an
/// empty name are skipped; a repeated name keeps the last value.
pub fn parse_cookies(header: Option<&HeaderValue>) -> HashMap<String, String> {
    let raw = match header.and_then(|value| value.to_str().ok()) {
        Some(raw) => raw,
        None => return HashMap::new(),
    };

    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
