//! Conditional GET support.

use actix_web::http::header::{HeaderMap, IF_NONE_MATCH};

/// True if an `If-None-Match` header matches `etag` (or is the `*` wildcard).
pub fn if_none_match_hits(headers: &HeaderMap, etag: &str) -> bool {
    let Some(raw) = headers.get(IF_NONE_MATCH).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    raw.trim() == "*"
        || raw
            .split(',')
            .map(str::trim)
            .map(|tag| tag.strip_prefix("W/").unwrap_or(tag))
            .any(|tag| tag == etag)
}
