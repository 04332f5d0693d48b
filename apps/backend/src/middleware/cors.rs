use std::env;

use actix_cors::Cors;
use actix_web::http::header;

use super::request_trace::TRACE_HEADER;

const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Origins from the comma-separated `CORS_ALLOWED_ORIGINS`, keeping only
/// http(s) entries. Falls back to localhost when nothing valid is set.
fn allowed_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        origins
    }
}

pub fn cors_middleware() -> Cors {
    let raw = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::IF_NONE_MATCH,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static(TRACE_HEADER),
            header::ETAG,
        ])
        .max_age(3600);

    for origin in allowed_origins(&raw) {
        cors = cors.allowed_origin(&origin);
    }
    cors
}
