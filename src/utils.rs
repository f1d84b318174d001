//! Request helpers shared by the reporting paths

use actix_web::http::header::HeaderMap;
use actix_web::http::Uri;

/// Request URI as the client sent it: path plus query string
pub fn endpoint(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Look up the request id under `header` in one header map
///
/// Missing or non-UTF-8 values yield an empty string. Callers pick the map:
/// the response headers when a response exists, the request headers only
/// after a panic has discarded it.
pub fn request_id(header: &str, headers: &HeaderMap) -> String {
    headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
