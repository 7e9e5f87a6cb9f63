//! Request helpers

use axum::http::{header, HeaderMap};

/// Public base URL of this service as seen by the client, with a trailing slash.
///
/// `configured` wins when set; otherwise the `Host` header and
/// `X-Forwarded-Proto` (default `http`) are used.
pub fn base_url(headers: &HeaderMap, configured: Option<&str>) -> String {
    if let Some(url) = configured {
        return format!("{}/", url.trim_end_matches('/'));
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("http");

    format!("{}://{}/", scheme, host)
}
