//! Request logging middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

/// How loudly a finished request should be reported
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Ok,
    ClientError,
    ServerError,
}

fn classify(status: StatusCode) -> Outcome {
    if status.is_server_error() {
        Outcome::ServerError
    } else if status.is_client_error()
        && status != StatusCode::NOT_FOUND
        && status != StatusCode::UNAUTHORIZED
    {
        Outcome::ClientError
    } else {
        Outcome::Ok
    }
}

/// Log method, route, status and latency of every request
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    // Prefer the route template so ids and tokens don't end up in logs
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);

    match classify(status) {
        Outcome::ServerError => warn!(
            method = %method,
            route = %route,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request failed"
        ),
        Outcome::ClientError => warn!(
            method = %method,
            route = %route,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request rejected"
        ),
        Outcome::Ok => info!(
            method = %method,
            route = %route,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed"
        ),
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(StatusCode::OK), Outcome::Ok);
        assert_eq!(classify(StatusCode::NOT_FOUND), Outcome::Ok);
        assert_eq!(classify(StatusCode::UNAUTHORIZED), Outcome::Ok);
        assert_eq!(classify(StatusCode::CONFLICT), Outcome::ClientError);
        assert_eq!(classify(StatusCode::TOO_MANY_REQUESTS), Outcome::ClientError);
        assert_eq!(classify(StatusCode::BAD_GATEWAY), Outcome::ServerError);
    }
}
