//! Rate limiting middleware

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::warn;

use crate::{error::AppError, middleware::CurrentUser, state::AppState};

/// Fixed-window limit for `GET /api/users/me`, keyed by client IP.
///
/// Only requests that authenticate are counted; the resolved user is left in
/// the request extensions for the handler.
pub async fn me_rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    let (mut parts, body) = request.into_parts();
    CurrentUser::from_request_parts(&mut parts, &state).await?;
    let request = Request::from_parts(parts, body);

    let limits = &state.config().rate_limit;
    let key = rate_limit_key("me", &ip);
    let mut redis = state.redis();

    match hit(&mut redis, &key, limits.me_window_seconds).await {
        Ok((count, ttl)) if count > limits.me_max_requests => {
            warn!(ip = %ip, count, "Rate limit exceeded");
            Err(AppError::TooManyRequests { retry_after: ttl.max(1) as u64 })
        }
        Ok(_) => Ok(next.run(request).await),
        Err(e) => {
            // Fail open: a Redis outage shouldn't take the endpoint down
            warn!(error = %e, "Rate limiter unavailable, allowing request");
            Ok(next.run(request).await)
        }
    }
}

/// Count one request against `key` and return (count, seconds until reset).
///
/// A counter without a TTL gets the window re-applied, so a failed `EXPIRE`
/// can't leave a key that never resets.
pub async fn hit(
    redis: &mut ConnectionManager,
    key: &str,
    window: i64,
) -> Result<(i64, i64), redis::RedisError> {
    let count: i64 = redis.incr(key, 1).await?;

    let mut ttl: i64 = redis.ttl(key).await?;
    if ttl < 0 {
        let _: () = redis.expire(key, window).await?;
        ttl = window;
    }

    Ok((count, ttl))
}

pub fn rate_limit_key(bucket: &str, ip: &str) -> String {
    format!("rate_limit:{}:{}", bucket, ip)
}

/// Peer address recorded by the server, or "unknown" when not served over TCP
fn client_ip(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
