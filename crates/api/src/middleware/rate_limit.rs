//! Per-client rate limiting for every route.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::AppState;
use crate::error::ApiError;

/// Key used when the connection address is unavailable.
pub const UNKNOWN_CLIENT: &str = "unknown";

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| UNKNOWN_CLIENT.to_string(), |info| info.0.ip().to_string())
}

/// Counts the request against its client's window.
///
/// Accepted responses carry `X-RateLimit-Limit` and `X-RateLimit-Remaining`;
/// rejections are a 429 with `Retry-After`.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);

    match state.rate_limiter.check(&client) {
        Ok(status) => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(LIMIT_HEADER, HeaderValue::from(status.limit));
            headers.insert(REMAINING_HEADER, HeaderValue::from(status.remaining));
            response
        }
        Err(exceeded) => {
            warn!(client = %client, retry_after = exceeded.retry_after_secs, "Rate limit exceeded");
            let mut response = ApiError::from(exceeded).into_response();
            let headers = response.headers_mut();
            headers.insert(RETRY_AFTER, HeaderValue::from(exceeded.retry_after_secs));
            headers.insert(LIMIT_HEADER, HeaderValue::from(exceeded.limit));
            headers.insert(REMAINING_HEADER, HeaderValue::from(0_u32));
            response
        }
    }
}
