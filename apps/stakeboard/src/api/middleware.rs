//! # Middleware Module
//!
//! Global request throttling for the Stakeboard HTTP API, driven by
//! `server.rate_limit` (or `STAKEBOARD_RATE_LIMIT`). A limit of 0 turns it
//! off and no layer is installed.

use super::types::ErrorResponse;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

// =============================================================================
// RATE LIMITER
// =============================================================================

/// One limiter shared by every route.
pub type SharedLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Limiter allowing `requests_per_second`, bursting up to the same amount.
/// `None` when the rate is 0.
pub fn build_limiter(requests_per_second: u32) -> Option<SharedLimiter> {
    NonZeroU32::new(requests_per_second)
        .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))))
}

/// Reject requests over the limit with 429 and an error body.
pub async fn throttle(
    State(limiter): State<SharedLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if limiter.check().is_ok() {
        return next.run(request).await;
    }

    tracing::warn!(
        event = "rate_limited",
        method = %request.method(),
        path = %request.uri().path()
    );
    too_many_requests()
}

fn too_many_requests() -> Response {
    let body = ErrorResponse {
        error: StatusCode::TOO_MANY_REQUESTS
            .canonical_reason()
            .unwrap_or("Too Many Requests")
            .to_string(),
    };
    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_disables_limiting() {
        assert!(build_limiter(0).is_none());
    }

    #[test]
    fn burst_matches_rate() {
        let limiter = build_limiter(2).expect("non-zero rate");
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }

    #[test]
    fn rejection_body_names_the_status() {
        let response = too_many_requests();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
