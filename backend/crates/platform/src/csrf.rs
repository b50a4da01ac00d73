//! CSRF Double-Submit Protection
//!
//! Every client gets a random `csrf_token` cookie readable by page scripts.
//! State-changing requests must echo it in the `X-CSRF-Token` header.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, Method, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::cookie::{extract_cookie, to_header_value};
use crate::crypto::{constant_time_eq, random_hex};
use crate::session::{AccessDenied, SessionConfig};

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

/// Random bytes per token (rendered as 32 hex characters)
const CSRF_TOKEN_BYTES: usize = 16;

/// Methods that change server state
pub fn is_state_changing(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}

/// Middleware that hands out a CSRF cookie to clients that lack one
pub async fn issue_csrf_cookie(
    State(config): State<SessionConfig>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let has_token = extract_cookie(req.headers(), CSRF_COOKIE).is_some_and(|t| !t.is_empty());

    let mut response = next.run(req).await;

    if !has_token {
        let cookie = config
            .csrf_cookie_attributes()
            .build_set_cookie(CSRF_COOKIE, &random_hex(CSRF_TOKEN_BYTES));
        if let Some(value) = to_header_value(cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Middleware that rejects state-changing requests without a matching token
pub async fn require_csrf(req: Request<Body>, next: Next) -> Response {
    if is_state_changing(req.method()) && !token_matches(&req) {
        tracing::warn!(method = %req.method(), path = %req.uri().path(), "CSRF check failed");
        return AccessDenied::CsrfInvalid.into_response();
    }

    next.run(req).await
}

fn token_matches(req: &Request<Body>) -> bool {
    let Some(cookie) = extract_cookie(req.headers(), CSRF_COOKIE) else {
        return false;
    };
    let Some(header) = req.headers().get(CSRF_HEADER).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    !cookie.is_empty() && constant_time_eq(cookie.as_bytes(), header.as_bytes())
}
