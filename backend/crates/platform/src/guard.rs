//! Request Guards
//!
//! Composes the CSRF and trust layers in the order every state-changing
//! route relies on: cookie issuance, then CSRF verification, then trust
//! resolution. Authentication and role checks run in handlers afterwards.

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};

use crate::csrf::{issue_csrf_cookie, require_csrf};
use crate::session::{SessionConfig, SharedAuthority, resolve_session_trust};

/// Wrap a router with CSRF protection and session trust resolution
pub fn protect(router: Router, authority: SharedAuthority, config: SessionConfig) -> Router {
    // Layers run outermost-first in reverse order of attachment
    router
        .layer(from_fn_with_state(authority, resolve_session_trust))
        .layer(from_fn(require_csrf))
        .layer(from_fn_with_state(config, issue_csrf_cookie))
}
