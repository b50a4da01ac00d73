//! Session Trust
//!
//! Trust is carried entirely by cookies and rebuilt on every request; the
//! server keeps no session table. Business code never looks at cookies.
//! It sees a [`SessionTrust`] placed in request extensions by
//! [`resolve_session_trust`], produced by whichever [`SessionAuthority`] the
//! binary installed.
//!
//! ## Cookie contract
//! - `auth=1` when authenticated
//! - `admin=1` or `admin=0`
//! - `user_id=<uuid>` for the authenticated identity
//!
//! [`PlainCookieAuthority`] reads and writes those values verbatim, which
//! means a client can forge them. [`SignedCookieAuthority`] appends an
//! HMAC-SHA256 tag to every value and treats unsigned or tampered values as
//! absent.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, code};
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::cookie::{CookieAttributes, SameSite, extract_cookie, to_header_value};
use crate::crypto::{constant_time_eq, decode_key_32, from_base64_url, hmac_sha256, to_base64_url};

/// Authenticated flag cookie
pub const AUTH_COOKIE: &str = "auth";
/// Admin role cookie
pub const ADMIN_COOKIE: &str = "admin";
/// Identity claim cookie
pub const USER_ID_COOKIE: &str = "user_id";

const TRUST_COOKIES: [&str; 3] = [AUTH_COOKIE, ADMIN_COOKIE, USER_ID_COOKIE];

// ============================================================================
// Configuration
// ============================================================================

/// Cookie policy shared by the trust and CSRF cookies
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl SessionConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::default()
        }
    }

    pub fn trust_cookie_attributes(&self) -> CookieAttributes {
        CookieAttributes {
            same_site: self.cookie_same_site,
            ..CookieAttributes::http_only(self.cookie_secure)
        }
    }

    pub fn csrf_cookie_attributes(&self) -> CookieAttributes {
        CookieAttributes {
            same_site: self.cookie_same_site,
            ..CookieAttributes::script_readable(self.cookie_secure)
        }
    }
}

// ============================================================================
// Trust and access decisions
// ============================================================================

/// Per-request trust derived from cookies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTrust {
    pub authenticated: bool,
    pub is_admin: bool,
    pub identity_id: Option<Uuid>,
}

impl SessionTrust {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Trust granted after a successful login or registration
    pub fn for_identity(identity_id: Uuid, is_admin: bool) -> Self {
        Self {
            authenticated: true,
            is_admin,
            identity_id: Some(identity_id),
        }
    }

    pub fn require_authenticated(&self) -> Result<(), AccessDenied> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AccessDenied::Unauthenticated)
        }
    }

    /// Authentication is checked before the role.
    pub fn require_admin(&self) -> Result<(), AccessDenied> {
        self.require_authenticated()?;
        if self.is_admin {
            Ok(())
        } else {
            Err(AccessDenied::Forbidden)
        }
    }

    /// Identity of the caller. A session without the claim counts as
    /// unauthenticated.
    pub fn require_identity(&self) -> Result<Uuid, AccessDenied> {
        self.require_authenticated()?;
        self.identity_id.ok_or(AccessDenied::Unauthenticated)
    }

    fn from_claims(auth: Option<String>, admin: Option<String>, user_id: Option<String>) -> Self {
        let authenticated = auth.as_deref() == Some("1");
        if !authenticated {
            return Self::anonymous();
        }

        Self {
            authenticated,
            is_admin: admin.as_deref() == Some("1"),
            identity_id: user_id.and_then(|raw| Uuid::parse_str(&raw).ok()),
        }
    }

    fn claims(&self) -> Vec<(&'static str, String)> {
        let mut claims = vec![
            (AUTH_COOKIE, "1".to_string()),
            (ADMIN_COOKIE, if self.is_admin { "1" } else { "0" }.to_string()),
        ];
        if let Some(id) = self.identity_id {
            claims.push((USER_ID_COOKIE, id.to_string()));
        }
        claims
    }
}

impl<S> FromRequestParts<S> for SessionTrust
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    /// Falls back to anonymous when no trust layer ran
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SessionTrust>()
            .copied()
            .unwrap_or_default())
    }
}

/// Rejections issued before business logic runs
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Administrator role required")]
    Forbidden,

    #[error("Missing or invalid CSRF token")]
    CsrfInvalid,
}

impl AccessDenied {
    pub fn to_app_error(&self) -> AppError {
        match self {
            AccessDenied::Unauthenticated => {
                AppError::unauthorized(self.to_string()).with_code(code::UNAUTHENTICATED)
            }
            AccessDenied::Forbidden => {
                AppError::forbidden(self.to_string()).with_code(code::FORBIDDEN)
            }
            AccessDenied::CsrfInvalid => AppError::forbidden(self.to_string())
                .with_code(code::CSRF_INVALID)
                .with_action("Reload the page and try again"),
        }
    }
}

impl IntoResponse for AccessDenied {
    fn into_response(self) -> Response {
        tracing::warn!(reason = %self, "Request rejected");
        self.to_app_error().into_response()
    }
}

// ============================================================================
// Authorities
// ============================================================================

/// Reads and writes trust cookies
pub trait SessionAuthority: Send + Sync + 'static {
    /// Rebuild trust from request cookies. Never fails; unknown means anonymous.
    fn read(&self, headers: &HeaderMap) -> SessionTrust;

    /// Set-Cookie values granting `trust`
    fn issue(&self, trust: &SessionTrust) -> Vec<HeaderValue>;

    /// Set-Cookie values expiring every trust cookie
    fn clear(&self) -> Vec<HeaderValue>;
}

/// Authority shared across routers and middleware
pub type SharedAuthority = Arc<dyn SessionAuthority>;

fn clear_trust_cookies(attrs: &CookieAttributes) -> Vec<HeaderValue> {
    TRUST_COOKIES
        .iter()
        .filter_map(|name| to_header_value(attrs.build_delete_cookie(name)))
        .collect()
}

/// Unsigned cookies, exactly the documented contract
#[derive(Debug, Clone, Default)]
pub struct PlainCookieAuthority {
    config: SessionConfig,
}

impl PlainCookieAuthority {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl SessionAuthority for PlainCookieAuthority {
    fn read(&self, headers: &HeaderMap) -> SessionTrust {
        SessionTrust::from_claims(
            extract_cookie(headers, AUTH_COOKIE),
            extract_cookie(headers, ADMIN_COOKIE),
            extract_cookie(headers, USER_ID_COOKIE),
        )
    }

    fn issue(&self, trust: &SessionTrust) -> Vec<HeaderValue> {
        let attrs = self.config.trust_cookie_attributes();
        trust
            .claims()
            .into_iter()
            .filter_map(|(name, value)| to_header_value(attrs.build_set_cookie(name, &value)))
            .collect()
    }

    fn clear(&self) -> Vec<HeaderValue> {
        clear_trust_cookies(&self.config.trust_cookie_attributes())
    }
}

/// Cookies carrying `value.base64url(HMAC-SHA256(secret, "name=value"))`
#[derive(Clone)]
pub struct SignedCookieAuthority {
    config: SessionConfig,
    secret: Zeroizing<[u8; 32]>,
}

impl SignedCookieAuthority {
    pub fn new(config: SessionConfig, secret: [u8; 32]) -> Self {
        Self {
            config,
            secret: Zeroizing::new(secret),
        }
    }

    /// Build from a base64 secret. `None` when it is not 32 bytes.
    pub fn from_base64_secret(config: SessionConfig, encoded: &str) -> Option<Self> {
        decode_key_32(encoded).map(|secret| Self { config, secret })
    }

    fn tag(&self, name: &str, value: &str) -> [u8; 32] {
        hmac_sha256(&self.secret[..], format!("{name}={value}").as_bytes())
    }

    fn sign(&self, name: &str, value: &str) -> String {
        format!("{}.{}", value, to_base64_url(&self.tag(name, value)))
    }

    fn verified(&self, headers: &HeaderMap, name: &str) -> Option<String> {
        let raw = extract_cookie(headers, name)?;
        let (value, tag) = raw.rsplit_once('.')?;
        let tag = from_base64_url(tag).ok()?;

        if constant_time_eq(&self.tag(name, value), &tag) {
            Some(value.to_string())
        } else {
            tracing::warn!(cookie = name, "Trust cookie signature mismatch");
            None
        }
    }
}

impl fmt::Debug for SignedCookieAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedCookieAuthority")
            .field("config", &self.config)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl SessionAuthority for SignedCookieAuthority {
    fn read(&self, headers: &HeaderMap) -> SessionTrust {
        SessionTrust::from_claims(
            self.verified(headers, AUTH_COOKIE),
            self.verified(headers, ADMIN_COOKIE),
            self.verified(headers, USER_ID_COOKIE),
        )
    }

    fn issue(&self, trust: &SessionTrust) -> Vec<HeaderValue> {
        let attrs = self.config.trust_cookie_attributes();
        trust
            .claims()
            .into_iter()
            .filter_map(|(name, value)| {
                to_header_value(attrs.build_set_cookie(name, &self.sign(name, &value)))
            })
            .collect()
    }

    fn clear(&self) -> Vec<HeaderValue> {
        clear_trust_cookies(&self.config.trust_cookie_attributes())
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Middleware that resolves trust and stores it in request extensions
pub async fn resolve_session_trust(
    State(authority): State<SharedAuthority>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let trust = authority.read(req.headers());
    req.extensions_mut().insert(trust);
    next.run(req).await
}
