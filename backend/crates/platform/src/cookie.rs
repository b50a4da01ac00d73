//! Cookie Management Infrastructure
//!
//! Set-Cookie rendering and Cookie header parsing shared by the CSRF and
//! session layers.

use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes applied to a cookie, independent of its name and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieAttributes {
    /// Session-lifetime HttpOnly cookie
    pub fn http_only(secure: bool) -> Self {
        Self {
            secure,
            ..Self::default()
        }
    }

    /// Cookie readable by page scripts (double-submit tokens)
    pub fn script_readable(secure: bool) -> Self {
        Self {
            secure,
            http_only: false,
            ..Self::default()
        }
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, name: &str, value: &str) -> String {
        let mut cookie = format!("{}={}", name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build Set-Cookie header for deletion (expired)
    pub fn build_delete_cookie(&self, name: &str) -> String {
        let mut cookie = format!("{}=", name);
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!(
            "; SameSite={}; Path={}; Max-Age=0",
            self.same_site.as_str(),
            self.path
        ));
        cookie
    }
}

/// Extract a cookie value from headers
///
/// Looks through every `Cookie` header, first match wins.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}

/// Convert a rendered cookie into a header value.
///
/// Cookie names and values built in this crate are ASCII, so a failure
/// here only drops the cookie.
pub fn to_header_value(cookie: String) -> Option<HeaderValue> {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::error!("Refusing to emit malformed Set-Cookie header");
            None
        }
    }
}
