//! Server configuration from environment variables
//!
//! Read once at startup. Missing or malformed required values abort the
//! boot with a message naming the variable.

use anyhow::{Context, bail};
use axum::http::HeaderValue;
use platform::field_cipher::FieldCipher;
use platform::session::{
    PlainCookieAuthority, SessionConfig, SharedAuthority, SignedCookieAuthority,
};
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

pub struct ServerConfig {
    pub database: PgConnectOptions,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub cookie_secure: bool,
    secret_key: String,
    trust_cookie_secret: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret_key = get("SECRET_KEY").context("SECRET_KEY must be set")?;

        // Parts are passed as options, never spliced into a URL
        let database = match get("DATABASE_URL") {
            Some(url) => url
                .trim()
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL is not a valid postgres URL")?,
            None => {
                let user = get("DB_USER").context("DATABASE_URL or DB_USER must be set")?;
                let name = get("DB_NAME").context("DATABASE_URL or DB_NAME must be set")?;
                let host = get("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string());
                let port = match get("DB_PORT") {
                    Some(raw) => raw
                        .trim()
                        .parse()
                        .with_context(|| format!("DB_PORT is not a port number: {raw}"))?,
                    None => DEFAULT_DB_PORT,
                };
                let options = PgConnectOptions::new()
                    .host(&host)
                    .port(port)
                    .username(&user)
                    .database(&name);
                match get("DB_PASSWORD") {
                    Some(password) => options.password(&password),
                    None => options,
                }
            }
        };

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let cookie_secure = match get("COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("COOKIE_SECURE must be true or false, got {raw}"))?,
            None => !cfg!(debug_assertions),
        };

        Ok(Self {
            database,
            max_connections,
            bind_addr,
            frontend_origins,
            cookie_secure,
            secret_key,
            trust_cookie_secret: get("TRUST_COOKIE_SECRET"),
        })
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            cookie_secure: self.cookie_secure,
            ..SessionConfig::default()
        }
    }

    /// Field cipher keyed by `SECRET_KEY`
    pub fn field_cipher(&self) -> anyhow::Result<FieldCipher> {
        FieldCipher::from_base64_key(&self.secret_key)
            .context("SECRET_KEY must be a base64-encoded 32-byte key")
    }

    /// Signed trust cookies when `TRUST_COOKIE_SECRET` is set, plain otherwise
    pub fn session_authority(&self) -> anyhow::Result<SharedAuthority> {
        let config = self.session_config();
        match &self.trust_cookie_secret {
            Some(secret) => {
                let Some(authority) = SignedCookieAuthority::from_base64_secret(config, secret)
                else {
                    bail!("TRUST_COOKIE_SECRET must be a base64-encoded 32-byte key");
                };
                Ok(Arc::new(authority))
            }
            None => Ok(Arc::new(PlainCookieAuthority::new(config))),
        }
    }

    pub fn signed_trust_cookies(&self) -> bool {
        self.trust_cookie_secret.is_some()
    }

    pub fn allowed_origins(&self) -> Vec<HeaderValue> {
        self.frontend_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect()
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("max_connections", &self.max_connections)
            .field("bind_addr", &self.bind_addr)
            .field("frontend_origins", &self.frontend_origins)
            .field("cookie_secure", &self.cookie_secure)
            .field("signed_trust_cookies", &self.signed_trust_cookies())
            .finish_non_exhaustive()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
