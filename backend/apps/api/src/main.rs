//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors only; request errors are rendered
//! by each context crate.

mod config;

use anyhow::Context;
use axum::{
    Json, Router,
    http::{Method, header},
    routing::get,
};
use creche::{CounterRepository, PgCounterRepository, creche_router};
use identity::{PgIdentityRepository, identity_router};
use platform::csrf::CSRF_HEADER;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,identity=info,creche=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    // Fail before touching the database if the key is unusable
    let cipher = Arc::new(config.field_cipher()?);
    let authority = config.session_authority()?;
    if !config.signed_trust_cookies() {
        tracing::warn!("TRUST_COOKIE_SECRET not set, trust cookies are unsigned");
    }

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.database.clone())
        .await
        .context("failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    tracing::info!("Migrations completed");

    // Counters row must exist before the first read
    let counters = PgCounterRepository::new(pool.clone());
    counters
        .ensure_initialized()
        .await
        .context("failed to initialize counters")?;

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(config.allowed_origins())
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            CSRF_HEADER,
        ]))
        .allow_credentials(true);

    // Build router
    let routes = Router::new()
        .route("/health", get(health))
        .merge(identity_router(
            PgIdentityRepository::new(pool.clone()),
            cipher,
            authority.clone(),
        ))
        .merge(creche_router(counters));

    let app = platform::guard::protect(routes, authority, config.session_config())
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Liveness probe
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
