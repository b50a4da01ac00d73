//! Creche Router

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::domain::repository::CounterRepository;
use crate::infra::postgres::PgCounterRepository;
use crate::presentation::handlers::{self, CrecheAppState};

/// Create the counters router with PostgreSQL repository
pub fn creche_router(repo: PgCounterRepository) -> Router {
    creche_router_generic(repo)
}

/// Create a generic counters router for any repository implementation
pub fn creche_router_generic<R>(repo: R) -> Router
where
    R: CounterRepository + Clone + Send + Sync + 'static,
{
    let state = CrecheAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route(
            "/api/creches",
            get(handlers::read_counters::<R>).patch(handlers::update_counter::<R>),
        )
        .route("/api/creche", get(handlers::read_counters_legacy::<R>))
        .with_state(state)
}
