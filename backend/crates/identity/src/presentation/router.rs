//! Identity Router

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use platform::field_cipher::FieldCipher;
use platform::session::SharedAuthority;
use std::sync::Arc;

use crate::domain::repository::IdentityRepository;
use crate::infra::postgres::PgIdentityRepository;
use crate::presentation::handlers::{self, IdentityAppState};

/// Create the Identity router with PostgreSQL repository
pub fn identity_router(
    repo: PgIdentityRepository,
    cipher: Arc<FieldCipher>,
    authority: SharedAuthority,
) -> Router {
    identity_router_generic(repo, cipher, authority)
}

/// Create a generic Identity router for any repository implementation
///
/// Paths are absolute; the router is merged, not nested.
pub fn identity_router_generic<R>(
    repo: R,
    cipher: Arc<FieldCipher>,
    authority: SharedAuthority,
) -> Router
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let state = IdentityAppState {
        repo: Arc::new(repo),
        cipher,
        authority,
    };

    Router::new()
        .route("/api/session", get(handlers::session_status))
        .route("/logout", get(handlers::logout::<R>))
        .route("/api/informacoes", post(handlers::identify::<R>))
        .route("/api/usuario/status", get(handlers::name_status::<R>))
        .route("/api/completar-nome", post(handlers::complete_name::<R>))
        .route("/api/informacoes/listar", get(handlers::list_identities::<R>))
        .route("/api/informacoes/{id}", delete(handlers::delete_identity::<R>))
        .route("/api/informacoes/{id}/admin", patch(handlers::change_role::<R>))
        .with_state(state)
}
