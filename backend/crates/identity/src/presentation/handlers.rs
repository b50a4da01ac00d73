//! HTTP Handlers
//!
//! Guards run in a fixed order inside each handler: authentication, then
//! role, then the request body/path. CSRF was already enforced by the
//! `platform::guard` layers before any handler runs.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use kernel::error::app_error::AppError;
use kernel::id::IdentityId;
use platform::extract::{ValidatedJson, ValidatedPath};
use platform::field_cipher::FieldCipher;
use platform::session::{SessionTrust, SharedAuthority};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    ChangeRoleUseCase, CompleteNameUseCase, DeleteIdentityUseCase, IdentifyInput,
    IdentifyOutcome, IdentifyUseCase, ListIdentitiesUseCase, NameStatusUseCase,
};
use crate::domain::repository::IdentityRepository;
use crate::error::IdentityResult;
use crate::presentation::dto::{
    ChangeRoleRequest, ChangeRoleResponse, CompleteNameRequest, IdentifyRequest,
    IdentifyResponse, IdentityListItem, NameStatusResponse, SessionStatusResponse,
    SuccessResponse,
};

/// Shared state for identity handlers
#[derive(Clone)]
pub struct IdentityAppState<R>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub cipher: Arc<FieldCipher>,
    pub authority: SharedAuthority,
}

fn with_cookies(mut response: Response, cookies: Vec<HeaderValue>) -> Response {
    for cookie in cookies {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

// ============================================================================
// Identify
// ============================================================================

/// POST /api/informacoes
pub async fn identify<R>(
    State(state): State<IdentityAppState<R>>,
    ValidatedJson(req): ValidatedJson<IdentifyRequest>,
) -> IdentityResult<Response>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = IdentifyUseCase::new(state.repo.clone(), state.cipher.clone());

    let output = use_case
        .execute(IdentifyInput {
            national_id: req.national_id,
            phone: req.phone,
            name: req.name,
        })
        .await?;

    let status = match output.outcome {
        IdentifyOutcome::Login => StatusCode::OK,
        IdentifyOutcome::Register => StatusCode::CREATED,
    };

    let trust = SessionTrust::for_identity(output.identity_id.into_uuid(), output.is_admin);
    let body = IdentifyResponse {
        success: true,
        admin: output.is_admin,
    };

    Ok(with_cookies(
        (status, Json(body)).into_response(),
        state.authority.issue(&trust),
    ))
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/session
pub async fn session_status(trust: SessionTrust) -> (StatusCode, Json<SessionStatusResponse>) {
    if trust.authenticated {
        (
            StatusCode::OK,
            Json(SessionStatusResponse {
                logged_in: true,
                admin: trust.is_admin,
            }),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(SessionStatusResponse {
                logged_in: false,
                admin: false,
            }),
        )
    }
}

/// GET /logout
pub async fn logout<R>(State(state): State<IdentityAppState<R>>) -> Response
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    with_cookies(Redirect::to("/").into_response(), state.authority.clear())
}

// ============================================================================
// Name completion
// ============================================================================

/// GET /api/usuario/status
pub async fn name_status<R>(
    State(state): State<IdentityAppState<R>>,
    trust: SessionTrust,
) -> IdentityResult<Json<NameStatusResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let id = IdentityId::from_uuid(trust.require_identity()?);

    let use_case = NameStatusUseCase::new(state.repo.clone(), state.cipher.clone());
    let name_pending = use_case.execute(&id).await?;

    Ok(Json(NameStatusResponse { name_pending }))
}

/// POST /api/completar-nome
pub async fn complete_name<R>(
    State(state): State<IdentityAppState<R>>,
    trust: SessionTrust,
    body: Result<ValidatedJson<CompleteNameRequest>, AppError>,
) -> IdentityResult<Json<SuccessResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let id = IdentityId::from_uuid(trust.require_identity()?);
    let ValidatedJson(req) = body?;

    let use_case = CompleteNameUseCase::new(state.repo.clone(), state.cipher.clone());
    use_case.execute(&id, &req.name).await?;

    Ok(Json(SuccessResponse::ok()))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/informacoes/listar
pub async fn list_identities<R>(
    State(state): State<IdentityAppState<R>>,
    trust: SessionTrust,
) -> IdentityResult<Json<Vec<IdentityListItem>>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    trust.require_admin()?;

    let use_case = ListIdentitiesUseCase::new(state.repo.clone(), state.cipher.clone());
    let items = use_case
        .execute()
        .await?
        .into_iter()
        .map(IdentityListItem::from)
        .collect();

    Ok(Json(items))
}

/// DELETE /api/informacoes/{id}
pub async fn delete_identity<R>(
    State(state): State<IdentityAppState<R>>,
    trust: SessionTrust,
    path: Result<ValidatedPath<Uuid>, AppError>,
) -> IdentityResult<Json<SuccessResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    trust.require_admin()?;
    let caller = IdentityId::from_uuid(trust.require_identity()?);
    let ValidatedPath(target) = path?;

    let use_case = DeleteIdentityUseCase::new(state.repo.clone());
    use_case.execute(&caller, &IdentityId::from_uuid(target)).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// PATCH /api/informacoes/{id}/admin
pub async fn change_role<R>(
    State(state): State<IdentityAppState<R>>,
    trust: SessionTrust,
    path: Result<ValidatedPath<Uuid>, AppError>,
    body: Result<ValidatedJson<ChangeRoleRequest>, AppError>,
) -> IdentityResult<Json<ChangeRoleResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    trust.require_admin()?;
    let caller = IdentityId::from_uuid(trust.require_identity()?);
    let ValidatedPath(target) = path?;
    let ValidatedJson(req) = body?;

    let use_case = ChangeRoleUseCase::new(state.repo.clone());
    let admin = use_case
        .execute(&caller, &IdentityId::from_uuid(target), req.admin)
        .await?;

    Ok(Json(ChangeRoleResponse {
        success: true,
        admin,
    }))
}
