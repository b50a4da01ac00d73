//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use kernel::error::app_error::AppError;
use platform::extract::ValidatedJson;
use platform::session::SessionTrust;
use std::sync::Arc;

use crate::application::{ReadCountersUseCase, UpdateCounterUseCase};
use crate::domain::repository::CounterRepository;
use crate::error::CounterResult;
use crate::presentation::dto::{
    CountersResponse, LegacyCountersResponse, UpdateCounterRequest, UpdateCounterResponse,
};

/// Shared state for counter handlers
#[derive(Clone)]
pub struct CrecheAppState<R>
where
    R: CounterRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

/// GET /api/creches
pub async fn read_counters<R>(
    State(state): State<CrecheAppState<R>>,
) -> CounterResult<Json<CountersResponse>>
where
    R: CounterRepository + Clone + Send + Sync + 'static,
{
    let counters = ReadCountersUseCase::new(state.repo.clone()).execute().await?;
    Ok(Json(counters.into()))
}

/// GET /api/creche
pub async fn read_counters_legacy<R>(
    State(state): State<CrecheAppState<R>>,
) -> CounterResult<Json<LegacyCountersResponse>>
where
    R: CounterRepository + Clone + Send + Sync + 'static,
{
    let counters = ReadCountersUseCase::new(state.repo.clone()).execute().await?;
    Ok(Json(counters.into()))
}

/// PATCH /api/creches
///
/// Role is checked before the body is looked at.
pub async fn update_counter<R>(
    State(state): State<CrecheAppState<R>>,
    trust: SessionTrust,
    body: Result<ValidatedJson<UpdateCounterRequest>, AppError>,
) -> CounterResult<Json<UpdateCounterResponse>>
where
    R: CounterRepository + Clone + Send + Sync + 'static,
{
    trust.require_admin()?;
    let ValidatedJson(req) = body?;

    let counters = UpdateCounterUseCase::new(state.repo.clone())
        .execute(req.into())
        .await?;

    Ok(Json(counters.into()))
}
