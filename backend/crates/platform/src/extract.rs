//! Request Extractors
//!
//! Wrappers around axum's `Json` and `Path` that reject with the unified
//! problem body (`VALIDATION_ERROR`) instead of axum's plain-text errors.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use kernel::error::{app_error::AppError, code};
use serde::de::DeserializeOwned;

/// JSON body that must deserialize into `T`
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON",
        _ => "Invalid request body",
    };
    AppError::bad_request(message)
        .with_code(code::VALIDATION_ERROR)
        .with_source(rejection)
}

/// Path parameters that must parse into `T`
#[derive(Debug, Clone, Copy)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

fn path_rejection(rejection: PathRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected path parameter");
    AppError::bad_request("Invalid path parameter")
        .with_code(code::VALIDATION_ERROR)
        .with_source(rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::routing::post;
    use serde::Deserialize;
    use tower::ServiceExt;
    use uuid::Uuid;

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Flag {
        admin: bool,
    }

    fn app() -> Router {
        Router::new().route(
            "/{id}",
            post(
                |ValidatedPath(id): ValidatedPath<Uuid>, ValidatedJson(flag): ValidatedJson<Flag>| async move {
                    format!("{id}:{}", flag.admin)
                },
            ),
        )
    }

    async fn send(path: String, body: &'static str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(
                Request::post(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_accepts_valid_input() {
        let (status, _) = send(format!("/{}", Uuid::new_v4()), r#"{"admin":true}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_bad_body_with_validation_code() {
        for body in [r#"{"admin":"yes"}"#, r#"{"admin":true,"x":1}"#, "{", "{}"] {
            let (status, json) = send(format!("/{}", Uuid::new_v4()), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(json["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_rejects_bad_path() {
        let (status, json) = send("/not-a-uuid".to_string(), r#"{"admin":true}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}
