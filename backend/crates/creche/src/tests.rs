//! Router-level tests for the creche crate

#[cfg(test)]
mod support {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use platform::guard::protect;
    use platform::session::{PlainCookieAuthority, SessionConfig, SharedAuthority};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::domain::entity::Counters;
    use crate::infra::memory::InMemoryCounterRepository;
    use crate::presentation::router::creche_router_generic;

    pub fn admin_cookies() -> String {
        format!("auth=1; admin=1; user_id={}", uuid::Uuid::new_v4())
    }

    pub fn user_cookies() -> String {
        format!("auth=1; admin=0; user_id={}", uuid::Uuid::new_v4())
    }

    pub fn app_with(repo: InMemoryCounterRepository) -> Router {
        let authority: SharedAuthority =
            Arc::new(PlainCookieAuthority::new(SessionConfig::development()));
        protect(
            creche_router_generic(repo),
            authority,
            SessionConfig::development(),
        )
    }

    pub fn app() -> (Router, InMemoryCounterRepository) {
        let repo = InMemoryCounterRepository::with_counters(Counters::zero());
        (app_with(repo.clone()), repo)
    }

    pub fn patch(cookies: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::PATCH)
            .uri("/api/creches")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, format!("csrf_token=tok; {cookies}"))
            .header("X-CSRF-Token", "tok")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod read_tests {
    use super::support::*;
    use crate::domain::entity::Counters;
    use crate::domain::value_object::{CounterField, CounterValue};
    use crate::infra::memory::InMemoryCounterRepository;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_public_read() {
        let counters = Counters::zero()
            .with(CounterField::Existing, CounterValue::new(3).unwrap())
            .with(CounterField::Promised, CounterValue::new(10).unwrap());
        let app = app_with(InMemoryCounterRepository::with_counters(counters));

        let (status, json) = send(&app, get("/api/creches")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "entregues": 3, "prometidas": 10 }));

        let (status, json) = send(&app, get("/api/creche")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "existentes": 3, "prometidas": 10 }));
    }

    #[tokio::test]
    async fn test_missing_row() {
        let app = app_with(InMemoryCounterRepository::new());

        for uri in ["/api/creches", "/api/creche"] {
            let (status, json) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(json["code"], "NOT_FOUND");
        }
    }
}

#[cfg(test)]
mod update_tests {
    use super::support::*;
    use crate::domain::repository::CounterRepository;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_bounds() {
        let (app, repo) = app();
        let admin = admin_cookies();

        let (status, json) =
            send(&app, patch(&admin, r#"{"campo":"entregues","valor":999999}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({ "sucesso": true, "entregues": 999999, "prometidas": 0 })
        );

        let (status, json) =
            send(&app, patch(&admin, r#"{"campo":"entregues","valor":1000000}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALUE_OUT_OF_RANGE");

        let (status, json) =
            send(&app, patch(&admin, r#"{"campo":"prometidas","valor":-1}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALUE_OUT_OF_RANGE");

        // Rejected updates leave the stored value alone
        let stored = repo.get().await.unwrap().unwrap();
        assert_eq!(stored.existing.get(), 999_999);
        assert_eq!(stored.promised.get(), 0);
    }

    #[tokio::test]
    async fn test_update_validation() {
        let (app, _) = app();
        let admin = admin_cookies();

        for body in [
            r#"{"campo":"existentes","valor":1}"#,
            r#"{"campo":"entregues","valor":1.5}"#,
            r#"{"campo":"entregues","valor":"1"}"#,
            r#"{"campo":"entregues"}"#,
            r#"{"campo":"entregues","valor":1,"x":0}"#,
            "not json",
        ] {
            let (status, json) = send(&app, patch(&admin, body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json["code"], "VALIDATION_ERROR", "{body}");
        }
    }

    #[tokio::test]
    async fn test_update_guard_order() {
        let (app, repo) = app();

        // CSRF before anything else
        let req = axum::http::Request::patch("/api/creches")
            .header("content-type", "application/json")
            .header("cookie", admin_cookies())
            .body(axum::body::Body::from(r#"{"campo":"entregues","valor":1}"#))
            .unwrap();
        let (status, json) = send(&app, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "CSRF_INVALID");

        // Authentication before role, role before body
        let (status, json) = send(&app, patch("", "not json")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "UNAUTHENTICATED");

        let (status, json) = send(&app, patch(&user_cookies(), "not json")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "FORBIDDEN");

        assert_eq!(repo.get().await.unwrap().unwrap().existing.get(), 0);
    }

    #[tokio::test]
    async fn test_ensure_initialized_keeps_existing_row() {
        let (app, repo) = app();
        send(&app, patch(&admin_cookies(), r#"{"campo":"prometidas","valor":7}"#)).await;

        repo.ensure_initialized().await.unwrap();
        let (_, json) = send(&app, get("/api/creches")).await;
        assert_eq!(json, json!({ "entregues": 0, "prometidas": 7 }));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::domain::value_object::{CounterValue, UnknownCounterField};
    use crate::error::CounterError;
    use axum::http::StatusCode;

    #[test]
    fn test_error_status_codes() {
        let out_of_range = CounterValue::new(1_000_000).unwrap_err();
        let cases: Vec<(CounterError, StatusCode, &str)> = vec![
            (
                CounterError::UnknownField(UnknownCounterField("x".to_string())),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (CounterError::NotAnInteger, StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (CounterError::OutOfRange(out_of_range), StatusCode::BAD_REQUEST, "VALUE_OUT_OF_RANGE"),
            (CounterError::NotFound, StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                CounterError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status_code(), status);
            assert_eq!(error.code(), code);
        }
    }

    #[tokio::test]
    async fn test_ensure_initialized_creates_zero_row() {
        use crate::domain::repository::CounterRepository;

        let repo = crate::infra::memory::InMemoryCounterRepository::new();
        assert_eq!(repo.get().await.unwrap(), None);

        repo.ensure_initialized().await.unwrap();
        assert_eq!(
            repo.get().await.unwrap(),
            Some(crate::domain::entity::Counters::zero())
        );
    }
}
