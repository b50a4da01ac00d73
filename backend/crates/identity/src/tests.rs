//! Router-level tests for the identity crate
//!
//! Every request goes through the same guard layers the server installs,
//! backed by the in-memory repository.

#[cfg(test)]
mod support {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{HeaderMap, Method, Request, StatusCode, header};
    use platform::field_cipher::FieldCipher;
    use platform::guard::protect;
    use platform::session::{PlainCookieAuthority, SessionConfig, SharedAuthority};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::domain::repository::IdentityRepository;
    use crate::infra::memory::InMemoryIdentityRepository;
    use crate::presentation::router::identity_router_generic;

    pub const CSRF_COOKIE: &str = "csrf_token=tok";
    pub const CSRF_TOKEN: &str = "tok";

    pub fn cipher() -> Arc<FieldCipher> {
        Arc::new(FieldCipher::from_key([3u8; 32]))
    }

    pub fn app() -> (Router, InMemoryIdentityRepository) {
        let repo = InMemoryIdentityRepository::new();
        (app_with(repo.clone()), repo)
    }

    /// Guarded router over any repository
    pub fn app_with<R>(repo: R) -> Router
    where
        R: IdentityRepository + Clone + Send + Sync + 'static,
    {
        let authority: SharedAuthority =
            Arc::new(PlainCookieAuthority::new(SessionConfig::development()));
        let router = identity_router_generic(repo, cipher(), authority.clone());
        protect(router, authority, SessionConfig::development())
    }

    /// Request with a valid CSRF pair plus the given trust cookies
    pub fn request(method: Method, uri: &str, cookies: &str, body: Option<Value>) -> Request<Body> {
        let cookie = if cookies.is_empty() {
            CSRF_COOKIE.to_string()
        } else {
            format!("{CSRF_COOKIE}; {cookies}")
        };
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header("X-CSRF-Token", CSRF_TOKEN);

        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, json)
    }

    /// Trust cookies from Set-Cookie headers, as a Cookie header value
    pub fn trust_cookies(headers: &HeaderMap) -> String {
        headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .filter(|pair| !pair.starts_with("csrf_token="))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Identity id carried in the `user_id` cookie
    pub fn identity_id(cookies: &str) -> uuid::Uuid {
        cookies
            .split("; ")
            .find_map(|pair| pair.strip_prefix("user_id="))
            .and_then(|id| id.parse().ok())
            .unwrap()
    }

    /// Identify and return the trust cookies
    pub async fn identify(app: &Router, cpf: &str, phone: &str) -> String {
        let body = serde_json::json!({ "cpf": cpf, "telefone": phone });
        let (status, headers, _) =
            send(app, request(Method::POST, "/api/informacoes", "", Some(body))).await;
        assert!(status.is_success(), "identify failed with {status}");
        trust_cookies(&headers)
    }
}

#[cfg(test)]
mod identify_tests {
    use super::support::*;
    use crate::domain::entity::Identity;
    use crate::domain::repository::{
        DeleteOutcome, IdentityRepository, InsertOutcome, NameUpdateOutcome, RoleChangeOutcome,
    };
    use crate::domain::value_object::Fingerprint;
    use crate::error::IdentityResult;
    use crate::infra::memory::InMemoryIdentityRepository;
    use axum::http::{Method, StatusCode};
    use kernel::id::IdentityId;
    use serde_json::json;

    #[tokio::test]
    async fn test_register_then_login() {
        let (app, repo) = app();
        let body = json!({ "cpf": "111", "telefone": "222" });

        let (status, headers, json) = send(
            &app,
            request(Method::POST, "/api/informacoes", "", Some(body.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json, json!({ "sucesso": true, "admin": false }));
        let cookies = trust_cookies(&headers);
        assert!(cookies.contains("auth=1"));
        assert!(cookies.contains("admin=0"));
        assert!(cookies.contains("user_id="));

        let (status, headers, json) =
            send(&app, request(Method::POST, "/api/informacoes", "", Some(body))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "sucesso": true, "admin": false }));
        assert_eq!(identity_id(&trust_cookies(&headers)), identity_id(&cookies));

        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_credential_mismatch_table() {
        let (app, repo) = app();
        identify(&app, "111", "222").await;
        identify(&app, "555", "666").await;

        let cases = [
            ("111", "333", "WRONG_PHONE_FOR_ID"),
            ("444", "222", "WRONG_ID_FOR_PHONE"),
            ("111", "666", "MISMATCHED_CREDENTIALS"),
        ];
        for (cpf, phone, code) in cases {
            let body = json!({ "cpf": cpf, "telefone": phone });
            let (status, headers, json) =
                send(&app, request(Method::POST, "/api/informacoes", "", Some(body))).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{cpf}/{phone}");
            assert_eq!(json["code"], code);
            assert!(json["erro"].is_string());
            assert!(trust_cookies(&headers).is_empty());
        }

        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_bodies() {
        let (app, repo) = app();
        let bodies = [
            json!({ "cpf": "", "telefone": "222" }),
            json!({ "telefone": "222" }),
            json!({ "cpf": "111", "telefone": "222", "admin": true }),
            json!({ "cpf": 111, "telefone": "222" }),
        ];
        for body in bodies {
            let (status, _, json) =
                send(&app, request(Method::POST, "/api/informacoes", "", Some(body))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["code"], "VALIDATION_ERROR");
        }
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_name_at_registration_stores_nothing() {
        let (app, repo) = app();
        let body = json!({ "cpf": "111", "telefone": "222", "nome": "Jo3" });
        let (status, _, json) =
            send(&app, request(Method::POST, "/api/informacoes", "", Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "NAME_INVALID_CHARSET");
        assert!(repo.is_empty());
    }

    /// Store whose lookups ran before a concurrent registration committed
    #[derive(Clone, Default)]
    struct LateLookupRepository {
        inner: InMemoryIdentityRepository,
    }

    impl IdentityRepository for LateLookupRepository {
        async fn insert(&self, identity: &Identity) -> IdentityResult<InsertOutcome> {
            self.inner.insert(identity).await
        }

        async fn find_by_id(&self, id: &IdentityId) -> IdentityResult<Option<Identity>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_national_id_fingerprint(
            &self,
            _fingerprint: &Fingerprint,
        ) -> IdentityResult<Option<Identity>> {
            Ok(None)
        }

        async fn find_by_phone_fingerprint(
            &self,
            _fingerprint: &Fingerprint,
        ) -> IdentityResult<Option<Identity>> {
            Ok(None)
        }

        async fn list_all(&self) -> IdentityResult<Vec<Identity>> {
            self.inner.list_all().await
        }

        async fn update_name(
            &self,
            id: &IdentityId,
            expected: &str,
            encrypted_name: &str,
        ) -> IdentityResult<NameUpdateOutcome> {
            self.inner.update_name(id, expected, encrypted_name).await
        }

        async fn delete_unless_admin(&self, id: &IdentityId) -> IdentityResult<DeleteOutcome> {
            self.inner.delete_unless_admin(id).await
        }

        async fn set_admin(
            &self,
            id: &IdentityId,
            is_admin: bool,
        ) -> IdentityResult<RoleChangeOutcome> {
            self.inner.set_admin(id, is_admin).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_registration_is_duplicate() {
        let repo = LateLookupRepository::default();
        let app = app_with(repo.clone());
        let body = json!({ "cpf": "111", "telefone": "222" });

        let (status, _, _) = send(
            &app,
            request(Method::POST, "/api/informacoes", "", Some(body.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        // Both lookups miss again, the insert hits the unique fingerprints
        let (status, headers, json) =
            send(&app, request(Method::POST, "/api/informacoes", "", Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "DUPLICATE_CREDENTIAL");
        assert!(!trust_cookies(&headers).contains("auth="));
        assert_eq!(repo.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_requires_csrf() {
        let (app, repo) = app();
        let req = axum::http::Request::post("/api/informacoes")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"cpf":"1","telefone":"2"}"#))
            .unwrap();
        let (status, _, json) = send(&app, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "CSRF_INVALID");
        assert!(repo.is_empty());
    }
}

#[cfg(test)]
mod session_tests {
    use super::support::*;
    use axum::http::{Method, StatusCode, header};
    use serde_json::json;

    #[tokio::test]
    async fn test_session_status() {
        let (app, _) = app();

        let (status, _, json) = send(&app, request(Method::GET, "/api/session", "", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json, json!({ "logado": false, "admin": false }));

        let (status, _, json) =
            send(&app, request(Method::GET, "/api/session", "auth=1; admin=1", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "logado": true, "admin": true }));
    }

    #[tokio::test]
    async fn test_logout_clears_trust_cookies() {
        let (app, _) = app();
        let cookies = identify(&app, "111", "222").await;

        let (status, headers, _) = send(&app, request(Method::GET, "/logout", &cookies, None)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/");

        let cleared: Vec<&str> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        for name in ["auth=", "admin=", "user_id="] {
            assert!(
                cleared.iter().any(|c| c.starts_with(name) && c.contains("Max-Age=0")),
                "{name} not cleared"
            );
        }
    }
}

#[cfg(test)]
mod name_tests {
    use super::support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    async fn complete(app: &axum::Router, cookies: &str, name: &str) -> (StatusCode, serde_json::Value) {
        let (status, _, json) = send(
            app,
            request(
                Method::POST,
                "/api/completar-nome",
                cookies,
                Some(json!({ "nome": name })),
            ),
        )
        .await;
        (status, json)
    }

    async fn pending(app: &axum::Router, cookies: &str) -> bool {
        let (status, _, json) =
            send(app, request(Method::GET, "/api/usuario/status", cookies, None)).await;
        assert_eq!(status, StatusCode::OK);
        json["nome_pendente"].as_bool().unwrap()
    }

    #[tokio::test]
    async fn test_name_completion_flow() {
        let (app, _) = app();
        let cookies = identify(&app, "111", "222").await;
        assert!(pending(&app, &cookies).await);

        let (status, json) = complete(&app, &cookies, "Jo3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "NAME_INVALID_CHARSET");

        let (status, json) = complete(&app, &cookies, "Jo").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "NAME_TOO_SHORT");

        let (status, json) = complete(&app, &cookies, "João Silva").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "sucesso": true }));
        assert!(!pending(&app, &cookies).await);

        let (status, json) = complete(&app, &cookies, "Outro Nome").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "NAME_ALREADY_SET");
    }

    #[tokio::test]
    async fn test_placeholder_cannot_complete_name() {
        let (app, _) = app();
        let cookies = identify(&app, "111", "222").await;

        let (status, json) = complete(&app, &cookies, "Sem Nome").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(pending(&app, &cookies).await);

        let (status, _) = complete(&app, &cookies, "João Silva").await;
        assert_eq!(status, StatusCode::OK);
        let (status, json) = complete(&app, &cookies, "Outro Nome").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "NAME_ALREADY_SET");
    }

    #[tokio::test]
    async fn test_placeholder_rejected_at_registration() {
        let (app, repo) = app();
        let body = json!({ "cpf": "111", "telefone": "222", "nome": "Sem Nome" });
        let (status, headers, json) =
            send(&app, request(Method::POST, "/api/informacoes", "", Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(trust_cookies(&headers).is_empty());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_registration_with_name_is_complete() {
        let (app, _) = app();
        let body = json!({ "cpf": "111", "telefone": "222", "nome": "Maria" });
        let (_, headers, _) =
            send(&app, request(Method::POST, "/api/informacoes", "", Some(body))).await;
        assert!(!pending(&app, &trust_cookies(&headers)).await);
    }

    #[tokio::test]
    async fn test_requires_identity() {
        let (app, _) = app();

        let (status, json) = complete(&app, "", "João Silva").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "UNAUTHENTICATED");

        // Authenticated flag without an identity claim
        let (status, _, json) =
            send(&app, request(Method::GET, "/api/usuario/status", "auth=1", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_unknown_identity() {
        let (app, _) = app();
        let cookies = format!("auth=1; admin=0; user_id={}", uuid::Uuid::new_v4());
        let (status, _, json) =
            send(&app, request(Method::GET, "/api/usuario/status", &cookies, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "NOT_FOUND");
    }
}

#[cfg(test)]
mod admin_tests {
    use super::support::*;
    use crate::domain::entity::{Identity, SealedFields};
    use crate::domain::repository::IdentityRepository;
    use crate::domain::value_object::Fingerprint;
    use crate::infra::memory::InMemoryIdentityRepository;
    use axum::Router;
    use axum::http::{Method, StatusCode};
    use kernel::id::IdentityId;
    use serde_json::json;

    /// Register, promote in storage, and log in again to get admin cookies
    async fn admin(app: &Router, repo: &InMemoryIdentityRepository, cpf: &str, phone: &str) -> String {
        let cookies = identify(app, cpf, phone).await;
        repo.set_admin(&IdentityId::from_uuid(identity_id(&cookies)), true)
            .await
            .unwrap();
        let cookies = identify(app, cpf, phone).await;
        assert!(cookies.contains("admin=1"));
        cookies
    }

    #[tokio::test]
    async fn test_list_requires_admin() {
        let (app, repo) = app();
        let user = identify(&app, "111", "222").await;
        let root = admin(&app, &repo, "900", "901").await;

        let (status, _, json) =
            send(&app, request(Method::GET, "/api/informacoes/listar", "", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "UNAUTHENTICATED");

        let (status, _, json) =
            send(&app, request(Method::GET, "/api/informacoes/listar", &user, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "FORBIDDEN");

        let (status, _, json) =
            send(&app, request(Method::GET, "/api/informacoes/listar", &root, None)).await;
        assert_eq!(status, StatusCode::OK);
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 2);
        let plain = items.iter().find(|i| i["cpf"] == "111").unwrap();
        assert_eq!(plain["telefone"], "222");
        assert_eq!(plain["nome"], "Sem Nome");
        assert_eq!(plain["admin"], false);
        assert_eq!(plain["legivel"], true);
    }

    #[tokio::test]
    async fn test_list_survives_unreadable_record() {
        let (app, repo) = app();
        let root = admin(&app, &repo, "900", "901").await;

        let broken = Identity::register(
            SealedFields {
                encrypted_name: "garbage".to_string(),
                encrypted_national_id: "garbage".to_string(),
                encrypted_phone: "garbage".to_string(),
            },
            Fingerprint::of("x1"),
            Fingerprint::of("x2"),
        );
        repo.insert(&broken).await.unwrap();

        let (status, _, json) =
            send(&app, request(Method::GET, "/api/informacoes/listar", &root, None)).await;
        assert_eq!(status, StatusCode::OK);
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 2);
        let unreadable = items
            .iter()
            .find(|i| i["id"] == broken.id.to_string())
            .unwrap();
        assert_eq!(unreadable["legivel"], false);
        assert!(unreadable["nome"].is_null());
        assert!(unreadable["cpf"].is_null());
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let (app, repo) = app();
        let root = admin(&app, &repo, "900", "901").await;
        let other_admin = admin(&app, &repo, "800", "801").await;
        let user = identify(&app, "111", "222").await;

        let delete = |target: uuid::Uuid| {
            request(
                Method::DELETE,
                &format!("/api/informacoes/{target}"),
                &root,
                None,
            )
        };

        let (status, _, json) = send(&app, delete(identity_id(&root))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "SELF_DELETE_FORBIDDEN");

        let (status, _, json) = send(&app, delete(identity_id(&other_admin))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "ADMIN_DELETE_FORBIDDEN");

        assert_eq!(repo.len(), 3);
        let (status, _, json) = send(&app, delete(identity_id(&user))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "sucesso": true }));
        assert_eq!(repo.len(), 2);

        let (status, _, json) = send(&app, delete(identity_id(&user))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "NOT_FOUND");

        let (status, _, json) = send(
            &app,
            request(Method::DELETE, "/api/informacoes/not-a-uuid", &root, None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_delete_by_non_admin() {
        let (app, _) = app();
        let user = identify(&app, "111", "222").await;
        let victim = identify(&app, "333", "444").await;

        let (status, _, json) = send(
            &app,
            request(
                Method::DELETE,
                &format!("/api/informacoes/{}", identity_id(&victim)),
                &user,
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_delete_by_anonymous() {
        let (app, repo) = app();
        let victim = identify(&app, "333", "444").await;

        let (status, _, json) = send(
            &app,
            request(
                Method::DELETE,
                &format!("/api/informacoes/{}", identity_id(&victim)),
                "",
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "UNAUTHENTICATED");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_role_change_requires_admin() {
        let (app, repo) = app();
        let user = identify(&app, "111", "222").await;
        let target = identify(&app, "333", "444").await;
        let uri = format!("/api/informacoes/{}/admin", identity_id(&target));
        let body = json!({ "admin": true });

        let (status, _, json) = send(
            &app,
            request(Method::PATCH, &uri, "", Some(body.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "UNAUTHENTICATED");

        let (status, _, json) =
            send(&app, request(Method::PATCH, &uri, &user, Some(body))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "FORBIDDEN");

        let stored = repo
            .find_by_id(&IdentityId::from_uuid(identity_id(&target)))
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.is_admin);
    }

    #[tokio::test]
    async fn test_role_changes() {
        let (app, repo) = app();
        let root = admin(&app, &repo, "900", "901").await;
        let user = identify(&app, "111", "222").await;

        let change = |cookies: &str, target: uuid::Uuid, body: serde_json::Value| {
            request(
                Method::PATCH,
                &format!("/api/informacoes/{target}/admin"),
                cookies,
                Some(body),
            )
        };

        let (status, _, json) =
            send(&app, change(&root, identity_id(&root), json!({ "admin": false }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "SELF_ROLE_CHANGE_FORBIDDEN");

        let (status, _, json) =
            send(&app, change(&root, identity_id(&user), json!({ "admin": "yes" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");

        let (status, _, json) =
            send(&app, change(&root, identity_id(&user), json!({ "admin": true }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "sucesso": true, "admin": true }));

        // One of two admins can be demoted
        let (status, _, json) =
            send(&app, change(&root, identity_id(&user), json!({ "admin": false }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "sucesso": true, "admin": false }));

        let (status, _, json) = send(
            &app,
            change(&root, uuid::Uuid::new_v4(), json!({ "admin": true })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_sole_admin_cannot_be_demoted() {
        let (app, repo) = app();
        let root = admin(&app, &repo, "900", "901").await;
        let user = identify(&app, "111", "222").await;

        // Caller presents admin cookies while holding no admin row
        let forged = format!("auth=1; admin=1; user_id={}", identity_id(&user));
        let (status, _, json) = send(
            &app,
            request(
                Method::PATCH,
                &format!("/api/informacoes/{}/admin", identity_id(&root)),
                &forged,
                Some(json!({ "admin": false })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["code"], "LAST_ADMIN_FORBIDDEN");
    }

    #[tokio::test]
    async fn test_admin_without_identity_claim() {
        let (app, _) = app();
        let (status, _, json) = send(
            &app,
            request(
                Method::DELETE,
                &format!("/api/informacoes/{}", uuid::Uuid::new_v4()),
                "auth=1; admin=1",
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_mutations_without_csrf_always_fail() {
        let (app, repo) = app();
        let root = admin(&app, &repo, "900", "901").await;
        let target = uuid::Uuid::new_v4();

        let routes = [
            (Method::POST, "/api/informacoes".to_string()),
            (Method::POST, "/api/completar-nome".to_string()),
            (Method::DELETE, format!("/api/informacoes/{target}")),
            (Method::PATCH, format!("/api/informacoes/{target}/admin")),
        ];

        for cookies in ["", root.as_str()] {
            for (method, uri) in &routes {
                for token in [None, Some("wrong")] {
                    let mut builder = axum::http::Request::builder()
                        .method(method.clone())
                        .uri(uri.as_str())
                        .header("content-type", "application/json")
                        .header("cookie", format!("{CSRF_COOKIE}; {cookies}"));
                    if let Some(token) = token {
                        builder = builder.header("X-CSRF-Token", token);
                    }
                    let req = builder.body(axum::body::Body::from("{}")).unwrap();

                    let (status, _, json) = send(&app, req).await;
                    assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
                    assert_eq!(json["code"], "CSRF_INVALID");
                }
            }
        }
    }
}

#[cfg(test)]
mod repository_tests {
    use crate::domain::entity::{Identity, SealedFields};
    use crate::domain::repository::{
        DeleteOutcome, IdentityRepository, InsertOutcome, NameUpdateOutcome, RoleChangeOutcome,
    };
    use crate::domain::value_object::Fingerprint;
    use crate::infra::memory::InMemoryIdentityRepository;

    fn identity(cpf: &str, phone: &str) -> Identity {
        Identity::register(
            SealedFields {
                encrypted_name: "n".to_string(),
                encrypted_national_id: "c".to_string(),
                encrypted_phone: "t".to_string(),
            },
            Fingerprint::of(cpf),
            Fingerprint::of(phone),
        )
    }

    #[tokio::test]
    async fn test_fingerprints_are_unique() {
        let repo = InMemoryIdentityRepository::new();
        assert!(matches!(
            repo.insert(&identity("1", "2")).await.unwrap(),
            InsertOutcome::Inserted(_)
        ));
        assert!(matches!(
            repo.insert(&identity("1", "3")).await.unwrap(),
            InsertOutcome::Conflict
        ));
        assert!(matches!(
            repo.insert(&identity("4", "2")).await.unwrap(),
            InsertOutcome::Conflict
        ));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_last_admin_guard() {
        let repo = InMemoryIdentityRepository::new();
        let a = identity("1", "2");
        let b = identity("3", "4");
        repo.insert(&a).await.unwrap();
        repo.insert(&b).await.unwrap();

        assert_eq!(repo.set_admin(&a.id, true).await.unwrap(), RoleChangeOutcome::Changed);
        assert_eq!(repo.set_admin(&a.id, false).await.unwrap(), RoleChangeOutcome::LastAdmin);

        assert_eq!(repo.set_admin(&b.id, true).await.unwrap(), RoleChangeOutcome::Changed);
        assert_eq!(repo.set_admin(&a.id, false).await.unwrap(), RoleChangeOutcome::Changed);
        assert_eq!(repo.set_admin(&b.id, false).await.unwrap(), RoleChangeOutcome::LastAdmin);
    }

    #[tokio::test]
    async fn test_delete_unless_admin() {
        let repo = InMemoryIdentityRepository::new();
        let a = identity("1", "2");
        repo.insert(&a).await.unwrap();
        repo.set_admin(&a.id, true).await.unwrap();

        assert_eq!(repo.delete_unless_admin(&a.id).await.unwrap(), DeleteOutcome::IsAdmin);
        repo.insert(&identity("3", "4")).await.unwrap();
        let b = repo.find_by_national_id_fingerprint(&Fingerprint::of("3")).await.unwrap().unwrap();
        assert_eq!(repo.delete_unless_admin(&b.id).await.unwrap(), DeleteOutcome::Deleted);
        assert!(repo.find_by_id(&b.id).await.unwrap().is_none());
        assert_eq!(repo.delete_unless_admin(&b.id).await.unwrap(), DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_name_compare_and_set() {
        let repo = InMemoryIdentityRepository::new();
        let a = identity("1", "2");
        repo.insert(&a).await.unwrap();

        assert_eq!(
            repo.update_name(&a.id, "n", "first").await.unwrap(),
            NameUpdateOutcome::Updated
        );
        // Second writer still expects the old value
        assert_eq!(
            repo.update_name(&a.id, "n", "second").await.unwrap(),
            NameUpdateOutcome::Stale
        );
        let stored = repo.find_by_id(&a.id).await.unwrap().unwrap();
        assert_eq!(stored.encrypted_name, "first");
    }
}

#[cfg(test)]
mod error_tests {
    use crate::domain::value_object::PersonNameError;
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use platform::field_cipher::CipherError;
    use platform::session::AccessDenied;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(IdentityError, StatusCode, &str)> = vec![
            (IdentityError::DuplicateCredential, StatusCode::BAD_REQUEST, "DUPLICATE_CREDENTIAL"),
            (IdentityError::MismatchedCredentials, StatusCode::FORBIDDEN, "MISMATCHED_CREDENTIALS"),
            (IdentityError::WrongPhoneForId, StatusCode::FORBIDDEN, "WRONG_PHONE_FOR_ID"),
            (IdentityError::WrongIdForPhone, StatusCode::FORBIDDEN, "WRONG_ID_FOR_PHONE"),
            (IdentityError::NotFound, StatusCode::NOT_FOUND, "NOT_FOUND"),
            (IdentityError::NameAlreadySet, StatusCode::CONFLICT, "NAME_ALREADY_SET"),
            (IdentityError::LastAdminForbidden, StatusCode::FORBIDDEN, "LAST_ADMIN_FORBIDDEN"),
            (
                IdentityError::InvalidName(PersonNameError::TooLong { length: 200, max: 120 }),
                StatusCode::BAD_REQUEST,
                "NAME_TOO_LONG",
            ),
            (
                IdentityError::Access(AccessDenied::CsrfInvalid),
                StatusCode::FORBIDDEN,
                "CSRF_INVALID",
            ),
            (
                IdentityError::Cipher(CipherError::Decryption),
                StatusCode::INTERNAL_SERVER_ERROR,
                "DECRYPTION_ERROR",
            ),
            (
                IdentityError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
        ];

        for (error, expected_status, expected_code) in test_cases {
            assert_eq!(error.code(), expected_code);
            assert_eq!(error.status_code(), expected_status);
            let response = error.into_response();
            assert_eq!(response.status(), expected_status, "{expected_code}");
        }
    }

    #[test]
    fn test_server_errors_hide_details() {
        let app_error = IdentityError::Internal("secret detail".to_string()).to_app_error();
        assert!(!app_error.message().contains("secret"));
    }
}
