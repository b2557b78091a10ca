pub mod candidates;
pub mod diagnostics;
pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(diagnostics::index_handler))
        .route("/health", get(health::health_handler))
        .route("/version", get(diagnostics::version_handler))
        .route("/db/now", get(diagnostics::db_now_handler))
        // Recruiting pipeline
        .route("/roles", post(handlers::handle_create_role))
        .route("/roles/:id/rti", put(handlers::handle_update_rti))
        .route("/roles/:id/share", get(handlers::handle_share))
        .route("/apply/:share_token", post(handlers::handle_apply))
        .route("/match/:id", post(handlers::handle_match))
        .route("/shortlist/:id", get(handlers::handle_shortlist))
        // Candidate table CRUD
        .route(
            "/candidates",
            get(candidates::handle_list_candidates).post(candidates::handle_create_candidate),
        )
        .route(
            "/candidates/:id",
            get(candidates::handle_get_candidate).delete(candidates::handle_delete_candidate),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::{Config, StoreBackend};
    use crate::pipeline::scoring::RuleScorer;
    use crate::store::MemoryStore;

    fn test_state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
            db: None,
            scorer: Arc::new(RuleScorer),
            config: Arc::new(Config {
                database_url: None,
                store: StoreBackend::Memory,
                db_sslmode: "disable".to_string(),
                db_max_connections: 1,
                host: "127.0.0.1".to_string(),
                port: 0,
                reload: false,
                rust_log: "info".to_string(),
            }),
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_backend_role(app: &Router) -> String {
        let (status, role) = send(
            app,
            Method::POST,
            "/roles",
            Some(json!({
                "title": "Backend Engineer",
                "jd_raw": "We need a Python backend engineer, FastAPI + AWS a plus"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        role["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_reports_store_backend() {
        let app = build_router(test_state());
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_index_and_version() {
        let app = build_router(test_state());
        let (status, index) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(index["db_now"], "/db/now");

        let (status, version) = send(&app, Method::GET, "/version", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(version["version"].is_string());
    }

    #[tokio::test]
    async fn test_db_now_without_database_is_unavailable() {
        let app = build_router(test_state());
        let (status, body) = send(&app, Method::GET, "/db/now", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_pipeline_end_to_end() {
        let app = build_router(test_state());
        let role_id = create_backend_role(&app).await;

        let (status, share) = send(&app, Method::GET, &format!("/roles/{role_id}/share"), None).await;
        assert_eq!(status, StatusCode::OK);
        let token = share["share_token"].as_str().unwrap().to_string();
        let (_, again) = send(&app, Method::GET, &format!("/roles/{role_id}/share"), None).await;
        assert_eq!(again["share_token"], token.as_str());

        let (status, applied) = send(
            &app,
            Method::POST,
            &format!("/apply/{token}"),
            Some(json!({
                "profile": {
                    "name": "Kim",
                    "email": "kim@example.com",
                    "skills": ["Python", "AWS", "FastAPI"]
                },
                "consent_bool": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let candidate_id = applied["candidate_id"].as_str().unwrap().to_string();

        let (status, scored) = send(&app, Method::POST, &format!("/match/{role_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(scored["scored"], 1);

        let (status, list) = send(&app, Method::GET, &format!("/shortlist/{role_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list[0]["candidate_id"], candidate_id.as_str());
        assert_eq!(list[0]["score_int"], 65);
        assert_eq!(list[0]["rationale"][1], "- 3y+ backend (missing)");

        let (_, filtered) = send(
            &app,
            Method::GET,
            &format!("/shortlist/{role_id}?min_score=70"),
            None,
        )
        .await;
        assert_eq!(filtered, json!([]));

        let (status, candidate) =
            send(&app, Method::GET, &format!("/candidates/{candidate_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(candidate["email"], "kim@example.com");
    }

    #[tokio::test]
    async fn test_update_rti_replaces_and_returns_role() {
        let app = build_router(test_state());
        let role_id = create_backend_role(&app).await;

        let (status, role) = send(
            &app,
            Method::PUT,
            &format!("/roles/{role_id}/rti"),
            Some(json!({ "rti_json": { "must": ["Rust"], "nice": [] } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(role["rti_json"]["must"], json!(["Rust"]));
        assert_eq!(role["rti_json"]["knockout"], json!([]));
        assert_eq!(role["rti_json"]["weights"]["must"], 0.6);
    }

    #[tokio::test]
    async fn test_unknown_role_and_token_are_404() {
        let app = build_router(test_state());
        let missing = Uuid::new_v4();

        let (status, body) = send(&app, Method::GET, &format!("/roles/{missing}/share"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, _) = send(&app, Method::POST, &format!("/match/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/roles/{missing}/rti"),
            Some(json!({ "rti_json": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::POST,
            "/apply/deadbeef0000",
            Some(json!({ "profile": { "skills": [] } })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_role_with_blank_title_is_400() {
        let app = build_router(test_state());
        let (status, body) = send(
            &app,
            Method::POST,
            "/roles",
            Some(json!({ "title": " ", "jd_raw": "python" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_role_with_empty_jd_gets_default_rti() {
        let app = build_router(test_state());
        let (status, role) = send(
            &app,
            Method::POST,
            "/roles",
            Some(json!({ "title": "Engineer", "jd_raw": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(role["jd_raw"], "");
        assert_eq!(role["rti_json"]["must"], json!(["3y+ backend", "Python", "Korean C1"]));
        assert_eq!(role["rti_json"]["nice"], json!(["FastAPI", "AWS", "ML ops"]));
        assert_eq!(role["rti_json"]["knockout"], json!(["No work authorization"]));
    }

    #[tokio::test]
    async fn test_bad_json_bodies_use_error_envelope() {
        let app = build_router(test_state());

        let (status, body) =
            send(&app, Method::POST, "/roles", Some(json!({ "title": "Engineer" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("jd_raw"));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/candidates")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_candidate_crud() {
        let app = build_router(test_state());

        let (status, created) = send(
            &app,
            Method::POST,
            "/candidates",
            Some(json!({ "name": "Lee", "email": "lee@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert!(created["created_at"].is_string());

        let (status, list) = send(&app, Method::GET, "/candidates", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, fetched) = send(&app, Method::GET, &format!("/candidates/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Lee");

        let (status, _) = send(&app, Method::DELETE, &format!("/candidates/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &format!("/candidates/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &format!("/candidates/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_candidate_validates_input() {
        let app = build_router(test_state());
        let (status, _) = send(
            &app,
            Method::POST,
            "/candidates",
            Some(json!({ "name": "Lee", "email": "not-an-email" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::POST, "/candidates", Some(json!({ "name": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        for email in ["kim@example..com", "kim@example.com.", "kim@-bad.com", "k\"@x.y"] {
            let (status, body) = send(
                &app,
                Method::POST,
                "/candidates",
                Some(json!({ "name": "Lee", "email": email })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{email}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }

        let (_, list) = send(&app, Method::GET, "/candidates", None).await;
        assert_eq!(list, json!([]));
    }
}
