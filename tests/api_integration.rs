//! Integration tests for the HTTP API
//!
//! Tests routing, caller identity and error mapping

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use brea_arena::core::{
    create_router, seed_personas, Arena, ArenaConfig, CandidateSelector, InMemoryStore,
    ProfileStore, SharedArena,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn create_test_router() -> Router {
    let store = Arc::new(InMemoryStore::new());
    seed_personas(store.as_ref()).await.unwrap();
    let store: Arc<dyn ProfileStore> = store;
    let arena: SharedArena = Arc::new(Arena::new(
        store,
        &ArenaConfig::default(),
        CandidateSelector::seeded(2024),
    ));
    create_router(arena)
}

fn get(uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-user-id", user)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, user: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-user-id", user)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], brea_arena::VERSION);
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let app = create_test_router().await;

    let (status, json) = send(
        &app,
        Request::builder().uri("/profile").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_profile_created_on_first_visit() {
    let app = create_test_router().await;

    let (status, json) = send(&app, get("/profile", "u1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["profile"]["id"], "u1");
    assert_eq!(json["recent_matches"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_extraction_and_chips_merge() {
    let app = create_test_router().await;

    let (status, _) = send(
        &app,
        post("/profile/extraction", "u1", r#"{"values": ["Family"], "display_name": "Ana"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(
        &app,
        post(
            "/profile/chips",
            "u1",
            r#"[{"type": "energy", "label": "Chill 😌"}, {"type": "value", "label": "family"}, {"type": "humor", "label": "Dry Humor"}]"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["values"], serde_json::json!(["Family"]));
    assert_eq!(json["personality_tags"]["energy"], "chill");
    assert_eq!(json["personality_tags"]["humor"], "dry");
    assert_eq!(json["display_name"], "Ana");
}

#[tokio::test]
async fn test_confirm_unknown_hypothesis() {
    let app = create_test_router().await;
    send(&app, get("/profile", "u1")).await;

    let (status, json) = send(
        &app,
        post(
            "/profile/hypotheses/confirm",
            "u1",
            r#"{"claim": "Loves hiking", "confirmed": true}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["retryable"], false);
}

#[tokio::test]
async fn test_run_and_consent_flow() {
    let app = create_test_router().await;
    send(&app, post("/profile/extraction", "u1", r#"{"values": ["Music"]}"#)).await;

    let (status, run) = send(
        &app,
        post("/arena/run", "u1", r#"{"target_persona_id": "seed_drew"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["candidate"]["display_name"], "Drew");
    assert_eq!(run["match_result"]["status"], "PENDING");
    assert_eq!(run["shared_values"], serde_json::json!(["Music"]));
    let match_id = run["match_result"]["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, get("/matches", "u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, get(&format!("/matches/{}", match_id), "u2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let consent_uri = format!("/matches/{}/consent", match_id);
    let (status, outcome) = send(&app, post(&consent_uri, "u1", r#"{"action": "APPROVE"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["record"]["status"], "APPROVED");
    assert_eq!(outcome["invite"]["token"].as_str().unwrap().len(), 64);

    let (status, json) = send(&app, post(&consent_uri, "u1", r#"{"action": "REJECT"}"#)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_DECIDED");
}

#[tokio::test]
async fn test_run_without_body_picks_persona() {
    let app = create_test_router().await;
    send(&app, get("/profile", "u1")).await;

    let (status, run) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/arena/run")
            .header("x-user-id", "u1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(run["candidate"]["id"].as_str().unwrap().starts_with("seed_"));
}

#[tokio::test]
async fn test_run_for_unknown_requester() {
    let app = create_test_router().await;

    let (status, json) = send(&app, post("/arena/run", "ghost", "{}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_run_with_invalid_body_stores_nothing() {
    let app = create_test_router().await;
    send(&app, get("/profile", "u1")).await;

    let (status, json) = send(&app, post("/arena/run", "u1", r#"{"target_persona_id": 42}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "BAD_REQUEST");

    let (status, _) = send(&app, post("/arena/run", "u1", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/arena/run")
            .header("x-user-id", "u1")
            .header("content-type", "text/plain")
            .body(Body::from("seed_sam"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (_, listed) = send(&app, get("/matches", "u1")).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}
