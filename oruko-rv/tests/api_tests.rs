//! Integration tests for oruko-rv HTTP endpoints
//!
//! Exercises routing, auth tiers and the review flow end to end through the
//! router. Job auth uses shared_secret=0 (disabled) except where the secret
//! check itself is under test.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

use oruko_common::api::auth::mint_session;
use oruko_common::db::init_database;
use oruko_common::time::now_ms;
use oruko_rv::db::{names, reviewers, submissions};
use oruko_rv::{build_router, AppState};

struct TestApp {
    _dir: TempDir,
    pool: SqlitePool,
    app: axum::Router,
}

/// Fresh database + router with job auth disabled
async fn setup_app(shared_secret: i64) -> TestApp {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("oruko.db"))
        .await
        .expect("Should initialize database");
    let state = AppState::new(pool.clone(), shared_secret, dir.path().join("review_audio"));
    TestApp {
        _dir: dir,
        pool,
        app: build_router(state),
    }
}

async fn seed_reviewer_session(pool: &SqlitePool, handle: &str, role: &str) -> String {
    reviewers::insert_reviewer(pool, handle, role, Some("Igbo,Yoruba"), now_ms())
        .await
        .expect("Should insert reviewer");
    mint_session(pool, handle).await.expect("Should mint session")
}

async fn seed_submission(pool: &SqlitePool, origin: &str) -> i64 {
    let name_id = names::insert_name(pool, "Adaeze", Some(origin), Some("crown"), Some("ah-DAH-eh-zeh"), now_ms())
        .await
        .expect("Should insert name");
    submissions::insert_for_name(pool, name_id, now_ms())
        .await
        .expect("Should insert submission")
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_empty(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_auth_required() {
    let t = setup_app(0).await;

    let response = t.app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "oruko-rv");
    assert!(body["version"].is_string());
}

// =============================================================================
// Session authentication
// =============================================================================

#[tokio::test]
async fn test_batches_requires_session_token() {
    let t = setup_app(0).await;

    let response = t.app.oneshot(get("/api/batches", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_session_token_rejected() {
    let t = setup_app(0).await;

    let response = t
        .app
        .oneshot(get("/api/batches", Some("not-a-real-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_session_lists_batches() {
    let t = setup_app(0).await;
    let token = seed_reviewer_session(&t.pool, "ada", "contributor").await;
    seed_submission(&t.pool, "Igbo").await;

    let response = t
        .app
        .oneshot(get("/api/batches", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["category"], "Igbo");
    assert_eq!(categories[0]["total_pending"], 1);
}

// =============================================================================
// Claim and review flow
// =============================================================================

#[tokio::test]
async fn test_claim_approve_flow() {
    let t = setup_app(0).await;
    let token = seed_reviewer_session(&t.pool, "ada", "contributor").await;
    let submission_id = seed_submission(&t.pool, "Igbo").await;

    // Claim the Igbo batch
    let response = t
        .app
        .clone()
        .oneshot(post_json(
            "/api/batches/claim",
            Some(&token),
            json!({ "category": "Igbo" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], submission_id);
    assert_eq!(tasks[0]["name"], "Adaeze");
    assert!(body["lease_expiry_ms"].as_i64().unwrap() > 0);
    assert_eq!(body["undo_grace_seconds"], 5);

    // Approve it
    let response = t
        .app
        .clone()
        .oneshot(post_empty(
            &format!("/api/submissions/{}/approve", submission_id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let row = submissions::get_submission(&t.pool, submission_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "approved");
    assert_eq!(row.verification_count, 1);

    let name = names::get_name(&t.pool, row.name_id).await.unwrap().unwrap();
    assert!(name.is_verified());
}

#[tokio::test]
async fn test_approve_without_lock_is_unauthorized() {
    let t = setup_app(0).await;
    let token = seed_reviewer_session(&t.pool, "ada", "contributor").await;
    let submission_id = seed_submission(&t.pool, "Igbo").await;

    // No claim first: the lock-scoped write affects zero rows
    let response = t
        .app
        .oneshot(post_empty(
            &format!("/api/submissions/{}/approve", submission_id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_edit_with_hint_via_http() {
    let t = setup_app(0).await;
    let token = seed_reviewer_session(&t.pool, "ada", "contributor").await;
    let submission_id = seed_submission(&t.pool, "Igbo").await;

    t.app
        .clone()
        .oneshot(post_json(
            "/api/batches/claim",
            Some(&token),
            json!({ "category": "Igbo" }),
        ))
        .await
        .unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post_json(
            &format!("/api/submissions/{}/edit", submission_id),
            Some(&token),
            json!({ "phonetic_hint": "ah-dah-EH-zeh" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let row = submissions::get_submission(&t.pool, submission_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "edited");
    assert_eq!(row.phonetic_hint.as_deref(), Some("ah-dah-EH-zeh"));
    assert!(row.audio_url.is_none());
}

#[tokio::test]
async fn test_edit_rejects_bad_base64() {
    let t = setup_app(0).await;
    let token = seed_reviewer_session(&t.pool, "ada", "contributor").await;
    let submission_id = seed_submission(&t.pool, "Igbo").await;

    t.app
        .clone()
        .oneshot(post_json(
            "/api/batches/claim",
            Some(&token),
            json!({ "category": "Igbo" }),
        ))
        .await
        .unwrap();

    let response = t
        .app
        .oneshot(post_json(
            &format!("/api/submissions/{}/edit", submission_id),
            Some(&token),
            json!({ "audio_base64": "!!! not base64 !!!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_release_locks_endpoint() {
    let t = setup_app(0).await;
    let token = seed_reviewer_session(&t.pool, "ada", "contributor").await;
    seed_submission(&t.pool, "Igbo").await;

    t.app
        .clone()
        .oneshot(post_json(
            "/api/batches/claim",
            Some(&token),
            json!({ "category": "Igbo" }),
        ))
        .await
        .unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post_empty("/api/locks/release", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["released"], 1);

    // Second release is a no-op, same end state
    let response = t
        .app
        .oneshot(post_empty("/api/locks/release", Some(&token)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["released"], 0);
}

// =============================================================================
// Job endpoints
// =============================================================================

#[tokio::test]
async fn test_sweep_locks_endpoint() {
    let t = setup_app(0).await;
    let submission_id = seed_submission(&t.pool, "Igbo").await;

    // Plant an expired lock directly
    sqlx::query("UPDATE submissions SET locked_by = 'ghost', locked_at = 0 WHERE id = ?")
        .bind(submission_id)
        .execute(&t.pool)
        .await
        .unwrap();

    let response = t
        .app
        .oneshot(post_empty("/api/jobs/sweep-locks", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["released"], 1);
}

#[tokio::test]
async fn test_job_endpoints_require_secret_when_enabled() {
    let t = setup_app(424_242).await;

    // Missing credential
    let response = t
        .app
        .clone()
        .oneshot(post_empty("/api/jobs/sweep-locks", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong credential
    let response = t
        .app
        .clone()
        .oneshot(post_empty("/api/jobs/sweep-locks", Some("999")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct credential
    let response = t
        .app
        .oneshot(post_empty("/api/jobs/sweep-locks", Some("424242")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_session_for_known_reviewer() {
    let t = setup_app(0).await;
    reviewers::insert_reviewer(&t.pool, "ada", "contributor", None, now_ms())
        .await
        .unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post_json("/api/sessions", None, json!({ "handle": "ada" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    let token = body["token"].as_str().unwrap();

    // The minted token authenticates
    let response = t.app.oneshot(get("/api/batches", Some(token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_session_unknown_reviewer_is_not_found() {
    let t = setup_app(0).await;

    let response = t
        .app
        .oneshot(post_json("/api/sessions", None, json!({ "handle": "nobody" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
