//! oruko-rv library - contributor batch review service
//!
//! Serves the batch claim/lock/review lifecycle over the names database:
//! grouping pending submissions into claimable batches, leasing them to
//! reviewers, applying review actions, and sweeping expired leases.

use axum::Router;
use sqlx::SqlitePool;
use std::path::PathBuf;

pub mod api;
pub mod db;
pub mod error;
pub mod review;
pub mod storage;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared secret guarding job and session-mint endpoints (0 disables auth)
    pub shared_secret: i64,
    /// Root folder for reviewer-recorded audio
    pub audio_folder: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, shared_secret: i64, audio_folder: PathBuf) -> Self {
        Self {
            db,
            shared_secret,
            audio_folder,
        }
    }
}

/// Build application router
///
/// Three auth tiers: reviewer-session routes, shared-secret job routes,
/// and the open health endpoint.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Reviewer routes (require a session token with contributor/admin role)
    let reviewer = Router::new()
        .route("/api/batches", get(api::list_batches))
        .route("/api/batches/claim", post(api::claim_batch))
        .route("/api/submissions/:id/approve", post(api::approve_submission))
        .route("/api/submissions/:id/ignore", post(api::ignore_submission))
        .route("/api/submissions/:id/undo", post(api::undo_submission))
        .route("/api/submissions/:id/edit", post(api::edit_submission))
        .route("/api/locks/release", post(api::release_locks))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::session_auth_middleware,
        ));

    // Job routes (require the shared secret as a bearer credential)
    let jobs = Router::new()
        .route("/api/jobs/sweep-locks", post(api::sweep_locks))
        .route("/api/sessions", post(api::create_session))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::job_auth_middleware,
        ));

    // Public routes (no authentication)
    let public = api::health_routes();

    Router::new()
        .merge(reviewer)
        .merge(jobs)
        .merge(public)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
