//! Machine-triggered job endpoints (shared-secret auth)

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::json;

use oruko_common::api::auth::mint_session;

use crate::error::ApiError;
use crate::review::sweeper;
use crate::AppState;

/// POST /api/jobs/sweep-locks
///
/// Invoked by an external scheduler. Idempotent: a repeat call after a full
/// sweep releases zero rows.
pub async fn sweep_locks(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let released = sweeper::release_expired_locks(&state.db).await?;
    Ok(Json(json!({ "released": released })))
}

/// Session mint request body
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub handle: String,
}

/// POST /api/sessions
///
/// Mints a reviewer session token. Called by the login provider's callback
/// after the passwordless flow completes; never exposed to browsers directly.
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = mint_session(&state.db, &request.handle).await?;
    Ok(Json(json!({ "token": token })))
}
