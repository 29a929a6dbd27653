//! Per-submission review action endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use oruko_common::db::Reviewer;
use oruko_common::Error;

use crate::error::ApiError;
use crate::review::{actions, locks};
use crate::storage::AudioStore;
use crate::AppState;

/// POST /api/submissions/:id/approve
pub async fn approve_submission(
    State(state): State<AppState>,
    Extension(reviewer): Extension<Reviewer>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    actions::approve(&state.db, &reviewer, id).await?;
    Ok(Json(json!({ "id": id, "status": "approved" })))
}

/// POST /api/submissions/:id/ignore
pub async fn ignore_submission(
    State(state): State<AppState>,
    Extension(reviewer): Extension<Reviewer>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    actions::ignore(&state.db, &reviewer, id).await?;
    Ok(Json(json!({ "id": id, "status": "rejected" })))
}

/// POST /api/submissions/:id/undo
pub async fn undo_submission(
    State(state): State<AppState>,
    Extension(reviewer): Extension<Reviewer>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    actions::undo(&state.db, &reviewer, id).await?;
    Ok(Json(json!({ "id": id, "status": "pending" })))
}

/// Edit request body; both fields optional
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub phonetic_hint: Option<String>,
    /// Re-recorded audio as standard base64
    pub audio_base64: Option<String>,
}

/// POST /api/submissions/:id/edit
pub async fn edit_submission(
    State(state): State<AppState>,
    Extension(reviewer): Extension<Reviewer>,
    Path(id): Path<i64>,
    Json(request): Json<EditRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let audio = match request.audio_base64 {
        Some(encoded) => Some(
            base64::engine::general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| Error::InvalidInput(format!("Invalid audio payload: {}", e)))?,
        ),
        None => None,
    };

    let store = AudioStore::new(state.audio_folder.clone());
    actions::edit(&state.db, &store, &reviewer, id, request.phonetic_hint, audio).await?;
    Ok(Json(json!({ "id": id, "status": "edited" })))
}

/// POST /api/locks/release
///
/// Releases every lock the session reviewer holds (batch session exit).
pub async fn release_locks(
    State(state): State<AppState>,
    Extension(reviewer): Extension<Reviewer>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let released = locks::release_locks(&state.db, &reviewer).await?;
    Ok(Json(json!({ "released": released })))
}
