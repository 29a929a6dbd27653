//! Batch listing and claiming endpoints

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::json;

use oruko_common::db::Reviewer;

use crate::error::ApiError;
use crate::review::{grouper, locks};
use crate::AppState;

/// GET /api/batches
///
/// Lists claimable batch pages per category for the session reviewer.
/// Infallible by design: store errors degrade to an empty listing.
pub async fn list_batches(
    State(state): State<AppState>,
    Extension(reviewer): Extension<Reviewer>,
) -> Json<serde_json::Value> {
    let categories = grouper::list_available_batches(&state.db, &reviewer).await;
    Json(json!({ "categories": categories }))
}

/// Claim request body
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub category: String,
}

/// POST /api/batches/claim
///
/// Claims (or resumes) a batch in the requested category. An empty task list
/// with lease_expiry_ms = 0 means nothing was available - a valid empty
/// state, not an error.
pub async fn claim_batch(
    State(state): State<AppState>,
    Extension(reviewer): Extension<Reviewer>,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<locks::ClaimedBatch>, ApiError> {
    let claimed = locks::claim_batch(&state.db, &reviewer, &request.category).await?;
    Ok(Json(claimed))
}
