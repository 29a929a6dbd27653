//! Authentication middleware for oruko-rv
//!
//! Two layers: reviewer-session auth for the review UI routes, and
//! shared-secret auth for machine-triggered job routes. Reviewer identity is
//! resolved here once and threaded to handlers through request extensions -
//! handlers never consult ambient session state.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use oruko_common::api::auth::{lookup_session, verify_job_secret};
use oruko_common::Error;

use crate::error::ApiError;
use crate::AppState;

/// Reviewer session middleware
///
/// Requires `Authorization: Bearer <session token>` resolving to a reviewer
/// with a recognized role (contributor or admin). The reviewer row is placed
/// in request extensions for handlers.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_credential(&request)
        .ok_or_else(|| Error::Unauthorized("Missing session token".to_string()))?;

    let reviewer = lookup_session(&state.db, &token)
        .await?
        .ok_or_else(|| Error::Unauthorized("Invalid session token".to_string()))?;

    // Coarse page-level gate: only recognized roles may enter the review API
    if reviewer.role().is_err() {
        warn!(
            "Session for {} carries unrecognized role {:?}",
            reviewer.handle, reviewer.role
        );
        return Err(Error::Unauthorized("Role not permitted".to_string()).into());
    }

    request.extensions_mut().insert(reviewer);
    Ok(next.run(request).await)
}

/// Job middleware: validates the shared secret bearer credential.
/// Secret value 0 disables checking (tests and local development).
pub async fn job_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.shared_secret != 0 {
        let provided = bearer_credential(&request)
            .ok_or_else(|| Error::Unauthorized("Missing job credential".to_string()))?;

        if !verify_job_secret(&provided, state.shared_secret) {
            warn!("Job endpoint called with invalid credential");
            return Err(Error::Unauthorized("Invalid job credential".to_string()).into());
        }
    }

    Ok(next.run(request).await)
}

/// Extract the value of an `Authorization: Bearer ...` header
fn bearer_credential(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}
