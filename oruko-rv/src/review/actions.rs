//! Review state machine: per-submission transitions
//!
//! `pending -> {approved, rejected, edited}`, each revocable back to pending
//! by undo. Every write is scoped by `locked_by = reviewer`; zero affected
//! rows means the caller does not hold the lock (it may have expired and been
//! reclaimed since the batch was fetched) and the action fails with no state
//! change.

use sqlx::SqlitePool;
use tracing::{info, warn};

use oruko_common::db::Reviewer;
use oruko_common::{Error, Result};

use crate::db::{names, submissions};
use crate::storage::AudioStore;

/// Approve a submission: bump its verification counter and mark the parent
/// name verified. A single approval verifies the name; the counter is kept
/// as an audit trail.
pub async fn approve(pool: &SqlitePool, reviewer: &Reviewer, submission_id: i64) -> Result<()> {
    let affected = submissions::set_approved(pool, submission_id, &reviewer.handle).await?;
    if affected == 0 {
        return Err(unauthorized(reviewer, submission_id, "approve"));
    }

    // Side effect on the parent name. Undo never reverts this - verification
    // is sticky once granted.
    if let Some(name_id) = submissions::name_id_of(pool, submission_id).await? {
        names::set_verified(pool, name_id).await?;
    }

    info!(
        "Reviewer {} approved submission {}",
        reviewer.handle, submission_id
    );
    Ok(())
}

/// Skip a submission: terminal decision, no counter or name change,
/// still revocable by undo.
pub async fn ignore(pool: &SqlitePool, reviewer: &Reviewer, submission_id: i64) -> Result<()> {
    let affected = submissions::set_rejected(pool, submission_id, &reviewer.handle).await?;
    if affected == 0 {
        return Err(unauthorized(reviewer, submission_id, "ignore"));
    }

    info!(
        "Reviewer {} ignored submission {}",
        reviewer.handle, submission_id
    );
    Ok(())
}

/// Edit a submission: store a re-recorded audio blob and/or replace the
/// phonetic hint. Status becomes edited even when neither field changed.
pub async fn edit(
    pool: &SqlitePool,
    store: &AudioStore,
    reviewer: &Reviewer,
    submission_id: i64,
    phonetic_hint: Option<String>,
    audio: Option<Vec<u8>>,
) -> Result<()> {
    // Cheap ownership check up front so we rarely store audio we then orphan
    let row = submissions::get_submission(pool, submission_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Submission {} not found", submission_id)))?;
    if row.locked_by.as_deref() != Some(reviewer.handle.as_str()) {
        return Err(unauthorized(reviewer, submission_id, "edit"));
    }

    let audio_url = match audio {
        Some(bytes) => Some(store.store_submission_audio(submission_id, &bytes).await?),
        None => None,
    };

    let affected = submissions::set_edited(
        pool,
        submission_id,
        &reviewer.handle,
        phonetic_hint.as_deref(),
        audio_url.as_deref(),
    )
    .await?;

    if affected == 0 {
        // Lock lost between the check and the write. The stored file is
        // orphaned; compensating cleanup is not attempted.
        if let Some(url) = &audio_url {
            warn!(
                "Edit of submission {} lost its lock after audio store; orphaned file {}",
                submission_id, url
            );
        }
        return Err(unauthorized(reviewer, submission_id, "edit"));
    }

    info!(
        "Reviewer {} edited submission {} (hint: {}, audio: {})",
        reviewer.handle,
        submission_id,
        phonetic_hint.is_some(),
        audio_url.is_some()
    );
    Ok(())
}

/// Revert a submission to pending. Decrements the counter only when the
/// prior state was approved; restores the cached original hint onto the
/// submission. The parent name's verified flag stays as-is.
pub async fn undo(pool: &SqlitePool, reviewer: &Reviewer, submission_id: i64) -> Result<()> {
    let affected = submissions::set_undone(pool, submission_id, &reviewer.handle).await?;
    if affected == 0 {
        return Err(unauthorized(reviewer, submission_id, "undo"));
    }

    info!(
        "Reviewer {} undid submission {}",
        reviewer.handle, submission_id
    );
    Ok(())
}

fn unauthorized(reviewer: &Reviewer, submission_id: i64, action: &str) -> Error {
    Error::Unauthorized(format!(
        "Reviewer {} does not hold the lock on submission {} ({})",
        reviewer.handle, submission_id, action
    ))
}
