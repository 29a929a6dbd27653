//! Lock manager: claims a batch for one reviewer and releases held locks
//!
//! The lock is the `locked_by`/`locked_at` field pair on each submission row,
//! advisory rather than a storage-level row lock. The claim stamp is a single
//! conditional UPDATE whose predicate re-checks availability, so concurrent
//! claims over the same category partition the rows between reviewers.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use oruko_common::db::Reviewer;
use oruko_common::{time, Result};

use crate::db::submissions::{self, Task};
use crate::review::{BATCH_SIZE, LEASE_DURATION_MS, UNDO_GRACE_SECONDS};

/// Result of a claim: the leased tasks and when the lease runs out
#[derive(Debug, Serialize)]
pub struct ClaimedBatch {
    pub tasks: Vec<Task>,
    /// 0 when nothing was available to claim
    pub lease_expiry_ms: i64,
    /// Advisory window for the client's undo affordance
    pub undo_grace_seconds: u32,
}

impl ClaimedBatch {
    fn empty() -> Self {
        Self {
            tasks: Vec::new(),
            lease_expiry_ms: 0,
            undo_grace_seconds: UNDO_GRACE_SECONDS,
        }
    }
}

/// Claim a batch of pending submissions in a category for a reviewer.
///
/// A reviewer already holding pending rows resumes those instead of claiming
/// fresh ones, with the lease stamp refreshed so the resumed session gets a
/// full window.
pub async fn claim_batch(
    pool: &SqlitePool,
    reviewer: &Reviewer,
    category: &str,
) -> Result<ClaimedBatch> {
    let now = time::now_ms();

    // Resume an interrupted session if one exists
    let held = submissions::fetch_tasks_held_by(pool, &reviewer.handle).await?;
    if !held.is_empty() {
        submissions::touch_lease(pool, &reviewer.handle, now).await?;
        info!(
            "Reviewer {} resumed batch session ({} tasks)",
            reviewer.handle,
            held.len()
        );
        return Ok(ClaimedBatch {
            tasks: held,
            lease_expiry_ms: now + LEASE_DURATION_MS,
            undo_grace_seconds: UNDO_GRACE_SECONDS,
        });
    }

    // Fresh claim: unlocked rows, or rows whose lease already ran out
    let lease_cutoff = now - LEASE_DURATION_MS;
    let claimed = submissions::claim_available(
        pool,
        &reviewer.handle,
        category,
        now,
        lease_cutoff,
        BATCH_SIZE as i64,
    )
    .await?;

    if claimed.is_empty() {
        return Ok(ClaimedBatch::empty());
    }

    let tasks = submissions::fetch_tasks_held_by(pool, &reviewer.handle).await?;
    info!(
        "Reviewer {} claimed {} tasks in category {}",
        reviewer.handle,
        tasks.len(),
        category
    );

    Ok(ClaimedBatch {
        tasks,
        lease_expiry_ms: now + LEASE_DURATION_MS,
        undo_grace_seconds: UNDO_GRACE_SECONDS,
    })
}

/// Release every lock a reviewer holds, regardless of status. Idempotent.
pub async fn release_locks(pool: &SqlitePool, reviewer: &Reviewer) -> Result<u64> {
    let released = submissions::release_for_reviewer(pool, &reviewer.handle).await?;
    if released > 0 {
        info!("Reviewer {} released {} locks", reviewer.handle, released);
    }
    Ok(released)
}
