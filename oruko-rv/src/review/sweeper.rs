//! Lease expiry sweeper
//!
//! Clears lock fields on pending submissions whose stamp outlived the lease.
//! Hygiene only: the claim predicate already treats expired locks as
//! available, so claims self-heal without this pass - it just keeps stale
//! "locked by other" rows out of category listings. Single statement, so
//! safe to invoke repeatedly or concurrently with itself.

use sqlx::SqlitePool;
use tracing::info;

use oruko_common::{time, Result};

use crate::db::submissions;
use crate::review::LEASE_DURATION_MS;

/// Release every expired lock; returns the number of rows released
pub async fn release_expired_locks(pool: &SqlitePool) -> Result<u64> {
    let cutoff = time::now_ms() - LEASE_DURATION_MS;
    let released = submissions::release_expired(pool, cutoff).await?;

    if released > 0 {
        info!("Lease sweep released {} expired locks", released);
    }
    Ok(released)
}
