//! Contributor batch review lifecycle
//!
//! A small state machine over submission rows: the grouper buckets pending
//! work into claimable pages, the lock manager leases a page to one reviewer,
//! review actions move each submission between pending/approved/rejected/
//! edited, and the sweeper clears leases that outlived their window.

pub mod actions;
pub mod grouper;
pub mod locks;
pub mod sweeper;

/// How long a claim lock stays valid before any reviewer may reclaim the row
pub const LEASE_DURATION_MS: i64 = 2 * 60 * 60 * 1000;

/// Number of submissions per claimable batch page
pub const BATCH_SIZE: usize = 50;

/// Client-side undo affordance window, advisory only (never enforced here)
pub const UNDO_GRACE_SECONDS: u32 = 5;

/// Upper bound on pending rows considered per grouping pass
pub const FETCH_LIMIT: i64 = 1000;
