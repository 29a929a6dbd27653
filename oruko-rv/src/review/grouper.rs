//! Batch grouper: buckets pending submissions into claimable pages
//!
//! Rows locked by someone else under a live lease are invisible; surviving
//! rows are grouped by the name's origin (first-occurrence order) and chunked
//! into fixed-size pages. Non-admin reviewers only see categories matching
//! their skill profile.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::error;

use oruko_common::db::Reviewer;

use crate::db::submissions::{self, PendingRow, UNCATEGORIZED};
use crate::review::{BATCH_SIZE, FETCH_LIMIT, LEASE_DURATION_MS};

/// One claimable page of review work
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub category: String,
    /// Human title, e.g. `"Igbo Batch #2"`
    pub title: String,
    /// Zero-based page index within the category
    pub index: usize,
    pub item_count: usize,
    /// Whether this reviewer already holds the lock on any item of the page
    pub held_by_me: bool,
}

/// All pages of one category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryBatches {
    pub category: String,
    pub total_pending: usize,
    pub batches: Vec<BatchSummary>,
}

/// List claimable batches for a reviewer.
///
/// Read errors degrade to an empty listing (logged): this feeds a browsing
/// UI that must stay navigable, so empty means "nothing to show", never a
/// hard failure the caller has to retry.
pub async fn list_available_batches(pool: &SqlitePool, reviewer: &Reviewer) -> Vec<CategoryBatches> {
    let rows = match submissions::fetch_pending_with_origin(pool, FETCH_LIMIT).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Batch listing query failed, returning empty set: {}", e);
            return Vec::new();
        }
    };

    group_batches(&rows, reviewer, oruko_common::time::now_ms())
}

/// Pure grouping pass over fetched rows. Split out for unit testing.
pub fn group_batches(rows: &[PendingRow], reviewer: &Reviewer, now_ms: i64) -> Vec<CategoryBatches> {
    // Category order follows first occurrence in fetch order
    let mut order: Vec<String> = Vec::new();
    let mut buckets: std::collections::HashMap<String, Vec<&PendingRow>> =
        std::collections::HashMap::new();

    for row in rows {
        if locked_by_other(row, &reviewer.handle, now_ms) {
            continue;
        }

        let category = match row.origin.as_deref() {
            Some(origin) if !origin.is_empty() => origin.to_string(),
            _ => UNCATEGORIZED.to_string(),
        };

        if !buckets.contains_key(&category) {
            order.push(category.clone());
        }
        buckets.entry(category).or_default().push(row);
    }

    let skill_tags: Vec<String> = reviewer
        .skill_tags()
        .iter()
        .map(|t| t.to_lowercase())
        .collect();

    let mut result = Vec::new();
    for category in order {
        if !reviewer.is_admin() && !matches_skills(&category, &skill_tags) {
            continue;
        }

        let rows = &buckets[&category];
        let batches = rows
            .chunks(BATCH_SIZE)
            .enumerate()
            .map(|(index, chunk)| BatchSummary {
                category: category.clone(),
                title: format!("{} Batch #{}", category, index + 1),
                index,
                item_count: chunk.len(),
                held_by_me: chunk
                    .iter()
                    .any(|r| r.locked_by.as_deref() == Some(reviewer.handle.as_str())),
            })
            .collect();

        result.push(CategoryBatches {
            category: category.clone(),
            total_pending: rows.len(),
            batches,
        });
    }

    result
}

/// A row is invisible when someone else holds a live lease on it
fn locked_by_other(row: &PendingRow, reviewer: &str, now_ms: i64) -> bool {
    match (&row.locked_by, row.locked_at) {
        (Some(holder), Some(stamp)) if holder != reviewer => {
            now_ms - stamp < LEASE_DURATION_MS
        }
        _ => false,
    }
}

/// Case-insensitive substring match in either direction against skill tags.
/// A reviewer with no declared skills matches nothing.
fn matches_skills(category: &str, skill_tags_lower: &[String]) -> bool {
    let cat = category.to_lowercase();
    skill_tags_lower
        .iter()
        .any(|tag| tag.contains(&cat) || cat.contains(tag))
}
