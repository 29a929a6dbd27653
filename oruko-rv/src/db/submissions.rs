//! Submission queries: pending listings, lease claims, review-state writes
//!
//! All listings order by `submissions.id` so batch paging is deterministic
//! across calls (fetch order alone is not guaranteed stable).

use oruko_common::Result;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// Category bucket for submissions whose name has no origin
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Minimal projection used by the batch grouper
#[derive(Debug, Clone, FromRow)]
pub struct PendingRow {
    pub id: i64,
    pub origin: Option<String>,
    pub locked_by: Option<String>,
    pub locked_at: Option<i64>,
}

/// Review task view: a submission joined with its name
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub meaning: Option<String>,
    pub audio_url: Option<String>,
    pub status: String,
    pub phonetic_hint: Option<String>,
    /// Pre-review hint, cached so the client can offer a reset
    pub original_phonetic_hint: Option<String>,
}

/// Fetch pending submissions with their name's origin, oldest first
pub async fn fetch_pending_with_origin(pool: &SqlitePool, limit: i64) -> Result<Vec<PendingRow>> {
    let rows = sqlx::query_as::<_, PendingRow>(
        r#"
        SELECT s.id, n.origin, s.locked_by, s.locked_at
        FROM submissions s
        JOIN names n ON n.id = s.name_id
        WHERE s.status = 'pending'
        ORDER BY s.id ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch the task view of every pending submission held by a reviewer
pub async fn fetch_tasks_held_by(pool: &SqlitePool, reviewer: &str) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        r#"
        SELECT s.id, n.name, n.origin AS category, n.meaning,
               s.audio_url, s.status, s.phonetic_hint, s.original_phonetic_hint
        FROM submissions s
        JOIN names n ON n.id = s.name_id
        WHERE s.locked_by = ? AND s.status = 'pending'
        ORDER BY s.id ASC
        "#,
    )
    .bind(reviewer)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Atomically claim up to `limit` available submissions in a category.
///
/// One conditional UPDATE: the inner SELECT picks candidates and the outer
/// predicate re-checks availability, so two overlapping claims partition the
/// rows instead of double-assigning them. Returns the claimed row ids.
pub async fn claim_available(
    pool: &SqlitePool,
    reviewer: &str,
    category: &str,
    now_ms: i64,
    lease_cutoff_ms: i64,
    limit: i64,
) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE submissions SET locked_by = ?1, locked_at = ?2
        WHERE id IN (
            SELECT s.id FROM submissions s
            JOIN names n ON n.id = s.name_id
            WHERE s.status = 'pending'
              AND (n.origin = ?3
                   OR (?3 = ?4 AND (n.origin IS NULL OR n.origin = '')))
              AND (s.locked_by IS NULL OR s.locked_at < ?5)
            ORDER BY s.id ASC
            LIMIT ?6
        )
          AND (locked_by IS NULL OR locked_at < ?5)
        RETURNING id
        "#,
    )
    .bind(reviewer)
    .bind(now_ms)
    .bind(category)
    .bind(UNCATEGORIZED)
    .bind(lease_cutoff_ms)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Refresh the lease stamp on every pending row a reviewer holds.
/// Used when a reviewer resumes an interrupted batch session.
pub async fn touch_lease(pool: &SqlitePool, reviewer: &str, now_ms: i64) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE submissions SET locked_at = ? WHERE locked_by = ? AND status = 'pending'",
    )
    .bind(now_ms)
    .bind(reviewer)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Clear lock fields on every submission held by a reviewer, any status
pub async fn release_for_reviewer(pool: &SqlitePool, reviewer: &str) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE submissions SET locked_by = NULL, locked_at = NULL WHERE locked_by = ?",
    )
    .bind(reviewer)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Clear lock fields on pending submissions whose lease stamp predates the cutoff
pub async fn release_expired(pool: &SqlitePool, lease_cutoff_ms: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE submissions SET locked_by = NULL, locked_at = NULL
        WHERE status = 'pending'
          AND locked_at IS NOT NULL
          AND locked_at < ?
        "#,
    )
    .bind(lease_cutoff_ms)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// The name a submission refers to
pub async fn name_id_of(pool: &SqlitePool, submission_id: i64) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT name_id FROM submissions WHERE id = ?")
        .bind(submission_id)
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

/// Mark approved and bump the verification counter. Ownership-scoped;
/// returns rows affected (0 = caller does not hold the lock).
pub async fn set_approved(pool: &SqlitePool, submission_id: i64, reviewer: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE submissions
        SET status = 'approved', verification_count = verification_count + 1
        WHERE id = ? AND locked_by = ?
        "#,
    )
    .bind(submission_id)
    .bind(reviewer)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Mark rejected (terminal skip, still revocable by undo). Ownership-scoped.
pub async fn set_rejected(pool: &SqlitePool, submission_id: i64, reviewer: &str) -> Result<u64> {
    let result =
        sqlx::query("UPDATE submissions SET status = 'rejected' WHERE id = ? AND locked_by = ?")
            .bind(submission_id)
            .bind(reviewer)
            .execute(pool)
            .await?;

    Ok(result.rows_affected())
}

/// Mark edited, replacing hint and/or audio reference where supplied.
/// A NULL bind leaves the stored value unchanged. Ownership-scoped.
pub async fn set_edited(
    pool: &SqlitePool,
    submission_id: i64,
    reviewer: &str,
    phonetic_hint: Option<&str>,
    audio_url: Option<&str>,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE submissions
        SET status = 'edited',
            phonetic_hint = COALESCE(?, phonetic_hint),
            audio_url = COALESCE(?, audio_url)
        WHERE id = ? AND locked_by = ?
        "#,
    )
    .bind(phonetic_hint)
    .bind(audio_url)
    .bind(submission_id)
    .bind(reviewer)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Revert to pending. The counter decrements only when the prior state was
/// approved and positive; the cached original hint is restored when present.
/// All CASE expressions evaluate against the pre-update row. Ownership-scoped.
pub async fn set_undone(pool: &SqlitePool, submission_id: i64, reviewer: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE submissions
        SET verification_count = CASE
                WHEN status = 'approved' AND verification_count > 0
                THEN verification_count - 1
                ELSE verification_count
            END,
            phonetic_hint = COALESCE(original_phonetic_hint, phonetic_hint),
            status = 'pending'
        WHERE id = ? AND locked_by = ?
        "#,
    )
    .bind(submission_id)
    .bind(reviewer)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Fetch one submission row (used by tests and the edit precondition check)
pub async fn get_submission(
    pool: &SqlitePool,
    submission_id: i64,
) -> Result<Option<oruko_common::db::Submission>> {
    let row = sqlx::query_as::<_, oruko_common::db::Submission>(
        "SELECT * FROM submissions WHERE id = ?",
    )
    .bind(submission_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Seed one review task for a name, caching the current hint for undo
pub async fn insert_for_name(pool: &SqlitePool, name_id: i64, now_ms: i64) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO submissions (name_id, status, phonetic_hint, original_phonetic_hint, created_at)
        SELECT id, 'pending', phonetic_hint, phonetic_hint, ? FROM names WHERE id = ?
        RETURNING id
        "#,
    )
    .bind(now_ms)
    .bind(name_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}
