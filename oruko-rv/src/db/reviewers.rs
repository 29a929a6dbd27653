//! Reviewer queries

use oruko_common::db::Reviewer;
use oruko_common::Result;
use sqlx::SqlitePool;

/// Insert a reviewer identity (dev seeding and tests)
pub async fn insert_reviewer(
    pool: &SqlitePool,
    handle: &str,
    role: &str,
    skills: Option<&str>,
    now_ms: i64,
) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO reviewers (handle, role, skills, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(handle)
    .bind(role)
    .bind(skills)
    .bind(now_ms)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Fetch a reviewer by handle
pub async fn get_by_handle(pool: &SqlitePool, handle: &str) -> Result<Option<Reviewer>> {
    let row = sqlx::query_as::<_, Reviewer>("SELECT * FROM reviewers WHERE handle = ?")
        .bind(handle)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}
