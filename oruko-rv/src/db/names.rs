//! Name queries

use oruko_common::db::Name;
use oruko_common::Result;
use sqlx::SqlitePool;

/// Set the global verified flag on a name
///
/// Only ever called as a side effect of an approval; undo does not revert it
/// (verification is sticky once granted).
pub async fn set_verified(pool: &SqlitePool, name_id: i64) -> Result<u64> {
    let result = sqlx::query("UPDATE names SET verification_status = 1 WHERE id = ?")
        .bind(name_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Fetch one name row
pub async fn get_name(pool: &SqlitePool, name_id: i64) -> Result<Option<Name>> {
    let row = sqlx::query_as::<_, Name>("SELECT * FROM names WHERE id = ?")
        .bind(name_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Insert a candidate name (bulk import and test seeding)
pub async fn insert_name(
    pool: &SqlitePool,
    name: &str,
    origin: Option<&str>,
    meaning: Option<&str>,
    phonetic_hint: Option<&str>,
    now_ms: i64,
) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO names (name, origin, meaning, phonetic_hint, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(origin)
    .bind(meaning)
    .bind(phonetic_hint)
    .bind(now_ms)
    .fetch_one(pool)
    .await?;

    Ok(id)
}
