//! Manual schema migrations
//!
//! Runs after table creation. Each step is guarded so the pass stays
//! idempotent for databases created at any earlier schema version.

use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

const CURRENT_VERSION: i64 = 2;

/// Apply migrations up to CURRENT_VERSION
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let version: i64 = sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
        .fetch_one(pool)
        .await?;

    if version >= CURRENT_VERSION {
        return Ok(());
    }

    if version < 2 {
        migrate_v1_to_v2(pool).await?;
    }

    sqlx::query("UPDATE schema_version SET version = ? WHERE id = 1")
        .bind(CURRENT_VERSION)
        .execute(pool)
        .await?;

    info!("Migrated database schema v{} -> v{}", version, CURRENT_VERSION);
    Ok(())
}

/// v2: cache the seed-time phonetic hint on submissions so undo can restore it
async fn migrate_v1_to_v2(pool: &SqlitePool) -> Result<()> {
    if !column_exists(pool, "submissions", "original_phonetic_hint").await? {
        sqlx::query("ALTER TABLE submissions ADD COLUMN original_phonetic_hint TEXT")
            .execute(pool)
            .await?;
        // Pre-v2 rows never had an edit applied yet
        sqlx::query("UPDATE submissions SET original_phonetic_hint = phonetic_hint")
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn column_exists(pool: &SqlitePool, table: &str, column: &str) -> Result<bool> {
    let columns = sqlx::query_as::<_, (i64, String, String, i64, Option<String>, i64)>(&format!(
        "PRAGMA table_info({})",
        table
    ))
    .fetch_all(pool)
    .await?;

    Ok(columns.iter().any(|(_, name, ..)| name == column))
}
