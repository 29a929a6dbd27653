//! API authentication: job shared secret and reviewer sessions
//!
//! Two independent mechanisms:
//!
//! - **Shared secret** (i64 in the settings table): guards machine-to-machine
//!   endpoints (the lock sweeper trigger, session minting). Presented as a
//!   bearer credential. Special value 0 disables checking entirely, intended
//!   for tests and local development.
//! - **Reviewer sessions**: opaque bearer tokens minted after the external
//!   passwordless login completes, resolved to a reviewer row per request.
//!
//! Pure functions and database operations only. No HTTP framework
//! dependencies - middleware lives in the service crates.

use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::Reviewer;
use crate::{time, Error, Result};

/// Settings key holding the shared secret
pub const SHARED_SECRET_KEY: &str = "api_shared_secret";

/// Load shared secret from database settings
///
/// Generates and stores a fresh non-zero secret on first run.
pub async fn load_shared_secret(db: &SqlitePool) -> Result<i64> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(SHARED_SECRET_KEY)
            .fetch_optional(db)
            .await?;

    match result {
        Some((value,)) => value
            .parse::<i64>()
            .map_err(|e| Error::Internal(format!("Invalid shared secret in settings: {}", e))),
        None => initialize_shared_secret(db).await,
    }
}

/// Generate and store a cryptographically random non-zero shared secret
pub async fn initialize_shared_secret(db: &SqlitePool) -> Result<i64> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let secret: i64 = loop {
        let val = rng.gen::<i64>();
        if val != 0 {
            break val;
        }
    };

    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(SHARED_SECRET_KEY)
        .bind(secret.to_string())
        .execute(db)
        .await?;

    Ok(secret)
}

/// Validate a presented bearer credential against the shared secret
///
/// Returns true when the secret is 0 (auth disabled). Both sides are hashed
/// before comparing, so compare timing varies with the digests rather than
/// with how much of the secret a guess got right.
pub fn verify_job_secret(provided: &str, secret: i64) -> bool {
    if secret == 0 {
        return true;
    }

    let expected = Sha256::digest(secret.to_string().as_bytes());
    let got = Sha256::digest(provided.as_bytes());
    expected == got
}

/// Mint a session token for a reviewer handle
///
/// The handle must belong to an existing reviewer row.
pub async fn mint_session(db: &SqlitePool, handle: &str) -> Result<String> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM reviewers WHERE handle = ?")
        .bind(handle)
        .fetch_optional(db)
        .await?;

    if exists.is_none() {
        return Err(Error::NotFound(format!("Unknown reviewer: {}", handle)));
    }

    let token = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO review_sessions (token, reviewer_handle, created_at) VALUES (?, ?, ?)",
    )
    .bind(&token)
    .bind(handle)
    .bind(time::now_ms())
    .execute(db)
    .await?;

    Ok(token)
}

/// Resolve a session token to its reviewer, if the token is valid
pub async fn lookup_session(db: &SqlitePool, token: &str) -> Result<Option<Reviewer>> {
    let reviewer = sqlx::query_as::<_, Reviewer>(
        r#"
        SELECT r.id, r.handle, r.role, r.skills, r.created_at
        FROM review_sessions s
        JOIN reviewers r ON r.handle = s.reviewer_handle
        WHERE s.token = ?
        "#,
    )
    .bind(token)
    .fetch_optional(db)
    .await?;

    Ok(reviewer)
}
