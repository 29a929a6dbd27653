//! Timestamp utilities
//!
//! Lock stamps, lease arithmetic and record timestamps are all Unix epoch
//! milliseconds (i64), so comparisons stay plain integer comparisons in SQL.

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current Unix epoch time in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
