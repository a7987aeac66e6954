//! Time helpers
//!
//! Timestamps are stored as Unix milliseconds throughout the database so
//! comparisons in queries stay plain integer math.

use chrono::Utc;

/// Current time as Unix milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Milliseconds in a minute
pub const MINUTE_MS: i64 = 60 * 1000;

/// Milliseconds in an hour
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
