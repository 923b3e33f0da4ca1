//! Time-related utilities with clock abstraction for testability.
//!
//! All timestamps in the system are Unix milliseconds in UTC. The quota
//! ledger additionally needs UTC calendar-day arithmetic, which lives here
//! so that day boundaries are computed in exactly one place.

use chrono::{DateTime, NaiveDate, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in UTC (milliseconds)
    fn now_utc_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc_millis(&self) -> i64 {
        get_utc_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_utc_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp in UTC (milliseconds)
pub fn get_utc_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to an RFC 3339 string in UTC
pub fn timestamp_to_utc_rfc3339(timestamp_millis: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

/// UTC calendar day a timestamp falls on
pub fn utc_day(timestamp_millis: i64) -> NaiveDate {
    DateTime::from_timestamp_millis(timestamp_millis)
        .map(|dt| dt.date_naive())
        .unwrap_or(NaiveDate::MIN)
}

/// Unix timestamp (milliseconds) of the next UTC midnight after `timestamp_millis`
pub fn next_utc_midnight(timestamp_millis: i64) -> i64 {
    utc_day(timestamp_millis)
        .succ_opt()
        .and_then(|next| next.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(i64::MAX)
}
