// ABOUTME: Shared utility functions for SIMLOK
// ABOUTME: Row id generation, worker count clamping and implementation date helpers

use crate::constants::{MAX_WORKERS, MIN_WORKERS};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer};

/// Generate an opaque client-side row id
pub fn generate_row_id() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..12)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Clamp a requested worker count into `[MIN_WORKERS, MAX_WORKERS]`
pub fn clamp_worker_count(requested: i64) -> usize {
    requested.clamp(MIN_WORKERS as i64, MAX_WORKERS as i64) as usize
}

/// Parse a `YYYY-MM-DD` form date, ignoring surrounding whitespace
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Whether any day in the inclusive range falls on Saturday or Sunday
pub fn range_includes_weekend(start: NaiveDate, end: NaiveDate) -> bool {
    if end < start {
        return false;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        // a full week always contains a weekend
        .take(7)
        .any(|day| matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
}

/// Serde helper: read an explicit `null` as the field's default.
///
/// Pair with `#[serde(default)]` so a missing key also falls back.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
