//! Wall-clock helpers

/// Current Unix time in milliseconds.
pub fn current_millis() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
