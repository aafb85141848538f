//! Rate limiter types and data structures

/// Outcome of one admission check
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    /// Whether the request exceeded the policy and must be rejected
    pub limited: bool,
    /// Entry count observed in the window (including this request)
    pub current_count: u64,
    /// Policy ceiling
    pub limit: u64,
    /// Remaining quota in the window
    pub remaining: u64,
    /// Unix milliseconds at which a full window will have elapsed
    pub reset_at_ms: u64,
}

impl RateLimitDecision {
    /// Decision for a disabled policy: always admitted, full quota.
    pub(super) fn unlimited(limit: u64, now_ms: u64, window_ms: u64) -> Self {
        Self {
            limited: false,
            current_count: 0,
            limit,
            remaining: limit,
            reset_at_ms: now_ms.saturating_add(window_ms),
        }
    }

    /// Fail-closed decision used when the counter store cannot answer.
    pub(super) fn fail_closed(limit: u64, now_ms: u64, window_ms: u64) -> Self {
        Self {
            limited: true,
            current_count: limit,
            limit,
            remaining: 0,
            reset_at_ms: now_ms.saturating_add(window_ms),
        }
    }
}
