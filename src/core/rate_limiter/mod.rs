//! Sliding-window admission control
//!
//! Decides, per inbound request, whether to accept or reject based on the
//! identity's recent request volume held in a shared counter store.

mod limiter;
mod types;


// Re-export public types
pub use limiter::SlidingWindowLimiter;
pub use types::RateLimitDecision;
