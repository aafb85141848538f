//! Counter store backends for the admission controller
//!
//! All sliding-window state lives behind the [`CounterStore`] trait: a sorted
//! collection of timestamped entries per identity key, with the prune/insert/
//! count/expire sequence executed atomically by each backend.

mod memory;
pub mod redis;

pub use memory::MemoryCounterStore;
pub use redis::RedisPool;

use crate::utils::error::Result;
use async_trait::async_trait;

/// Shared counter store contract.
///
/// A store holds, per identity key, the set of request timestamps inside the
/// current window. Both operations prune entries strictly older than
/// `cutoff_ms` before counting, so a completed call never leaves stale
/// entries behind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically prune entries older than `cutoff_ms`, insert an entry at
    /// `now_ms`, refresh the key's expiry to `ttl_ms`, and return the
    /// resulting entry count (including the new entry).
    ///
    /// Concurrent callers on the same key must each observe a serializable
    /// count increment; partial execution must not be observable.
    async fn prune_insert_count(
        &self,
        key: &str,
        cutoff_ms: u64,
        now_ms: u64,
        ttl_ms: u64,
    ) -> Result<u64>;

    /// Prune entries older than `cutoff_ms` and return the remaining count
    /// without inserting.
    async fn prune_count(&self, key: &str, cutoff_ms: u64) -> Result<u64>;

    /// Re-establish the backend connection after a transient failure.
    async fn reconnect(&self) -> Result<()>;
}
