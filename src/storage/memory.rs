//! Process-local counter store
//!
//! Mirrors the redis driver's semantics over an in-process map. Suitable for
//! single-instance deployments and tests; state is lost on restart and not
//! shared across instances.

use super::CounterStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// One identity's window: entry timestamps plus the key's own expiry.
#[derive(Debug, Default)]
struct IdentityWindow {
    entries: Vec<u64>,
    expires_at_ms: u64,
}

/// In-memory [`CounterStore`] implementation
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    windows: Mutex<HashMap<String, IdentityWindow>>,
}

impl MemoryCounterStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop whole keys whose TTL elapsed. Keeps memory bounded by the number
    /// of identities active within one window duration.
    fn evict_expired(windows: &mut HashMap<String, IdentityWindow>, now_ms: u64) {
        windows.retain(|_, w| w.expires_at_ms > now_ms);
    }

    /// Number of live identity keys, for tests and diagnostics.
    pub fn key_count(&self) -> usize {
        self.windows.lock().len()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn prune_insert_count(
        &self,
        key: &str,
        cutoff_ms: u64,
        now_ms: u64,
        ttl_ms: u64,
    ) -> Result<u64> {
        let mut windows = self.windows.lock();
        Self::evict_expired(&mut windows, now_ms);

        let window = windows.entry(key.to_string()).or_default();
        window.entries.retain(|&t| t >= cutoff_ms);
        window.entries.push(now_ms);
        window.expires_at_ms = now_ms.saturating_add(ttl_ms);

        Ok(window.entries.len() as u64)
    }

    async fn prune_count(&self, key: &str, cutoff_ms: u64) -> Result<u64> {
        let mut windows = self.windows.lock();

        let Some(window) = windows.get_mut(key) else {
            return Ok(0);
        };
        window.entries.retain(|&t| t >= cutoff_ms);

        Ok(window.entries.len() as u64)
    }

    async fn reconnect(&self) -> Result<()> {
        Ok(())
    }
}
