//! Core admission controller implementation

use super::types::RateLimitDecision;
use crate::config::RateLimitConfig;
use crate::storage::CounterStore;
use crate::utils::clock::current_millis;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sliding-window admission controller.
///
/// Owns no window state itself; every check runs the atomic
/// prune/insert/count/expire sequence against the shared [`CounterStore`], so
/// multi-instance deployments sharing one store share the admission decision.
///
/// Store failures never escape to the caller: the controller fails closed
/// (treats the request as limited), because losing the store also loses the
/// only memory of recent request volume.
pub struct SlidingWindowLimiter {
    store: Arc<dyn CounterStore>,
    config: RateLimitConfig,
}

impl SlidingWindowLimiter {
    /// Create a limiter over the given store and policy
    pub fn new(store: Arc<dyn CounterStore>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    /// The configured policy
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn key(&self, identity: &str) -> String {
        format!("{}:{}", self.config.key_prefix, identity)
    }

    /// Check the identity against the policy and consume one slot.
    ///
    /// On a transient store error the controller reconnects once and retries
    /// the check a single time before failing closed.
    pub async fn check_and_consume(&self, identity: &str) -> RateLimitDecision {
        let now = current_millis();

        if !self.config.enabled {
            return RateLimitDecision::unlimited(
                self.config.max_requests,
                now,
                self.config.window_ms,
            );
        }

        let key = self.key(identity);
        let cutoff = now.saturating_sub(self.config.window_ms);

        match self
            .store
            .prune_insert_count(&key, cutoff, now, self.config.window_ms)
            .await
        {
            Ok(count) => self.decision(count, now),
            Err(e) if e.is_retryable() => {
                warn!("Transient counter store error for {}: {}, retrying once", key, e);
                self.retry_once(&key, cutoff, now).await
            }
            Err(e) => {
                warn!("Counter store unavailable for {}: {}, failing closed", key, e);
                self.closed(now)
            }
        }
    }

    async fn retry_once(&self, key: &str, cutoff: u64, now: u64) -> RateLimitDecision {
        if let Err(e) = self.store.reconnect().await {
            warn!("Counter store reconnect failed: {}, failing closed", e);
            return self.closed(now);
        }

        match self
            .store
            .prune_insert_count(key, cutoff, now, self.config.window_ms)
            .await
        {
            Ok(count) => self.decision(count, now),
            Err(e) => {
                warn!("Counter store retry failed for {}: {}, failing closed", key, e);
                self.closed(now)
            }
        }
    }

    /// Remaining quota for the identity without consuming a slot.
    ///
    /// Fails closed to zero when the store cannot answer.
    pub async fn remaining(&self, identity: &str) -> u64 {
        if !self.config.enabled {
            return self.config.max_requests;
        }

        let now = current_millis();
        let cutoff = now.saturating_sub(self.config.window_ms);

        match self.store.prune_count(&self.key(identity), cutoff).await {
            Ok(count) => self.config.max_requests.saturating_sub(count),
            Err(e) => {
                warn!("Counter store unavailable for remaining(): {}", e);
                0
            }
        }
    }

    fn decision(&self, count: u64, now: u64) -> RateLimitDecision {
        let limited = count > self.config.max_requests;
        if limited {
            debug!(
                "Rate limit exceeded: {}/{} requests in window",
                count, self.config.max_requests
            );
        }

        RateLimitDecision {
            limited,
            current_count: count,
            limit: self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(count),
            reset_at_ms: now.saturating_add(self.config.window_ms),
        }
    }

    fn closed(&self, now: u64) -> RateLimitDecision {
        RateLimitDecision::fail_closed(self.config.max_requests, now, self.config.window_ms)
    }
}
