//! Atomic sliding-window operations over Redis sorted sets
//!
//! Each identity key is a sorted set whose members are unique per request and
//! whose scores are the request timestamps in milliseconds. The prune, insert,
//! count and expiry steps run inside one MULTI/EXEC pipeline so concurrent
//! requests for the same identity serialize on the server.

use super::pool::RedisPool;
use crate::storage::CounterStore;
use crate::utils::error::{GovernorError, Result};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl CounterStore for RedisPool {
    async fn prune_insert_count(
        &self,
        key: &str,
        cutoff_ms: u64,
        now_ms: u64,
        ttl_ms: u64,
    ) -> Result<u64> {
        let mut conn = self.connection();

        // Members carry a UUID so two inserts within the same millisecond
        // remain distinct entries.
        let member = format!("{}-{}", now_ms, Uuid::new_v4().simple());

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("ZREMRANGEBYSCORE")
            .arg(key)
            .arg("-inf")
            .arg(format!("({}", cutoff_ms))
            .ignore()
            .cmd("ZADD")
            .arg(key)
            .arg(now_ms)
            .arg(&member)
            .ignore()
            .cmd("ZCARD")
            .arg(key)
            .cmd("PEXPIRE")
            .arg(key)
            .arg(ttl_ms)
            .ignore();

        let (count,): (u64,) = tokio::time::timeout(self.op_timeout(), pipe.query_async(&mut conn))
            .await
            .map_err(|_| {
                GovernorError::Timeout(format!("counter store transaction for {}", key))
            })?
            .map_err(GovernorError::Redis)?;

        Ok(count)
    }

    async fn prune_count(&self, key: &str, cutoff_ms: u64) -> Result<u64> {
        let mut conn = self.connection();

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("ZREMRANGEBYSCORE")
            .arg(key)
            .arg("-inf")
            .arg(format!("({}", cutoff_ms))
            .ignore()
            .cmd("ZCARD")
            .arg(key);

        let (count,): (u64,) = tokio::time::timeout(self.op_timeout(), pipe.query_async(&mut conn))
            .await
            .map_err(|_| GovernorError::Timeout(format!("counter store count for {}", key)))?
            .map_err(GovernorError::Redis)?;

        Ok(count)
    }

    async fn reconnect(&self) -> Result<()> {
        RedisPool::reconnect(self).await
    }
}
