//! Redis connection management for the counter store
//!
//! A single multiplexed connection serves all governance traffic; it is
//! cheaply cloned per operation and swapped wholesale on `reconnect`.

use crate::config::RedisConfig;
use crate::utils::error::{GovernorError, Result};
use parking_lot::RwLock;
use redis::{Client, aio::MultiplexedConnection};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis-backed counter store connection pool
pub struct RedisPool {
    pub(crate) client: Client,
    pub(crate) conn: RwLock<MultiplexedConnection>,
    pub(crate) config: RedisConfig,
}

impl RedisPool {
    /// Connect to Redis with the configured timeouts
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        info!("Connecting to counter store");
        debug!("Redis URL: {}", Self::sanitize_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(GovernorError::Redis)?;
        let conn = Self::open_connection(&client, config).await?;

        info!("Counter store connection established");
        Ok(Self {
            client,
            conn: RwLock::new(conn),
            config: config.clone(),
        })
    }

    async fn open_connection(
        client: &Client,
        config: &RedisConfig,
    ) -> Result<MultiplexedConnection> {
        client
            .get_multiplexed_async_connection_with_timeouts(
                Duration::from_millis(config.response_timeout_ms),
                Duration::from_millis(config.connect_timeout_ms),
            )
            .await
            .map_err(GovernorError::Redis)
    }

    /// Get a connection handle for one operation
    pub(crate) fn connection(&self) -> MultiplexedConnection {
        self.conn.read().clone()
    }

    /// Replace the shared connection with a freshly established one.
    ///
    /// Used by the admission controller's single-retry policy after a
    /// transient store error (e.g. a READONLY replica response).
    pub async fn reconnect(&self) -> Result<()> {
        warn!("Re-establishing counter store connection");
        let fresh = Self::open_connection(&self.client, &self.config).await?;
        *self.conn.write() = fresh;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing counter store health check");
        let mut conn = self.connection();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(GovernorError::Redis)?;
        debug!("Counter store health check passed");
        Ok(())
    }

    /// Per-operation timeout from the pool configuration
    pub(crate) fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.config.response_timeout_ms)
    }

    /// Sanitize Redis URL for logging (hide password)
    pub(crate) fn sanitize_url(url: &str) -> String {
        if let Ok(parsed) = url::Url::parse(url) {
            let mut sanitized = parsed.clone();
            if sanitized.password().is_some() {
                let _ = sanitized.set_password(Some("***"));
            }
            sanitized.to_string()
        } else {
            "invalid_url".to_string()
        }
    }
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("url", &Self::sanitize_url(&self.config.url))
            .finish()
    }
}
