//! Redis Session Store
//!
//! Entries live under `session:<token>`; a TTL maps to `SET ... EX`.

use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

use crate::domain::repository::{SessionStore, StoreError};

const SESSION_PREFIX: &str = "session";

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Open a client for `url` and verify the connection
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self::new(conn))
    }

    fn make_key(key: &str) -> String {
        format!("{SESSION_PREFIX}:{key}")
    }

    /// Redis expiry has whole-second granularity; never round down to zero
    fn ttl_secs(ttl: Duration) -> u64 {
        ttl.as_secs().max(1)
    }
}

impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(Self::make_key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let key = Self::make_key(key);

        match ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, Self::ttl_secs(ttl)).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(Self::make_key(key)).await?;
        Ok(removed > 0)
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key() {
        assert_eq!(RedisSessionStore::make_key("abc"), "session:abc");
    }

    #[test]
    fn test_ttl_secs_rounds_up_subsecond() {
        assert_eq!(RedisSessionStore::ttl_secs(Duration::from_millis(200)), 1);
        assert_eq!(RedisSessionStore::ttl_secs(Duration::from_secs(3600)), 3600);
    }

    #[test]
    fn test_redis_error_conversion() {
        let err = redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"));
        let store_err = StoreError::from(err);
        assert!(matches!(store_err, StoreError::Backend(msg) if msg.contains("connection refused")));
    }
}
