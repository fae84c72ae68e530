use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Redis-backed cache for public read models and the session revocation list.
///
/// When no Redis URL is configured the cache is disabled: reads miss, writes
/// and deletes succeed without doing anything.
#[derive(Clone)]
pub struct RedisCache {
    connection: Option<ConnectionManager>,
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self {
            connection: Some(connection),
        })
    }

    pub fn disabled() -> Self {
        Self { connection: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.connection.is_some()
    }

    /// Get a value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let Some(connection) = &self.connection else {
            return Ok(None);
        };

        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut connection.clone())
            .await?;

        match value {
            Some(v) => {
                let deserialized = serde_json::from_str(&v).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::TypeError,
                        "Deserialization error",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with optional TTL (in seconds)
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> redis::RedisResult<()> {
        let Some(connection) = &self.connection else {
            return Ok(());
        };

        let serialized = serde_json::to_string(value).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "Serialization error",
                e.to_string(),
            ))
        })?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(serialized);

        if let Some(ttl) = ttl_seconds {
            cmd.arg("EX").arg(ttl);
        }

        cmd.query_async(&mut connection.clone()).await
    }

    /// Delete a key from cache
    pub async fn delete(&self, key: &str) -> redis::RedisResult<()> {
        let Some(connection) = &self.connection else {
            return Ok(());
        };

        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut connection.clone())
            .await
    }

    /// Delete a key, logging instead of failing. Used after writes.
    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.delete(key).await {
            tracing::warn!("Failed to invalidate cache key {key}: {e}");
        }
    }

    /// Check if key exists
    pub async fn exists(&self, key: &str) -> redis::RedisResult<bool> {
        let Some(connection) = &self.connection else {
            return Ok(false);
        };

        redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut connection.clone())
            .await
    }

    /// Round-trip a PING; `false` when disabled or unreachable.
    pub async fn ping(&self) -> bool {
        let Some(connection) = &self.connection else {
            return false;
        };

        redis::cmd("PING")
            .query_async::<_, String>(&mut connection.clone())
            .await
            .is_ok()
    }

    /// Record a signed-out session id until its token would have expired anyway.
    pub async fn revoke_session(&self, jti: &str, ttl: Duration) -> redis::RedisResult<()> {
        let ttl = ttl.as_secs().max(1);
        self.set(&keys::revoked_session(jti), &true, Some(ttl)).await
    }

    pub async fn is_session_revoked(&self, jti: &str) -> bool {
        match self.exists(&keys::revoked_session(jti)).await {
            Ok(revoked) => revoked,
            Err(e) => {
                tracing::warn!("Cache error while checking session revocation: {e}");
                false
            }
        }
    }
}

/// Cache key generators
pub mod keys {
    /// Public business profile
    pub fn business_info() -> String {
        "public:business-info".to_string()
    }

    /// Public settings map
    pub fn public_settings() -> String {
        "public:settings".to_string()
    }

    /// Generate key for a public page by slug
    pub fn page(slug: &str) -> String {
        format!("public:page:{}", slug)
    }

    /// Generate key for a revoked session token id
    pub fn revoked_session(jti: &str) -> String {
        format!("session:revoked:{}", jti)
    }
}

/// TTL for public read models.
pub const PUBLIC_TTL_SECS: u64 = 600;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_cache_misses_and_accepts_writes() {
        let cache = RedisCache::disabled();
        assert!(!cache.is_enabled());
        cache.set("k", &42u32, Some(10)).await.unwrap();
        assert_eq!(cache.get::<u32>("k").await.unwrap(), None);
        assert!(!cache.is_session_revoked("abc").await);
        assert!(!cache.ping().await);
    }

    #[test]
    fn key_shapes() {
        assert_eq!(keys::page("about"), "public:page:about");
        assert_eq!(keys::revoked_session("j1"), "session:revoked:j1");
    }
}
