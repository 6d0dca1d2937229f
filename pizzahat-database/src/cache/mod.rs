mod redis_store;

use std::future::Future;
use std::time::Duration;

use anyhow::Context as _;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use redis_store::RedisCacheStore;

/// How long per-guild configuration stays cached.
pub const CONFIG_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Where cached bytes live. `Disabled` misses every read and drops every
/// write, so callers always fall through to Postgres.
#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled,
    Redis(RedisCacheStore),
}

impl CacheBackend {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        match self {
            Self::Disabled => Ok(None),
            Self::Redis(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> anyhow::Result<()> {
        match self {
            Self::Disabled => Ok(()),
            Self::Redis(store) => store.set(key, value, ttl_seconds).await,
        }
    }

    async fn del(&self, key: &str) -> anyhow::Result<()> {
        match self {
            Self::Disabled => Ok(()),
            Self::Redis(store) => store.del(key).await,
        }
    }
}

/// Optional JSON cache in front of per-guild settings.
#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Disabled,
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(RedisCacheStore::from_url(redis_url)?),
        })
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled => Ok(()),
            CacheBackend::Redis(store) => store.ping().await,
        }
    }

    pub async fn get_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(bytes) = self.backend.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .with_context(|| format!("failed to deserialize cache value for `{key}`"))
    }

    pub async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let payload = serde_json::to_vec(value)
            .with_context(|| format!("failed to serialize cache value for `{key}`"))?;

        self.backend.set(key, payload, ttl.as_secs().max(1)).await
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        self.backend.del(key).await
    }

    /// Serve `key` from the cache, or run `loader` and cache its result.
    /// Cache failures are logged and never fail the lookup.
    pub async fn get_or_load_json<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(source) => warn!(?source, cache_key = key, "cache read failed; loading from database"),
        }

        let loaded = loader().await?;

        if let Err(source) = self.set_json(key, &loaded, ttl).await {
            warn!(?source, cache_key = key, "cache write failed; serving database value");
        }

        Ok(loaded)
    }
}

pub fn staff_role_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("guild:{guild_id}:staff_role"))
}

pub async fn invalidate_staff_role(cache: &CacheService, guild_id: u64) -> anyhow::Result<()> {
    cache.del(&staff_role_key(cache, guild_id)).await
}

#[cfg(test)]
mod tests {
    use super::{CacheService, staff_role_key};

    #[test]
    fn keys_are_prefixed_per_guild() {
        let cache = CacheService::disabled("pizzahat:test");
        assert_eq!(
            staff_role_key(&cache, 42),
            "pizzahat:test:guild:42:staff_role"
        );
        assert!(!cache.is_redis_enabled());
    }

    #[tokio::test]
    async fn disabled_cache_always_loads() {
        let cache = CacheService::disabled("pizzahat:test");
        let loaded = cache
            .get_or_load_json("k", super::CONFIG_CACHE_TTL, || async {
                Ok::<_, anyhow::Error>(Some(7_u64))
            })
            .await
            .expect("loader succeeds");
        assert_eq!(loaded, Some(7));
        assert!(cache.get_json::<Option<u64>>("k").await.expect("disabled get").is_none());
    }
}
