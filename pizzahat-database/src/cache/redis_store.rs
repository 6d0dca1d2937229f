use anyhow::Context as _;
use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;

/// Pooled Redis connections for the settings cache.
#[derive(Clone, Debug)]
pub struct RedisCacheStore {
    pool: Pool,
}

impl RedisCacheStore {
    pub fn from_url(redis_url: &str) -> anyhow::Result<Self> {
        let pool = Config::from_url(redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .context("failed to create redis pool")?;

        Ok(Self { pool })
    }

    async fn connection(&self) -> anyhow::Result<Connection> {
        self.pool
            .get()
            .await
            .context("failed to get redis connection")
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;

        conn.get::<_, Option<Vec<u8>>>(key)
            .await
            .with_context(|| format!("redis GET failed for `{key}`"))
    }

    pub async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> anyhow::Result<()> {
        let mut conn = self.connection().await?;

        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .with_context(|| format!("redis SETEX failed for `{key}`"))
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        let mut conn = self.connection().await?;

        conn.del::<_, u64>(key)
            .await
            .with_context(|| format!("redis DEL failed for `{key}`"))?;

        Ok(())
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self.connection().await?;

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .context("redis PING failed")?;

        Ok(())
    }
}
