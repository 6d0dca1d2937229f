use anyhow::Context as _;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::cache::CacheService;

/// Schema for `warnlogs` and `staff_role`.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres pool plus the optional settings cache, shared by every command.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    cache: CacheService,
}

impl Database {
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        cache: CacheService,
    ) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("failed to connect to PostgreSQL")?;
        info!(max_connections, "PostgreSQL connection established.");

        Ok(Self::from_pool(pool, cache))
    }

    pub fn from_pool(pool: PgPool, cache: CacheService) -> Self {
        Self { pool, cache }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .context("failed to apply database migrations")?;
        info!("Database migrations applied.");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }
}
