use anyhow::Context as _;

use crate::cache::{CONFIG_CACHE_TTL, invalidate_staff_role, staff_role_key};
use crate::database::Database;

/// Role pinged when a member opens a ticket.
pub async fn get_staff_role_id(db: &Database, guild_id: u64) -> anyhow::Result<Option<u64>> {
    let cache_key = staff_role_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

            let role_id: Option<i64> =
                sqlx::query_scalar("SELECT role_id FROM staff_role WHERE guild_id = $1")
                    .bind(guild_id_i64)
                    .fetch_optional(db.pool())
                    .await?;

            role_id
                .map(u64::try_from)
                .transpose()
                .context("role_id out of u64 range")
        })
        .await
}

pub async fn set_staff_role_id(db: &Database, guild_id: u64, role_id: u64) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let role_id_i64 = i64::try_from(role_id).context("role_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO staff_role (guild_id, role_id)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET role_id = EXCLUDED.role_id",
    )
    .bind(guild_id_i64)
    .bind(role_id_i64)
    .execute(db.pool())
    .await?;

    invalidate_staff_role(db.cache(), guild_id).await?;

    Ok(())
}

pub async fn clear_staff_role_id(db: &Database, guild_id: u64) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query("DELETE FROM staff_role WHERE guild_id = $1")
        .bind(guild_id_i64)
        .execute(db.pool())
        .await?;

    invalidate_staff_role(db.cache(), guild_id).await?;

    Ok(())
}
