//! `warnlogs` persistence.
//!
//! A row holds two index-aligned arrays, `warns` and `time`. Appends are a
//! single upsert; removals lock the row for the length of one transaction so
//! concurrent moderators never overwrite each other's edits.

use pizzahat_ledger::{
    WarnEntry, WarnError, WarnKey, WarnRecord, WarnSelector, WarnStore, resolve_selector,
};

use crate::database::Database;

#[derive(sqlx::FromRow)]
struct WarnRow {
    warns: Vec<String>,
    time: Vec<f64>,
}

impl WarnStore for Database {
    async fn get(&self, key: WarnKey) -> Result<Option<WarnRecord>, WarnError> {
        let (guild_id, user_id) = key_params(key)?;

        let row: Option<WarnRow> = sqlx::query_as(
            "SELECT warns, \"time\" FROM warnlogs WHERE guild_id = $1 AND user_id = $2",
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(WarnError::store)?;

        row.map(|row| WarnRecord::from_columns(key, row.warns, row.time))
            .transpose()
    }

    async fn append(&self, key: WarnKey, reason: &str, at: f64) -> Result<usize, WarnError> {
        let (guild_id, user_id) = key_params(key)?;

        let count: i32 = sqlx::query_scalar(
            "INSERT INTO warnlogs (guild_id, user_id, warns, \"time\")
             VALUES ($1, $2, ARRAY[$3::TEXT], ARRAY[$4::DOUBLE PRECISION])
             ON CONFLICT (guild_id, user_id) DO UPDATE
             SET warns = array_append(warnlogs.warns, $3::TEXT),
                 \"time\" = array_append(warnlogs.\"time\", $4::DOUBLE PRECISION)
             RETURNING cardinality(warns)",
        )
        .bind(guild_id)
        .bind(user_id)
        .bind(reason)
        .bind(at)
        .fetch_one(self.pool())
        .await
        .map_err(WarnError::store)?;

        usize::try_from(count).map_err(WarnError::store)
    }

    async fn remove(&self, key: WarnKey, selector: WarnSelector) -> Result<WarnEntry, WarnError> {
        let (guild_id, user_id) = key_params(key)?;

        let mut tx = self.pool().begin().await.map_err(WarnError::store)?;

        let row: Option<WarnRow> = sqlx::query_as(
            "SELECT warns, \"time\"
             FROM warnlogs
             WHERE guild_id = $1 AND user_id = $2
             FOR UPDATE",
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(WarnError::store)?;

        let mut entries = match row {
            Some(row) => WarnRecord::from_columns(key, row.warns, row.time)?.entries,
            None => Vec::new(),
        };

        let index = match resolve_selector(&entries, selector) {
            Ok(index) => index,
            Err(source) => {
                tx.rollback().await.map_err(WarnError::store)?;
                return Err(source);
            }
        };

        let removed = entries.remove(index);

        if entries.is_empty() {
            sqlx::query("DELETE FROM warnlogs WHERE guild_id = $1 AND user_id = $2")
                .bind(guild_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(WarnError::store)?;
        } else {
            let (warns, times): (Vec<String>, Vec<f64>) = entries
                .into_iter()
                .map(|entry| (entry.reason, entry.warned_at))
                .unzip();

            sqlx::query(
                "UPDATE warnlogs SET warns = $1, \"time\" = $2 WHERE guild_id = $3 AND user_id = $4",
            )
            .bind(warns)
            .bind(times)
            .bind(guild_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(WarnError::store)?;
        }

        tx.commit().await.map_err(WarnError::store)?;

        Ok(removed)
    }

    async fn clear(&self, key: WarnKey) -> Result<usize, WarnError> {
        let (guild_id, user_id) = key_params(key)?;

        let count: Option<i32> = sqlx::query_scalar(
            "DELETE FROM warnlogs WHERE guild_id = $1 AND user_id = $2 RETURNING cardinality(warns)",
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(WarnError::store)?;

        count
            .map(usize::try_from)
            .transpose()
            .map(Option::unwrap_or_default)
            .map_err(WarnError::store)
    }
}

fn key_params(key: WarnKey) -> Result<(i64, i64), WarnError> {
    let guild_id = i64::try_from(key.guild_id)
        .map_err(|_| WarnError::store(format!("guild_id {} out of i64 range", key.guild_id)))?;
    let user_id = i64::try_from(key.user_id)
        .map_err(|_| WarnError::store(format!("user_id {} out of i64 range", key.user_id)))?;
    Ok((guild_id, user_id))
}

#[cfg(test)]
mod tests {
    use pizzahat_ledger::{WarnEntry, WarnError, WarnKey, WarnSelector, WarnStore};
    use sqlx::PgPool;

    use super::key_params;
    use crate::cache::CacheService;
    use crate::database::Database;

    const KEY: WarnKey = WarnKey {
        guild_id: 860_889_936_914_677_770,
        user_id: 813_819_712_953_647_206,
    };

    fn store(pool: PgPool) -> Database {
        Database::from_pool(pool, CacheService::disabled("pizzahat:test"))
    }

    async fn row_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM warnlogs")
            .fetch_one(db.pool())
            .await
            .expect("count query")
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn upsert_appends_in_call_order(pool: PgPool) {
        let db = store(pool);

        for (expected, (reason, at)) in [("spam", 1000.0), ("flood", 2000.0), ("spam", 3000.5)]
            .into_iter()
            .enumerate()
        {
            let total = db.append(KEY, reason, at).await.expect("append succeeds");
            assert_eq!(total, expected + 1);
        }

        let record = db.get(KEY).await.expect("get succeeds").expect("row exists");
        assert_eq!(record.reasons().collect::<Vec<_>>(), vec!["spam", "flood", "spam"]);
        assert_eq!(record.times().collect::<Vec<_>>(), vec![1000.0, 2000.0, 3000.5]);
        assert_eq!(row_count(&db).await, 1);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn removing_the_last_entry_deletes_the_row(pool: PgPool) {
        let db = store(pool);
        db.append(KEY, "spam", 1000.0).await.expect("append succeeds");

        let removed = db.remove_at(KEY, 0).await.expect("index 0 exists");
        assert_eq!(removed, WarnEntry::new("spam", 1000.0));
        assert!(db.get(KEY).await.expect("get succeeds").is_none());
        assert_eq!(row_count(&db).await, 0);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn removes_by_warn_id_from_the_middle(pool: PgPool) {
        let db = store(pool);
        for (reason, at) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
            db.append(KEY, reason, at).await.expect("append succeeds");
        }

        let removed = db
            .remove(KEY, WarnSelector::WarnedAt(2.0))
            .await
            .expect("warn id exists");
        assert_eq!(removed.reason, "b");

        let record = db.get(KEY).await.expect("get succeeds").expect("row exists");
        assert_eq!(record.reasons().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(record.times().collect::<Vec<_>>(), vec![1.0, 3.0]);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn failed_removals_roll_back(pool: PgPool) {
        let db = store(pool);
        db.append(KEY, "spam", 1000.0).await.expect("append succeeds");
        db.append(KEY, "flood", 2000.0).await.expect("append succeeds");
        let before = db.get(KEY).await.expect("get succeeds");

        assert!(matches!(
            db.remove_at(KEY, 2).await,
            Err(WarnError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            db.remove(KEY, WarnSelector::WarnedAt(1500.0)).await,
            Err(WarnError::NotFound { .. })
        ));
        assert_eq!(db.get(KEY).await.expect("get succeeds"), before);

        // The row lock is released, so later writes still go through.
        assert_eq!(db.append(KEY, "caps", 3000.0).await.expect("append succeeds"), 3);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn absent_rows_behave_as_empty(pool: PgPool) {
        let db = store(pool);

        assert!(db.get(KEY).await.expect("get succeeds").is_none());
        assert!(matches!(
            db.remove_at(KEY, 0).await,
            Err(WarnError::IndexOutOfRange { index: 0, len: 0 })
        ));
        assert_eq!(db.clear(KEY).await.expect("clear succeeds"), 0);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn clear_reports_how_many_were_held(pool: PgPool) {
        let db = store(pool);
        let other = WarnKey::new(KEY.guild_id, 1);
        for at in [1.0, 2.0, 3.0] {
            db.append(KEY, "noise", at).await.expect("append succeeds");
        }
        db.append(other, "noise", 4.0).await.expect("append succeeds");

        assert_eq!(db.clear(KEY).await.expect("clear succeeds"), 3);
        assert!(db.get(KEY).await.expect("get succeeds").is_none());
        assert_eq!(row_count(&db).await, 1);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn schema_rejects_misaligned_arrays(pool: PgPool) {
        let result = sqlx::query(
            "INSERT INTO warnlogs (guild_id, user_id, warns, \"time\")
             VALUES (1, 2, ARRAY['spam'], ARRAY[]::DOUBLE PRECISION[])",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn concurrent_appends_are_not_lost(pool: PgPool) {
        let db = store(pool);
        let mut handles = Vec::new();
        for offset in 0..16 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                db.append(KEY, "burst", f64::from(offset)).await
            }));
        }
        for handle in handles {
            handle.await.expect("task joins").expect("append succeeds");
        }

        let record = db.get(KEY).await.expect("get succeeds").expect("row exists");
        assert_eq!(record.len(), 16);
    }

    #[test]
    fn snowflake_ids_fit_bigint_columns() {
        let key = WarnKey::new(860_889_936_914_677_770, 813_819_712_953_647_206);
        assert_eq!(
            key_params(key).ok(),
            Some((860_889_936_914_677_770, 813_819_712_953_647_206))
        );
    }

    #[test]
    fn ids_above_i64_are_store_errors() {
        let key = WarnKey::new(u64::MAX, 1);
        assert!(matches!(
            key_params(key),
            Err(WarnError::StoreUnavailable(_))
        ));
    }
}
