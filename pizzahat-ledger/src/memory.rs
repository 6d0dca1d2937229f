use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::WarnError;
use crate::model::{WarnEntry, WarnKey, WarnRecord};
use crate::store::{WarnSelector, WarnStore, resolve_selector};

/// Process-local store. A single lock serialises every mutation, which
/// gives the same per-key atomicity as the Postgres store.
#[derive(Clone, Debug, Default)]
pub struct MemoryWarnStore {
    rows: Arc<Mutex<HashMap<WarnKey, Vec<WarnEntry>>>>,
}

impl MemoryWarnStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WarnStore for MemoryWarnStore {
    async fn get(&self, key: WarnKey) -> Result<Option<WarnRecord>, WarnError> {
        let rows = self.rows.lock().await;
        Ok(rows.get(&key).map(|entries| WarnRecord {
            key,
            entries: entries.clone(),
        }))
    }

    async fn append(&self, key: WarnKey, reason: &str, at: f64) -> Result<usize, WarnError> {
        let mut rows = self.rows.lock().await;
        let entries = rows.entry(key).or_default();
        entries.push(WarnEntry::new(reason, at));
        Ok(entries.len())
    }

    async fn remove(&self, key: WarnKey, selector: WarnSelector) -> Result<WarnEntry, WarnError> {
        let mut rows = self.rows.lock().await;
        let entries = rows.get(&key).map(Vec::as_slice).unwrap_or_default();
        let index = resolve_selector(entries, selector)?;

        let Some(entries) = rows.get_mut(&key) else {
            return Err(WarnError::IndexOutOfRange { index, len: 0 });
        };
        let removed = entries.remove(index);
        if entries.is_empty() {
            rows.remove(&key);
        }

        Ok(removed)
    }

    async fn clear(&self, key: WarnKey) -> Result<usize, WarnError> {
        let mut rows = self.rows.lock().await;
        Ok(rows.remove(&key).map_or(0, |entries| entries.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryWarnStore;
    use crate::error::WarnError;
    use crate::model::{WarnEntry, WarnKey};
    use crate::store::{WarnSelector, WarnStore};

    const KEY: WarnKey = WarnKey {
        guild_id: 1,
        user_id: 2,
    };

    #[tokio::test]
    async fn appends_keep_call_order() {
        let store = MemoryWarnStore::new();
        let reasons = ["spam", "flood", "spam", "caps"];

        for (offset, reason) in reasons.iter().enumerate() {
            let count = store
                .append(KEY, reason, 1000.0 + offset as f64)
                .await
                .expect("append succeeds");
            assert_eq!(count, offset + 1);
        }

        let record = store.get(KEY).await.expect("get succeeds").expect("row exists");
        assert_eq!(record.reasons().collect::<Vec<_>>(), reasons);
        assert_eq!(record.reasons().count(), record.times().count());
    }

    #[tokio::test]
    async fn absent_key_reads_as_none() {
        let store = MemoryWarnStore::new();
        assert!(store.get(KEY).await.expect("get succeeds").is_none());
        assert_eq!(store.clear(KEY).await.expect("clear succeeds"), 0);
    }

    #[tokio::test]
    async fn removing_the_only_entry_deletes_the_row() {
        let store = MemoryWarnStore::new();
        store.append(KEY, "spam", 1000.0).await.expect("append succeeds");

        let removed = store.remove_at(KEY, 0).await.expect("index 0 exists");
        assert_eq!(removed, WarnEntry::new("spam", 1000.0));
        assert!(store.get(KEY).await.expect("get succeeds").is_none());
    }

    #[tokio::test]
    async fn out_of_range_removal_leaves_record_unchanged() {
        let store = MemoryWarnStore::new();
        store.append(KEY, "spam", 1000.0).await.expect("append succeeds");
        store.append(KEY, "flood", 2000.0).await.expect("append succeeds");
        let before = store.get(KEY).await.expect("get succeeds");

        let result = store.remove_at(KEY, 2).await;
        assert!(matches!(
            result,
            Err(WarnError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(store.get(KEY).await.expect("get succeeds"), before);
    }

    #[tokio::test]
    async fn remove_at_on_absent_row_is_out_of_range() {
        let store = MemoryWarnStore::new();
        assert!(matches!(
            store.remove_at(KEY, 0).await,
            Err(WarnError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[tokio::test]
    async fn removes_by_warn_id_from_the_middle() {
        let store = MemoryWarnStore::new();
        for (reason, at) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
            store.append(KEY, reason, at).await.expect("append succeeds");
        }

        store
            .remove(KEY, WarnSelector::WarnedAt(2.0))
            .await
            .expect("warn id exists");

        let record = store.get(KEY).await.expect("get succeeds").expect("row exists");
        assert_eq!(record.reasons().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(record.times().collect::<Vec<_>>(), vec![1.0, 3.0]);
    }

    #[tokio::test]
    async fn keys_do_not_share_rows() {
        let store = MemoryWarnStore::new();
        let other = WarnKey::new(1, 3);
        store.append(KEY, "spam", 1.0).await.expect("append succeeds");
        store.append(other, "flood", 2.0).await.expect("append succeeds");

        assert_eq!(store.clear(KEY).await.expect("clear succeeds"), 1);
        let record = store.get(other).await.expect("get succeeds").expect("row exists");
        assert_eq!(record.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_are_not_lost() {
        let store = MemoryWarnStore::new();
        let mut handles = Vec::new();
        for offset in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(KEY, "burst", offset as f64).await
            }));
        }
        for handle in handles {
            handle.await.expect("task joins").expect("append succeeds");
        }

        let record = store.get(KEY).await.expect("get succeeds").expect("row exists");
        assert_eq!(record.len(), 32);
    }
}
