use std::future::Future;

use crate::error::WarnError;
use crate::model::{WarnEntry, WarnKey, WarnRecord};

/// Which entry a removal targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WarnSelector {
    /// Zero-based position in issue order.
    Index(usize),
    /// First entry whose timestamp equals the given warn id.
    WarnedAt(f64),
}

/// Persistence for warn records.
///
/// Every mutation must be atomic for its [`WarnKey`]: two concurrent appends
/// or removals on the same key may not lose each other's writes.
pub trait WarnStore: Send + Sync {
    /// Fetch the record, or `None` when the member has never been warned.
    fn get(
        &self,
        key: WarnKey,
    ) -> impl Future<Output = Result<Option<WarnRecord>, WarnError>> + Send;

    /// Append a warning, creating the record on first use. Returns the new
    /// warning count.
    fn append(
        &self,
        key: WarnKey,
        reason: &str,
        at: f64,
    ) -> impl Future<Output = Result<usize, WarnError>> + Send;

    /// Remove one entry and return it. The record is deleted once empty and
    /// left untouched on failure.
    fn remove(
        &self,
        key: WarnKey,
        selector: WarnSelector,
    ) -> impl Future<Output = Result<WarnEntry, WarnError>> + Send;

    /// Delete the record. Returns how many warnings it held.
    fn clear(&self, key: WarnKey) -> impl Future<Output = Result<usize, WarnError>> + Send;

    fn remove_at(
        &self,
        key: WarnKey,
        index: usize,
    ) -> impl Future<Output = Result<WarnEntry, WarnError>> + Send {
        self.remove(key, WarnSelector::Index(index))
    }
}

/// Resolve `selector` against the current entries.
pub fn resolve_selector(entries: &[WarnEntry], selector: WarnSelector) -> Result<usize, WarnError> {
    match selector {
        WarnSelector::Index(index) if index < entries.len() => Ok(index),
        WarnSelector::Index(index) => Err(WarnError::IndexOutOfRange {
            index,
            len: entries.len(),
        }),
        WarnSelector::WarnedAt(warn_id) => entries
            .iter()
            .position(|entry| entry.warned_at == warn_id)
            .ok_or(WarnError::NotFound { warn_id }),
    }
}

#[cfg(test)]
mod tests {
    use super::{WarnSelector, resolve_selector};
    use crate::error::WarnError;
    use crate::model::WarnEntry;

    #[test]
    fn resolves_indices_and_warn_ids() {
        let entries = vec![WarnEntry::new("spam", 1000.0), WarnEntry::new("flood", 2000.0)];

        assert_eq!(resolve_selector(&entries, WarnSelector::Index(1)).ok(), Some(1));
        assert_eq!(
            resolve_selector(&entries, WarnSelector::WarnedAt(2000.0)).ok(),
            Some(1)
        );
        assert!(matches!(
            resolve_selector(&entries, WarnSelector::Index(2)),
            Err(WarnError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            resolve_selector(&entries, WarnSelector::WarnedAt(3000.0)),
            Err(WarnError::NotFound { .. })
        ));
    }

    #[test]
    fn empty_entries_have_no_valid_index() {
        assert!(matches!(
            resolve_selector(&[], WarnSelector::Index(0)),
            Err(WarnError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }
}
