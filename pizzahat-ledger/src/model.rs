use crate::error::WarnError;

/// Identifies one ledger row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WarnKey {
    pub guild_id: u64,
    pub user_id: u64,
}

impl WarnKey {
    pub fn new(guild_id: u64, user_id: u64) -> Self {
        Self { guild_id, user_id }
    }
}

/// A single issued warning.
///
/// `warned_at` is a Unix timestamp in seconds and doubles as the
/// caller-facing warn id.
#[derive(Clone, Debug, PartialEq)]
pub struct WarnEntry {
    pub reason: String,
    pub warned_at: f64,
}

impl WarnEntry {
    pub fn new(reason: impl Into<String>, warned_at: f64) -> Self {
        Self {
            reason: reason.into(),
            warned_at,
        }
    }

    pub fn warn_id(&self) -> f64 {
        self.warned_at
    }
}

/// All warnings for one member of one guild, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct WarnRecord {
    pub key: WarnKey,
    pub entries: Vec<WarnEntry>,
}

impl WarnRecord {
    /// Zip the stored `warns`/`time` columns into entries.
    pub fn from_columns(
        key: WarnKey,
        warns: Vec<String>,
        times: Vec<f64>,
    ) -> Result<Self, WarnError> {
        if warns.len() != times.len() {
            return Err(WarnError::MismatchedColumns {
                warns: warns.len(),
                times: times.len(),
            });
        }

        let entries = warns
            .into_iter()
            .zip(times)
            .map(|(reason, warned_at)| WarnEntry { reason, warned_at })
            .collect();

        Ok(Self { key, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.reason.as_str())
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|entry| entry.warned_at)
    }
}

/// Parse a warn id as typed by a moderator (`1712345678.123`, optionally in
/// backticks as the bot displays it).
pub fn parse_warn_id(raw: &str) -> Option<f64> {
    let value = raw.trim().trim_matches('`').trim();
    value.parse::<f64>().ok().filter(|id| id.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{WarnEntry, WarnKey, WarnRecord, parse_warn_id};
    use crate::error::WarnError;

    fn key() -> WarnKey {
        WarnKey::new(10, 20)
    }

    #[test]
    fn zips_columns_in_order() {
        let record = WarnRecord::from_columns(
            key(),
            vec!["spam".to_owned(), "flood".to_owned()],
            vec![1000.0, 2000.0],
        )
        .expect("columns have equal length");

        assert_eq!(
            record.entries,
            vec![WarnEntry::new("spam", 1000.0), WarnEntry::new("flood", 2000.0)]
        );
        assert_eq!(record.reasons().collect::<Vec<_>>(), vec!["spam", "flood"]);
        assert_eq!(record.times().collect::<Vec<_>>(), vec![1000.0, 2000.0]);
    }

    #[test]
    fn rejects_mismatched_columns() {
        let result = WarnRecord::from_columns(key(), vec!["spam".to_owned()], vec![]);
        assert!(matches!(
            result,
            Err(WarnError::MismatchedColumns { warns: 1, times: 0 })
        ));
    }

    #[test]
    fn parses_displayed_warn_ids() {
        let id = 1_712_345_678.123_f64;
        assert_eq!(parse_warn_id(&format!("`{}`", id)), Some(id));
        assert_eq!(parse_warn_id(" 1000 "), Some(1000.0));
        assert_eq!(parse_warn_id("soon"), None);
        assert_eq!(parse_warn_id("NaN"), None);
        assert_eq!(parse_warn_id("inf"), None);
    }
}
