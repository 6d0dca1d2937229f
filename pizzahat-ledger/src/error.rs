use std::error::Error as StdError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WarnError {
    #[error("a member can't warn themselves or the bot")]
    SelfOrBotTarget,

    #[error("actor rank {actor} does not exceed target rank {target}")]
    InsufficientHierarchy { actor: i64, target: i64 },

    #[error("no warning with id {warn_id} exists")]
    NotFound { warn_id: f64 },

    #[error("warning index {index} is out of range for {len} warning(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("stored warn columns disagree: {warns} reason(s), {times} timestamp(s)")]
    MismatchedColumns { warns: usize, times: usize },

    #[error("warn store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn StdError + Send + Sync>),
}

impl WarnError {
    pub fn store<E>(source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        WarnError::StoreUnavailable(source.into())
    }

    /// Validation failures that should be shown to the invoking user rather
    /// than treated as a command error.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            WarnError::SelfOrBotTarget
                | WarnError::InsufficientHierarchy { .. }
                | WarnError::NotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::WarnError;

    #[test]
    fn validation_errors_are_user_facing() {
        assert!(WarnError::SelfOrBotTarget.is_user_facing());
        assert!(WarnError::InsufficientHierarchy { actor: 1, target: 1 }.is_user_facing());
        assert!(WarnError::NotFound { warn_id: 1.5 }.is_user_facing());
        assert!(!WarnError::IndexOutOfRange { index: 3, len: 1 }.is_user_facing());
        assert!(!WarnError::store("connection refused").is_user_facing());
    }

    #[test]
    fn store_errors_keep_their_source() {
        let error = WarnError::store("connection refused");
        assert_eq!(
            error.to_string(),
            "warn store unavailable: connection refused"
        );
        assert!(std::error::Error::source(&error).is_some());
    }
}
