use tracing::debug;

use crate::error::WarnError;
use crate::model::{WarnEntry, WarnKey};
use crate::store::{WarnSelector, WarnStore};

/// A guild member as the ledger sees them.
///
/// `rank` is the position of the member's highest role; callers give the
/// guild owner a rank above every role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub user_id: u64,
    pub display_name: String,
    pub rank: i64,
}

/// What a successful [`WarnService::warn`] stored.
#[derive(Clone, Debug, PartialEq)]
pub struct IssuedWarning {
    pub reason: String,
    pub warn_id: f64,
    pub total: usize,
}

pub struct WarnService<S> {
    store: S,
    bot_user_id: u64,
}

impl<S: WarnStore> WarnService<S> {
    pub fn new(store: S, bot_user_id: u64) -> Self {
        Self { store, bot_user_id }
    }

    pub async fn warn(
        &self,
        guild_id: u64,
        actor: &Participant,
        target: &Participant,
        reason: Option<&str>,
        at: f64,
    ) -> Result<IssuedWarning, WarnError> {
        if target.user_id == actor.user_id || target.user_id == self.bot_user_id {
            return Err(WarnError::SelfOrBotTarget);
        }

        if actor.rank <= target.rank {
            return Err(WarnError::InsufficientHierarchy {
                actor: actor.rank,
                target: target.rank,
            });
        }

        let reason = match reason.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => text.to_owned(),
            None => default_reason(&actor.display_name),
        };

        let total = self
            .store
            .append(WarnKey::new(guild_id, target.user_id), &reason, at)
            .await?;
        debug!(guild_id, user_id = target.user_id, total, "warning recorded");

        Ok(IssuedWarning {
            reason,
            warn_id: at,
            total,
        })
    }

    /// Warnings in issue order; empty when the member has none.
    pub async fn list_warnings(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Vec<WarnEntry>, WarnError> {
        let record = self.store.get(WarnKey::new(guild_id, user_id)).await?;
        Ok(record.map(|record| record.entries).unwrap_or_default())
    }

    pub async fn delete_warning(
        &self,
        guild_id: u64,
        user_id: u64,
        warn_id: f64,
    ) -> Result<WarnEntry, WarnError> {
        let removed = self
            .store
            .remove(
                WarnKey::new(guild_id, user_id),
                WarnSelector::WarnedAt(warn_id),
            )
            .await?;
        debug!(guild_id, user_id, warn_id, "warning deleted");
        Ok(removed)
    }

    pub async fn clear_warnings(&self, guild_id: u64, user_id: u64) -> Result<usize, WarnError> {
        self.store.clear(WarnKey::new(guild_id, user_id)).await
    }
}

pub fn default_reason(actor_name: &str) -> String {
    format!("No reason given. Warned by {actor_name}")
}

#[cfg(test)]
mod tests {
    use super::{Participant, WarnService, default_reason};
    use crate::error::WarnError;
    use crate::memory::MemoryWarnStore;
    use crate::model::WarnEntry;

    const GUILD: u64 = 100;
    const BOT: u64 = 999;

    fn member(user_id: u64, rank: i64) -> Participant {
        Participant {
            user_id,
            display_name: format!("user{user_id}"),
            rank,
        }
    }

    fn service() -> WarnService<MemoryWarnStore> {
        WarnService::new(MemoryWarnStore::new(), BOT)
    }

    fn pairs(entries: &[WarnEntry]) -> Vec<(&str, f64)> {
        entries
            .iter()
            .map(|entry| (entry.reason.as_str(), entry.warn_id()))
            .collect()
    }

    #[tokio::test]
    async fn spam_then_flood_scenario() {
        let service = service();
        let moderator = member(1, 10);
        let target = member(2, 1);

        service
            .warn(GUILD, &moderator, &target, Some("spam"), 1000.0)
            .await
            .expect("first warn");
        let listed = service.list_warnings(GUILD, 2).await.expect("list");
        assert_eq!(pairs(&listed), vec![("spam", 1000.0)]);

        service
            .warn(GUILD, &moderator, &target, Some("flood"), 2000.0)
            .await
            .expect("second warn");
        let listed = service.list_warnings(GUILD, 2).await.expect("list");
        assert_eq!(pairs(&listed), vec![("spam", 1000.0), ("flood", 2000.0)]);

        service
            .delete_warning(GUILD, 2, 1000.0)
            .await
            .expect("1000.0 exists");
        let listed = service.list_warnings(GUILD, 2).await.expect("list");
        assert_eq!(pairs(&listed), vec![("flood", 2000.0)]);

        let again = service.delete_warning(GUILD, 2, 1000.0).await;
        assert!(matches!(again, Err(WarnError::NotFound { warn_id }) if warn_id == 1000.0));
    }

    #[tokio::test]
    async fn warning_yourself_always_fails() {
        let service = service();
        for rank in [0, 5, i64::MAX] {
            let actor = member(7, rank);
            let result = service.warn(GUILD, &actor, &actor, Some("x"), 1.0).await;
            assert!(matches!(result, Err(WarnError::SelfOrBotTarget)));
        }
        assert!(service.list_warnings(GUILD, 7).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn warning_the_bot_fails() {
        let service = service();
        let result = service
            .warn(GUILD, &member(1, 50), &member(BOT, 0), None, 1.0)
            .await;
        assert!(matches!(result, Err(WarnError::SelfOrBotTarget)));
    }

    #[tokio::test]
    async fn equal_or_higher_rank_is_rejected() {
        let service = service();
        let actor = member(1, 5);

        let equal = service.warn(GUILD, &actor, &member(2, 5), None, 1.0).await;
        assert!(matches!(
            equal,
            Err(WarnError::InsufficientHierarchy { actor: 5, target: 5 })
        ));

        let higher = service.warn(GUILD, &actor, &member(2, 9), None, 1.0).await;
        assert!(matches!(
            higher,
            Err(WarnError::InsufficientHierarchy { actor: 5, target: 9 })
        ));
        assert!(service.list_warnings(GUILD, 2).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn missing_reason_names_the_actor() {
        let service = service();
        let actor = member(1, 3);

        let issued = service
            .warn(GUILD, &actor, &member(2, 0), Some("   "), 5.0)
            .await
            .expect("warn succeeds");

        assert_eq!(issued.reason, default_reason("user1"));
        assert_eq!(issued.warn_id, 5.0);
        assert_eq!(issued.total, 1);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let service = service();
        let actor = member(1, 3);
        let target = member(2, 0);
        for at in [1.0, 2.0, 3.0] {
            service
                .warn(GUILD, &actor, &target, Some("noise"), at)
                .await
                .expect("warn succeeds");
        }

        assert_eq!(service.clear_warnings(GUILD, 2).await.expect("clear"), 3);
        assert!(service.list_warnings(GUILD, 2).await.expect("list").is_empty());
    }
}
