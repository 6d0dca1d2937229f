use std::collections::HashMap;

use poise::serenity_prelude as serenity;

/// Rank given to the guild owner: above every role.
pub const OWNER_RANK: i64 = i64::MAX;

/// Resolve a user's effective guild permissions from role grants.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    let roles = guild_id.roles(http).await?;

    let mut resolved = serenity::Permissions::empty();
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    for role in roles.values() {
        if role.id == everyone_role_id || member.roles.contains(&role.id) {
            resolved |= role.permissions;
        }
    }

    Ok(resolved)
}

pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_user_permissions(http, guild_id, user_id).await?;

    Ok(perms.contains(serenity::Permissions::ADMINISTRATOR) || perms.contains(required))
}

/// Snapshot of a guild's role positions, used to compare members.
#[derive(Clone, Debug)]
pub struct RoleLadder {
    owner_id: serenity::UserId,
    positions: HashMap<serenity::RoleId, u16>,
}

impl RoleLadder {
    pub fn from_parts(
        owner_id: serenity::UserId,
        positions: HashMap<serenity::RoleId, u16>,
    ) -> Self {
        Self {
            owner_id,
            positions,
        }
    }

    pub async fn fetch(http: &serenity::Http, guild_id: serenity::GuildId) -> anyhow::Result<Self> {
        let guild = guild_id.to_partial_guild(http).await?;
        let roles = guild_id.roles(http).await?;

        Ok(Self::from_parts(
            guild.owner_id,
            roles
                .into_iter()
                .map(|(role_id, role)| (role_id, role.position))
                .collect(),
        ))
    }

    /// Position of the highest role held, 0 for `@everyone` only.
    pub fn rank(&self, user_id: serenity::UserId, role_ids: &[serenity::RoleId]) -> i64 {
        if user_id == self.owner_id {
            return OWNER_RANK;
        }

        role_ids
            .iter()
            .filter_map(|role_id| self.positions.get(role_id))
            .max()
            .map_or(0, |position| i64::from(*position))
    }

    pub fn member_rank(&self, member: &serenity::Member) -> i64 {
        self.rank(member.user.id, &member.roles)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use poise::serenity_prelude as serenity;

    use super::{OWNER_RANK, RoleLadder};

    fn ladder() -> RoleLadder {
        let positions = HashMap::from([
            (serenity::RoleId::new(10), 1),
            (serenity::RoleId::new(11), 4),
            (serenity::RoleId::new(12), 9),
        ]);
        RoleLadder::from_parts(serenity::UserId::new(1), positions)
    }

    #[test]
    fn owner_outranks_everyone() {
        assert_eq!(ladder().rank(serenity::UserId::new(1), &[]), OWNER_RANK);
    }

    #[test]
    fn highest_role_wins() {
        let roles = [serenity::RoleId::new(10), serenity::RoleId::new(12)];
        assert_eq!(ladder().rank(serenity::UserId::new(2), &roles), 9);
    }

    #[test]
    fn roleless_and_unknown_roles_rank_zero() {
        let ladder = ladder();
        assert_eq!(ladder.rank(serenity::UserId::new(2), &[]), 0);
        assert_eq!(
            ladder.rank(serenity::UserId::new(2), &[serenity::RoleId::new(99)]),
            0
        );
    }
}
