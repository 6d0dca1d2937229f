use poise::serenity_prelude as serenity;

/// Combine an existing role overwrite with new grants and denials. Bits named
/// in `allow` or `deny` replace whatever the overwrite said before; all other
/// bits are kept.
pub fn merge_overwrite(
    existing: Option<(serenity::Permissions, serenity::Permissions)>,
    allow: serenity::Permissions,
    deny: serenity::Permissions,
) -> (serenity::Permissions, serenity::Permissions) {
    let (old_allow, old_deny) =
        existing.unwrap_or((serenity::Permissions::empty(), serenity::Permissions::empty()));
    let touched = allow | deny;
    ((old_allow - touched) | allow, (old_deny - touched) | deny)
}

/// Apply `allow`/`deny` to `role_id` on `channel`, keeping unrelated bits of
/// any overwrite the role already has.
pub async fn apply_role_overwrite(
    http: &serenity::Http,
    channel: &serenity::GuildChannel,
    role_id: serenity::RoleId,
    allow: serenity::Permissions,
    deny: serenity::Permissions,
) -> Result<(), serenity::Error> {
    let existing = channel
        .permission_overwrites
        .iter()
        .find(|overwrite| overwrite.kind == serenity::PermissionOverwriteType::Role(role_id))
        .map(|overwrite| (overwrite.allow, overwrite.deny));

    let (allow, deny) = merge_overwrite(existing, allow, deny);

    channel
        .id
        .create_permission(
            http,
            serenity::PermissionOverwrite {
                allow,
                deny,
                kind: serenity::PermissionOverwriteType::Role(role_id),
            },
        )
        .await
}

/// `@everyone` shares its id with the guild.
pub fn everyone_role(guild_id: serenity::GuildId) -> serenity::RoleId {
    serenity::RoleId::new(guild_id.get())
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::Permissions;

    use super::merge_overwrite;

    #[test]
    fn denies_replace_previous_grants() {
        let existing = Some((
            Permissions::SEND_MESSAGES | Permissions::ATTACH_FILES,
            Permissions::empty(),
        ));
        let (allow, deny) = merge_overwrite(
            existing,
            Permissions::empty(),
            Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS,
        );

        assert_eq!(allow, Permissions::ATTACH_FILES);
        assert_eq!(deny, Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS);
    }

    #[test]
    fn grants_lift_previous_denials() {
        let existing = Some((
            Permissions::empty(),
            Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS,
        ));
        let (allow, deny) =
            merge_overwrite(existing, Permissions::SEND_MESSAGES, Permissions::empty());

        assert_eq!(allow, Permissions::SEND_MESSAGES);
        assert_eq!(deny, Permissions::EMBED_LINKS);
    }

    #[test]
    fn missing_overwrite_starts_empty() {
        let (allow, deny) =
            merge_overwrite(None, Permissions::VIEW_CHANNEL, Permissions::empty());
        assert_eq!(allow, Permissions::VIEW_CHANNEL);
        assert!(deny.is_empty());
    }
}
