use poise::serenity_prelude as serenity;

use crate::moderation::embeds::{guild_only_message, permission_denied_message};
use pizzahat_core::{Context, Error};
use pizzahat_ledger::Participant;
use pizzahat_utils::formatting::permission_display_name;
use pizzahat_utils::permissions::{RoleLadder, has_user_permission};

/// Resolve the invoking guild and check the author holds `required`.
///
/// Replies to the author and returns `None` when either check fails.
pub async fn moderator_guild(
    ctx: Context<'_>,
    required: serenity::Permissions,
) -> Result<Option<serenity::GuildId>, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(None);
    };

    if !has_user_permission(ctx.http(), guild_id, ctx.author().id, required).await? {
        let label = required
            .iter_names()
            .next()
            .map(|(name, _)| permission_display_name(name))
            .unwrap_or_else(|| "additional".to_owned());
        ctx.say(permission_denied_message(&label)).await?;
        return Ok(None);
    }

    Ok(Some(guild_id))
}

/// Ledger view of a member, ranked against `ladder`.
pub fn participant(ladder: &RoleLadder, member: &serenity::Member) -> Participant {
    Participant {
        user_id: member.user.id.get(),
        display_name: member.display_name().to_owned(),
        rank: ladder.member_rank(member),
    }
}
