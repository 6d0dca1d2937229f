use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{request_failed_message, usage_message};
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_utils::formatting::escape_mentions;

pub const META: CommandMeta = CommandMeta {
    name: "setnick",
    desc: "Set a member's nickname.",
    category: "moderation",
    usage: "p!setnick <member> <nickname>",
};

/// Discord's nickname length limit.
const MAX_NICK_CHARS: usize = 32;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("sn"),
    user_cooldown = 5
)]
pub async fn setnick(
    ctx: Context<'_>,
    #[description = "The member to rename"] member: Option<serenity::Member>,
    #[description = "New nickname"]
    #[rest]
    nick: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_NICKNAMES).await?
    else {
        return Ok(());
    };

    let (Some(member), Some(nick)) = (member, nick.filter(|nick| !nick.trim().is_empty())) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };
    let nick = nick.trim();

    if nick.chars().count() > MAX_NICK_CHARS {
        ctx.say("Nicknames can be at most 32 characters long.").await?;
        return Ok(());
    }

    let edit = serenity::EditMember::new().nickname(nick);
    if let Err(source) = guild_id.edit_member(ctx.http(), member.user.id, edit).await {
        error!(?source, "nickname request failed");
        ctx.say(request_failed_message("rename")).await?;
        return Ok(());
    }

    ctx.say(format!(
        "Nickname for {} was changed to `{}`",
        member.user.name,
        escape_mentions(nick)
    ))
    .await?;

    Ok(())
}
