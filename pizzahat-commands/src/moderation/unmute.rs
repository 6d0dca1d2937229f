use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{moderation_action_embed, request_failed_message, usage_message};
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "unmute",
    desc: "Remove a member's timeout.",
    category: "moderation",
    usage: "p!unmute <member>",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    user_cooldown = 3
)]
pub async fn unmute(
    ctx: Context<'_>,
    #[description = "The member to unmute"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MODERATE_MEMBERS).await?
    else {
        return Ok(());
    };

    let Some(member) = member else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if member.communication_disabled_until.is_none() {
        ctx.say("That member isn't timed out.").await?;
        return Ok(());
    }

    let edit = serenity::EditMember::new().enable_communication();
    if let Err(source) = guild_id.edit_member(ctx.http(), member.user.id, edit).await {
        error!(?source, "unmute request failed");
        ctx.say(request_failed_message("unmute")).await?;
        return Ok(());
    }

    let embed = moderation_action_embed("Unmuted User", ctx.author().id, member.user.id, None, None);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
