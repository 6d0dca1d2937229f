use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    moderation_action_embed, moderation_self_action_message, request_failed_message,
    usage_message,
};
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "kick",
    desc: "Kick a member from the server.",
    category: "moderation",
    usage: "p!kick <member> [reason]",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    user_cooldown = 3
)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "The member to kick"] member: Option<serenity::Member>,
    #[description = "Reason for the kick"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::KICK_MEMBERS).await? else {
        return Ok(());
    };

    let Some(member) = member else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if member.user.id == ctx.author().id {
        ctx.say(moderation_self_action_message("kick")).await?;
        return Ok(());
    }

    let kick_result = guild_id
        .kick_with_reason(
            ctx.http(),
            member.user.id,
            reason.as_deref().unwrap_or("No reason provided"),
        )
        .await;

    if let Err(source) = kick_result {
        error!(?source, "kick request failed");
        ctx.say(request_failed_message("kick")).await?;
        return Ok(());
    }

    let embed = moderation_action_embed(
        "Kicked User",
        ctx.author().id,
        member.user.id,
        reason.as_deref(),
        None,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
