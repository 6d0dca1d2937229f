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
    name: "softban",
    desc: "Ban and immediately unban a member to wipe their recent messages.",
    category: "moderation",
    usage: "p!softban <member> [reason]",
};

/// Days of message history removed by the ban half.
const SOFTBAN_DELETE_DAYS: u8 = 7;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("sb"),
    user_cooldown = 5
)]
pub async fn softban(
    ctx: Context<'_>,
    #[description = "The member to softban"] member: Option<serenity::Member>,
    #[description = "Reason for the softban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::BAN_MEMBERS).await? else {
        return Ok(());
    };

    let Some(member) = member else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if member.user.id == ctx.author().id {
        ctx.say(moderation_self_action_message("softban")).await?;
        return Ok(());
    }

    let ban_result = guild_id
        .ban_with_reason(
            ctx.http(),
            member.user.id,
            SOFTBAN_DELETE_DAYS,
            reason.as_deref().unwrap_or("No reason provided"),
        )
        .await;

    if let Err(source) = ban_result {
        error!(?source, "softban request failed");
        ctx.say(request_failed_message("softban")).await?;
        return Ok(());
    }

    if let Err(source) = guild_id.unban(ctx.http(), member.user.id).await {
        error!(?source, user_id = member.user.id.get(), "softban unban request failed");
        ctx.say("The member was banned but I couldn't lift the ban. Use the unban command.")
            .await?;
        return Ok(());
    }

    let embed = moderation_action_embed(
        "Softbanned User",
        ctx.author().id,
        member.user.id,
        reason.as_deref(),
        None,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
