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
    name: "ban",
    desc: "Ban a user from the server, even if they already left.",
    category: "moderation",
    usage: "p!ban <user> [reason]",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("b"),
    user_cooldown = 3
)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "The user to ban"] user: Option<serenity::User>,
    #[description = "Reason for the ban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::BAN_MEMBERS).await? else {
        return Ok(());
    };

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if user.id == ctx.author().id {
        ctx.say(moderation_self_action_message("ban")).await?;
        return Ok(());
    }

    let ban_result = guild_id
        .ban_with_reason(
            ctx.http(),
            user.id,
            0,
            reason.as_deref().unwrap_or("No reason provided"),
        )
        .await;

    if let Err(source) = ban_result {
        error!(?source, "ban request failed");
        ctx.say(request_failed_message("ban")).await?;
        return Ok(());
    }

    let embed = moderation_action_embed(
        "Banned User",
        ctx.author().id,
        user.id,
        reason.as_deref(),
        None,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
