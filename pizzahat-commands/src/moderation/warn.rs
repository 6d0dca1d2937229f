use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{moderation_action_embed, usage_message, warn_error_message};
use crate::moderation::guard::{moderator_guild, participant};
use pizzahat_core::{Context, Error};
use pizzahat_utils::permissions::RoleLadder;
use pizzahat_utils::time::snowflake_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Warn a member and record it in their warn log.",
    category: "moderation",
    usage: "p!warn <member> [reason]",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    user_cooldown = 3
)]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "The member to warn"] member: Option<serenity::Member>,
    #[description = "Reason for the warning"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_MESSAGES).await? else {
        return Ok(());
    };

    let Some(member) = member else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(author) = ctx.author_member().await else {
        ctx.say("I couldn't look up your membership in this server.").await?;
        return Ok(());
    };

    let ladder = RoleLadder::fetch(ctx.http(), guild_id).await?;
    let actor = participant(&ladder, &author);
    let target = participant(&ladder, &member);

    let service = ctx.data().warn_service(ctx.framework().bot_id.get());
    let issued = match service
        .warn(
            guild_id.get(),
            &actor,
            &target,
            reason.as_deref(),
            snowflake_unix_secs(ctx.id()),
        )
        .await
    {
        Ok(issued) => issued,
        Err(error) => match warn_error_message(&error) {
            Some(message) => {
                ctx.say(message).await?;
                return Ok(());
            }
            None => return Err(error.into()),
        },
    };

    let embed = moderation_action_embed(
        "Warned User",
        ctx.author().id,
        member.user.id,
        Some(&issued.reason),
        None,
    )
    .footer(serenity::CreateEmbedFooter::new(format!(
        "Warn ID: {} | Total warnings: {}",
        issued.warn_id, issued.total
    )));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
