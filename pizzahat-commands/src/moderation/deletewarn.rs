use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{usage_message, warn_error_message};
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_ledger::model::parse_warn_id;
use pizzahat_utils::embed::success_embed;
use pizzahat_utils::formatting::escape_mentions;

pub const META: CommandMeta = CommandMeta {
    name: "deletewarn",
    desc: "Delete one warning from a member by its warn ID.",
    category: "moderation",
    usage: "p!deletewarn <member> <warn_id>",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("delwarn"),
    user_cooldown = 3
)]
pub async fn deletewarn(
    ctx: Context<'_>,
    #[description = "The member whose warning to delete"] member: Option<serenity::Member>,
    #[description = "Warn ID shown by the warnings command"] warn_id: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_MESSAGES).await? else {
        return Ok(());
    };

    let (Some(member), Some(raw_id)) = (member, warn_id) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(warn_id) = parse_warn_id(&raw_id) else {
        ctx.say("That doesn't look like a warn ID. Copy it from the warnings list.")
            .await?;
        return Ok(());
    };

    let service = ctx.data().warn_service(ctx.framework().bot_id.get());
    let removed = match service
        .delete_warning(guild_id.get(), member.user.id.get(), warn_id)
        .await
    {
        Ok(removed) => removed,
        Err(error) => match warn_error_message(&error) {
            Some(message) => {
                ctx.say(message).await?;
                return Ok(());
            }
            None => return Err(error.into()),
        },
    };

    let embed = success_embed(
        "Warning Deleted",
        format!(
            "Removed warn `{}` from <@{}>.\n**Reason was :** {}",
            removed.warn_id(),
            member.user.id.get(),
            escape_mentions(&removed.reason)
        ),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
