use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::usage_message;
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_utils::embed::success_embed;

pub const META: CommandMeta = CommandMeta {
    name: "clearwarns",
    desc: "Clear every warning a member has.",
    category: "moderation",
    usage: "p!clearwarns <member>",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn clearwarns(
    ctx: Context<'_>,
    #[description = "The member whose warnings to clear"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_MESSAGES).await? else {
        return Ok(());
    };

    let Some(member) = member else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let service = ctx.data().warn_service(ctx.framework().bot_id.get());
    let cleared = service
        .clear_warnings(guild_id.get(), member.user.id.get())
        .await?;

    if cleared == 0 {
        ctx.say("That member has no warnings to clear.").await?;
        return Ok(());
    }

    let embed = success_embed(
        "Warnings Cleared",
        format!(
            "Cleared **{cleared}** warning{} from <@{}>.",
            if cleared == 1 { "" } else { "s" },
            member.user.id.get()
        ),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
