use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{moderation_action_embed, usage_message};
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_utils::parse::parse_user_id;

pub const META: CommandMeta = CommandMeta {
    name: "unban",
    desc: "Lift a ban by user ID.",
    category: "moderation",
    usage: "p!unban <user_id>",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("ub"),
    user_cooldown = 3
)]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "ID of the banned user"] user_id: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::BAN_MEMBERS).await? else {
        return Ok(());
    };

    let Some(user_id) = user_id.as_deref().and_then(parse_user_id) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };
    let user_id = serenity::UserId::new(user_id);

    if let Err(source) = guild_id.unban(ctx.http(), user_id).await {
        error!(?source, "unban request failed");
        ctx.say("I couldn't unban that user. Make sure the ID belongs to a banned user.")
            .await?;
        return Ok(());
    }

    let embed = moderation_action_embed("Unbanned User", ctx.author().id, user_id, None, None);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
