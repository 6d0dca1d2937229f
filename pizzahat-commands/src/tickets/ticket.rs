use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::usage_message;
use crate::moderation::guard::moderator_guild;
use crate::tickets::panel::{panel_components, panel_embed};
use pizzahat_core::{Context, Error};
use pizzahat_database::impls::staff_role::get_staff_role_id;
use pizzahat_utils::parse::parse_channel_id;

pub const META: CommandMeta = CommandMeta {
    name: "ticket",
    desc: "Post the ticket panel in a channel. Needs a staff role first.",
    category: "tickets",
    usage: "p!ticket <#channel|channel_id>",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Tickets",
    aliases("tickets"),
    user_cooldown = 10
)]
pub async fn ticket(
    ctx: Context<'_>,
    #[description = "Channel mention/id for the panel"] channel: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_GUILD).await? else {
        return Ok(());
    };

    let Some(channel_id) = channel.as_deref().and_then(parse_channel_id) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };
    let channel_id = serenity::ChannelId::new(channel_id);

    if get_staff_role_id(&ctx.data().db, guild_id.get()).await?.is_none() {
        ctx.say("Set a staff role first with `p!staffrole <role>`.").await?;
        return Ok(());
    }

    let channels = guild_id.channels(ctx.http()).await?;
    let Some(target) = channels.get(&channel_id) else {
        ctx.say("That channel isn't in this server.").await?;
        return Ok(());
    };

    if !hosts_private_threads(target.kind) {
        ctx.say("Tickets need a regular text channel. Announcement channels can't host private threads.")
            .await?;
        return Ok(());
    }

    let panel = serenity::CreateMessage::new()
        .embed(panel_embed())
        .components(panel_components());

    if let Err(source) = channel_id.send_message(ctx.http(), panel).await {
        error!(?source, "ticket panel request failed");
        ctx.say("I couldn't post in that channel. Check my permissions there.")
            .await?;
        return Ok(());
    }

    ctx.say(format!("Ticket panel posted in <#{}>.", channel_id.get()))
        .await?;

    Ok(())
}

/// Ticket threads are private, which only plain text channels support.
fn hosts_private_threads(kind: serenity::ChannelType) -> bool {
    kind == serenity::ChannelType::Text
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::ChannelType;

    use super::hosts_private_threads;

    #[test]
    fn only_text_channels_take_the_panel() {
        assert!(hosts_private_threads(ChannelType::Text));
        assert!(!hosts_private_threads(ChannelType::News));
        assert!(!hosts_private_threads(ChannelType::Voice));
        assert!(!hosts_private_threads(ChannelType::Forum));
    }
}
