use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::guard::moderator_guild;
use crate::moderation::overwrites::{apply_role_overwrite, everyone_role};
use pizzahat_core::{Context, Error};

pub const HIDE_META: CommandMeta = CommandMeta {
    name: "hide",
    desc: "Hide a channel from a role (default: @everyone).",
    category: "moderation",
    usage: "p!hide [role] [channel]",
};

pub const EXPOSE_META: CommandMeta = CommandMeta {
    name: "expose",
    desc: "Make a hidden channel visible to a role again (default: @everyone).",
    category: "moderation",
    usage: "p!expose [role] [channel]",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn hide(
    ctx: Context<'_>,
    #[description = "Role to hide from (default: @everyone)"] role: Option<serenity::Role>,
    #[description = "Channel to hide (default: this one)"] channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    set_visibility(ctx, role, channel, false).await
}

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn expose(
    ctx: Context<'_>,
    #[description = "Role to expose to (default: @everyone)"] role: Option<serenity::Role>,
    #[description = "Channel to expose (default: this one)"] channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    set_visibility(ctx, role, channel, true).await
}

async fn set_visibility(
    ctx: Context<'_>,
    role: Option<serenity::Role>,
    channel: Option<serenity::GuildChannel>,
    visible: bool,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_CHANNELS).await?
    else {
        return Ok(());
    };

    let channel = match channel {
        Some(channel) => channel,
        None => match ctx.guild_channel().await {
            Some(channel) => channel,
            None => {
                ctx.say("I couldn't resolve this channel.").await?;
                return Ok(());
            }
        },
    };

    let (role_id, role_name) = match role {
        Some(role) => (role.id, role.name),
        None => (everyone_role(guild_id), "@everyone".to_owned()),
    };

    let (allow, deny) = if visible {
        (serenity::Permissions::VIEW_CHANNEL, serenity::Permissions::empty())
    } else {
        (serenity::Permissions::empty(), serenity::Permissions::VIEW_CHANNEL)
    };

    if let Err(source) = apply_role_overwrite(ctx.http(), &channel, role_id, allow, deny).await {
        error!(?source, visible, "channel visibility request failed");
        ctx.say("I couldn't update that channel. I likely need the 'Manage Channels' permission.")
            .await?;
        return Ok(());
    }

    ctx.say(visibility_message(channel.id, &role_name, visible))
        .await?;

    Ok(())
}

fn visibility_message(channel_id: serenity::ChannelId, role_name: &str, visible: bool) -> String {
    if visible {
        format!("<#{}> has been exposed to `{role_name}`", channel_id.get())
    } else {
        format!("<#{}> has been hidden from `{role_name}`", channel_id.get())
    }
}
