use tracing::{debug, error, warn};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{lock_embed, usage_message};
use crate::moderation::guard::moderator_guild;
use crate::moderation::overwrites::{apply_role_overwrite, everyone_role};
use pizzahat_core::{Context, Error};
use pizzahat_utils::embed::success_embed;

pub const LOCK_META: CommandMeta = CommandMeta {
    name: "lock",
    desc: "Lock a channel or the whole server for a role (default: @everyone).",
    category: "moderation",
    usage: "p!lock <channel [role] [channel] | server [role]>",
};

pub const UNLOCK_META: CommandMeta = CommandMeta {
    name: "unlock",
    desc: "Unlock a channel or the whole server for a role (default: @everyone).",
    category: "moderation",
    usage: "p!unlock <channel [role] [channel] | server [role]>",
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LockMode {
    Lock,
    Unlock,
}

fn is_voice(kind: serenity::ChannelType) -> bool {
    matches!(kind, serenity::ChannelType::Voice | serenity::ChannelType::Stage)
}

/// Permissions a lock toggles on a channel of `kind`.
fn locked_permissions(kind: serenity::ChannelType) -> serenity::Permissions {
    if is_voice(kind) {
        serenity::Permissions::CONNECT | serenity::Permissions::SPEAK
    } else {
        serenity::Permissions::SEND_MESSAGES | serenity::Permissions::ADD_REACTIONS
    }
}

/// Server-wide unlocks also restore history on text channels.
fn server_unlock_permissions(kind: serenity::ChannelType) -> serenity::Permissions {
    if is_voice(kind) {
        locked_permissions(kind)
    } else {
        locked_permissions(kind) | serenity::Permissions::READ_MESSAGE_HISTORY
    }
}

fn role_label(guild_id: serenity::GuildId, role_id: serenity::RoleId) -> String {
    if role_id == everyone_role(guild_id) {
        "@everyone".to_owned()
    } else {
        format!("<@&{}>", role_id.get())
    }
}

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("lockdown"),
    subcommands("lock_channel", "lock_server")
)]
pub async fn lock(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(usage_message(LOCK_META.usage)).await?;
    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "channel",
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn lock_channel(
    ctx: Context<'_>,
    #[description = "Role to lock out (default: @everyone)"] role: Option<serenity::Role>,
    #[description = "Channel to lock (default: this one)"] channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    toggle_channel(ctx, role, channel, LockMode::Lock).await
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "server",
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn lock_server(
    ctx: Context<'_>,
    #[description = "Role to lock out (default: @everyone)"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    toggle_server(ctx, role, LockMode::Lock).await
}

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    subcommands("unlock_channel", "unlock_server")
)]
pub async fn unlock(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(usage_message(UNLOCK_META.usage)).await?;
    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "channel",
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn unlock_channel(
    ctx: Context<'_>,
    #[description = "Role to unlock for (default: @everyone)"] role: Option<serenity::Role>,
    #[description = "Channel to unlock (default: this one)"] channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    toggle_channel(ctx, role, channel, LockMode::Unlock).await
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "server",
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn unlock_server(
    ctx: Context<'_>,
    #[description = "Role to unlock for (default: @everyone)"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    toggle_server(ctx, role, LockMode::Unlock).await
}

async fn toggle_channel(
    ctx: Context<'_>,
    role: Option<serenity::Role>,
    channel: Option<serenity::GuildChannel>,
    mode: LockMode,
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
    let role_id = role.map_or_else(|| everyone_role(guild_id), |role| role.id);
    let toggled = locked_permissions(channel.kind);

    let (allow, deny) = match mode {
        LockMode::Lock => (serenity::Permissions::empty(), toggled),
        LockMode::Unlock => (toggled, serenity::Permissions::empty()),
    };

    if let Err(source) = apply_role_overwrite(ctx.http(), &channel, role_id, allow, deny).await {
        error!(?source, ?mode, "channel lock request failed");
        ctx.say("I couldn't update that channel. I likely need the 'Manage Channels' permission.")
            .await?;
        return Ok(());
    }

    let (emoji, heading, verb) = match mode {
        LockMode::Lock => ('🔒', "🔒 Locked", "locked"),
        LockMode::Unlock => ('🔓', "🔓 Unlocked", "unlocked"),
    };

    if let poise::Context::Prefix(prefix) = ctx {
        if let Err(source) = prefix.msg.react(ctx.http(), emoji).await {
            debug!(?source, "lock reaction failed");
        }
    }

    let detail = format!(
        "<#{}> has been {verb} for {}",
        channel.id.get(),
        role_label(guild_id, role_id)
    );
    ctx.send(poise::CreateReply::default().embed(lock_embed(heading, detail)))
        .await?;

    Ok(())
}

async fn toggle_server(
    ctx: Context<'_>,
    role: Option<serenity::Role>,
    mode: LockMode,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_CHANNELS).await?
    else {
        return Ok(());
    };

    ctx.defer().await?;

    let role_id = role.map_or_else(|| everyone_role(guild_id), |role| role.id);
    let channels = guild_id.channels(ctx.http()).await?;

    let mut failed = 0_usize;
    for channel in channels.values() {
        if !matches!(
            channel.kind,
            serenity::ChannelType::Text
                | serenity::ChannelType::News
                | serenity::ChannelType::Voice
                | serenity::ChannelType::Stage
        ) {
            continue;
        }

        let toggled = match mode {
            LockMode::Lock => locked_permissions(channel.kind),
            LockMode::Unlock => server_unlock_permissions(channel.kind),
        };

        let (allow, deny) = match mode {
            LockMode::Lock => (serenity::Permissions::empty(), toggled),
            LockMode::Unlock => (toggled, serenity::Permissions::empty()),
        };

        if let Err(source) = apply_role_overwrite(ctx.http(), channel, role_id, allow, deny).await {
            warn!(?source, channel_id = channel.id.get(), ?mode, "server lock skipped channel");
            failed += 1;
        }
    }

    let (title, mut description) = match mode {
        LockMode::Lock => (
            "Server Locked",
            "The server has been locked by a staff member. You are **not muted**.".to_owned(),
        ),
        LockMode::Unlock => ("Server Unlocked", "The server has been unlocked.".to_owned()),
    };
    if failed > 0 {
        description.push_str(&format!("\n\n{failed} channel(s) could not be updated."));
    }

    ctx.send(poise::CreateReply::default().embed(success_embed(title, description)))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::{ChannelType, GuildId, Permissions, RoleId};

    use super::{locked_permissions, role_label, server_unlock_permissions};

    #[test]
    fn text_and_voice_lock_different_permissions() {
        assert_eq!(
            locked_permissions(ChannelType::Text),
            Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS
        );
        assert_eq!(
            locked_permissions(ChannelType::Voice),
            Permissions::CONNECT | Permissions::SPEAK
        );
    }

    #[test]
    fn server_unlock_restores_history() {
        assert!(
            server_unlock_permissions(ChannelType::Text)
                .contains(Permissions::READ_MESSAGE_HISTORY)
        );
        assert_eq!(
            server_unlock_permissions(ChannelType::Stage),
            Permissions::CONNECT | Permissions::SPEAK
        );
    }

    #[test]
    fn everyone_is_not_rendered_as_role_mention() {
        let guild_id = GuildId::new(42);
        assert_eq!(role_label(guild_id, RoleId::new(42)), "@everyone");
        assert_eq!(role_label(guild_id, RoleId::new(7)), "<@&7>");
    }
}
