use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    moderation_action_embed, moderation_self_action_message, request_failed_message,
    usage_message,
};
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_utils::formatting::format_compact_duration;
use pizzahat_utils::parse::parse_duration_seconds;

pub const META: CommandMeta = CommandMeta {
    name: "timeout",
    desc: "Timeout a member for a duration (default: 10m).",
    category: "moderation",
    usage: "p!timeout <member> [duration] [reason]",
};

const DEFAULT_TIMEOUT_SECS: u64 = 10 * 60;
/// Discord refuses timeouts longer than 28 days.
const MAX_TIMEOUT_SECS: u64 = 28 * 24 * 60 * 60;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("mute"),
    user_cooldown = 3
)]
pub async fn timeout(
    ctx: Context<'_>,
    #[description = "The member to timeout"] member: Option<serenity::Member>,
    #[description = "Duration (e.g. 10m, 2h)"] duration: Option<String>,
    #[description = "Reason for timeout"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MODERATE_MEMBERS).await?
    else {
        return Ok(());
    };

    let Some(member) = member else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if member.user.id == ctx.author().id {
        ctx.say(moderation_self_action_message("timeout")).await?;
        return Ok(());
    }

    let seconds = match duration.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            let Some(seconds) = parse_duration_seconds(raw) else {
                ctx.say(format!(
                    "Invalid duration. Usage: `{}` (examples: 30s, 10m, 2h, 1d)",
                    META.usage
                ))
                .await?;
                return Ok(());
            };
            seconds
        }
        _ => DEFAULT_TIMEOUT_SECS,
    };

    if seconds > MAX_TIMEOUT_SECS {
        ctx.say("Timeouts can't be longer than 28 days.").await?;
        return Ok(());
    }
    let duration_label = format_compact_duration(seconds);

    let until_unix = SystemTime::now()
        .checked_add(Duration::from_secs(seconds))
        .unwrap_or_else(SystemTime::now)
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs()) as i64;
    let until = serenity::Timestamp::from_unix_timestamp(until_unix)?;

    let edit = serenity::EditMember::new().disable_communication_until_datetime(until);
    if let Err(source) = guild_id.edit_member(ctx.http(), member.user.id, edit).await {
        error!(?source, "timeout request failed");
        ctx.say(request_failed_message("timeout")).await?;
        return Ok(());
    }

    let embed = moderation_action_embed(
        "Timed Out User",
        ctx.author().id,
        member.user.id,
        reason.as_deref(),
        Some(&duration_label),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
