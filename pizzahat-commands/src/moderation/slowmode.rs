use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_utils::embed::success_embed;
use pizzahat_utils::formatting::format_compact_duration;

pub const META: CommandMeta = CommandMeta {
    name: "slowmode",
    desc: "Show, set or disable (0) this channel's slowmode.",
    category: "moderation",
    usage: "p!slowmode [seconds]",
};

const MAX_SLOWMODE_SECS: u16 = 21_600;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("sm"),
    user_cooldown = 5
)]
pub async fn slowmode(
    ctx: Context<'_>,
    #[description = "Delay between messages in seconds, 0 to disable"] seconds: Option<u32>,
) -> Result<(), Error> {
    if moderator_guild(ctx, serenity::Permissions::MANAGE_MESSAGES)
        .await?
        .is_none()
    {
        return Ok(());
    }

    let Some(seconds) = seconds else {
        let current = ctx
            .guild_channel()
            .await
            .and_then(|channel| channel.rate_limit_per_user)
            .unwrap_or(0);
        ctx.say(current_slowmode_message(current)).await?;
        return Ok(());
    };

    let Some(seconds) = u16::try_from(seconds)
        .ok()
        .filter(|value| *value <= MAX_SLOWMODE_SECS)
    else {
        ctx.say("Slowmode can't be longer than 6 hours (21600 seconds).")
            .await?;
        return Ok(());
    };

    let edit = serenity::EditChannel::new().rate_limit_per_user(seconds);
    if let Err(source) = ctx.channel_id().edit(ctx.http(), edit).await {
        error!(?source, "slowmode request failed");
        ctx.say("I couldn't change slowmode. I likely need the 'Manage Channels' permission.")
            .await?;
        return Ok(());
    }

    let description = if seconds == 0 {
        "Slowmode has been disabled.".to_owned()
    } else {
        format!(
            "Slowmode set to **{}**.",
            format_compact_duration(u64::from(seconds))
        )
    };
    ctx.send(poise::CreateReply::default().embed(success_embed("Slowmode", description)))
        .await?;

    Ok(())
}

fn current_slowmode_message(seconds: u16) -> String {
    if seconds == 0 {
        "Slowmode is off in this channel.".to_owned()
    } else {
        format!(
            "Slowmode in this channel is **{}**.",
            format_compact_duration(u64::from(seconds))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::current_slowmode_message;

    #[test]
    fn describes_current_slowmode() {
        assert_eq!(current_slowmode_message(0), "Slowmode is off in this channel.");
        assert_eq!(
            current_slowmode_message(90),
            "Slowmode in this channel is **1m 30s**."
        );
    }
}
