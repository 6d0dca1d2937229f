use tokio::time::{Duration, sleep};
use tracing::{debug, error};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "cleanup",
    desc: "Delete my own messages among the latest ones in this channel (default and max: 100).",
    category: "moderation",
    usage: "p!cleanup [amount]",
};

const MAX_CLEANUP: u16 = 100;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn cleanup(
    ctx: Context<'_>,
    #[description = "How many recent messages to scan"] amount: Option<u16>,
) -> Result<(), Error> {
    if moderator_guild(ctx, serenity::Permissions::MANAGE_MESSAGES)
        .await?
        .is_none()
    {
        return Ok(());
    }

    let limit = match cleanup_limit(amount) {
        Ok(limit) => limit,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    let channel_id = ctx.channel_id();
    let bot_id = ctx.framework().bot_id;
    let ids = channel_id
        .messages(ctx.http(), serenity::GetMessages::new().limit(limit))
        .await?
        .into_iter()
        .filter(|message| message.author.id == bot_id)
        .map(|message| message.id)
        .collect::<Vec<_>>();

    let cleared = ids.len();
    let delete_result = match ids.len() {
        0 => Ok(()),
        1 => channel_id.delete_message(ctx.http(), ids[0]).await,
        _ => channel_id.delete_messages(ctx.http(), ids).await,
    };

    if let Err(source) = delete_result {
        error!(?source, "cleanup delete request failed");
        ctx.say("I couldn't delete my messages here.").await?;
        return Ok(());
    }

    let confirmation = ctx.say(format!("{cleared} message(s) cleared")).await?;
    sleep(Duration::from_millis(2500)).await;
    if let Err(source) = confirmation.message().await?.delete(ctx.http()).await {
        debug!(?source, "cleanup confirmation already gone");
    }

    Ok(())
}

fn cleanup_limit(requested: Option<u16>) -> Result<u8, &'static str> {
    match requested.unwrap_or(MAX_CLEANUP) {
        0 => Err("Amount must be at least 1."),
        amount if amount > MAX_CLEANUP => Err("I can only clear up to 100 messages at a time."),
        amount => u8::try_from(amount).map_err(|_| "I can only clear up to 100 messages at a time."),
    }
}

#[cfg(test)]
mod tests {
    use super::cleanup_limit;

    #[test]
    fn limits_scan_to_one_hundred() {
        assert_eq!(cleanup_limit(None), Ok(100));
        assert_eq!(cleanup_limit(Some(12)), Ok(12));
        assert!(cleanup_limit(Some(0)).is_err());
        assert!(cleanup_limit(Some(101)).is_err());
    }
}
