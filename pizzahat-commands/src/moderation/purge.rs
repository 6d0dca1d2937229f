use tokio::time::{Duration, sleep};
use tracing::{debug, error};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};

pub const META: CommandMeta = CommandMeta {
    name: "purge",
    desc: "Delete the latest messages in this channel (default and max: 100).",
    category: "moderation",
    usage: "p!purge [amount]",
};

const MAX_PURGE: u8 = 100;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("clear"),
    user_cooldown = 5
)]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "Amount of messages to purge"] amount: Option<u16>,
) -> Result<(), Error> {
    if moderator_guild(ctx, serenity::Permissions::MANAGE_MESSAGES)
        .await?
        .is_none()
    {
        return Ok(());
    }

    let amount = purge_amount(amount);
    if amount == 0 {
        ctx.say("Amount must be at least 1.").await?;
        return Ok(());
    }

    let channel_id = ctx.channel_id();
    // Prefix invocations also remove the command message itself.
    let (limit, command_message) = match ctx {
        poise::Context::Prefix(prefix) => {
            (amount.saturating_add(1).min(MAX_PURGE), Some(prefix.msg.id))
        }
        poise::Context::Application(_) => (amount, None),
    };
    let messages = channel_id
        .messages(ctx.http(), serenity::GetMessages::new().limit(limit))
        .await?;

    let ids: Vec<serenity::MessageId> = messages.into_iter().map(|message| message.id).collect();

    if ids.is_empty() {
        ctx.say("No messages found to delete.").await?;
        return Ok(());
    }

    let purged = purged_count(&ids, command_message);
    let delete_result = if ids.len() == 1 {
        channel_id.delete_message(ctx.http(), ids[0]).await
    } else {
        channel_id.delete_messages(ctx.http(), ids).await
    };

    if let Err(source) = delete_result {
        error!(?source, "purge delete request failed");
        ctx.say("I couldn't delete messages. I likely need the 'Manage Messages' permission.")
            .await?;
        return Ok(());
    }

    let confirmation = ctx.say(format!("Purged {purged} message(s).")).await?;
    sleep(Duration::from_secs(3)).await;
    if let Err(source) = confirmation.message().await?.delete(ctx.http()).await {
        debug!(?source, "purge confirmation already gone");
    }

    Ok(())
}

fn purge_amount(requested: Option<u16>) -> u8 {
    match requested {
        Some(value) => value.min(u16::from(MAX_PURGE)) as u8,
        None => MAX_PURGE,
    }
}

/// Deleted messages excluding the invoking command message.
fn purged_count(
    deleted: &[serenity::MessageId],
    command_message: Option<serenity::MessageId>,
) -> usize {
    deleted
        .iter()
        .filter(|id| Some(**id) != command_message)
        .count()
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::MessageId;

    use super::{purge_amount, purged_count};

    #[test]
    fn defaults_and_caps_amount() {
        assert_eq!(purge_amount(None), 100);
        assert_eq!(purge_amount(Some(5)), 5);
        assert_eq!(purge_amount(Some(5000)), 100);
        assert_eq!(purge_amount(Some(0)), 0);
    }

    #[test]
    fn command_message_is_not_counted() {
        let deleted = (1..=100).map(MessageId::new).collect::<Vec<_>>();
        assert_eq!(purged_count(&deleted, Some(MessageId::new(100))), 99);
        assert_eq!(purged_count(&deleted, None), 100);
        assert_eq!(purged_count(&deleted[..5], Some(MessageId::new(500))), 5);
    }
}
