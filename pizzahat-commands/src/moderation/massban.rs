use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::usage_message;
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_utils::embed::success_embed;
use pizzahat_utils::formatting::escape_mentions;
use pizzahat_utils::parse::parse_user_id;

pub const META: CommandMeta = CommandMeta {
    name: "massban",
    desc: "Ban several server members at once with one reason.",
    category: "moderation",
    usage: "p!massban <member> [member...] [reason]",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("mb"),
    user_cooldown = 10
)]
pub async fn massban(
    ctx: Context<'_>,
    #[description = "Member mentions/ids, then an optional reason"]
    #[rest]
    targets: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::BAN_MEMBERS).await? else {
        return Ok(());
    };

    let (user_ids, reason) = split_targets(targets.as_deref().unwrap_or_default());
    if user_ids.is_empty() {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    }
    let reason = reason.unwrap_or("No reason provided");

    let mut banned = Vec::new();
    let mut skipped = Vec::new();
    for user_id in user_ids {
        let target = serenity::UserId::new(user_id);

        if target == ctx.author().id {
            skipped.push((user_id, "that's you"));
            continue;
        }

        if guild_id.member(ctx.http(), target).await.is_err() {
            skipped.push((user_id, "not in this server"));
            continue;
        }

        match guild_id
            .ban_with_reason(ctx.http(), target, 0, reason)
            .await
        {
            Ok(()) => banned.push(user_id),
            Err(source) => {
                error!(?source, user_id, "massban request failed");
                skipped.push((user_id, "ban failed"));
            }
        }
    }

    let embed = success_embed("Mass Ban", massban_summary(&banned, &skipped, reason));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Leading member mentions or ids, then whatever is left as the reason.
fn split_targets(raw: &str) -> (Vec<u64>, Option<&str>) {
    let mut user_ids = Vec::new();
    let mut rest = raw.trim();

    while !rest.is_empty() {
        let (token, tail) = rest
            .split_once(char::is_whitespace)
            .unwrap_or((rest, ""));
        let Some(user_id) = parse_user_id(token) else {
            break;
        };
        if !user_ids.contains(&user_id) {
            user_ids.push(user_id);
        }
        rest = tail.trim_start();
    }

    (user_ids, Some(rest).filter(|reason| !reason.is_empty()))
}

fn massban_summary(banned: &[u64], skipped: &[(u64, &str)], reason: &str) -> String {
    let mut lines = banned
        .iter()
        .map(|user_id| format!("Banned <@{user_id}>"))
        .collect::<Vec<_>>();
    lines.extend(
        skipped
            .iter()
            .map(|(user_id, why)| format!("Skipped <@{user_id}>: {why}")),
    );
    lines.push(format!("**Reason :** {}", escape_mentions(reason)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{massban_summary, split_targets};

    #[test]
    fn takes_leading_members_then_reason() {
        assert_eq!(
            split_targets("<@123> <@!456> 789 raid accounts"),
            (vec![123, 456, 789], Some("raid accounts"))
        );
        assert_eq!(split_targets("<@123>  <@123>"), (vec![123], None));
        assert_eq!(
            split_targets("spam <@123>"),
            (Vec::<u64>::new(), Some("spam <@123>"))
        );
        assert_eq!(split_targets("   "), (Vec::<u64>::new(), None));
    }

    #[test]
    fn summary_lists_banned_and_skipped() {
        let summary = massban_summary(&[1, 2], &[(3, "not in this server")], "raid");
        assert_eq!(
            summary,
            "Banned <@1>\nBanned <@2>\nSkipped <@3>: not in this server\n**Reason :** raid"
        );
    }
}
