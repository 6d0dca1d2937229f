use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use pizzahat_core::{Context, Error};
use pizzahat_ledger::WarnEntry;
use pizzahat_utils::formatting::escape_mentions;
use pizzahat_utils::pagination::{chunk_lines, paginate_embed_pages_with_thumbnail};

pub const META: CommandMeta = CommandMeta {
    name: "warnings",
    desc: "Show your warnings, or another member's.",
    category: "moderation",
    usage: "p!warnings [member]",
};

const WARNINGS_PER_PAGE: usize = 5;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("warns"),
    user_cooldown = 5
)]
pub async fn warnings(
    ctx: Context<'_>,
    #[description = "The member to check"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let user = match member.as_ref() {
        Some(member) => &member.user,
        None => ctx.author(),
    };

    let service = ctx.data().warn_service(ctx.framework().bot_id.get());
    let entries = service.list_warnings(guild_id.get(), user.id.get()).await?;

    let title = format!("Warnings for {}", user.tag());
    let pages = warning_pages(&entries);
    paginate_embed_pages_with_thumbnail(ctx, &title, &pages, 1, Some(&user.face())).await?;

    Ok(())
}

fn warning_line(number: usize, entry: &WarnEntry) -> String {
    format!(
        "**{number}.** Warn ID: `{id}`\n**Reason :** {reason}\n**When :** <t:{ts}:f>",
        id = entry.warn_id(),
        reason = escape_mentions(&entry.reason),
        ts = entry.warned_at as i64,
    )
}

fn warning_pages(entries: &[WarnEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["This user has no warnings.".to_owned()];
    }

    let header = format!("Total warnings: **{}**\n\n", entries.len());
    let lines = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| warning_line(index + 1, entry))
        .collect::<Vec<_>>();

    chunk_lines(&lines, WARNINGS_PER_PAGE, "\n\n")
        .into_iter()
        .map(|page| format!("{header}{page}"))
        .collect()
}
