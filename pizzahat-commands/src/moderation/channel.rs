use std::collections::BTreeMap;

use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_utils::pagination::paginate_embed_pages_with_thumbnail;

pub const META: CommandMeta = CommandMeta {
    name: "channel",
    desc: "Create, delete or list server channels.",
    category: "moderation",
    usage: "p!channel <create <name> | delete <channel> | list>",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    subcommands("channel_create", "channel_delete", "channel_list")
)]
pub async fn channel(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(usage_message(META.usage)).await?;
    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "create",
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn channel_create(
    ctx: Context<'_>,
    #[description = "Name of the new text channel"] name: String,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_CHANNELS).await?
    else {
        return Ok(());
    };

    let create = serenity::CreateChannel::new(name.as_str()).kind(serenity::ChannelType::Text);
    match guild_id.create_channel(ctx.http(), create).await {
        Ok(created) => {
            ctx.say(format!("Channel <#{}> created successfully!", created.id.get()))
                .await?;
        }
        Err(source) => {
            error!(?source, "channel create request failed");
            ctx.say("I couldn't create that channel. I likely need the 'Manage Channels' permission.")
                .await?;
        }
    }

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "delete",
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn channel_delete(
    ctx: Context<'_>,
    #[description = "Channel to delete"] channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_CHANNELS).await?
    else {
        return Ok(());
    };

    if channel.guild_id != guild_id {
        ctx.say("That channel isn't in this server.").await?;
        return Ok(());
    }

    if let Err(source) = channel.id.delete(ctx.http()).await {
        error!(?source, "channel delete request failed");
        ctx.say("I couldn't delete that channel. I likely need the 'Manage Channels' permission.")
            .await?;
        return Ok(());
    }

    if channel.id != ctx.channel_id() {
        ctx.say("Channel deleted successfully!").await?;
    }

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "list",
    aliases("all"),
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn channel_list(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let channels = guild_id.channels(ctx.http()).await?;

    let category_names = channels
        .values()
        .filter(|channel| channel.kind == serenity::ChannelType::Category)
        .map(|channel| (channel.id, (channel.position, channel.name.clone())))
        .collect::<BTreeMap<_, _>>();

    let mut listed = channels
        .values()
        .filter(|channel| channel.kind != serenity::ChannelType::Category)
        .map(|channel| ListedChannel {
            id: channel.id.get(),
            name: channel.name.clone(),
            kind: channel_kind_label(channel.kind),
            position: channel.position,
            category: channel
                .parent_id
                .and_then(|parent| category_names.get(&parent))
                .map(|(position, name)| (*position, name.clone())),
        })
        .collect::<Vec<_>>();

    if listed.is_empty() {
        ctx.say("No channels to display.").await?;
        return Ok(());
    }

    let total = listed.len();
    let pages = channel_pages(&mut listed);
    let title = format!("{} Channels ({total})", guild.name);
    paginate_embed_pages_with_thumbnail(ctx, &title, &pages, 1, guild.icon_url().as_deref())
        .await?;

    Ok(())
}

struct ListedChannel {
    id: u64,
    name: String,
    kind: &'static str,
    position: u16,
    /// Category position and name.
    category: Option<(u16, String)>,
}

fn channel_kind_label(kind: serenity::ChannelType) -> &'static str {
    match kind {
        serenity::ChannelType::Text => "text",
        serenity::ChannelType::Voice => "voice",
        serenity::ChannelType::News => "news",
        serenity::ChannelType::Stage => "stage_voice",
        serenity::ChannelType::Forum => "forum",
        _ => "other",
    }
}

/// One page per category, uncategorized channels first.
fn channel_pages(channels: &mut [ListedChannel]) -> Vec<String> {
    channels.sort_by(|left, right| {
        left.category
            .cmp(&right.category)
            .then(left.position.cmp(&right.position))
            .then(left.id.cmp(&right.id))
    });

    let mut pages = Vec::new();
    for group in channels.chunk_by(|left, right| left.category == right.category) {
        let heading = group[0]
            .category
            .as_ref()
            .map_or("No category", |(_, name)| name.as_str());
        let body = group
            .iter()
            .map(|channel| format!("\t{} :: {} :: {}", channel.name, channel.kind, channel.id))
            .collect::<Vec<_>>()
            .join("\n");
        pages.push(format!("```asciidoc\n{heading}\n{body}\n```"));
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::{ListedChannel, channel_pages};

    fn listed(id: u64, name: &str, position: u16, category: Option<(u16, &str)>) -> ListedChannel {
        ListedChannel {
            id,
            name: name.to_owned(),
            kind: "text",
            position,
            category: category.map(|(position, name)| (position, name.to_owned())),
        }
    }

    #[test]
    fn groups_channels_by_category() {
        let mut channels = vec![
            listed(4, "memes", 1, Some((1, "Fun"))),
            listed(1, "rules", 0, None),
            listed(3, "general", 0, Some((0, "Chat"))),
            listed(5, "art", 0, Some((1, "Fun"))),
        ];
        let pages = channel_pages(&mut channels);

        assert_eq!(pages.len(), 3);
        assert!(pages[0].starts_with("```asciidoc\nNo category\n\trules :: text :: 1"));
        assert!(pages[1].contains("Chat\n\tgeneral :: text :: 3"));
        assert!(pages[2].contains("Fun\n\tart :: text :: 5\n\tmemes :: text :: 4"));
    }
}
