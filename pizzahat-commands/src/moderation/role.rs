use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_utils::formatting::escape_mentions;
use pizzahat_utils::pagination::{chunk_lines, paginate_embed_pages_with_thumbnail};
use pizzahat_utils::parse::{parse_flag, parse_hex_color};
use pizzahat_utils::permissions::RoleLadder;

pub const META: CommandMeta = CommandMeta {
    name: "role",
    desc: "Add, remove, create, delete or list server roles.",
    category: "moderation",
    usage: "p!role <add|remove <member> <role> | create <name> [hex color] [hoist] | delete <role> | list>",
};

const ROLES_PER_PAGE: usize = 10;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    subcommands("role_add", "role_remove", "role_create", "role_delete", "role_list")
)]
pub async fn role(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(usage_message(META.usage)).await?;
    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "add",
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn role_add(
    ctx: Context<'_>,
    #[description = "Member to give the role to"] member: serenity::Member,
    #[description = "Role to add"]
    #[rest]
    role: serenity::Role,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_ROLES).await? else {
        return Ok(());
    };

    if !author_outranks_role(ctx, guild_id, &role).await? {
        return Ok(());
    }

    if member.roles.contains(&role.id) {
        ctx.say(format!(
            "{} already has `{}` role.",
            member.user.tag(),
            escape_mentions(&role.name)
        ))
        .await?;
        return Ok(());
    }

    if let Err(source) = member.add_role(ctx.http(), role.id).await {
        error!(?source, "role add request failed");
        ctx.say("I couldn't add that role. Check that my role is above it.")
            .await?;
        return Ok(());
    }

    ctx.say(format!(
        "Successfully added `{}` to {}",
        escape_mentions(&role.name),
        member.user.tag()
    ))
    .await?;

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "remove",
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn role_remove(
    ctx: Context<'_>,
    #[description = "Member to take the role from"] member: serenity::Member,
    #[description = "Role to remove"]
    #[rest]
    role: serenity::Role,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_ROLES).await? else {
        return Ok(());
    };

    if !author_outranks_role(ctx, guild_id, &role).await? {
        return Ok(());
    }

    if !member.roles.contains(&role.id) {
        ctx.say(format!(
            "{} does not have `{}` role.",
            member.user.tag(),
            escape_mentions(&role.name)
        ))
        .await?;
        return Ok(());
    }

    if let Err(source) = member.remove_role(ctx.http(), role.id).await {
        error!(?source, "role remove request failed");
        ctx.say("I couldn't remove that role. Check that my role is above it.")
            .await?;
        return Ok(());
    }

    ctx.say(format!(
        "Successfully removed `{}` from {}",
        escape_mentions(&role.name),
        member.user.tag()
    ))
    .await?;

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "create",
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn role_create(
    ctx: Context<'_>,
    #[description = "Name of the new role"] name: String,
    #[description = "Hex color, e.g. #456dd4"] color: Option<String>,
    #[description = "Show members separately (yes/no)"] hoist: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_ROLES).await? else {
        return Ok(());
    };

    let colour = match color.as_deref() {
        Some(raw) => match parse_hex_color(raw) {
            Some(colour) => colour,
            None => {
                ctx.say("Invalid color. Use a hex value like `#456dd4`.").await?;
                return Ok(());
            }
        },
        None => 0,
    };

    let hoist = match hoist.as_deref() {
        Some(raw) => match parse_flag(raw) {
            Some(hoist) => hoist,
            None => {
                ctx.say("Hoist must be yes or no.").await?;
                return Ok(());
            }
        },
        None => false,
    };

    let reason = format!("Role created by {}", ctx.author().tag());
    let edit = serenity::EditRole::new()
        .name(name.as_str())
        .colour(colour)
        .hoist(hoist)
        .audit_log_reason(&reason);

    if let Err(source) = guild_id.create_role(ctx.http(), edit).await {
        error!(?source, "role create request failed");
        ctx.say("I couldn't create that role. I likely need the 'Manage Roles' permission.")
            .await?;
        return Ok(());
    }

    ctx.say("Role created successfully!").await?;
    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    rename = "delete",
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn role_delete(
    ctx: Context<'_>,
    #[description = "Role to delete"]
    #[rest]
    role: serenity::Role,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_ROLES).await? else {
        return Ok(());
    };

    if !author_outranks_role(ctx, guild_id, &role).await? {
        return Ok(());
    }

    if let Err(source) = guild_id.delete_role(ctx.http(), role.id).await {
        error!(?source, "role delete request failed");
        ctx.say("I couldn't delete that role. Check that my role is above it.")
            .await?;
        return Ok(());
    }

    ctx.say("Role deleted successfully!").await?;
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
pub async fn role_list(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let roles = guild_id.roles(ctx.http()).await?;
    if roles.is_empty() {
        ctx.say("No roles to display.").await?;
        return Ok(());
    }

    let mut ladder = roles
        .values()
        .map(|role| (role.id.get(), role.position, role.name.clone()))
        .collect::<Vec<_>>();
    let lines = role_lines(&mut ladder);
    let pages = chunk_lines(&lines, ROLES_PER_PAGE, "\n\n");

    let title = format!("{} Roles ({})", guild.name, lines.len());
    paginate_embed_pages_with_thumbnail(ctx, &title, &pages, 1, guild.icon_url().as_deref())
        .await?;

    Ok(())
}

/// Only roles strictly below the author's highest role can be handed out,
/// taken away or deleted. Replies and returns `false` otherwise.
async fn author_outranks_role(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    role: &serenity::Role,
) -> Result<bool, Error> {
    let Some(author) = ctx.author_member().await else {
        ctx.say("I couldn't look up your membership in this server.").await?;
        return Ok(false);
    };

    let ladder = RoleLadder::fetch(ctx.http(), guild_id).await?;
    if outranks_role(ladder.member_rank(&author), role.position) {
        return Ok(true);
    }

    ctx.say(format!(
        "You can't manage `{}`: it's not below your highest role.",
        escape_mentions(&role.name)
    ))
    .await?;
    Ok(false)
}

fn outranks_role(actor_rank: i64, role_position: u16) -> bool {
    actor_rank > i64::from(role_position)
}

/// Highest role first.
fn role_lines(roles: &mut [(u64, u16, String)]) -> Vec<String> {
    roles.sort_by(|left, right| right.1.cmp(&left.1).then(left.0.cmp(&right.0)));
    roles
        .iter()
        .map(|(id, _, name)| format!("<@&{id}> `({id})` • {}", escape_mentions(name)))
        .collect()
}
