use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_database::impls::staff_role::{
    clear_staff_role_id, get_staff_role_id, set_staff_role_id,
};
use pizzahat_utils::parse::parse_role_id;

pub const META: CommandMeta = CommandMeta {
    name: "staffrole",
    desc: "Set or view the role pinged in new tickets.",
    category: "tickets",
    usage: "p!staffrole [@role|role_id|clear]",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Tickets",
    user_cooldown = 5
)]
pub async fn staffrole(
    ctx: Context<'_>,
    #[description = "Role mention/id, or 'clear'"]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_GUILD).await? else {
        return Ok(());
    };

    if let Some(input) = input
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    {
        if input.eq_ignore_ascii_case("clear") {
            clear_staff_role_id(&ctx.data().db, guild_id.get()).await?;
            ctx.say("Staff role cleared. New tickets can't be opened until one is set.")
                .await?;
            return Ok(());
        }

        if let Some(role_id) = parse_role_id(input) {
            let roles = guild_id.roles(ctx.http()).await?;
            if !roles.contains_key(&serenity::RoleId::new(role_id)) {
                ctx.say("That role doesn't exist in this server.").await?;
                return Ok(());
            }

            set_staff_role_id(&ctx.data().db, guild_id.get(), role_id).await?;
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("Staff role set to <@&{role_id}>."))
                    .allowed_mentions(serenity::CreateAllowedMentions::new()),
            )
            .await?;
            return Ok(());
        }

        ctx.say("Provide a valid role mention/id, or `clear`.").await?;
        return Ok(());
    }

    match get_staff_role_id(&ctx.data().db, guild_id.get()).await? {
        Some(role_id) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("Current staff role: <@&{role_id}>"))
                    .allowed_mentions(serenity::CreateAllowedMentions::new()),
            )
            .await?;
        }
        None => {
            ctx.say("No staff role configured.").await?;
        }
    }

    Ok(())
}
