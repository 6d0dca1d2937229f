use pizzahat_core::{Context, Error};

use crate::utility::embeds::find_command;
use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Show usage syntax for a specific command.",
    category: "utility",
    usage: "p!usage <command>",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Utility",
    user_cooldown = 3
)]
pub async fn usage(
    ctx: Context<'_>,
    #[description = "Command name"] command: Option<String>,
) -> Result<(), Error> {
    let Some(raw_name) = command.as_deref() else {
        ctx.say(format!("Usage: `{}`", META.usage)).await?;
        return Ok(());
    };

    let Some(command) = find_command(&ctx.framework().options().commands, raw_name) else {
        ctx.say(format!("Unknown command: `{}`", raw_name.trim())).await?;
        return Ok(());
    };

    ctx.say(format!("Usage: `{}`", command.usage)).await?;
    Ok(())
}
