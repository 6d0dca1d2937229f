use std::time::Instant;

use pizzahat_core::{Context, Error};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Check that the bot is alive and how fast it answers.",
    category: "utility",
    usage: "p!ping",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Utility",
    user_cooldown = 3
)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let reply = ctx.say("Pong!").await?;
    let elapsed = started.elapsed().as_millis();

    let gateway = ctx.ping().await;
    let content = if gateway.is_zero() {
        format!("Pong! `{elapsed}ms`")
    } else {
        format!("Pong! `{elapsed}ms` (gateway `{}ms`)", gateway.as_millis())
    };
    reply
        .edit(ctx, poise::CreateReply::default().content(content))
        .await?;

    Ok(())
}
