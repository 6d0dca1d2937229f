mod events;

use std::env;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use pizzahat_core::{Data, Error};
use pizzahat_database::{CacheService, Database};
use pizzahat_utils::COMMAND_PREFIX;
use pizzahat_utils::embed::failed_embed;
use pizzahat_utils::formatting::format_compact_duration;

const DB_MAX_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let database_url = env::var("DATABASE_URL")?;
    // Without a guild id, slash commands are registered globally.
    let guild_id = match env::var("DISCORD_GUILD_ID") {
        Ok(raw) if !raw.trim().is_empty() => Some(serenity::GuildId::new(
            raw.trim()
                .parse::<u64>()
                .ok()
                .filter(|id| *id != 0)
                .ok_or_else(|| anyhow::anyhow!("DISCORD_GUILD_ID must be a guild id"))?,
        )),
        _ => None,
    };

    let cache = build_cache();
    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    let db = Database::connect(&database_url, DB_MAX_CONNECTIONS, cache).await?;

    if env_bool("AUTO_RUN_MIGRATIONS", true) {
        db.migrate().await?;
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: pizzahat_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(COMMAND_PREFIX.to_string()),
                mention_as_prefix: true,
                case_insensitive_commands: true,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            let db = db.clone();
            Box::pin(async move {
                info!(user = %ready.user.name, guilds = ready.guilds.len(), "PizzaHat is online!");

                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            guild_id,
                        )
                        .await?;
                        info!(guild_id = guild_id.get(), "Slash commands registered in guild.");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Slash commands registered globally.");
                    }
                }

                Ok(Data { db })
            })
        })
        .build();

    info!("PizzaHat is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

fn build_cache() -> CacheService {
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "pizzahat:prod".to_string());

    if !env_bool("REDIS_ENABLED", false) {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        return CacheService::disabled(redis_key_prefix);
    }

    let Ok(redis_url) = env::var("REDIS_URL") else {
        warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
        return CacheService::disabled(redis_key_prefix);
    };

    match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
        Ok(cache) => {
            info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
            cache
        }
        Err(err) => {
            warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
            CacheService::disabled(redis_key_prefix)
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = failed_embed("Something went wrong while running this command.")
                .title("Command Error");

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            // Subcommands share their parent's usage line.
            let qualified_name = &ctx.command().qualified_name;
            let root = qualified_name.split_whitespace().next().unwrap_or_default();
            let usage = pizzahat_commands::COMMANDS
                .iter()
                .find(|meta| meta.name == root)
                .map_or_else(
                    || format!("Usage: `{COMMAND_PREFIX}{qualified_name}`"),
                    |meta| format!("Usage: `{}`", meta.usage),
                );
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => {
            let wait = format_compact_duration(remaining_cooldown.as_secs().max(1));
            let _ = ctx
                .send(
                    poise::CreateReply::default()
                        .ephemeral(true)
                        .content(format!("Slow down! Try again in {wait}.")),
                )
                .await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            if let Err(source) = poise::builtins::on_error(other).await {
                error!(?source, "framework error");
            }
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::InteractionCreate {
        interaction: serenity::Interaction::Component(component),
    } = event
    {
        events::tickets::handle_ticket_interaction(ctx, data, component).await;
    }

    Ok(())
}
