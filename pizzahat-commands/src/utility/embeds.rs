use poise::serenity_prelude as serenity;

use crate::{COMMANDS, CommandMeta};
use pizzahat_core::{Data, Error};
use pizzahat_utils::COMMAND_PREFIX;
use pizzahat_utils::embed::DEFAULT_EMBED_COLOR;
use pizzahat_utils::formatting::display_category;

pub fn unknown_query_message(query: &str, valid_categories: &[&str]) -> String {
    let valid = valid_categories
        .iter()
        .map(|category| display_category(category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "No command or category called `{}`.\nValid categories: {}",
        query.trim(),
        valid
    )
}

pub fn page_out_of_range_message(requested_page: usize, total_pages: usize) -> String {
    format!(
        "Page {} does not exist. Available pages: 1-{}.",
        requested_page, total_pages
    )
}

pub fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("`{}`: {}\n", command.name, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

/// Resolve a typed name or alias (`p!warns`, `delwarn`) to its metadata.
pub fn find_command(
    registered: &[poise::Command<Data, Error>],
    raw: &str,
) -> Option<&'static CommandMeta> {
    let wanted = raw
        .trim()
        .trim_start_matches(COMMAND_PREFIX)
        .to_ascii_lowercase();

    let name = registered
        .iter()
        .find(|command| command.name == wanted || command.aliases.iter().any(|alias| *alias == wanted))
        .map_or(wanted.as_str(), |command| command.name.as_str());

    COMMANDS.iter().find(|meta| meta.name == name)
}

pub fn aliases_of<'a>(registered: &'a [poise::Command<Data, Error>], name: &str) -> Vec<&'a str> {
    registered
        .iter()
        .find(|command| command.name == name)
        .map(|command| command.aliases.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

pub fn command_detail_embed(meta: &CommandMeta, aliases: &[&str]) -> serenity::CreateEmbed {
    let aliases = if aliases.is_empty() {
        "None".to_owned()
    } else {
        aliases
            .iter()
            .map(|alias| format!("`{alias}`"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    serenity::CreateEmbed::new()
        .title(format!("{COMMAND_PREFIX}{}", meta.name))
        .description(meta.desc)
        .field("Usage", format!("`{}`", meta.usage), false)
        .field("Aliases", aliases, true)
        .field("Category", display_category(meta.category), true)
        .color(DEFAULT_EMBED_COLOR)
}

pub fn help_home_embed(categories: &[&str]) -> serenity::CreateEmbed {
    let listed = categories
        .iter()
        .map(|category| {
            let count = COMMANDS
                .iter()
                .filter(|command| command.category == *category)
                .count();
            format!("**{}**: {count} commands", display_category(category))
        })
        .collect::<Vec<_>>()
        .join("\n");

    serenity::CreateEmbed::new()
        .title("PizzaHat Help")
        .description(format!(
            "Pick a category from the menu below.\nUse `{COMMAND_PREFIX}help <command>` for details on one command."
        ))
        .field("Categories", listed, false)
        .color(DEFAULT_EMBED_COLOR)
}

pub fn help_category_embed(category: &str, commands: &[&CommandMeta]) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("{} Commands", display_category(category)))
        .description(grouped_help_description(commands))
        .color(DEFAULT_EMBED_COLOR)
}

/// Every command name, one field per category.
pub fn help_commands_list_embed(commands: &[&CommandMeta]) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title("Commands List")
        .color(DEFAULT_EMBED_COLOR);

    for (category, names) in names_by_category(commands) {
        embed = embed.field(display_category(category), names, false);
    }

    embed
}

fn names_by_category<'a>(commands: &[&'a CommandMeta]) -> Vec<(&'a str, String)> {
    let mut grouped: Vec<(&str, Vec<String>)> = Vec::new();
    for command in commands {
        let name = format!("`{}`", command.name);
        match grouped.iter_mut().find(|(category, _)| *category == command.category) {
            Some((_, names)) => names.push(name),
            None => grouped.push((command.category, vec![name])),
        }
    }

    grouped
        .into_iter()
        .map(|(category, names)| (category, names.join(", ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        find_command, grouped_help_description, names_by_category, unknown_query_message,
    };
    use crate::{COMMANDS, commands};

    #[test]
    fn resolves_names_and_aliases() {
        let registered = commands();

        assert_eq!(find_command(&registered, "warn").map(|meta| meta.name), Some("warn"));
        assert_eq!(
            find_command(&registered, "p!warns").map(|meta| meta.name),
            Some("warnings")
        );
        assert_eq!(
            find_command(&registered, "DELWARN").map(|meta| meta.name),
            Some("deletewarn")
        );
        assert!(find_command(&registered, "music").is_none());
    }

    #[test]
    fn groups_by_category() {
        let metas = COMMANDS
            .iter()
            .filter(|meta| meta.name == "ping" || meta.name == "ticket")
            .collect::<Vec<_>>();
        let description = grouped_help_description(&metas);

        assert!(description.contains("**Utility**\n`ping`"));
        assert!(description.contains("**Tickets**\n`ticket`"));
    }

    #[test]
    fn unknown_query_lists_categories() {
        assert_eq!(
            unknown_query_message("fun", &["moderation", "utility"]),
            "No command or category called `fun`.\nValid categories: Moderation, Utility"
        );
    }

    #[test]
    fn lists_names_per_category() {
        let metas = COMMANDS
            .iter()
            .filter(|meta| ["ping", "warn", "help", "kick"].contains(&meta.name))
            .collect::<Vec<_>>();

        assert_eq!(
            names_by_category(&metas),
            vec![
                ("utility", "`ping`, `help`".to_owned()),
                ("moderation", "`warn`, `kick`".to_owned()),
            ]
        );
    }
}
