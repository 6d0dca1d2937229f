use std::time::Duration;

use tracing::debug;

use poise::serenity_prelude as serenity;

use crate::utility::embeds::{
    aliases_of, command_detail_embed, find_command, grouped_help_description,
    help_category_embed, help_commands_list_embed, help_home_embed, page_out_of_range_message,
    unknown_query_message,
};
use crate::{COMMANDS, CommandMeta};
use pizzahat_core::{Context, Error};
use pizzahat_utils::formatting::display_category;
use pizzahat_utils::pagination::{
    PAGINATION_TIMEOUT_SECS, page_window, paginate_embed_pages, total_pages,
};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "List commands, a category, or details for one command.",
    category: "utility",
    usage: "p!help [command|category|page]",
};

const HELP_COMMANDS_PER_PAGE: usize = 15;
const NOT_YOUR_MENU: &str = "Not your help command ._.";

enum HelpQuery<'a> {
    Menu,
    Page(usize),
    Named(&'a str),
}

fn parse_query(raw: Option<&str>) -> HelpQuery<'_> {
    let Some(raw) = raw.map(str::trim).filter(|entry| !entry.is_empty()) else {
        return HelpQuery::Menu;
    };

    match raw.parse::<usize>() {
        Ok(page) if page >= 1 => HelpQuery::Page(page),
        _ => HelpQuery::Named(raw),
    }
}

#[poise::command(
    prefix_command,
    slash_command,
    category = "Utility",
    user_cooldown = 3
)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Command, category or page number"] query: Option<String>,
) -> Result<(), Error> {
    let mut categories: Vec<&'static str> =
        COMMANDS.iter().map(|command| command.category).collect();
    categories.sort_unstable();
    categories.dedup();

    let (category, requested_page) = match parse_query(query.as_deref()) {
        HelpQuery::Menu => {
            help_menu(ctx, &categories).await?;
            return Ok(());
        }
        HelpQuery::Page(page) => (None, page),
        HelpQuery::Named(name) => {
            let registered = &ctx.framework().options().commands;
            if let Some(meta) = find_command(registered, name) {
                let aliases = aliases_of(registered, meta.name);
                ctx.send(
                    poise::CreateReply::default().embed(command_detail_embed(meta, &aliases)),
                )
                .await?;
                return Ok(());
            }

            let wanted = name.to_ascii_lowercase();
            let Some(category) = categories.iter().copied().find(|category| *category == wanted)
            else {
                ctx.say(unknown_query_message(name, &categories)).await?;
                return Ok(());
            };
            (Some(category), 1)
        }
    };

    let commands = sorted_commands(category);
    let total = total_pages(commands.len(), HELP_COMMANDS_PER_PAGE);

    if requested_page > total {
        ctx.say(page_out_of_range_message(requested_page, total)).await?;
        return Ok(());
    }

    let pages = (1..=total)
        .map(|page| {
            let (start, end) = page_window(commands.len(), HELP_COMMANDS_PER_PAGE, page);
            grouped_help_description(&commands[start..end])
        })
        .collect::<Vec<_>>();
    paginate_embed_pages(ctx, "PizzaHat Commands", &pages, requested_page).await?;
    Ok(())
}

#[derive(Debug, PartialEq)]
enum MenuAction {
    Home,
    Category(&'static str),
    CommandsList,
    Delete,
}

struct MenuIds {
    select: String,
    home: String,
    list: String,
    delete: String,
}

impl MenuIds {
    fn new(ctx_id: u64) -> Self {
        Self {
            select: format!("{ctx_id}_help_category"),
            home: format!("{ctx_id}_help_home"),
            list: format!("{ctx_id}_help_list"),
            delete: format!("{ctx_id}_help_delete"),
        }
    }

    /// What a press on this menu asks for. Unknown ids and categories are
    /// ignored.
    fn action(
        &self,
        custom_id: &str,
        selected: &[String],
        categories: &[&'static str],
    ) -> Option<MenuAction> {
        if custom_id == self.select {
            let value = selected.first()?;
            return categories
                .iter()
                .copied()
                .find(|category| *category == value.as_str())
                .map(MenuAction::Category);
        }

        if custom_id == self.home {
            Some(MenuAction::Home)
        } else if custom_id == self.list {
            Some(MenuAction::CommandsList)
        } else if custom_id == self.delete {
            Some(MenuAction::Delete)
        } else {
            None
        }
    }

    fn components(&self, categories: &[&str], disabled: bool) -> Vec<serenity::CreateActionRow> {
        let options = categories
            .iter()
            .map(|category| {
                serenity::CreateSelectMenuOption::new(display_category(category), *category)
            })
            .collect();

        vec![
            serenity::CreateActionRow::SelectMenu(
                serenity::CreateSelectMenu::new(
                    &self.select,
                    serenity::CreateSelectMenuKind::String { options },
                )
                .placeholder("Choose a category...")
                .disabled(disabled),
            ),
            serenity::CreateActionRow::Buttons(vec![
                serenity::CreateButton::new(&self.home)
                    .label("Home")
                    .emoji('🏠')
                    .style(serenity::ButtonStyle::Secondary)
                    .disabled(disabled),
                serenity::CreateButton::new(&self.list)
                    .label("Commands List")
                    .emoji('📜')
                    .style(serenity::ButtonStyle::Secondary)
                    .disabled(disabled),
                serenity::CreateButton::new(&self.delete)
                    .label("Delete Menu")
                    .emoji('🛑')
                    .style(serenity::ButtonStyle::Danger)
                    .disabled(disabled),
            ]),
        ]
    }
}

fn menu_embed(action: &MenuAction, categories: &[&str]) -> serenity::CreateEmbed {
    match action {
        MenuAction::Category(category) => {
            help_category_embed(category, &sorted_commands(Some(*category)))
        }
        MenuAction::CommandsList => help_commands_list_embed(&sorted_commands(None)),
        MenuAction::Home | MenuAction::Delete => help_home_embed(categories),
    }
}

/// Category browser with Home / Commands List / Delete Menu buttons. Anyone
/// else pressing it gets an ephemeral refusal; the components are disabled
/// once the collector times out.
async fn help_menu(ctx: Context<'_>, categories: &[&'static str]) -> Result<(), Error> {
    let ids = MenuIds::new(ctx.id());
    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(help_home_embed(categories))
                .components(ids.components(categories, false)),
        )
        .await?;

    let message = reply.message().await?;
    let message_id = message.id;
    let channel_id = message.channel_id;
    let author_id = ctx.author().id;
    let mut shown = MenuAction::Home;

    while let Some(press) = serenity::collector::ComponentInteractionCollector::new(ctx)
        .message_id(message_id)
        .timeout(Duration::from_secs(PAGINATION_TIMEOUT_SECS))
        .await
    {
        if press.user.id != author_id {
            press
                .create_response(
                    ctx.http(),
                    serenity::CreateInteractionResponse::Message(
                        serenity::CreateInteractionResponseMessage::new()
                            .content(NOT_YOUR_MENU)
                            .ephemeral(true),
                    ),
                )
                .await?;
            continue;
        }

        let selected = match &press.data.kind {
            serenity::ComponentInteractionDataKind::StringSelect { values } => values.as_slice(),
            _ => &[],
        };
        let Some(action) = ids.action(&press.data.custom_id, selected, categories) else {
            continue;
        };

        if action == MenuAction::Delete {
            press
                .create_response(ctx.http(), serenity::CreateInteractionResponse::Acknowledge)
                .await?;
            channel_id.delete_message(ctx.http(), message_id).await?;
            return Ok(());
        }

        press
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(menu_embed(&action, categories))
                        .components(ids.components(categories, false)),
                ),
            )
            .await?;
        shown = action;
    }

    if let Err(source) = channel_id
        .edit_message(
            ctx.http(),
            message_id,
            serenity::EditMessage::new()
                .embed(menu_embed(&shown, categories))
                .components(ids.components(categories, true)),
        )
        .await
    {
        debug!(?source, "help menu already gone");
    }

    Ok(())
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|command| category.is_none_or(|wanted| command.category == wanted))
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}
