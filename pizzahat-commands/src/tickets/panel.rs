//! Ticket panel components. The buttons outlive the process, so the
//! interaction handler matches on these custom ids rather than collectors.

use poise::serenity_prelude as serenity;

use pizzahat_utils::embed::DEFAULT_EMBED_COLOR;

pub const CREATE_TICKET_ID: &str = "create_ticket_btn";
pub const CLOSE_TICKET_ID: &str = "close_ticket_btn";
pub const REOPEN_TICKET_ID: &str = "reopen_ticket_btn";

pub const TICKET_ARCHIVED_MESSAGE: &str = "Ticket thread has been archived!";
pub const TICKET_REOPENED_MESSAGE: &str = "Ticket thread has been reopened!";
pub const TICKETS_NOT_CONFIGURED_MESSAGE: &str =
    "Tickets aren't set up here yet. Ask a server manager to run `p!staffrole <role>`.";

pub const TICKET_OPEN_FAILED_MESSAGE: &str =
    "I couldn't open a ticket right now. Please try again later or contact a staff member.";

/// Discord's thread name limit.
const MAX_THREAD_NAME_CHARS: usize = 100;

/// Which ticket button was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketButton {
    Create,
    Close,
    Reopen,
}

impl TicketButton {
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        match custom_id {
            CREATE_TICKET_ID => Some(Self::Create),
            CLOSE_TICKET_ID => Some(Self::Close),
            REOPEN_TICKET_ID => Some(Self::Reopen),
            _ => None,
        }
    }
}

/// The role to ping in a new ticket, or the reply for the member when there
/// is none. A failed lookup is not reported as "not configured".
pub fn staff_role_for_ticket<E>(
    lookup: Result<Option<u64>, E>,
) -> Result<serenity::RoleId, &'static str> {
    match lookup {
        Ok(Some(role_id)) if role_id != 0 => Ok(serenity::RoleId::new(role_id)),
        Ok(_) => Err(TICKETS_NOT_CONFIGURED_MESSAGE),
        Err(_) => Err(TICKET_OPEN_FAILED_MESSAGE),
    }
}

pub fn panel_embed() -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Support Tickets")
        .description("Press the button below to open a private ticket with the staff team.")
        .color(DEFAULT_EMBED_COLOR)
}

pub fn panel_components() -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(CREATE_TICKET_ID)
            .label("Create ticket")
            .emoji('🎟')
            .style(serenity::ButtonStyle::Primary),
    ])]
}

pub fn ticket_controls() -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(CLOSE_TICKET_ID)
            .label("Close")
            .style(serenity::ButtonStyle::Danger),
        serenity::CreateButton::new(REOPEN_TICKET_ID)
            .label("Reopen")
            .style(serenity::ButtonStyle::Success),
    ])]
}

pub fn ticket_thread_name(username: &str) -> String {
    format!("{username}-ticket")
        .chars()
        .take(MAX_THREAD_NAME_CHARS)
        .collect()
}

/// First message in a new ticket thread: pings staff and the opener.
pub fn ticket_opened_message(
    staff_role_id: serenity::RoleId,
    opener: &serenity::User,
) -> serenity::CreateMessage {
    let embed = serenity::CreateEmbed::new()
        .title("Ticket created!")
        .description(format!(
            "<@{}> `[{}]` created a ticket.",
            opener.id.get(),
            opener.name
        ))
        .color(DEFAULT_EMBED_COLOR)
        .footer(serenity::CreateEmbedFooter::new(opener.name.clone()).icon_url(opener.face()));

    serenity::CreateMessage::new()
        .content(format!("<@&{}> | <@{}>", staff_role_id.get(), opener.id.get()))
        .embed(embed)
        .components(ticket_controls())
        .allowed_mentions(
            serenity::CreateAllowedMentions::new()
                .roles(vec![staff_role_id])
                .users(vec![opener.id]),
        )
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::RoleId;

    use super::{
        CLOSE_TICKET_ID, CREATE_TICKET_ID, REOPEN_TICKET_ID, TICKET_OPEN_FAILED_MESSAGE,
        TICKETS_NOT_CONFIGURED_MESSAGE, TicketButton, staff_role_for_ticket, ticket_thread_name,
    };

    #[test]
    fn lookup_failures_are_not_reported_as_unconfigured() {
        assert_eq!(
            staff_role_for_ticket::<&str>(Ok(Some(42))),
            Ok(RoleId::new(42))
        );
        assert_eq!(
            staff_role_for_ticket::<&str>(Ok(None)),
            Err(TICKETS_NOT_CONFIGURED_MESSAGE)
        );
        assert_eq!(
            staff_role_for_ticket::<&str>(Ok(Some(0))),
            Err(TICKETS_NOT_CONFIGURED_MESSAGE)
        );
        assert_eq!(
            staff_role_for_ticket(Err("pool timed out")),
            Err(TICKET_OPEN_FAILED_MESSAGE)
        );
    }

    #[test]
    fn maps_custom_ids() {
        assert_eq!(
            TicketButton::from_custom_id(CREATE_TICKET_ID),
            Some(TicketButton::Create)
        );
        assert_eq!(
            TicketButton::from_custom_id(CLOSE_TICKET_ID),
            Some(TicketButton::Close)
        );
        assert_eq!(
            TicketButton::from_custom_id(REOPEN_TICKET_ID),
            Some(TicketButton::Reopen)
        );
        assert_eq!(TicketButton::from_custom_id("pagination:next"), None);
    }

    #[test]
    fn thread_names_fit_discord_limit() {
        assert_eq!(ticket_thread_name("pizza"), "pizza-ticket");
        assert_eq!(ticket_thread_name(&"a".repeat(120)).chars().count(), 100);
    }
}
