use poise::serenity_prelude as serenity;

use pizzahat_ledger::WarnError;
use pizzahat_utils::embed::{DEFAULT_EMBED_COLOR, SUCCESS_EMBED_COLOR};
use pizzahat_utils::formatting::escape_mentions;

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn permission_denied_message(permission: &str) -> String {
    format!("You need **{permission}** perms to run this command.")
}

pub fn moderation_self_action_message(action: &str) -> String {
    format!("You can't {action} yourself.")
}

pub fn request_failed_message(action: &str) -> String {
    format!("I couldn't {action} that user. Check role hierarchy and permissions.")
}

/// User-facing text for ledger validation failures; `None` for failures that
/// should surface as command errors.
pub fn warn_error_message(error: &WarnError) -> Option<&'static str> {
    if !error.is_user_facing() {
        return None;
    }

    match error {
        WarnError::SelfOrBotTarget => Some("You can't warn yourself or the bot."),
        WarnError::InsufficientHierarchy { .. } => {
            Some("You can't warn someone with a higher or equal role hierarchy.")
        }
        WarnError::NotFound { .. } => Some("No warn entry found for this user."),
        _ => None,
    }
}

pub fn moderation_action_embed(
    title: &str,
    moderator_id: serenity::UserId,
    target_id: serenity::UserId,
    reason: Option<&str>,
    duration: Option<&str>,
) -> serenity::CreateEmbed {
    let mut lines = vec![
        format!("**Moderator :** <@{}>", moderator_id.get()),
        format!("**Member :** <@{}>", target_id.get()),
        format!(
            "**Reason :** {}",
            escape_mentions(reason.unwrap_or("No reason provided"))
        ),
    ];

    if let Some(duration) = duration {
        lines.push(format!("**Duration :** {duration}"));
    }

    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .description(lines.join("\n"))
        .color(SUCCESS_EMBED_COLOR)
        .timestamp(serenity::Timestamp::now())
}

pub fn lock_embed(heading: &str, detail: String) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .field(heading, detail, false)
}

#[cfg(test)]
mod tests {
    use pizzahat_ledger::WarnError;

    use super::{permission_denied_message, usage_message, warn_error_message};

    #[test]
    fn validation_errors_have_messages() {
        assert!(warn_error_message(&WarnError::SelfOrBotTarget).is_some());
        assert!(
            warn_error_message(&WarnError::InsufficientHierarchy { actor: 1, target: 2 })
                .is_some()
        );
        assert!(warn_error_message(&WarnError::NotFound { warn_id: 1.0 }).is_some());
    }

    #[test]
    fn store_failures_are_not_swallowed() {
        assert!(warn_error_message(&WarnError::store("down")).is_none());
        assert!(warn_error_message(&WarnError::IndexOutOfRange { index: 1, len: 0 }).is_none());
    }

    #[test]
    fn formats_helper_messages() {
        assert_eq!(usage_message("p!warn <member>"), "Usage: `p!warn <member>`");
        assert_eq!(
            permission_denied_message("Manage Messages"),
            "You need **Manage Messages** perms to run this command."
        );
    }
}
