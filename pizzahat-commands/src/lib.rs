pub mod moderation;
pub mod tickets;
pub mod utility;

use pizzahat_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::usage::META,
    moderation::warn::META,
    moderation::warnings::META,
    moderation::deletewarn::META,
    moderation::clearwarns::META,
    moderation::kick::META,
    moderation::ban::META,
    moderation::massban::META,
    moderation::softban::META,
    moderation::unban::META,
    moderation::timeout::META,
    moderation::unmute::META,
    moderation::purge::META,
    moderation::cleanup::META,
    moderation::slowmode::META,
    moderation::lock::LOCK_META,
    moderation::lock::UNLOCK_META,
    moderation::visibility::HIDE_META,
    moderation::visibility::EXPOSE_META,
    moderation::role::META,
    moderation::channel::META,
    moderation::setnick::META,
    moderation::modnick::MODNICK_META,
    moderation::modnick::DECANCER_META,
    tickets::staffrole::META,
    tickets::ticket::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        utility::usage::usage(),
        moderation::warn::warn(),
        moderation::warnings::warnings(),
        moderation::deletewarn::deletewarn(),
        moderation::clearwarns::clearwarns(),
        moderation::kick::kick(),
        moderation::ban::ban(),
        moderation::massban::massban(),
        moderation::softban::softban(),
        moderation::unban::unban(),
        moderation::timeout::timeout(),
        moderation::unmute::unmute(),
        moderation::purge::purge(),
        moderation::cleanup::cleanup(),
        moderation::slowmode::slowmode(),
        moderation::lock::lock(),
        moderation::lock::unlock(),
        moderation::visibility::hide(),
        moderation::visibility::expose(),
        moderation::role::role(),
        moderation::channel::channel(),
        moderation::setnick::setnick(),
        moderation::modnick::modnick(),
        moderation::modnick::decancer(),
        tickets::staffrole::staffrole(),
        tickets::ticket::ticket(),
    ]
}

#[cfg(test)]
mod tests {
    use super::{COMMANDS, commands};

    #[test]
    fn command_names_are_unique() {
        let mut names: Vec<&str> = COMMANDS.iter().map(|command| command.name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn usage_lines_use_the_prefix() {
        for command in COMMANDS {
            assert!(
                command.usage.starts_with(&format!("{}{}", pizzahat_utils::COMMAND_PREFIX, command.name)),
                "{} has usage {}",
                command.name,
                command.usage
            );
        }
    }

    #[test]
    fn every_registered_command_has_metadata() {
        let registered = commands();
        assert_eq!(registered.len(), COMMANDS.len());
        for command in &registered {
            assert!(
                COMMANDS.iter().any(|meta| meta.name == command.name),
                "{} has no metadata",
                command.name
            );
        }
    }

    #[test]
    fn moderation_aliases_are_registered() {
        let registered = commands();
        let aliases = |name: &str| {
            registered
                .iter()
                .find(|command| command.name == name)
                .map(|command| command.aliases.clone())
                .unwrap_or_default()
        };

        assert!(aliases("lock").iter().any(|alias| alias == "lockdown"));
        assert!(aliases("massban").iter().any(|alias| alias == "mb"));
        assert!(aliases("modnick").iter().any(|alias| alias == "mn"));
    }
}
