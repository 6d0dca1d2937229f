use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{request_failed_message, usage_message};
use crate::moderation::guard::moderator_guild;
use pizzahat_core::{Context, Error};
use pizzahat_utils::formatting::escape_mentions;

pub const MODNICK_META: CommandMeta = CommandMeta {
    name: "modnick",
    desc: "Replace a member's nickname with a random moderated one.",
    category: "moderation",
    usage: "p!modnick <member>",
};

pub const DECANCER_META: CommandMeta = CommandMeta {
    name: "decancer",
    desc: "Fold fancy unicode and strip leading symbols from a member's name.",
    category: "moderation",
    usage: "p!decancer <member>",
};

const MODERATED_NICKNAME: &str = "Moderated Nickname";
/// Characters that hoist a name to the top of the member list.
const HOISTING_CHARS: &str = "!@#$%^&*()_+-=.,/?;:[]{}`~\"'\\|<>";
const AFK_PREFIX: &str = "[AFK] ";
const MAX_NICK_CHARS: usize = 32;

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    aliases("mn"),
    user_cooldown = 5
)]
pub async fn modnick(
    ctx: Context<'_>,
    #[description = "The member to rename"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_NICKNAMES).await?
    else {
        return Ok(());
    };

    let Some(member) = member else {
        ctx.say(usage_message(MODNICK_META.usage)).await?;
        return Ok(());
    };

    let nick = moderated_nickname(ctx.id());
    let reason = format!("Moderated nickname (req. by: {})", ctx.author().tag());
    let edit = serenity::EditMember::new()
        .nickname(nick.as_str())
        .audit_log_reason(&reason);
    if let Err(source) = guild_id.edit_member(ctx.http(), member.user.id, edit).await {
        error!(?source, "modnick request failed");
        ctx.say(request_failed_message("rename")).await?;
        return Ok(());
    }

    ctx.say(format!("Nickname changed to `{nick}`")).await?;
    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    category = "Moderation",
    user_cooldown = 5
)]
pub async fn decancer(
    ctx: Context<'_>,
    #[description = "The member to clean up"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let Some(guild_id) = moderator_guild(ctx, serenity::Permissions::MANAGE_NICKNAMES).await?
    else {
        return Ok(());
    };

    let Some(member) = member else {
        ctx.say(usage_message(DECANCER_META.usage)).await?;
        return Ok(());
    };

    let Some(nick) = decancered_nickname(member.display_name()) else {
        ctx.say("No special characters found.").await?;
        return Ok(());
    };

    let reason = format!("Decancered member (req. by: {})", ctx.author().tag());
    let edit = serenity::EditMember::new()
        .nickname(nick.as_str())
        .audit_log_reason(&reason);
    if let Err(source) = guild_id.edit_member(ctx.http(), member.user.id, edit).await {
        error!(?source, "decancer request failed");
        ctx.say(request_failed_message("rename")).await?;
        return Ok(());
    }

    ctx.say(format!(
        "Successfully decancered {} to `{}`",
        member.user.tag(),
        escape_mentions(&nick)
    ))
    .await?;

    Ok(())
}

/// `Moderated Nickname` plus five hex digits taken from `seed`.
fn moderated_nickname(seed: u64) -> String {
    format!("{MODERATED_NICKNAME} {:05x}", seed & 0xF_FFFF)
}

/// The cleaned-up nickname for `display_name`, or `None` when it is already
/// plain. AFK names are left alone.
fn decancered_nickname(display_name: &str) -> Option<String> {
    if display_name.starts_with(AFK_PREFIX) {
        return None;
    }

    let cured = match decancer::cure(display_name, decancer::Options::default()) {
        Ok(cured) => cured.to_string(),
        Err(_) => return Some(MODERATED_NICKNAME.to_owned()),
    };
    let cleaned = cured
        .trim_start_matches(|c: char| c.is_whitespace() || HOISTING_CHARS.contains(c))
        .trim_end();

    if cleaned == display_name.to_lowercase() {
        return None;
    }

    if cleaned.is_empty() {
        return Some(MODERATED_NICKNAME.to_owned());
    }

    Some(cleaned.chars().take(MAX_NICK_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::{decancered_nickname, moderated_nickname};

    #[test]
    fn moderated_nicknames_fit_in_24_chars() {
        let nick = moderated_nickname(175_928_847_299_117_063);
        assert!(nick.starts_with("Moderated Nickname "));
        assert_eq!(nick.chars().count(), 24);
        assert_eq!(moderated_nickname(0), "Moderated Nickname 00000");
    }

    #[test]
    fn strips_hoisting_symbols() {
        assert_eq!(decancered_nickname("!!!cool"), Some("cool".to_owned()));
        assert_eq!(
            decancered_nickname("!!!"),
            Some("Moderated Nickname".to_owned())
        );
    }

    #[test]
    fn folds_fancy_unicode() {
        assert_eq!(decancered_nickname("𝔽𝕌ℕℕ𝕐"), Some("funny".to_owned()));
    }

    #[test]
    fn plain_and_afk_names_are_kept() {
        assert_eq!(decancered_nickname("pizza"), None);
        assert_eq!(decancered_nickname("Pizza"), None);
        assert_eq!(decancered_nickname("[AFK] !away"), None);
    }
}
