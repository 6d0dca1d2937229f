use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x45_6D_D4;
/// Color for completed actions.
pub const SUCCESS_EMBED_COLOR: u32 = 0x2E_CC_71;
/// Color for refused or failed actions.
pub const FAILED_EMBED_COLOR: u32 = 0xE7_4C_3C;

pub fn success_embed(title: impl Into<String>, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(SUCCESS_EMBED_COLOR)
        .timestamp(serenity::Timestamp::now())
}

pub fn failed_embed(description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .description(description)
        .color(FAILED_EMBED_COLOR)
}

/// Build one page of a paginated embed. The footer is only shown when there
/// is more than one page.
pub fn build_page_embed(
    title: &str,
    description: &str,
    page: usize,
    total_pages: usize,
    thumbnail_url: Option<&str>,
) -> serenity::CreateEmbed {
    let page = page.max(1);
    let total_pages = total_pages.max(1);

    let mut embed = serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(DEFAULT_EMBED_COLOR)
        .description(description.to_owned());

    if total_pages > 1 {
        embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
            "Page {}/{}",
            page, total_pages
        )));
    }

    if let Some(url) = thumbnail_url {
        embed = embed.thumbnail(url);
    }

    embed
}
