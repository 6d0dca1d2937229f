use std::time::Duration;

use poise::serenity_prelude as serenity;

use crate::embed::build_page_embed;

pub const PAGINATION_TIMEOUT_SECS: u64 = 60 * 3;

/// Number of pages needed for `total_items`, never less than one.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    total_items.div_ceil(per_page).max(1)
}

/// Half-open item range shown on the 1-based `page`.
pub fn page_window(total_items: usize, per_page: usize, page: usize) -> (usize, usize) {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = (start + per_page).min(total_items);
    (start, end)
}

/// Split already formatted lines into page descriptions.
pub fn chunk_lines(lines: &[String], per_page: usize, separator: &str) -> Vec<String> {
    let pages = total_pages(lines.len(), per_page);
    (1..=pages)
        .map(|page| {
            let (start, end) = page_window(lines.len(), per_page, page);
            lines[start..end].join(separator)
        })
        .collect()
}

struct PageIds {
    prev: String,
    next: String,
    close: String,
}

impl PageIds {
    fn new(ctx_id: u64) -> Self {
        Self {
            prev: format!("{ctx_id}_prev"),
            next: format!("{ctx_id}_next"),
            close: format!("{ctx_id}_close"),
        }
    }

    fn buttons(&self, current_page: usize, total_pages: usize) -> Vec<serenity::CreateActionRow> {
        vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&self.prev)
                .label("Prev")
                .disabled(current_page == 0)
                .style(serenity::ButtonStyle::Secondary),
            serenity::CreateButton::new(&self.next)
                .label("Next")
                .disabled(current_page + 1 >= total_pages)
                .style(serenity::ButtonStyle::Secondary),
            serenity::CreateButton::new(&self.close)
                .label("Close")
                .style(serenity::ButtonStyle::Danger),
        ])]
    }
}

pub async fn paginate_embed_pages<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    paginate_embed_pages_with_thumbnail(ctx, title, pages, start_page, None).await
}

/// Send `pages` as one embed with Prev/Next/Close buttons that only the
/// invoking user can press. Buttons are removed once the collector times out.
pub async fn paginate_embed_pages_with_thumbnail<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
    thumbnail_url: Option<&str>,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    if pages.is_empty() {
        return Ok(());
    }

    let total = pages.len();
    let mut current = start_page.clamp(1, total) - 1;
    let render = |index: usize| build_page_embed(title, &pages[index], index + 1, total, thumbnail_url);

    if total == 1 {
        ctx.send(poise::CreateReply::default().embed(render(current)))
            .await?;
        return Ok(());
    }

    let ids = PageIds::new(ctx.id());
    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(render(current))
                .components(ids.buttons(current, total)),
        )
        .await?;

    let message = reply.message().await?;
    let message_id = message.id;
    let channel_id = message.channel_id;
    let author_id = ctx.author().id;

    while let Some(press) = serenity::collector::ComponentInteractionCollector::new(ctx)
        .message_id(message_id)
        .author_id(author_id)
        .timeout(Duration::from_secs(PAGINATION_TIMEOUT_SECS))
        .await
    {
        let custom_id = press.data.custom_id.as_str();

        if custom_id == ids.close {
            press
                .create_response(ctx.http(), serenity::CreateInteractionResponse::Acknowledge)
                .await?;
            channel_id.delete_message(ctx.http(), message_id).await?;
            return Ok(());
        }

        if custom_id == ids.next {
            current = (current + 1).min(total - 1);
        } else if custom_id == ids.prev {
            current = current.saturating_sub(1);
        } else {
            continue;
        }

        press
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(render(current))
                        .components(ids.buttons(current, total)),
                ),
            )
            .await?;
    }

    let _ = channel_id
        .edit_message(
            ctx.http(),
            message_id,
            serenity::EditMessage::new()
                .embed(render(current))
                .components(vec![]),
        )
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{chunk_lines, page_window, total_pages};

    #[test]
    fn always_at_least_one_page() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn windows_clamp_to_item_count() {
        assert_eq!(page_window(23, 10, 1), (0, 10));
        assert_eq!(page_window(23, 10, 3), (20, 23));
        assert_eq!(page_window(23, 10, 9), (23, 23));
        assert_eq!(page_window(23, 10, 0), (0, 10));
    }

    #[test]
    fn chunks_lines_into_pages() {
        let lines: Vec<String> = (1..=5).map(|n| n.to_string()).collect();
        assert_eq!(chunk_lines(&lines, 2, "\n"), vec!["1\n2", "3\n4", "5"]);
        assert_eq!(chunk_lines(&[], 2, "\n"), vec![String::new()]);
    }
}
