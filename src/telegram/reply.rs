//! Reply (quoted message) extraction.

use scraper::{ElementRef, Selector};
use tracing::trace;

use super::dom::{exists, find_first, find_text, selector, text_of};
use super::models::Reply;
use crate::constants::{
    REPLY_ELLIPSIS_LABEL, REPLY_PHOTO_LABEL, REPLY_STICKER_LABEL, REPLY_VIDEO_LABEL,
    UNKNOWN_USER_LABEL,
};

static REPLY: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".tgme_widget_message_reply"));
static AUTHOR: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".tgme_widget_message_author_name"));

// Checked in order when the quoted message has no text of its own.
static MEDIA_MARKERS: std::sync::LazyLock<[(Selector, &'static str); 3]> =
    std::sync::LazyLock::new(|| {
        [
            (selector(".tgme_widget_message_photo"), REPLY_PHOTO_LABEL),
            (selector(".tgme_widget_message_sticker"), REPLY_STICKER_LABEL),
            (selector(".tgme_widget_message_video"), REPLY_VIDEO_LABEL),
        ]
    });

pub fn extract_reply(post: ElementRef<'_>) -> Option<Reply> {
    let block = find_first(post, &REPLY)?;
    let Some(href) = block.value().attr("href") else {
        trace!("Reply block without href");
        return None;
    };

    let id = quoted_id(href);
    let author = find_text(block, &AUTHOR).unwrap_or_else(|| UNKNOWN_USER_LABEL.to_string());

    let full_text = text_of(block);
    let mut text = full_text.replacen(author.as_str(), "", 1).trim().to_string();
    if text.is_empty() {
        text = media_label(block).to_string();
    }

    Some(Reply {
        url: format!("/post/{id}"),
        author,
        text,
    })
}

/// Last path segment of the quoted message link, ignoring query and fragment.
fn quoted_id(href: &str) -> &str {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/').next().unwrap_or_default()
}

fn media_label(block: ElementRef<'_>) -> &'static str {
    MEDIA_MARKERS
        .iter()
        .find(|(marker, _)| exists(block, marker))
        .map_or(REPLY_ELLIPSIS_LABEL, |(_, label)| *label)
}
