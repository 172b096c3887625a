//! Post extraction from Telegram channel preview pages (`t.me/s/<channel>`).
//!
//! [`PostExtractor`] turns one rendered message element into a [`Post`]. The
//! work is split across independent extractors that all read the same,
//! never-modified element:
//!
//! - [`metadata`]: id, canonical link, timestamp and views
//! - [`content`]: plain text and rewritten body HTML
//! - [`media`]: photos, videos, stickers and emoji
//! - [`link_preview`]: the external link card
//! - [`reply`]: the quoted message
//!
//! Extraction never fails. Anything missing degrades to a default, an absent
//! field, or a dropped media item.

pub mod content;
pub mod css;
mod dom;
pub mod link_preview;
pub mod media;
pub mod metadata;
pub mod models;
pub mod reply;

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::Config;

pub use models::{LinkPreview, MediaItem, Post, Reply};

static MESSAGE: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| dom::selector(".tgme_widget_message[data-post]"));

/// Extracts [`Post`] records using a fixed proxy configuration.
#[derive(Debug, Clone, Default)]
pub struct PostExtractor {
    config: Config,
}

impl PostExtractor {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract one post, rendering relative time against the current clock.
    #[must_use]
    pub fn extract(&self, post: ElementRef<'_>, channel: &str) -> Post {
        self.extract_at(post, channel, Utc::now())
    }

    /// Extract one post with relative time computed against `now`.
    #[must_use]
    pub fn extract_at(&self, post: ElementRef<'_>, channel: &str, now: DateTime<Utc>) -> Post {
        let meta = metadata::extract_metadata(post, channel, now);
        let body = content::extract_content(post, &meta.link, &self.config.sticker_proxy);
        let media = media::extract_media(post, &self.config);
        let link_preview = link_preview::extract_link_preview(post);
        let reply = reply::extract_reply(post);

        debug!(
            channel,
            id = %meta.id,
            media = media.len(),
            has_preview = link_preview.is_some(),
            has_reply = reply.is_some(),
            "Extracted post"
        );

        Post {
            id: meta.id,
            link: meta.link,
            datetime: meta.datetime,
            formatted_date: meta.formatted_date,
            text: body.text,
            html_content: body.html_content,
            views: meta.views,
            media,
            link_preview,
            reply,
        }
    }

    /// Extract every message of a saved preview page in document order.
    #[must_use]
    pub fn extract_page(&self, html: &str, channel: &str) -> Vec<Post> {
        self.extract_page_at(html, channel, Utc::now())
    }

    #[must_use]
    pub fn extract_page_at(&self, html: &str, channel: &str, now: DateTime<Utc>) -> Vec<Post> {
        let document = Html::parse_document(html);
        let posts: Vec<Post> = document
            .select(&MESSAGE)
            .map(|message| self.extract_at(message, channel, now))
            .collect();
        debug!(channel, count = posts.len(), "Extracted page");
        posts
    }
}
