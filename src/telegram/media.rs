//! Media resolution: photos, videos, stickers and custom emoji.
//!
//! Each kind is scanned separately over the original post node and the
//! results are concatenated images first, then videos, then stickers.

use scraper::{ElementRef, Selector};
use tracing::debug;

use super::css::{absolute_host, extract_css_url, extract_img_path, has_scheme, proxy_file_url};
use super::dom::{find_all, find_attr, is_within_class, selector, REPLY_CLASS};
use super::models::MediaItem;
use crate::config::Config;

static PHOTO_WRAP: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".tgme_widget_message_photo_wrap"));
static VIDEO: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".tgme_widget_message_video_wrap video"));
static STICKER: std::sync::LazyLock<Selector> = std::sync::LazyLock::new(|| {
    selector(
        ".tgme_widget_message_sticker_wrap, .tgme_widget_message_tgsticker_wrap, \
         .tgme_widget_message_videosticker_wrap, .emoji",
    )
});
static STICKER_TAG: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector("tgs-sticker[src]"));
static NESTED_SOURCE: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector("img[src], video[src]"));
static STYLED: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector("[style]"));

const STICKER_WRAP_CLASSES: &[&str] = &[
    "tgme_widget_message_sticker_wrap",
    "tgme_widget_message_tgsticker_wrap",
    "tgme_widget_message_videosticker_wrap",
];

/// All media of a post in image, video, sticker order.
pub fn extract_media(post: ElementRef<'_>, config: &Config) -> Vec<MediaItem> {
    let mut media = extract_images(post, config);
    media.extend(extract_videos(post, config));
    media.extend(extract_stickers(post, config));
    media
}

/// Photos are rendered as `background-image` on a wrapper link. Wrappers
/// whose style has no `/file/` path are dropped.
pub fn extract_images(post: ElementRef<'_>, config: &Config) -> Vec<MediaItem> {
    find_all(post, &PHOTO_WRAP)
        .filter_map(|photo| {
            let style = photo.value().attr("style").unwrap_or_default();
            let url = extract_css_url(style)
                .and_then(|raw| proxy_file_url(raw, &config.static_proxy));
            if url.is_none() {
                debug!(style, "Dropping photo without a /file/ path");
            }
            url.map(|url| MediaItem::Image { url })
        })
        .collect()
}

/// Every `<video>` with a non-empty `src` becomes an entry; `/file/` URLs move to the
/// static proxy and anything else is kept verbatim.
pub fn extract_videos(post: ElementRef<'_>, config: &Config) -> Vec<MediaItem> {
    find_all(post, &VIDEO)
        .filter_map(|video| {
            let src = video.value().attr("src").filter(|s| !s.is_empty())?;
            let url = proxy_file_url(src, &config.static_proxy).unwrap_or_else(|| src.to_string());
            let thumbnail = video
                .value()
                .attr("poster")
                .filter(|poster| !poster.is_empty())
                .map(|poster| {
                    proxy_file_url(poster, &config.static_proxy)
                        .unwrap_or_else(|| poster.to_string())
                });
            Some(MediaItem::Video { url, thumbnail })
        })
        .collect()
}

/// Stickers and custom emoji of the post itself. Emoji inside the quoted
/// message belong to that message and are skipped.
pub fn extract_stickers(post: ElementRef<'_>, config: &Config) -> Vec<MediaItem> {
    find_all(post, &STICKER)
        .filter(|element| !is_within_class(*element, post, REPLY_CLASS))
        .filter(|element| !is_nested_in_sticker_wrap(*element, post))
        .filter_map(|element| {
            let raw = sticker_source(element)?;
            Some(MediaItem::Emoji {
                url: resolve_sticker_url(raw, config),
            })
        })
        .collect()
}

fn is_nested_in_sticker_wrap(element: ElementRef<'_>, post: ElementRef<'_>) -> bool {
    STICKER_WRAP_CLASSES
        .iter()
        .any(|class| is_within_class(element, post, class))
}

/// Raw source of a sticker or emoji: a `<tgs-sticker>` source, then a nested
/// `<img>`/`<video>`, then an inline `background-image`.
fn sticker_source(element: ElementRef<'_>) -> Option<&str> {
    let own = element.value();
    if own.name() == "tgs-sticker" {
        if let Some(src) = own.attr("src").filter(|s| !s.is_empty()) {
            return Some(src);
        }
    }
    find_attr(element, &STICKER_TAG, "src")
        .filter(|s| !s.is_empty())
        .or_else(|| find_attr(element, &NESTED_SOURCE, "src").filter(|s| !s.is_empty()))
        .or_else(|| own.attr("style").and_then(extract_css_url))
        .or_else(|| {
            find_all(element, &STYLED)
                .find_map(|styled| styled.value().attr("style").and_then(extract_css_url))
        })
}

/// Resolve a sticker source to an absolute URL.
///
/// Precedence: URLs with a scheme are kept, protocol-relative URLs get
/// `https:`, `/img/` paths go to the sticker proxy, `/file/` paths go to the
/// static proxy, anything else passes through.
#[must_use]
pub fn resolve_sticker_url(raw: &str, config: &Config) -> String {
    if has_scheme(raw) {
        return raw.to_string();
    }
    if raw.starts_with("//") {
        return format!("https:{raw}");
    }
    if let Some(path) = extract_img_path(raw) {
        return format!("{}{path}", absolute_host(&config.sticker_proxy));
    }
    if let Some(url) = proxy_file_url(raw, &config.static_proxy) {
        return url;
    }
    raw.to_string()
}
