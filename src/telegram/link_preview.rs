//! Link preview card extraction.

use scraper::{ElementRef, Selector};
use tracing::debug;
use url::Url;

use super::css::extract_css_url;
use super::dom::{find_attr, find_first, find_text, selector};
use super::models::LinkPreview;

static PREVIEW: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".tgme_widget_message_link_preview"));
static TITLE: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".link_preview_title"));
static SITE_NAME: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".link_preview_site_name"));
static DESCRIPTION: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".link_preview_description"));
static IMAGE: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".link_preview_image, .link_preview_right_image"));

/// Extract the link preview card of a post.
///
/// Returns `None` when there is no card, the card has no `href`, or the
/// `href` is not a parseable URL.
pub fn extract_link_preview(post: ElementRef<'_>) -> Option<LinkPreview> {
    let card = find_first(post, &PREVIEW)?;
    let url = card.value().attr("href")?;

    let hostname = match Url::parse(url) {
        Ok(parsed) => parsed.host_str().unwrap_or_default().to_string(),
        Err(e) => {
            debug!(url, error = %e, "Discarding link preview with invalid URL");
            return None;
        }
    };

    let title = find_text(card, &TITLE)
        .or_else(|| find_text(card, &SITE_NAME))
        .unwrap_or_default();
    let description = find_text(card, &DESCRIPTION).unwrap_or_default();
    let image = find_attr(card, &IMAGE, "style")
        .and_then(extract_css_url)
        .map(str::to_string);

    Some(LinkPreview {
        url: url.to_string(),
        title,
        description,
        image,
        hostname,
    })
}
