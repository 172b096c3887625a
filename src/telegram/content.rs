//! Message body normalization.
//!
//! The body subtree is never edited in place. [`render_body`] walks the
//! original nodes and writes a new HTML string, applying the rewrites as it
//! goes, so the other extractors keep reading an untouched tree.

use maud::{html, Markup};
use scraper::node::Node;
use scraper::{ElementRef, Selector};

use super::css::rewrite_sticker_host;
use super::dom::{find_all, has_class, is_within_class, selector, text_of, REPLY_CLASS};
use crate::constants::MEDIA_TOO_LARGE_LABEL;

static MESSAGE_TEXT: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".tgme_widget_message_text"));
static UNSUPPORTED_MEDIA: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".message_media_not_supported_wrap"));

const STRIPPED_CLASSES: &[&str] = &[
    "tgme_widget_message_photo_wrap",
    "tgme_widget_message_video_wrap",
];
const HASHTAG_CLASS: &str = "hashtag";
const LINK_CLASS: &str = "link link-primary";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Body text and markup of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub text: String,
    pub html_content: String,
}

pub fn extract_content(post: ElementRef<'_>, post_link: &str, sticker_proxy: &str) -> PostContent {
    let body = message_body(post);

    let text = body.map(text_of).unwrap_or_default();
    let mut html_content = body
        .map(|body| render_body(body, sticker_proxy))
        .unwrap_or_default();

    if has_unsupported_media(post) {
        html_content.push_str(&unsupported_media_notice(post_link).into_string());
    }

    PostContent { text, html_content }
}

/// The post's own text block. Quoted messages reuse the same class, so
/// anything inside the reply block is skipped.
fn message_body(post: ElementRef<'_>) -> Option<ElementRef<'_>> {
    find_all(post, &MESSAGE_TEXT).find(|element| !is_within_class(*element, post, REPLY_CLASS))
}

pub fn has_unsupported_media(post: ElementRef<'_>) -> bool {
    find_all(post, &UNSUPPORTED_MEDIA).next().is_some()
}

/// Serialize the children of `body` with links classified, media
/// placeholders dropped and emoji hosts rewritten.
#[must_use]
pub fn render_body(body: ElementRef<'_>, sticker_proxy: &str) -> String {
    let mut out = String::new();
    write_children(&mut out, body, sticker_proxy);
    out
}

fn write_children(out: &mut String, element: ElementRef<'_>, sticker_proxy: &str) {
    let raw_text = RAW_TEXT_ELEMENTS.contains(&element.value().name());

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&escape(text));
                }
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(out, child, sticker_proxy);
                }
            }
            _ => {}
        }
    }
}

fn write_element(out: &mut String, element: ElementRef<'_>, sticker_proxy: &str) {
    if STRIPPED_CLASSES.iter().any(|class| has_class(element, class)) {
        return;
    }

    let value = element.value();
    let name = value.name();
    let extra_class = (name == "a").then(|| link_class(element));
    let is_emoji = has_class(element, "emoji");

    out.push('<');
    out.push_str(name);

    let mut wrote_class = false;
    for (attr, attr_value) in value.attrs() {
        let rendered = match (attr, extra_class) {
            ("class", Some(extra)) => {
                wrote_class = true;
                if attr_value.trim().is_empty() {
                    extra.to_string()
                } else {
                    format!("{attr_value} {extra}")
                }
            }
            ("style", _) if is_emoji => rewrite_sticker_host(attr_value, sticker_proxy).into_owned(),
            _ => attr_value.to_string(),
        };
        write_attr(out, attr, &rendered);
    }
    if let (Some(extra), false) = (extra_class, wrote_class) {
        write_attr(out, "class", extra);
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    write_children(out, element, sticker_proxy);

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

/// Hashtag links keep their own styling; every other link gets the generic
/// link classes.
fn link_class(link: ElementRef<'_>) -> &'static str {
    if text_of(link).starts_with('#') {
        HASHTAG_CLASS
    } else {
        LINK_CLASS
    }
}

fn escape(value: &str) -> String {
    html! { (value) }.into_string()
}

/// Notice shown in place of media Telegram refused to embed.
#[must_use]
pub fn unsupported_media_notice(post_link: &str) -> Markup {
    html! {
        div class="unsupported-media-notice not-prose my-2 p-3 bg-base-300/30 border border-base-content/10 rounded-lg flex items-center justify-between gap-2 text-sm" {
            div class="flex items-center gap-2" {
                i class="ri-error-warning-line text-warning" {}
                span { (MEDIA_TOO_LARGE_LABEL) "，无法预览。" }
            }
            a href=(post_link) target="_blank" rel="noopener noreferrer" class="btn btn-xs btn-ghost" {
                "在 Telegram 中查看"
                i class="ri-external-link-line" {}
            }
        }
    }
}
