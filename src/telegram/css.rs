//! Narrow string parsers for the attribute values the widget markup encodes
//! media in: CSS `url(...)` values and Telegram `/file/` and `/img/` paths.

use std::borrow::Cow;

use regex::{Captures, Regex};

use crate::constants::DEFAULT_STICKER_HOST;

static CSS_URL: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^)'"\s]+))\s*\)"#).unwrap()
});

static FILE_PATH: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?i)/file/.+").unwrap());

static IMG_PATH: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?i)/img/.+").unwrap());

static SCHEME: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").unwrap());

// Groups 1 and 3 keep the characters around the host so `web.telegram.org`
// and `telegram.org.example.com` are not mistaken for the default host.
static STICKER_HOST: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r#"(?i)(^|[^\w.\-])(//|https?://)?telegram\.org($|[/'"?#:)\s])"#).unwrap()
});

/// Extract the first `url(...)` value from a CSS declaration list.
///
/// Accepts double-quoted, single-quoted and unquoted forms. Returns `None`
/// for styles without a url or with an empty one.
#[must_use]
pub fn extract_css_url(style: &str) -> Option<&str> {
    let caps = CSS_URL.captures(style)?;
    let value = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str()
        .trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// The `/file/...` tail of a URL, if it has one.
#[must_use]
pub fn extract_file_path(raw: &str) -> Option<&str> {
    FILE_PATH.find(raw).map(|m| m.as_str())
}

/// The `/img/...` tail of a URL, if it has one.
#[must_use]
pub fn extract_img_path(raw: &str) -> Option<&str> {
    IMG_PATH.find(raw).map(|m| m.as_str())
}

/// Whether the value starts with a URI scheme (`https:`, `data:`, ...).
#[must_use]
pub fn has_scheme(raw: &str) -> bool {
    SCHEME.is_match(raw)
}

/// Turn a configured host into an absolute `https` prefix.
///
/// `stickers.example.com` and `//stickers.example.com` both become
/// `https://stickers.example.com`; hosts that already carry a scheme are
/// returned unchanged.
#[must_use]
pub fn absolute_host(host: &str) -> Cow<'_, str> {
    if has_scheme(host) {
        Cow::Borrowed(host)
    } else if let Some(rest) = host.strip_prefix("//") {
        Cow::Owned(format!("https://{rest}"))
    } else {
        Cow::Owned(format!("https://{host}"))
    }
}

/// Rewrite a URL onto the static proxy when it carries a `/file/` path.
#[must_use]
pub fn proxy_file_url(raw: &str, static_proxy: &str) -> Option<String> {
    extract_file_path(raw).map(|path| format!("{static_proxy}{path}"))
}

/// Point inline emoji styles at the configured sticker host.
///
/// Handles protocol-relative (`//telegram.org`), absolute
/// (`https://telegram.org`) and bare (`telegram.org`) references. A proxy
/// that carries its own scheme, or is protocol-relative, replaces the whole
/// reference. A bare proxy keeps protocol-relative references
/// protocol-relative and makes everything else `https://`. Styles that do not
/// mention the default host are returned untouched.
#[must_use]
pub fn rewrite_sticker_host<'a>(style: &'a str, proxy: &str) -> Cow<'a, str> {
    let proxy = if proxy.is_empty() {
        DEFAULT_STICKER_HOST
    } else {
        proxy
    };
    let proxy_is_qualified = proxy.starts_with("//") || has_scheme(proxy);

    STICKER_HOST.replace_all(style, |caps: &Captures<'_>| {
        let lead = caps.get(1).map_or("", |m| m.as_str());
        let prefix = caps.get(2).map_or("", |m| m.as_str());
        let tail = caps.get(3).map_or("", |m| m.as_str());
        if proxy_is_qualified {
            format!("{lead}{proxy}{tail}")
        } else if prefix.starts_with("//") {
            format!("{lead}//{proxy}{tail}")
        } else {
            format!("{lead}https://{proxy}{tail}")
        }
    })
}
