//! Post identity and counters: id, canonical link, timestamp, views.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use scraper::{ElementRef, Selector};
use tracing::trace;

use super::dom::{find_attr, find_first, find_text, selector};
use crate::constants::{CANONICAL_BASE, DISPLAY_UTC_OFFSET_SECS, UNKNOWN_TIME_LABEL};

static DATA_POST: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector("[data-post]"));
static DATE_TIME: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".tgme_widget_message_date time"));
static VIEWS: std::sync::LazyLock<Selector> =
    std::sync::LazyLock::new(|| selector(".tgme_widget_message_views"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetadata {
    pub id: String,
    pub link: String,
    pub datetime: String,
    pub formatted_date: String,
    pub views: String,
}

pub fn extract_metadata(post: ElementRef<'_>, channel: &str, now: DateTime<Utc>) -> PostMetadata {
    let id = post_id(post, channel);
    let link = canonical_link(channel, &id);

    let datetime = find_attr(post, &DATE_TIME, "datetime")
        .unwrap_or_default()
        .to_string();
    let formatted_date = format_datetime(&datetime, now);

    let views = find_text(post, &VIEWS).unwrap_or_else(|| "0".to_string());

    PostMetadata {
        id,
        link,
        datetime,
        formatted_date,
        views,
    }
}

/// Channel-relative id from the `data-post="<channel>/<id>"` attribute.
///
/// The node may be the message itself or its outer wrapper. Returns `"0"`
/// when the attribute is missing, belongs to another channel, or has no id.
pub fn post_id(post: ElementRef<'_>, channel: &str) -> String {
    let data_post = post
        .value()
        .attr("data-post")
        .or_else(|| find_first(post, &DATA_POST).and_then(|el| el.value().attr("data-post")));

    let Some(data_post) = data_post else {
        trace!(channel, "Post has no data-post attribute");
        return "0".to_string();
    };

    match data_post.split_once('/') {
        Some((prefix, id)) if prefix.eq_ignore_ascii_case(channel) && !id.is_empty() => {
            id.to_string()
        }
        _ => {
            trace!(channel, data_post, "Unexpected data-post value");
            "0".to_string()
        }
    }
}

#[must_use]
pub fn canonical_link(channel: &str, id: &str) -> String {
    format!("{CANONICAL_BASE}/{channel}/{id}")
}

fn format_datetime(datetime: &str, now: DateTime<Utc>) -> String {
    if datetime.is_empty() {
        return UNKNOWN_TIME_LABEL.to_string();
    }
    match DateTime::parse_from_rfc3339(datetime) {
        Ok(parsed) => relative_time(parsed, now),
        Err(e) => {
            trace!(datetime, error = %e, "Unparsable post timestamp");
            UNKNOWN_TIME_LABEL.to_string()
        }
    }
}

fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Describe `then` relative to `now`, e.g. `"3 hours ago"` or `"in 2 days"`.
///
/// Both instants are viewed in the display offset (UTC+8). Buckets round to
/// the nearest unit: under 45 seconds is "a few seconds", under 90 seconds
/// "a minute", under 45 minutes "N minutes", and so on up to years.
#[must_use]
pub fn relative_time(then: DateTime<FixedOffset>, now: DateTime<Utc>) -> String {
    let offset = display_offset();
    let then = then.with_timezone(&offset);
    let now = now.with_timezone(&offset);

    let seconds = (now - then).num_seconds();
    let phrase = humanize(seconds.unsigned_abs());
    if seconds < 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn humanize(seconds: u64) -> String {
    let rounded = |unit: f64| (seconds as f64 / unit).round() as u64;

    if seconds <= 44 {
        return "a few seconds".to_string();
    }
    if seconds <= 89 {
        return "a minute".to_string();
    }
    let minutes = rounded(60.0);
    if minutes <= 44 {
        return format!("{minutes} minutes");
    }
    if minutes <= 89 {
        return "an hour".to_string();
    }
    let hours = rounded(3600.0);
    if hours <= 21 {
        return format!("{hours} hours");
    }
    if hours <= 35 {
        return "a day".to_string();
    }
    let days = rounded(86_400.0);
    if days <= 25 {
        return format!("{days} days");
    }
    if days <= 45 {
        return "a month".to_string();
    }
    let months = rounded(86_400.0 * 30.436_875);
    if months <= 10 {
        return format!("{months} months");
    }
    if months <= 17 {
        return "a year".to_string();
    }
    format!("{} years", rounded(86_400.0 * 365.2425))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use scraper::Html;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn message(document: &Html) -> ElementRef<'_> {
        document
            .select(&selector(".tgme_widget_message"))
            .next()
            .unwrap()
    }

    #[test]
    fn test_extract_full_metadata() {
        let document = Html::parse_fragment(
            r#"<div class="tgme_widget_message" data-post="durov/123">
                <span class="tgme_widget_message_views">1.2K</span>
                <a class="tgme_widget_message_date" href="https://t.me/durov/123">
                    <time datetime="2024-01-15T09:00:00+00:00" class="time">09:00</time>
                </a>
            </div>"#,
        );

        let meta = extract_metadata(message(&document), "durov", now());
        assert_eq!(meta.id, "123");
        assert_eq!(meta.link, "https://t.me/durov/123");
        assert_eq!(meta.datetime, "2024-01-15T09:00:00+00:00");
        assert_eq!(meta.formatted_date, "3 hours ago");
        assert_eq!(meta.views, "1.2K");
    }

    #[test]
    fn test_missing_everything_defaults() {
        let document = Html::parse_fragment(r#"<div class="tgme_widget_message"></div>"#);

        let meta = extract_metadata(message(&document), "durov", now());
        assert_eq!(meta.id, "0");
        assert!(meta.link.ends_with("/0"));
        assert_eq!(meta.datetime, "");
        assert_eq!(meta.formatted_date, "未知时间");
        assert_eq!(meta.views, "0");
    }

    #[test]
    fn test_post_id_from_wrapper() {
        let document = Html::parse_fragment(
            r#"<div class="tgme_widget_message_wrap"><div class="tgme_widget_message" data-post="Durov/7"></div></div>"#,
        );
        let wrap = document
            .select(&selector(".tgme_widget_message_wrap"))
            .next()
            .unwrap();
        assert_eq!(post_id(wrap, "durov"), "7");
    }

    #[test]
    fn test_post_id_malformed() {
        let document = Html::parse_fragment(
            r#"<div class="tgme_widget_message" data-post="otherchannel/5"></div>
               <div class="tgme_widget_message" data-post="durov/"></div>
               <div class="tgme_widget_message" data-post="garbage"></div>"#,
        );
        let ids: Vec<_> = document
            .select(&selector(".tgme_widget_message"))
            .map(|el| post_id(el, "durov"))
            .collect();
        assert_eq!(ids, vec!["0", "0", "0"]);
    }

    #[test]
    fn test_unparsable_datetime() {
        assert_eq!(format_datetime("yesterday", now()), "未知时间");
    }

    #[test]
    fn test_relative_time_buckets() {
        let at = |secs: i64| {
            (now() - chrono::Duration::seconds(secs)).with_timezone(&Utc.fix())
        };

        assert_eq!(relative_time(at(10), now()), "a few seconds ago");
        assert_eq!(relative_time(at(60), now()), "a minute ago");
        assert_eq!(relative_time(at(5 * 60), now()), "5 minutes ago");
        assert_eq!(relative_time(at(60 * 60), now()), "an hour ago");
        assert_eq!(relative_time(at(3 * 3600), now()), "3 hours ago");
        assert_eq!(relative_time(at(30 * 3600), now()), "a day ago");
        assert_eq!(relative_time(at(4 * 86_400), now()), "4 days ago");
        assert_eq!(relative_time(at(30 * 86_400), now()), "a month ago");
        assert_eq!(relative_time(at(90 * 86_400), now()), "3 months ago");
        assert_eq!(relative_time(at(365 * 86_400), now()), "a year ago");
        assert_eq!(relative_time(at(3 * 365 * 86_400), now()), "3 years ago");
        assert_eq!(relative_time(at(-2 * 3600), now()), "in 2 hours");
    }

    #[test]
    fn test_relative_time_independent_of_source_offset() {
        let then = DateTime::parse_from_rfc3339("2024-01-15T17:00:00+08:00").unwrap();
        assert_eq!(relative_time(then, now()), "3 hours ago");
    }
}
