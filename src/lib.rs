//! Telegram post extractor library.
//!
//! Turns the HTML of a public channel preview page (`https://t.me/s/<channel>`)
//! into normalized post records: text, rewritten HTML, absolute media URLs,
//! link previews and reply context.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod config;
pub mod constants;
pub mod telegram;

pub use config::Config;
pub use telegram::{LinkPreview, MediaItem, Post, PostExtractor, Reply};
