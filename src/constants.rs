//! Shared constants used across the extractor.

/// Default host prefixed onto `/file/...` media paths.
pub const DEFAULT_STATIC_PROXY: &str = "https://cdn5.telesco.pe";

/// Default host for sticker and emoji assets.
///
/// This is also the host that inline emoji styles point at in the source
/// markup, so it doubles as the rewrite target.
pub const DEFAULT_STICKER_HOST: &str = "telegram.org";

/// Base for canonical post links.
pub const CANONICAL_BASE: &str = "https://t.me";

/// Offset used when rendering timestamps (UTC+8, Asia/Shanghai).
pub const DISPLAY_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Fallback for posts without a usable timestamp.
pub const UNKNOWN_TIME_LABEL: &str = "未知时间";

/// Fallback author name for quoted messages.
pub const UNKNOWN_USER_LABEL: &str = "未知用户";

/// Reply summaries used when the quoted message has no text.
pub const REPLY_PHOTO_LABEL: &str = "[图片]";
pub const REPLY_STICKER_LABEL: &str = "[贴纸]";
pub const REPLY_VIDEO_LABEL: &str = "[视频]";
pub const REPLY_ELLIPSIS_LABEL: &str = "...";

/// Label shown when Telegram refused to embed a media file.
pub const MEDIA_TOO_LARGE_LABEL: &str = "媒体文件过大";
