//! Output records produced by [`super::PostExtractor`].

use serde::{Deserialize, Serialize};

/// One extracted channel post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Channel-relative message id, `"0"` when the source had none.
    pub id: String,
    /// Canonical `https://t.me/<channel>/<id>` link.
    pub link: String,
    /// Raw `datetime` attribute from the source, empty when absent.
    pub datetime: String,
    /// Human-readable relative time, or a fallback label.
    pub formatted_date: String,
    /// Plain text of the message body.
    pub text: String,
    /// Rewritten body HTML followed by any unsupported-media notice.
    pub html_content: String,
    /// View counter text as shown on the page (`"1.2K"`), `"0"` by default.
    pub views: String,
    pub media: Vec<MediaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_preview: Option<LinkPreview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<Reply>,
}

/// A media reference with an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaItem {
    Image {
        url: String,
    },
    Video {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thumbnail: Option<String>,
    },
    /// Stickers and custom emoji.
    Emoji {
        url: String,
    },
}

impl MediaItem {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Image { url } | Self::Video { url, .. } | Self::Emoji { url } => url,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Emoji { .. } => "emoji",
        }
    }
}

/// Summary card Telegram renders for an external link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreview {
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub hostname: String,
}

/// The message a post replies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Local reference, `/post/<id>`.
    pub url: String,
    pub author: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_item_json_shape() {
        let video = MediaItem::Video {
            url: "https://static.test/file/v.mp4".to_string(),
            thumbnail: None,
        };
        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(json["url"], "https://static.test/file/v.mp4");
        assert!(json.get("thumbnail").is_none());

        let emoji = MediaItem::Emoji {
            url: "https://telegram.org/img/emoji/40/F09F9889.png".to_string(),
        };
        assert_eq!(serde_json::to_value(&emoji).unwrap()["type"], "emoji");
        assert_eq!(emoji.kind(), "emoji");
        assert_eq!(emoji.url(), "https://telegram.org/img/emoji/40/F09F9889.png");
    }

    #[test]
    fn test_post_json_uses_camel_case_and_omits_absent_blocks() {
        let post = Post {
            id: "42".to_string(),
            link: "https://t.me/durov/42".to_string(),
            datetime: String::new(),
            formatted_date: "未知时间".to_string(),
            text: "hi".to_string(),
            html_content: "hi".to_string(),
            views: "0".to_string(),
            media: Vec::new(),
            link_preview: None,
            reply: None,
        };

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["formattedDate"], "未知时间");
        assert_eq!(json["htmlContent"], "hi");
        assert!(json.get("linkPreview").is_none());
        assert!(json.get("reply").is_none());

        let back: Post = serde_json::from_value(json).unwrap();
        assert_eq!(back, post);
    }
}
