use serde::{Deserialize, Serialize};

/// A classified media source, ready for the view layer to turn into markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Media {
    /// `data:image/...` URI embedded directly in the definition.
    InlineImage { src: String },
    /// YouTube player for an 11-character video id.
    YouTube { video_id: String },
    /// Vimeo player for a numeric video id.
    Vimeo { video_id: String },
    /// `.m3u8` playlist; needs an HLS-capable client player.
    HlsStream { src: String },
    /// `.mp4`, `.webm` or `.ogg` file played by a native video element.
    Video { src: String },
    /// Anything else is treated as an image URL.
    Image { src: String },
}

impl Media {
    /// Short label used in logs and markup classes.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Media::InlineImage { .. } => "inline_image",
            Media::YouTube { .. } => "youtube",
            Media::Vimeo { .. } => "vimeo",
            Media::HlsStream { .. } => "hls_stream",
            Media::Video { .. } => "video",
            Media::Image { .. } => "image",
        }
    }

    /// Player URL for embedded platforms. Both players start muted so
    /// browsers allow autoplay; Vimeo additionally gets do-not-track.
    pub fn embed_url(&self) -> Option<String> {
        match self {
            Media::YouTube { video_id } => Some(format!(
                "https://www.youtube.com/embed/{}?autoplay=1&mute=1",
                video_id
            )),
            Media::Vimeo { video_id } => Some(format!(
                "https://player.vimeo.com/video/{}?autoplay=1&muted=1&dnt=1",
                video_id
            )),
            _ => None,
        }
    }

    /// The original source for media that is loaded directly.
    pub fn source(&self) -> Option<&str> {
        match self {
            Media::InlineImage { src }
            | Media::HlsStream { src }
            | Media::Video { src }
            | Media::Image { src } => Some(src),
            Media::YouTube { .. } | Media::Vimeo { .. } => None,
        }
    }

    pub fn is_embed(&self) -> bool {
        matches!(self, Media::YouTube { .. } | Media::Vimeo { .. })
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Media::HlsStream { .. } | Media::Video { .. })
    }
}
