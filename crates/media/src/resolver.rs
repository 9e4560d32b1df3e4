//! Ordered classification of media source strings.
//!
//! Rules run in a fixed order and the first match wins. Data URIs and
//! streaming platforms must be recognised before the suffix checks, and
//! everything unmatched falls through to a plain image. A URL that looks
//! like both a YouTube link and an `.mp4` file is therefore a YouTube embed.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::types::Media;

type Rule = fn(&str) -> Option<Media>;

struct MediaRule {
    name: &'static str,
    classify: Rule,
}

const RULES: [MediaRule; 5] = [
    MediaRule {
        name: "inline_image",
        classify: inline_image,
    },
    MediaRule {
        name: "youtube",
        classify: youtube,
    },
    MediaRule {
        name: "vimeo",
        classify: vimeo,
    },
    MediaRule {
        name: "hls_stream",
        classify: hls_stream,
    },
    MediaRule {
        name: "video",
        classify: direct_video,
    },
];

const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".webm", ".ogg"];

/// Classifies a media source. Never fails: unmatched sources are images.
pub fn resolve_media(src: &str) -> Media {
    for rule in RULES.iter() {
        if let Some(media) = (rule.classify)(src) {
            debug!(rule = rule.name, src = %src, "Resolved media source");
            return media;
        }
    }
    debug!(rule = "image", src = %src, "Resolved media source");
    Media::Image {
        src: src.to_string(),
    }
}

/// Like [`resolve_media`], but a missing or empty source means "no media".
pub fn resolve_optional(src: Option<&str>) -> Option<Media> {
    match src {
        Some(s) if !s.is_empty() => Some(resolve_media(s)),
        _ => None,
    }
}

fn youtube_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?:https?://)?(?:www\.)?(?:youtube\.com/(?:watch\?v=|embed/|v/|shorts/|live/)|youtu\.be/)([a-zA-Z0-9_-]{11})(?:\S+)?",
        )
        .expect("YouTube pattern is valid")
    })
}

fn vimeo_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:https?://)?(?:www\.|player\.)?vimeo\.com/(?:video/)?([0-9]+)(?:/?|\?|#|$)")
            .expect("Vimeo pattern is valid")
    })
}

fn inline_image(src: &str) -> Option<Media> {
    src.starts_with("data:image/").then(|| Media::InlineImage {
        src: src.to_string(),
    })
}

fn youtube(src: &str) -> Option<Media> {
    let caps = youtube_pattern().captures(src)?;
    Some(Media::YouTube {
        video_id: caps.get(1)?.as_str().to_string(),
    })
}

fn vimeo(src: &str) -> Option<Media> {
    let caps = vimeo_pattern().captures(src)?;
    Some(Media::Vimeo {
        video_id: caps.get(1)?.as_str().to_string(),
    })
}

fn hls_stream(src: &str) -> Option<Media> {
    src.ends_with(".m3u8").then(|| Media::HlsStream {
        src: src.to_string(),
    })
}

fn direct_video(src: &str) -> Option<Media> {
    VIDEO_EXTENSIONS
        .iter()
        .any(|ext| src.ends_with(ext))
        .then(|| Media::Video {
            src: src.to_string(),
        })
}
