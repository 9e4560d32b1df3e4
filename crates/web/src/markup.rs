use quiz_core::config::MediaConfig;
use quiz_core::{Action, ActionIntent, RenderRequest};
use quiz_media::Media;

const YOUTUBE_ALLOW: &str = "accelerometer; autoplay; encrypted-media; gyroscope; picture-in-picture";
const VIMEO_ALLOW: &str = "autoplay; fullscreen; picture-in-picture";

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JS string literal safe to embed inside a `<script>` element.
fn js_string(input: &str) -> String {
    serde_json::to_string(input)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// Full card markup for one step.
pub fn render_step_html(request: &RenderRequest, media_config: &MediaConfig) -> String {
    let media_html = request
        .media
        .as_ref()
        .map(|m| render_media_html(m, &request.step_id, media_config))
        .unwrap_or_default();

    let bullets_html = if request.bullets.is_empty() {
        String::new()
    } else {
        let items: String = request
            .bullets
            .iter()
            .map(|b| format!("<li>{}</li>", escape_html(b)))
            .collect();
        format!("<ul class=\"quiz-bullets\">{}</ul>", items)
    };

    let actions_html: String = request
        .actions
        .iter()
        .enumerate()
        .map(|(i, a)| render_action_html(i, a))
        .collect();

    format!(
        "<div class=\"quiz-step-card {}\" data-step=\"{}\">{}<h2 class=\"quiz-title\">{}</h2>{}<div class=\"quiz-answers-grid\">{}</div></div>",
        escape_html(&request.animation),
        escape_html(&request.step_id),
        media_html,
        escape_html(&request.title),
        bullets_html,
        actions_html
    )
}

fn render_action_html(index: usize, action: &Action) -> String {
    match &action.intent {
        ActionIntent::Navigate { target } => format!(
            "<button type=\"button\" class=\"quiz-answer-button\" data-action=\"{}\" data-target=\"{}\">{}</button>",
            index,
            escape_html(target),
            escape_html(&action.label)
        ),
        ActionIntent::ExternalLink { url } => format!(
            "<a href=\"{}\" class=\"quiz-checkout-button\" data-action=\"{}\">{}</a>",
            escape_html(url),
            index,
            escape_html(&action.label)
        ),
    }
}

/// Markup for a resolved media source. Video elements get a stable id
/// derived from the step so the HLS loader can find them.
pub fn render_media_html(media: &Media, step_id: &str, config: &MediaConfig) -> String {
    let video_id = format!("{}{}", config.video_id_prefix, step_id);
    match media {
        Media::InlineImage { src } | Media::Image { src } => format!(
            "<img src=\"{}\" class=\"quiz-media-image\" alt=\"{}\">",
            escape_html(src),
            escape_html(&config.image_alt)
        ),
        Media::YouTube { .. } => embed_html(media, YOUTUBE_ALLOW),
        Media::Vimeo { .. } => embed_html(media, VIMEO_ALLOW),
        Media::HlsStream { src } => format!(
            "<video id=\"{}\" class=\"quiz-media-video\" controls autoplay muted playsinline></video><script>{}</script>",
            escape_html(&video_id),
            hls_loader(&video_id, src)
        ),
        Media::Video { src } => format!(
            "<video id=\"{}\" src=\"{}\" class=\"quiz-media-video\" controls autoplay muted playsinline></video>",
            escape_html(&video_id),
            escape_html(src)
        ),
    }
}

fn embed_html(media: &Media, allow: &str) -> String {
    format!(
        "<div class=\"quiz-media-aspect-ratio\"><iframe src=\"{}\" frameborder=\"0\" allow=\"{}\" allowfullscreen></iframe></div>",
        escape_html(&media.embed_url().unwrap_or_default()),
        allow
    )
}

// Prefers hls.js when present, falls back to native HLS; otherwise the
// element stays empty.
fn hls_loader(video_id: &str, src: &str) -> String {
    format!(
        "(function(){{var v=document.getElementById({id}),s={src};if(!v)return;if(typeof Hls!=='undefined'&&Hls.isSupported()){{var h=new Hls();h.loadSource(s);h.attachMedia(v)}}else if(v.canPlayType('application/vnd.apple.mpegurl')){{v.src=s}}}})();",
        id = js_string(video_id),
        src = js_string(src)
    )
}

pub fn render_error_html(message: &str) -> String {
    format!(
        "<p class=\"quiz-error\" style=\"color:red; text-align:center;\">{}</p>",
        escape_html(message)
    )
}
