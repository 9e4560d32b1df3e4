use serde::Deserialize;

/// Root widget configuration. Loaded from environment variables with the
/// prefix `QUIZ_WIDGET__` and an optional `quiz-widget.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_animation")]
    pub default_animation: String,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub style: StyleConfig,
}

/// Texts shown inside the container when something goes wrong.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_invalid_quiz_message")]
    pub invalid_quiz: String,
    /// `{step_id}` is replaced with the missing id.
    #[serde(default = "default_step_not_found_message")]
    pub step_not_found: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_image_alt")]
    pub image_alt: String,
    #[serde(default = "default_video_id_prefix")]
    pub video_id_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_style_id_prefix")]
    pub id_prefix: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

// Default functions
fn default_animation() -> String {
    "fade-in".to_string()
}
fn default_invalid_quiz_message() -> String {
    "Error: the quiz JSON is invalid.".to_string()
}
fn default_step_not_found_message() -> String {
    "Error: step \"{step_id}\" was not found.".to_string()
}
fn default_image_alt() -> String {
    "Quiz image".to_string()
}
fn default_video_id_prefix() -> String {
    "video-".to_string()
}
fn default_style_id_prefix() -> String {
    "style-".to_string()
}
fn default_font_family() -> String {
    "Arial, sans-serif".to_string()
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            invalid_quiz: default_invalid_quiz_message(),
            step_not_found: default_step_not_found_message(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            image_alt: default_image_alt(),
            video_id_prefix: default_video_id_prefix(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_style_id_prefix(),
            font_family: default_font_family(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            default_animation: default_animation(),
            messages: MessagesConfig::default(),
            media: MediaConfig::default(),
            style: StyleConfig::default(),
        }
    }
}

impl MessagesConfig {
    pub fn step_not_found_for(&self, step_id: &str) -> String {
        self.step_not_found.replace("{step_id}", step_id)
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables and optional config file.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("quiz-widget").required(false))
            .add_source(
                config::Environment::with_prefix("QUIZ_WIDGET")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.default_animation, "fade-in");
        assert_eq!(config.media.video_id_prefix, "video-");
        assert_eq!(config.style.id_prefix, "style-");
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: WidgetConfig = serde_json::from_value(serde_json::json!({
            "messages": { "invalid_quiz": "Bad quiz" }
        }))
        .expect("config deserializes");
        assert_eq!(config.messages.invalid_quiz, "Bad quiz");
        assert_eq!(
            config.messages.step_not_found_for("intro"),
            "Error: step \"intro\" was not found."
        );
        assert_eq!(config.default_animation, "fade-in");
    }
}
