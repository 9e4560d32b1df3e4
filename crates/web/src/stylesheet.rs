use tracing::warn;

use quiz_core::config::StyleConfig;
use quiz_core::QuizSettings;

const BASE_RULES: &str = r#"
.quiz-step-card {
    background: var(--bg, #ffffff);
    color: var(--text, #222222);
    border: 1px solid var(--border, #dddddd);
    border-radius: 12px;
    padding: 2rem;
    max-width: 600px;
    margin: 2rem auto;
    text-align: center;
    box-shadow: 0 10px 25px rgba(0,0,0,0.1);
}
.quiz-media-image, .quiz-media-video {
    max-width: 100%;
    height: auto;
    border-radius: 8px;
    margin-bottom: 1.5rem;
}
.quiz-media-aspect-ratio {
    position: relative;
    width: 100%;
    padding-top: 56.25%;
    margin-bottom: 1.5rem;
    border-radius: 8px;
    overflow: hidden;
}
.quiz-media-aspect-ratio iframe {
    position: absolute;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    border: none;
}
.quiz-bullets {
    list-style-position: inside;
    text-align: left;
    margin: 1.5rem 0;
    display: flex;
    flex-direction: column;
    gap: 0.5rem;
}
.quiz-answers-grid {
    display: grid;
    gap: 1rem;
}
.quiz-answer-button, .quiz-checkout-button {
    background: var(--btn, #007bff);
    color: var(--btn-text, #ffffff);
    border: none;
    width: 100%;
    padding: 1rem;
    border-radius: 8px;
    font-size: 1rem;
    font-weight: 500;
    cursor: pointer;
    transition: transform 0.2s, box-shadow 0.2s;
}
.quiz-answer-button:hover, .quiz-checkout-button:hover {
    transform: scale(1.03);
    box-shadow: 0 4px 15px rgba(0,0,0,0.1);
}
.quiz-checkout-button {
    text-decoration: none;
    display: block;
}
.fade-in { animation: fadeIn 0.5s ease-in-out; }
@keyframes fadeIn {
    from { opacity: 0; transform: translateY(10px); }
    to { opacity: 1; transform: translateY(0); }
}
"#;

/// Builds the style sheet for one container. Colors from the settings become
/// CSS custom properties scoped to the container; unset colors fall back to
/// the defaults baked into the rules.
pub fn build_style_sheet(container_id: &str, settings: &QuizSettings, config: &StyleConfig) -> String {
    let variables = [
        ("--bg", settings.background_color()),
        ("--text", settings.text_color()),
        ("--btn", settings.button_color()),
        ("--btn-text", settings.button_text_color()),
        ("--border", settings.border_color()),
    ];

    let mut sheet = format!("#{} {{\n", css_ident(container_id));
    for (name, value) in variables {
        let Some(value) = value else { continue };
        if is_safe_css_value(value) {
            sheet.push_str(&format!("    {}: {};\n", name, value));
        } else {
            warn!(container_id = %container_id, property = name, value = %value, "Ignoring unsafe style value");
        }
    }
    sheet.push_str(&format!("    font-family: {};\n}}", config.font_family));
    sheet.push_str(BASE_RULES);
    sheet
}

fn is_safe_css_value(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(|c| matches!(c, ';' | '{' | '}' | '<' | '>'))
}

// Escapes characters that would break an id selector.
fn css_ident(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scoped_variables() {
        let settings: QuizSettings = serde_json::from_value(json!({
            "backgroundColor": "#fafafa",
            "buttonColor": "rgb(0, 128, 0)",
            "animation": "fade-in"
        }))
        .unwrap();

        let sheet = build_style_sheet("my-quiz", &settings, &StyleConfig::default());
        assert!(sheet.starts_with("#my-quiz {\n"));
        assert!(sheet.contains("--bg: #fafafa;"));
        assert!(sheet.contains("--btn: rgb(0, 128, 0);"));
        assert!(!sheet.contains("--text:"));
        assert!(sheet.contains("font-family: Arial, sans-serif;"));
        assert!(sheet.contains(".quiz-step-card"));
    }

    #[test]
    fn test_unsafe_values_dropped() {
        let settings: QuizSettings = serde_json::from_value(json!({
            "textColor": "red;} body { display:none"
        }))
        .unwrap();
        let sheet = build_style_sheet("q", &settings, &StyleConfig::default());
        assert!(!sheet.contains("display:none"));
    }

    #[test]
    fn test_selector_escaping() {
        assert_eq!(css_ident("quiz.main"), "quiz\\.main");
        assert_eq!(css_ident("quiz_1-a"), "quiz_1-a");
    }
}
