use tracing::debug;

use quiz_core::{Action, QuizSettings, RenderRequest, Step};
use quiz_media::resolve_optional;

/// Turns a step definition into a render request: resolves its media and
/// decides which actions the viewer gets.
#[derive(Debug, Clone)]
pub struct StepPresenter {
    default_animation: String,
}

impl StepPresenter {
    pub fn new(default_animation: impl Into<String>) -> Self {
        Self {
            default_animation: default_animation.into(),
        }
    }

    pub fn present(&self, container_id: &str, step: &Step, settings: &QuizSettings) -> RenderRequest {
        let media = resolve_optional(step.media_src());
        let actions = self.actions_for(step);

        debug!(
            container_id = %container_id,
            step_id = %step.id,
            media = media.as_ref().map(|m| m.kind_label()).unwrap_or("none"),
            actions = actions.len(),
            "Presenting quiz step"
        );

        RenderRequest {
            container_id: container_id.to_string(),
            step_id: step.id.clone(),
            title: step.title.clone(),
            bullets: step.bullets.clone(),
            media,
            actions,
            animation: settings
                .animation()
                .unwrap_or(&self.default_animation)
                .to_string(),
        }
    }

    /// A result step with a checkout button gets exactly that one external
    /// link, even if it also lists answers. Everything else gets one
    /// navigation action per answer.
    pub fn actions_for(&self, step: &Step) -> Vec<Action> {
        if let Some(checkout) = step.checkout() {
            return vec![Action::external(&checkout.text, &checkout.url)];
        }
        step.answers
            .iter()
            .map(|a| Action::navigate(&a.text, &a.target))
            .collect()
    }
}

impl Default for StepPresenter {
    fn default() -> Self {
        Self::new("fade-in")
    }
}
