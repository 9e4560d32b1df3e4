use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use quiz_core::config::MessagesConfig;
use quiz_core::types::DefinitionIssue;
use quiz_core::{
    Action, ActionIntent, QuizDefinition, QuizError, QuizResult, StyleRegistry, ViewRenderer,
    WidgetConfig,
};

use crate::presenter::StepPresenter;
use crate::state_machine::{EngineState, QuizStateMachine};

/// Drives one quiz inside one container.
///
/// Failures are handled where they happen: the container shows a message
/// and a log entry is written before the error is returned. Callers may
/// ignore the returned error without leaving the page in a broken state.
pub struct QuizEngine {
    container_id: String,
    quiz: Option<QuizDefinition>,
    machine: QuizStateMachine,
    presenter: StepPresenter,
    messages: MessagesConfig,
    view: Arc<dyn ViewRenderer>,
    styles: Arc<StyleRegistry>,
}

impl std::fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizEngine")
            .field("container_id", &self.container_id)
            .field("steps", &self.quiz.as_ref().map(|q| q.steps.len()))
            .field("state", &self.machine.state())
            .finish()
    }
}

impl QuizEngine {
    /// Creates an uninitialized engine bound to `container_id`. The style
    /// registry is shared by every engine on the same page.
    pub fn new(
        container_id: impl Into<String>,
        view: Arc<dyn ViewRenderer>,
        styles: Arc<StyleRegistry>,
    ) -> Self {
        let config = WidgetConfig::default();
        Self {
            container_id: container_id.into(),
            quiz: None,
            machine: QuizStateMachine::new(),
            presenter: StepPresenter::new(config.default_animation),
            messages: config.messages,
            view,
            styles,
        }
    }

    pub fn with_config(mut self, config: &WidgetConfig) -> Self {
        self.presenter = StepPresenter::new(config.default_animation.clone());
        self.messages = config.messages.clone();
        self
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn quiz(&self) -> Option<&QuizDefinition> {
        self.quiz.as_ref()
    }

    pub fn state(&self) -> EngineState {
        self.machine.state()
    }

    pub fn current_step_id(&self) -> Option<&str> {
        self.machine.current_step_id()
    }

    /// Loads a quiz definition and renders its first step.
    ///
    /// Malformed input shows an error in the container. A definition
    /// without steps is only logged and leaves the container untouched.
    pub fn initialize(&mut self, source: &str) -> QuizResult<()> {
        let value: Value = match serde_json::from_str(source) {
            Ok(v) => v,
            Err(e) => return Err(self.fail_parse(e)),
        };

        if !has_steps(&value) {
            warn!(container_id = %self.container_id, "Quiz has no steps, nothing to render");
            return Err(QuizError::EmptyQuiz);
        }

        let quiz: QuizDefinition = match serde_json::from_value(value) {
            Ok(q) => q,
            Err(e) => return Err(self.fail_parse(e)),
        };

        for issue in quiz.diagnostics() {
            match issue {
                DefinitionIssue::DuplicateStepId { step_id } => {
                    warn!(container_id = %self.container_id, step_id = %step_id, "Duplicate step id, first one wins");
                }
                DefinitionIssue::DanglingTarget { step_id, target } => {
                    warn!(container_id = %self.container_id, step_id = %step_id, target = %target, "Answer targets a missing step");
                }
            }
        }

        let first_step_id = match quiz.first_step() {
            Some(step) => step.id.clone(),
            None => return Err(QuizError::EmptyQuiz),
        };

        let view = &self.view;
        let container_id = &self.container_id;
        self.styles
            .ensure_installed(container_id, || view.style_sheet(container_id, &quiz.settings));

        info!(
            container_id = %self.container_id,
            steps = quiz.steps.len(),
            first_step = %first_step_id,
            "Quiz initialized"
        );

        self.quiz = Some(quiz);
        self.machine.initialized(&first_step_id)?;
        self.render_step(&first_step_id)
    }

    /// Renders the step with `step_id`, replacing the container content.
    pub fn render_step(&mut self, step_id: &str) -> QuizResult<()> {
        let quiz = self.quiz.as_ref().ok_or(QuizError::NotInitialized)?;

        let Some(step) = quiz.find_step(step_id) else {
            let message = self.messages.step_not_found_for(step_id);
            error!(container_id = %self.container_id, step_id = %step_id, "Quiz step not found");
            self.view.render_error(&self.container_id, &message);
            self.machine.step_not_found(&message)?;
            return Err(QuizError::StepNotFound {
                step_id: step_id.to_string(),
            });
        };

        let request = self.presenter.present(&self.container_id, step, &quiz.settings);
        self.view.render(&request);
        self.machine.step_rendered(&request.step_id)?;

        info!(
            container_id = %self.container_id,
            step_id = %request.step_id,
            actions = request.actions.len(),
            "Rendered quiz step"
        );
        Ok(())
    }

    /// Runs an action the viewer activated. Navigation renders the target
    /// step; an external link is handed back to the host to open.
    pub fn activate(&mut self, action: &Action) -> QuizResult<Option<String>> {
        match &action.intent {
            ActionIntent::Navigate { target } => {
                self.render_step(target)?;
                Ok(None)
            }
            ActionIntent::ExternalLink { url } => {
                info!(container_id = %self.container_id, url = %url, "Leaving quiz via external link");
                Ok(Some(url.clone()))
            }
        }
    }

    /// Tears the engine down along with its container's style sheet.
    ///
    /// A container is driven by one engine at a time; the sheet is released
    /// even if another engine was created for the same container id. The
    /// host owns the container markup and clears it itself.
    pub fn dispose(self) {
        let released = self.styles.release(&self.container_id);
        info!(container_id = %self.container_id, released, "Quiz engine disposed");
    }

    fn fail_parse(&mut self, err: serde_json::Error) -> QuizError {
        error!(container_id = %self.container_id, error = %err, "Quiz definition is invalid");
        self.view
            .render_error(&self.container_id, &self.messages.invalid_quiz);
        self.quiz = None;
        if let Err(e) = self.machine.parse_failed(&err.to_string()) {
            error!(error = %e, "Unexpected engine state after parse failure");
        }
        QuizError::Parse(err)
    }
}

fn has_steps(value: &Value) -> bool {
    value
        .get("steps")
        .and_then(Value::as_array)
        .is_some_and(|steps| !steps.is_empty())
}

/// Creates an engine for `container_id` and initializes it from `source`.
/// Errors are already reported in the container and the log, so the engine
/// is returned either way.
pub fn initialize_quiz(
    container_id: impl Into<String>,
    source: &str,
    view: Arc<dyn ViewRenderer>,
    styles: Arc<StyleRegistry>,
    config: &WidgetConfig,
) -> QuizEngine {
    let mut engine = QuizEngine::new(container_id, view, styles).with_config(config);
    if let Err(e) = engine.initialize(source) {
        info!(container_id = %engine.container_id, error = %e, "Quiz initialization did not complete");
    }
    engine
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quiz_core::view::{capture_view, CaptureView, ViewEvent};
    use serde_json::json;

    fn sample_quiz() -> String {
        json!({
            "settings": { "buttonColor": "#333" },
            "steps": [
                {
                    "id": "start",
                    "title": "Where do you train?",
                    "answers": [
                        { "text": "Home", "target": "home" },
                        { "text": "Gym", "target": "gym" }
                    ]
                },
                {
                    "id": "home",
                    "title": "Home plan",
                    "answers": [{ "text": "Back", "target": "start" }]
                },
                {
                    "id": "gym",
                    "type": "result",
                    "title": "Gym plan",
                    "answers": [{ "text": "Ignored", "target": "start" }],
                    "checkoutButton": { "url": "https://shop.example.com", "text": "Buy" }
                }
            ]
        })
        .to_string()
    }

    fn engine_with(view: &Arc<CaptureView>) -> (QuizEngine, Arc<StyleRegistry>) {
        let styles = Arc::new(StyleRegistry::new());
        let engine = QuizEngine::new("quiz", view.clone(), styles.clone());
        (engine, styles)
    }

    #[test]
    fn test_initialize_renders_first_step() {
        let view = capture_view();
        let (mut engine, styles) = engine_with(&view);

        engine.initialize(&sample_quiz()).unwrap();

        assert_eq!(view.count(), 1);
        assert_eq!(view.last_render().unwrap().step_id, "start");
        assert_eq!(
            engine.state(),
            EngineState::Ready {
                current_step_id: "start".into()
            }
        );
        assert!(styles.is_installed("quiz"));
    }

    #[test]
    fn test_malformed_json_shows_error() {
        let view = capture_view();
        let (mut engine, styles) = engine_with(&view);

        let err = engine.initialize("{ not json").unwrap_err();
        assert!(matches!(err, QuizError::Parse(_)));
        assert!(err.is_user_visible());
        assert!(matches!(
            view.last().unwrap(),
            ViewEvent::Error { ref message, .. } if message == "Error: the quiz JSON is invalid."
        ));
        assert!(matches!(engine.state(), EngineState::Error { .. }));
        assert!(styles.is_empty());

        // Error is terminal until re-initialization.
        assert!(matches!(
            engine.render_step("start").unwrap_err(),
            QuizError::NotInitialized
        ));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let view = capture_view();
        let (mut engine, _) = engine_with(&view);

        let err = engine
            .initialize(r#"{"steps":[{"id":1,"title":"numeric id"}]}"#)
            .unwrap_err();
        assert!(matches!(err, QuizError::Parse(_)));
        assert_eq!(view.count(), 1);
    }

    #[test]
    fn test_empty_quiz_leaves_container_untouched() {
        let view = capture_view();
        let (mut engine, styles) = engine_with(&view);

        for source in [r#"{"steps":[]}"#, r#"{"settings":{}}"#, "42", r#"{"steps":null}"#] {
            let err = engine.initialize(source).unwrap_err();
            assert!(matches!(err, QuizError::EmptyQuiz), "source {}", source);
        }

        assert_eq!(view.count(), 0);
        assert!(styles.is_empty());
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    #[test]
    fn test_navigation_follows_targets() {
        let view = capture_view();
        let (mut engine, _) = engine_with(&view);
        engine.initialize(&sample_quiz()).unwrap();

        let first = view.last_render().unwrap();
        engine.activate(&first.actions[0]).unwrap();
        assert_eq!(engine.current_step_id(), Some("home"));

        let home = view.last_render().unwrap();
        engine.activate(&home.actions[0]).unwrap();
        assert_eq!(engine.current_step_id(), Some("start"));

        engine.activate(&first.actions[1]).unwrap();
        assert_eq!(engine.current_step_id(), Some("gym"));
    }

    #[test]
    fn test_result_step_offers_only_checkout() {
        let view = capture_view();
        let (mut engine, _) = engine_with(&view);
        engine.initialize(&sample_quiz()).unwrap();
        engine.render_step("gym").unwrap();

        let request = view.last_render().unwrap();
        assert_eq!(request.actions.len(), 1);
        assert!(request.actions[0].is_external());

        let url = engine.activate(&request.actions[0]).unwrap();
        assert_eq!(url.as_deref(), Some("https://shop.example.com"));
        assert_eq!(engine.current_step_id(), Some("gym"));
    }

    #[test]
    fn test_missing_step_reports_and_recovers() {
        let view = capture_view();
        let (mut engine, _) = engine_with(&view);
        engine.initialize(&sample_quiz()).unwrap();

        let err = engine.render_step("nowhere").unwrap_err();
        assert!(matches!(err, QuizError::StepNotFound { ref step_id } if step_id == "nowhere"));
        assert_eq!(
            view.last().unwrap(),
            ViewEvent::Error {
                container_id: "quiz".into(),
                message: "Error: step \"nowhere\" was not found.".into()
            }
        );
        assert!(matches!(engine.state(), EngineState::Error { .. }));
        assert_eq!(engine.current_step_id(), Some("start"));

        engine.render_step("home").unwrap();
        assert_eq!(
            engine.state(),
            EngineState::Ready {
                current_step_id: "home".into()
            }
        );
    }

    #[test]
    fn test_style_installed_once_per_container() {
        let view = capture_view();
        let styles = Arc::new(StyleRegistry::new());

        let mut first = QuizEngine::new("quiz", view.clone(), styles.clone());
        first.initialize(&sample_quiz()).unwrap();
        first.render_step("home").unwrap();

        let mut second = QuizEngine::new("quiz", view.clone(), styles.clone());
        second.initialize(&sample_quiz()).unwrap();

        assert_eq!(styles.len(), 1);
        assert_eq!(view.style_requests(), vec!["quiz".to_string()]);
    }

    #[test]
    fn test_reinitialize_recovers_from_parse_error() {
        let view = capture_view();
        let (mut engine, styles) = engine_with(&view);

        assert!(engine.initialize("nope").is_err());
        assert!(matches!(engine.state(), EngineState::Error { .. }));

        engine.initialize(&sample_quiz()).unwrap();
        assert_eq!(
            engine.state(),
            EngineState::Ready {
                current_step_id: "start".into()
            }
        );
        assert_eq!(styles.len(), 1);

        let other = json!({ "steps": [{ "id": "welcome", "title": "Hi" }] }).to_string();
        engine.initialize(&other).unwrap();
        assert_eq!(
            engine.state(),
            EngineState::Ready {
                current_step_id: "welcome".into()
            }
        );
        assert_eq!(view.last_render().unwrap().step_id, "welcome");
        assert_eq!(view.style_requests(), vec!["quiz".to_string()]);
    }

    #[test]
    fn test_dispose_releases_style() {
        let view = capture_view();
        let (mut engine, styles) = engine_with(&view);
        engine.initialize(&sample_quiz()).unwrap();
        engine.dispose();
        assert!(styles.is_empty());
    }

    #[test]
    fn test_configured_messages() {
        let view = capture_view();
        let mut config = WidgetConfig::default();
        config.messages.invalid_quiz = "Quiz indisponible".into();

        let engine = initialize_quiz(
            "quiz",
            "oops",
            view.clone(),
            Arc::new(StyleRegistry::new()),
            &config,
        );
        assert!(matches!(engine.state(), EngineState::Error { .. }));
        assert_eq!(
            view.last().unwrap(),
            ViewEvent::Error {
                container_id: "quiz".into(),
                message: "Quiz indisponible".into()
            }
        );
    }
}
