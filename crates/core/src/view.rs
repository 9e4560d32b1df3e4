//! View seam: what the engine hands to whoever paints the container.
//!
//! The engine never touches markup. It builds a [`RenderRequest`] with an
//! explicit action list and passes it to an `Arc<dyn ViewRenderer>`. The
//! renderer binds host input events to the actions and reports activations
//! back to the engine.

use std::sync::{Arc, Mutex};

use quiz_media::Media;
use serde::{Deserialize, Serialize};

use crate::types::QuizSettings;

/// What activating an action should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ActionIntent {
    /// Render the step with this id in the same container.
    Navigate { target: String },
    /// Leave the quiz; no internal transition happens.
    ExternalLink { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub label: String,
    pub intent: ActionIntent,
}

impl Action {
    pub fn navigate(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            intent: ActionIntent::Navigate {
                target: target.into(),
            },
        }
    }

    pub fn external(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            intent: ActionIntent::ExternalLink { url: url.into() },
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self.intent, ActionIntent::ExternalLink { .. })
    }
}

/// Everything needed to paint one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub container_id: String,
    pub step_id: String,
    pub title: String,
    pub bullets: Vec<String>,
    pub media: Option<Media>,
    pub actions: Vec<Action>,
    pub animation: String,
}

/// Paints engine output into a host container. Every call replaces the
/// container's whole content.
pub trait ViewRenderer: Send + Sync {
    /// Style sheet for a container, installed once per container id.
    fn style_sheet(&self, container_id: &str, settings: &QuizSettings) -> String;

    fn render(&self, request: &RenderRequest);

    fn render_error(&self, container_id: &str, message: &str);
}

/// A single call recorded by [`CaptureView`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Rendered(RenderRequest),
    Error {
        container_id: String,
        message: String,
    },
}

/// In-memory renderer that records calls, for tests.
#[derive(Default)]
pub struct CaptureView {
    events: Mutex<Vec<ViewEvent>>,
    style_requests: Mutex<Vec<String>>,
}

impl CaptureView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().expect("capture view mutex poisoned").clone()
    }

    pub fn last(&self) -> Option<ViewEvent> {
        self.events
            .lock()
            .expect("capture view mutex poisoned")
            .last()
            .cloned()
    }

    /// Most recent successful render, if any.
    pub fn last_render(&self) -> Option<RenderRequest> {
        self.events
            .lock()
            .expect("capture view mutex poisoned")
            .iter()
            .rev()
            .find_map(|e| match e {
                ViewEvent::Rendered(r) => Some(r.clone()),
                ViewEvent::Error { .. } => None,
            })
    }

    pub fn count(&self) -> usize {
        self.events.lock().expect("capture view mutex poisoned").len()
    }

    /// Container ids for which a style sheet was requested.
    pub fn style_requests(&self) -> Vec<String> {
        self.style_requests
            .lock()
            .expect("capture view mutex poisoned")
            .clone()
    }
}

impl ViewRenderer for CaptureView {
    fn style_sheet(&self, container_id: &str, _settings: &QuizSettings) -> String {
        self.style_requests
            .lock()
            .expect("capture view mutex poisoned")
            .push(container_id.to_string());
        format!("/* {} */", container_id)
    }

    fn render(&self, request: &RenderRequest) {
        self.events
            .lock()
            .expect("capture view mutex poisoned")
            .push(ViewEvent::Rendered(request.clone()));
    }

    fn render_error(&self, container_id: &str, message: &str) {
        self.events
            .lock()
            .expect("capture view mutex poisoned")
            .push(ViewEvent::Error {
                container_id: container_id.to_string(),
                message: message.to_string(),
            });
    }
}

/// Convenience: create a capture view for tests.
pub fn capture_view() -> Arc<CaptureView> {
    Arc::new(CaptureView::new())
}
