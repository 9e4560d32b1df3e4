//! In-memory host page.
//!
//! Stands in for the browser document: each container holds its current
//! markup and the actions bound to its buttons. A render replaces both, so
//! actions from a previous step can no longer be clicked.

use dashmap::DashMap;
use tracing::{debug, warn};

use quiz_core::{Action, QuizSettings, RenderRequest, StyleRegistry, ViewRenderer, WidgetConfig};

use crate::markup::{escape_html, render_error_html, render_step_html};
use crate::stylesheet::build_style_sheet;

/// Current content of one container.
#[derive(Debug, Clone)]
pub struct ContainerView {
    pub html: String,
    pub actions: Vec<Action>,
}

pub struct HtmlPage {
    config: WidgetConfig,
    containers: DashMap<String, ContainerView>,
}

impl HtmlPage {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            containers: DashMap::new(),
        }
    }

    pub fn container_html(&self, container_id: &str) -> Option<String> {
        self.containers.get(container_id).map(|c| c.html.clone())
    }

    pub fn actions(&self, container_id: &str) -> Vec<Action> {
        self.containers
            .get(container_id)
            .map(|c| c.actions.clone())
            .unwrap_or_default()
    }

    /// Simulates a click on the `index`-th button of a container and returns
    /// the action bound to it, for the host to pass to the engine.
    pub fn click(&self, container_id: &str, index: usize) -> Option<Action> {
        let action = self
            .containers
            .get(container_id)
            .and_then(|c| c.actions.get(index).cloned());
        match &action {
            Some(a) => debug!(container_id = %container_id, index, label = %a.label, "Action clicked"),
            None => warn!(container_id = %container_id, index, "No action bound at index"),
        }
        action
    }

    /// Removes a container from the page.
    pub fn remove(&self, container_id: &str) -> bool {
        self.containers.remove(container_id).is_some()
    }

    /// Full HTML document with every installed style sheet and container.
    pub fn document(&self, styles: &StyleRegistry) -> String {
        let mut ids: Vec<String> = self.containers.iter().map(|r| r.key().clone()).collect();
        ids.sort();

        let mut head = String::new();
        let mut body = String::new();
        for id in &ids {
            if let Some(sheet) = styles.get(id) {
                head.push_str(&format!(
                    "<style id=\"{}{}\">{}</style>\n",
                    escape_html(&self.config.style.id_prefix),
                    escape_html(id),
                    sheet
                ));
            }
            let html = self.container_html(id).unwrap_or_default();
            body.push_str(&format!("<div id=\"{}\">{}</div>\n", escape_html(id), html));
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{}</head>\n<body>\n{}</body>\n</html>\n",
            head, body
        )
    }
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self::new(WidgetConfig::default())
    }
}

impl ViewRenderer for HtmlPage {
    fn style_sheet(&self, container_id: &str, settings: &QuizSettings) -> String {
        build_style_sheet(container_id, settings, &self.config.style)
    }

    fn render(&self, request: &RenderRequest) {
        let html = render_step_html(request, &self.config.media);
        self.containers.insert(
            request.container_id.clone(),
            ContainerView {
                html,
                actions: request.actions.clone(),
            },
        );
    }

    fn render_error(&self, container_id: &str, message: &str) {
        self.containers.insert(
            container_id.to_string(),
            ContainerView {
                html: render_error_html(message),
                actions: Vec::new(),
            },
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(step_id: &str, actions: Vec<Action>) -> RenderRequest {
        RenderRequest {
            container_id: "quiz".into(),
            step_id: step_id.into(),
            title: format!("Step {}", step_id),
            bullets: vec![],
            media: None,
            actions,
            animation: "fade-in".into(),
        }
    }

    #[test]
    fn test_render_binds_actions() {
        let page = HtmlPage::default();
        page.render(&request("a", vec![Action::navigate("Next", "b")]));

        assert!(page.container_html("quiz").unwrap().contains("Step a"));
        assert_eq!(page.click("quiz", 0), Some(Action::navigate("Next", "b")));
        assert!(page.click("quiz", 1).is_none());
        assert!(page.click("other", 0).is_none());
    }

    #[test]
    fn test_render_replaces_previous_content() {
        let page = HtmlPage::default();
        page.render(&request("a", vec![Action::navigate("Next", "b")]));
        page.render(&request("b", vec![]));

        let html = page.container_html("quiz").unwrap();
        assert!(html.contains("Step b"));
        assert!(!html.contains("Step a"));
        assert!(page.actions("quiz").is_empty());
    }

    #[test]
    fn test_error_clears_actions() {
        let page = HtmlPage::default();
        page.render(&request("a", vec![Action::navigate("Next", "b")]));
        page.render_error("quiz", "Broken");

        assert_eq!(
            page.container_html("quiz").unwrap(),
            render_error_html("Broken")
        );
        assert!(page.click("quiz", 0).is_none());
    }

    #[test]
    fn test_document_includes_installed_styles() {
        let page = HtmlPage::default();
        let styles = StyleRegistry::new();
        page.render(&request("a", vec![]));
        styles.ensure_installed("quiz", || page.style_sheet("quiz", &QuizSettings::default()));

        let doc = page.document(&styles);
        assert_eq!(doc.matches("<style id=\"style-quiz\">").count(), 1);
        assert!(doc.contains("<div id=\"quiz\"><div class=\"quiz-step-card fade-in\""));

        assert!(page.remove("quiz"));
        assert!(!page.document(&styles).contains("id=\"quiz\""));
    }
}
