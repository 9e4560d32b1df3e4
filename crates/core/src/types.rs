use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A branching quiz: the steps to navigate plus opaque presentation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: QuizSettings,
}

/// One screen of the quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: StepKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub media: Option<MediaRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub checkout_button: Option<CheckoutButton>,
}

/// Step variant. Unknown type names are ordinary question steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Result,
    #[default]
    #[serde(other)]
    Ordinary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaRef {
    #[serde(default)]
    pub src: Option<String>,
}

/// A button that moves the quiz to `target`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub target: String,
}

/// External call-to-action shown on result steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutButton {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub text: String,
}

/// Presentation settings, kept verbatim. Only a handful of keys are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizSettings(pub Map<String, Value>);

/// Structural problems that do not stop a quiz from loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionIssue {
    DuplicateStepId { step_id: String },
    DanglingTarget { step_id: String, target: String },
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl QuizDefinition {
    /// First step with the given id. Ids are expected to be unique; when
    /// they are not, the earliest one wins.
    pub fn find_step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }

    /// Reports duplicated ids and answers pointing at missing steps.
    pub fn diagnostics(&self) -> Vec<DefinitionIssue> {
        let mut issues = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id.as_str()) {
                issues.push(DefinitionIssue::DuplicateStepId {
                    step_id: step.id.clone(),
                });
            }
        }

        for step in &self.steps {
            for answer in &step.answers {
                if !seen.contains(answer.target.as_str()) {
                    issues.push(DefinitionIssue::DanglingTarget {
                        step_id: step.id.clone(),
                        target: answer.target.clone(),
                    });
                }
            }
        }
        issues
    }
}

impl Step {
    pub fn is_result(&self) -> bool {
        self.kind == StepKind::Result
    }

    /// Checkout button, only honoured on result steps.
    pub fn checkout(&self) -> Option<&CheckoutButton> {
        if self.is_result() {
            self.checkout_button.as_ref()
        } else {
            None
        }
    }

    pub fn media_src(&self) -> Option<&str> {
        self.media.as_ref().and_then(|m| m.src.as_deref())
    }
}

impl QuizSettings {
    /// String value for `key`; non-string values are ignored.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn background_color(&self) -> Option<&str> {
        self.text("backgroundColor")
    }

    pub fn text_color(&self) -> Option<&str> {
        self.text("textColor")
    }

    pub fn button_color(&self) -> Option<&str> {
        self.text("buttonColor")
    }

    pub fn button_text_color(&self) -> Option<&str> {
        self.text("buttonTextColor")
    }

    pub fn border_color(&self) -> Option<&str> {
        self.text("borderColor")
    }

    /// Animation class for step cards. Empty strings count as unset.
    pub fn animation(&self) -> Option<&str> {
        self.text("animation").filter(|a| !a.is_empty())
    }
}
