use serde::{Deserialize, Serialize};

use quiz_core::{QuizError, QuizResult};

/// Coarse lifecycle phase of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    Uninitialized,
    Ready,
    Error,
}

/// Snapshot of the engine state as seen from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum EngineState {
    Uninitialized,
    Ready { current_step_id: String },
    Error { message: String },
}

/// Describes a single valid state transition for an engine.
#[derive(Debug, Clone, Serialize)]
pub struct StateTransition {
    pub from: EnginePhase,
    pub to: EnginePhase,
    pub trigger: &'static str,
}

pub const INITIALIZED: &str = "initialized";
pub const PARSE_FAILED: &str = "parse_failed";
pub const STEP_RENDERED: &str = "step_rendered";
pub const STEP_NOT_FOUND: &str = "step_not_found";

/// Guards the engine lifecycle. Nothing returns to `Uninitialized`, and a
/// step can only be rendered once a quiz has been loaded.
#[derive(Debug, Clone)]
pub struct QuizStateMachine {
    phase: EnginePhase,
    current_step_id: Option<String>,
    last_error: Option<String>,
    transitions: Vec<StateTransition>,
}

impl QuizStateMachine {
    pub fn new() -> Self {
        use EnginePhase::*;

        let transitions = vec![
            // Uninitialized ->
            StateTransition {
                from: Uninitialized,
                to: Ready,
                trigger: INITIALIZED,
            },
            StateTransition {
                from: Uninitialized,
                to: Error,
                trigger: PARSE_FAILED,
            },
            // Ready ->
            StateTransition {
                from: Ready,
                to: Ready,
                trigger: STEP_RENDERED,
            },
            StateTransition {
                from: Ready,
                to: Ready,
                trigger: INITIALIZED,
            },
            StateTransition {
                from: Ready,
                to: Error,
                trigger: STEP_NOT_FOUND,
            },
            StateTransition {
                from: Ready,
                to: Error,
                trigger: PARSE_FAILED,
            },
            // Error ->
            StateTransition {
                from: Error,
                to: Ready,
                trigger: STEP_RENDERED,
            },
            StateTransition {
                from: Error,
                to: Ready,
                trigger: INITIALIZED,
            },
            StateTransition {
                from: Error,
                to: Error,
                trigger: STEP_NOT_FOUND,
            },
            StateTransition {
                from: Error,
                to: Error,
                trigger: PARSE_FAILED,
            },
        ];

        Self {
            phase: Uninitialized,
            current_step_id: None,
            last_error: None,
            transitions,
        }
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn current_step_id(&self) -> Option<&str> {
        self.current_step_id.as_deref()
    }

    pub fn state(&self) -> EngineState {
        match self.phase {
            EnginePhase::Uninitialized => EngineState::Uninitialized,
            EnginePhase::Ready => EngineState::Ready {
                current_step_id: self.current_step_id.clone().unwrap_or_default(),
            },
            EnginePhase::Error => EngineState::Error {
                message: self.last_error.clone().unwrap_or_default(),
            },
        }
    }

    pub fn can_transition(&self, to: EnginePhase, trigger: &str) -> bool {
        self.transitions
            .iter()
            .any(|t| t.from == self.phase && t.to == to && t.trigger == trigger)
    }

    fn transition(&mut self, to: EnginePhase, trigger: &str) -> QuizResult<()> {
        if self.can_transition(to, trigger) {
            self.phase = to;
            Ok(())
        } else {
            Err(QuizError::InvalidTransition {
                from: format!("{:?}", self.phase),
                to: format!("{:?}", to),
                trigger: trigger.to_string(),
            })
        }
    }

    /// A quiz was loaded and its first step selected.
    pub fn initialized(&mut self, first_step_id: &str) -> QuizResult<()> {
        self.transition(EnginePhase::Ready, INITIALIZED)?;
        self.current_step_id = Some(first_step_id.to_string());
        self.last_error = None;
        Ok(())
    }

    /// The source could not be decoded. Any previously loaded step is gone.
    pub fn parse_failed(&mut self, message: &str) -> QuizResult<()> {
        self.transition(EnginePhase::Error, PARSE_FAILED)?;
        self.current_step_id = None;
        self.last_error = Some(message.to_string());
        Ok(())
    }

    pub fn step_rendered(&mut self, step_id: &str) -> QuizResult<()> {
        self.transition(EnginePhase::Ready, STEP_RENDERED)?;
        self.current_step_id = Some(step_id.to_string());
        self.last_error = None;
        Ok(())
    }

    /// Navigation hit a missing step. The current step id is kept so a
    /// retry with a valid id can continue from here.
    pub fn step_not_found(&mut self, message: &str) -> QuizResult<()> {
        self.transition(EnginePhase::Error, STEP_NOT_FOUND)?;
        self.last_error = Some(message.to_string());
        Ok(())
    }
}

impl Default for QuizStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_uninitialized() {
        let machine = QuizStateMachine::new();
        assert_eq!(machine.phase(), EnginePhase::Uninitialized);
        assert_eq!(machine.state(), EngineState::Uninitialized);
        assert!(machine.current_step_id().is_none());
    }

    #[test]
    fn test_cannot_render_before_initialize() {
        let mut machine = QuizStateMachine::new();
        let err = machine.step_rendered("a").unwrap_err();
        assert!(matches!(err, QuizError::InvalidTransition { .. }));
        assert_eq!(machine.phase(), EnginePhase::Uninitialized);
    }

    #[test]
    fn test_ready_navigation() {
        let mut machine = QuizStateMachine::new();
        machine.initialized("a").unwrap();
        machine.step_rendered("a").unwrap();
        machine.step_rendered("b").unwrap();
        assert_eq!(
            machine.state(),
            EngineState::Ready {
                current_step_id: "b".into()
            }
        );
    }

    #[test]
    fn test_missing_step_keeps_current_id() {
        let mut machine = QuizStateMachine::new();
        machine.initialized("a").unwrap();
        machine.step_not_found("missing").unwrap();

        assert_eq!(machine.phase(), EnginePhase::Error);
        assert_eq!(machine.current_step_id(), Some("a"));

        machine.step_rendered("b").unwrap();
        assert_eq!(machine.phase(), EnginePhase::Ready);
    }

    #[test]
    fn test_parse_failure_clears_step() {
        let mut machine = QuizStateMachine::new();
        machine.parse_failed("bad json").unwrap();
        assert_eq!(
            machine.state(),
            EngineState::Error {
                message: "bad json".into()
            }
        );
        assert!(machine.current_step_id().is_none());
        assert!(machine.can_transition(EnginePhase::Ready, INITIALIZED));
    }

    #[test]
    fn test_not_found_before_initialize_is_rejected() {
        let mut machine = QuizStateMachine::new();
        assert!(machine.step_not_found("x").is_err());
    }
}
