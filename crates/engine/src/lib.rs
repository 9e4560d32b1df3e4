//! Quiz engine: step navigation for a branching quiz rendered into a
//! single container, one step at a time.

pub mod engine;
pub mod presenter;
pub mod state_machine;

pub use engine::{initialize_quiz, QuizEngine};
pub use presenter::StepPresenter;
pub use state_machine::{EnginePhase, EngineState, QuizStateMachine};
