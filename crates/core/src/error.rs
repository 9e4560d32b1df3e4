use thiserror::Error;

pub type QuizResult<T> = Result<T, QuizError>;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Quiz definition is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Quiz definition has no steps")]
    EmptyQuiz,

    #[error("Step \"{step_id}\" not found")]
    StepNotFound { step_id: String },

    #[error("Quiz engine has not been initialized")]
    NotInitialized,

    #[error("Invalid state transition from {from:?} to {to:?} on {trigger}")]
    InvalidTransition {
        from: String,
        to: String,
        trigger: String,
    },
}

impl QuizError {
    /// Errors that are shown inside the container, as opposed to the
    /// silently logged ones.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, QuizError::Parse(_) | QuizError::StepNotFound { .. })
    }
}
