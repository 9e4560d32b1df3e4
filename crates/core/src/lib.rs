pub mod config;
pub mod error;
pub mod styles;
pub mod types;
pub mod view;

pub use config::WidgetConfig;
pub use error::{QuizError, QuizResult};
pub use styles::StyleRegistry;
pub use types::{Answer, CheckoutButton, MediaRef, QuizDefinition, QuizSettings, Step, StepKind};
pub use view::{Action, ActionIntent, RenderRequest, ViewRenderer};
