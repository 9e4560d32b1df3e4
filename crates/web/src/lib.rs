//! HTML view layer for the quiz engine.
//!
//! # Modules
//!
//! - [`markup`]: step, media and error markup
//! - [`stylesheet`]: per-container style sheet built from quiz settings
//! - [`page`]: in-memory host page that renders containers and binds
//!   actions to clicks

pub mod markup;
pub mod page;
pub mod stylesheet;

pub use page::HtmlPage;
