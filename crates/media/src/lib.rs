//! Media source classification for quiz steps.
//!
//! A step carries at most one media source string. [`resolve_media`] turns it
//! into a [`Media`] value naming how the source should be played: inline or
//! plain image, YouTube or Vimeo player, adaptive (HLS) stream, or a direct
//! video file. Markup generation is left to the view layer.

pub mod resolver;
pub mod types;

pub use resolver::{resolve_media, resolve_optional};
pub use types::Media;
