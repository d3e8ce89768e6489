//! Presentation timing types.
//!
//! Pure data types with no IO, no async, no rendering dependency.
//! Used by the engine to turn elapsed time into layer opacity/offset and
//! typewriter progress.

mod animation;
mod layer;
mod typewriter;

pub use layer::{LayerEffect, LayerEffectKind};
pub use typewriter::Typewriter;
