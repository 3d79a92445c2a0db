//! Per-point style model.
//!
//! Scope:
//! - stroke color representation (straight RGB, opacity carried separately)
//! - accessor functions that evaluate position and style for each point

mod accessor;
mod color;

pub use accessor::{Accessor, AccessorError, LineAccessors, StyleKey};
pub use color::StrokeColor;
