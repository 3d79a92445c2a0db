//! Scene resources.
//!
//! Responsibilities:
//! - describe a drawable: immutable geometry plus material, visibility and bin
//! - accept drawables from features through the [`DrawableSink`] trait
//! - provide deterministic draw order (bin, then insertion order)

mod drawable;
mod order;
mod registry;

pub use drawable::{Drawable, DrawableId, LineMaterial};
pub use order::{Bin, SortKey};
pub use registry::{DrawableSink, Scene};
