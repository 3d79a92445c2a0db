//! Coordinate types shared by the geometry builder, projections and renderers.
//!
//! Positions enter the pipeline in a feature's source CRS as `f64`, are projected
//! in bulk, and are narrowed to `f32` only when written into GPU buffers.

mod position;
mod viewport;

pub use position::{LatLng, Position};
pub use viewport::Viewport;
