//! Coordinate reference systems and the batched coordinate transform.
//!
//! The geometry builder hands the transform one flat coordinate list per
//! rebuild; implementations never see individual points.

mod crs;
mod transform;

pub use crs::Crs;
pub use transform::{CoordinateTransform, ProjectionError, Projector};
