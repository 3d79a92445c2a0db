//! Line geometry expansion.
//!
//! Turns a polyline dataset into GPU-ready triangle geometry: every segment is
//! expanded into two triangles (six independent vertices) that carry their own
//! position, both neighbors, an offset sign and the point's style. The join
//! shader then pushes each vertex sideways in screen space.

mod buffers;
mod builder;
mod error;
mod template;
mod vertex;

pub use buffers::{Bounds, BufferSet};
pub use builder::build_line_buffers;
pub use error::BuildError;
pub use template::{vertex_template, vertices_per_segment, Endpoint, TemplateEntry, LINE_TEMPLATE};
pub use vertex::LineVertex;
