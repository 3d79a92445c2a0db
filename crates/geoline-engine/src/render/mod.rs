//! GPU rendering subsystem.
//!
//! The line renderer consumes the [`Scene`](crate::scene::Scene) and issues GPU
//! commands via wgpu. It owns its GPU resources (pipeline, per-drawable buffers).
//!
//! Convention:
//! - vertex positions are in the display CRS
//! - the camera maps them to clip space; stroke widths are in pixels

mod camera;
mod common;
mod ctx;
pub mod join;
mod line;
mod shader;

pub use camera::Camera;
pub use ctx::{RenderCtx, RenderTarget};
pub use join::LineUniforms;
pub use line::LineRenderer;
pub use shader::{ShaderSource, LINE_JOIN_SHADER};
