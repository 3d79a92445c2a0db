//! Geoline engine crate.
//!
//! Wide-line rendering core for map layers: polyline datasets are expanded on
//! the CPU into neighbor-aware triangle geometry, and a WGSL join program
//! offsets every vertex in screen space to draw constant-pixel-width lines with
//! mitered joins. Features decide per frame whether to rebuild geometry or just
//! refresh per-frame parameters.

pub mod coords;
pub mod device;
pub mod feature;
pub mod geometry;
pub mod logging;
pub mod projection;
pub mod render;
pub mod scene;
pub mod style;
pub mod version;
