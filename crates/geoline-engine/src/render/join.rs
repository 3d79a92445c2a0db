//! Host-side mirror of the `line_join` vertex stage.
//!
//! Every function here computes exactly what `shaders/line_join.wgsl` does, in
//! the same order and precision, so the join math can be tested and used on the
//! CPU (hit estimation, debugging) without a GPU.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::geometry::LineVertex;
use crate::scene::LineMaterial;

use super::Camera;

/// Clip position used for hidden vertices; outside the `[-1, 1]` clip volume.
pub const HIDDEN_CLIP_POSITION: Vec4 = Vec4::new(2.0, 2.0, 0.0, 1.0);

/// Uniform block of the `line_join` program.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineUniforms {
    /// Column-major.
    pub model_view: [[f32; 4]; 4],
    /// Column-major.
    pub projection: [[f32; 4]; 4],
    pub pixel_width: f32,
    pub join_cos_threshold: f32,
    pub _pad: [f32; 2], // 16-byte alignment
}

impl LineUniforms {
    pub fn new(camera: &Camera, material: LineMaterial) -> Self {
        Self {
            model_view: camera.model_view.to_cols_array_2d(),
            projection: camera.projection.to_cols_array_2d(),
            pixel_width: material.pixel_width,
            join_cos_threshold: material.join_cos_threshold,
            _pad: [0.0; 2],
        }
    }

    fn view_projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection) * Mat4::from_cols_array_2d(&self.model_view)
    }
}

/// Join at one vertex in screen space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Join {
    /// Bisector direction in radians (0 when clamped).
    pub angle: f32,
    /// Cosine of the angle between the bisector and the incoming segment.
    pub cos_half_angle: f32,
    /// The join was treated as a reversal.
    pub clamped: bool,
}

/// Output of the vertex stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadedVertex {
    pub clip_position: Vec4,
    /// Stroke color with opacity as alpha.
    pub color: [f32; 4],
}

/// Transforms `p` and divides by `w` unless `w` is exactly zero.
pub fn to_screen(view_projection: Mat4, p: Vec3) -> Vec4 {
    let s = view_projection * p.extend(1.0);
    if s.w != 0.0 { s / s.w } else { s }
}

/// Direction of a screen-space delta. A zero x component resolves to
/// `±PI/2` by the sign of y (`+PI/2` when y is zero too).
pub fn segment_angle(delta: Vec2) -> f32 {
    let mut angle = std::f32::consts::PI * 0.5;
    if delta.y < 0.0 {
        angle = -angle;
    }
    if delta.x != 0.0 {
        angle = delta.y.atan2(delta.x);
    }
    angle
}

/// Computes the join at `pos` given its screen-space neighbors.
///
/// A zero-length delta borrows the other side's angle, so open ends get the
/// direction of their single segment.
pub fn join(prev: Vec2, pos: Vec2, next: Vec2, cos_threshold: f32) -> Join {
    let delta_next = next - pos;
    let delta_prev = pos - prev;

    let mut angle_next = segment_angle(delta_next);
    let mut angle_prev = segment_angle(delta_prev);
    if delta_prev == Vec2::ZERO {
        angle_prev = angle_next;
    }
    if delta_next == Vec2::ZERO {
        angle_next = angle_prev;
    }

    let mut angle = (angle_prev + angle_next) / 2.0;
    let mut cos_half_angle = (angle_prev - angle).cos();
    let clamped = cos_half_angle < cos_threshold;
    if clamped {
        cos_half_angle = if cos_half_angle >= 0.0 { 1.0 } else { -1.0 };
        angle = 0.0;
    }

    Join { angle, cos_half_angle, clamped }
}

/// Screen-space displacement applied to a vertex with the given join.
pub fn displacement(join: Join, offset: f32, stroke_width: f32, pixel_width: f32) -> Vec2 {
    let shift = (offset * stroke_width * pixel_width) / join.cos_half_angle;
    Vec2::new(shift * join.angle.sin(), -(shift * join.angle.cos()))
}

/// Runs the vertex stage for one vertex.
pub fn shade_vertex(vertex: &LineVertex, uniforms: &LineUniforms) -> ShadedVertex {
    let [r, g, b] = vertex.stroke_color;
    let color = [r, g, b, vertex.stroke_opacity];

    if vertex.stroke_opacity < 0.0 {
        return ShadedVertex { clip_position: HIDDEN_CLIP_POSITION, color };
    }

    let vp = uniforms.view_projection();
    let pos = to_screen(vp, Vec3::from_array(vertex.pos));
    let next = to_screen(vp, Vec3::from_array(vertex.next));
    let prev = to_screen(vp, Vec3::from_array(vertex.prev));

    let prev_xy = prev.truncate().truncate();
    let pos_xy = pos.truncate().truncate();
    let next_xy = next.truncate().truncate();

    let j = join(prev_xy, pos_xy, next_xy, uniforms.join_cos_threshold);
    let d = displacement(j, vertex.offset, vertex.stroke_width, uniforms.pixel_width);

    ShadedVertex {
        clip_position: Vec4::new(pos.x + d.x, pos.y + d.y, pos.z, pos.w),
        color,
    }
}
