use glam::{Mat4, Vec2, Vec3};

use crate::coords::Viewport;

/// View and projection transforms fed to the join shader every frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub model_view: Mat4,
    pub projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::identity()
    }
}

impl Camera {
    /// Positions are already in clip space.
    pub const fn identity() -> Self {
        Self {
            model_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }

    /// Top-down orthographic map view.
    ///
    /// `center` is in display CRS units and `units_per_pixel` sets the zoom.
    /// +Y points up, as in projected map coordinates.
    pub fn map_view(center: Vec2, units_per_pixel: f32, viewport: Viewport) -> Self {
        let half_w = 0.5 * viewport.width.max(1.0) * units_per_pixel;
        let half_h = 0.5 * viewport.height.max(1.0) * units_per_pixel;
        Self {
            model_view: Mat4::from_translation(Vec3::new(-center.x, -center.y, 0.0)),
            projection: Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, -1.0, 1.0),
        }
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.model_view
    }
}
