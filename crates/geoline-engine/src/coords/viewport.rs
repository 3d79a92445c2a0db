/// Render-surface size in pixels.
///
/// Used by the line pipeline to turn a stroke width given in pixels into
/// clip-space units.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Reciprocal of the surface width, fed to the join shader as `pixel_width`.
    ///
    /// A zero, negative or non-finite width yields `0.0`: strokes collapse to
    /// nothing instead of propagating infinity or NaN into the shader.
    #[inline]
    pub fn pixel_width(self) -> f32 {
        if self.width > 0.0 && self.width.is_finite() {
            1.0 / self.width
        } else {
            0.0
        }
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        if self.is_valid() { self.width / self.height } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_width_is_reciprocal_of_width() {
        assert_eq!(Viewport::new(800.0, 600.0).pixel_width(), 1.0 / 800.0);
    }

    #[test]
    fn pixel_width_guards_unusable_widths() {
        assert_eq!(Viewport::new(0.0, 600.0).pixel_width(), 0.0);
        assert_eq!(Viewport::new(-5.0, 600.0).pixel_width(), 0.0);
        assert_eq!(Viewport::new(f32::NAN, 600.0).pixel_width(), 0.0);
        assert_eq!(Viewport::new(f32::INFINITY, 600.0).pixel_width(), 0.0);
        assert_eq!(Viewport::default().pixel_width(), 0.0);
    }

    #[test]
    fn aspect_falls_back_to_square() {
        assert_eq!(Viewport::new(0.0, 0.0).aspect(), 1.0);
        assert_eq!(Viewport::new(200.0, 100.0).aspect(), 2.0);
    }
}
