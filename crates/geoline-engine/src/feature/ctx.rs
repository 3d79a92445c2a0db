use crate::coords::Viewport;
use crate::projection::{CoordinateTransform, Crs};
use crate::scene::DrawableSink;

/// Host services handed to a feature for one `build`/`update` call.
pub struct FeatureCtx<'a> {
    pub sink: &'a mut dyn DrawableSink,
    /// Render-surface size this frame.
    pub surface: Viewport,
    /// Display CRS of the map.
    pub map_crs: &'a Crs,
    pub transform: &'a dyn CoordinateTransform,
}

impl<'a> FeatureCtx<'a> {
    #[inline]
    pub fn new(
        sink: &'a mut dyn DrawableSink,
        surface: Viewport,
        map_crs: &'a Crs,
        transform: &'a dyn CoordinateTransform,
    ) -> Self {
        Self {
            sink,
            surface,
            map_crs,
            transform,
        }
    }
}
