use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::BufferSet;
use crate::version::Version;

use super::Bin;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a drawable; stable across geometry rebuilds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DrawableId(u64);

impl DrawableId {
    fn next() -> Self {
        DrawableId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Per-drawable parameters of the join shader that do not depend on the camera.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineMaterial {
    /// Reciprocal of the render-surface width (0 when the width is unusable).
    pub pixel_width: f32,
    /// Half-angle cosine below which a join is treated as a reversal.
    pub join_cos_threshold: f32,
}

impl Default for LineMaterial {
    fn default() -> Self {
        Self {
            pixel_width: 0.0,
            join_cos_threshold: 0.1,
        }
    }
}

/// A scene resource: shared immutable geometry plus the state the renderer
/// needs to draw it.
///
/// A feature owns its drawable; the scene keeps a registered copy that the
/// feature keeps in sync through the [`DrawableSink`](super::DrawableSink)
/// setters. Cloning is cheap because geometry is reference counted.
#[derive(Debug, Clone)]
pub struct Drawable {
    id: DrawableId,
    geometry: Arc<BufferSet>,
    geometry_version: Version,
    material: LineMaterial,
    visible: bool,
    bin: Bin,
    dynamic_draw: bool,
}

impl Drawable {
    pub fn new(material: LineMaterial, dynamic_draw: bool) -> Self {
        Self {
            id: DrawableId::next(),
            geometry: Arc::new(BufferSet::default()),
            geometry_version: Version::UNSET,
            material,
            visible: true,
            bin: Bin::default(),
            dynamic_draw,
        }
    }

    #[inline]
    pub fn id(&self) -> DrawableId {
        self.id
    }

    #[inline]
    pub fn geometry(&self) -> &Arc<BufferSet> {
        &self.geometry
    }

    /// Changes whenever the geometry is replaced; renderers re-upload on change.
    #[inline]
    pub fn geometry_version(&self) -> Version {
        self.geometry_version
    }

    #[inline]
    pub fn material(&self) -> LineMaterial {
        self.material
    }

    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn bin(&self) -> Bin {
        self.bin
    }

    /// Whether GPU buffers should be allocated for in-place rewrites.
    #[inline]
    pub fn dynamic_draw(&self) -> bool {
        self.dynamic_draw
    }

    /// Replaces the geometry wholesale.
    pub fn replace_geometry(&mut self, geometry: Arc<BufferSet>) {
        self.geometry = geometry;
        self.geometry_version = Version::next();
    }

    pub fn set_material(&mut self, material: LineMaterial) {
        self.material = material;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_bin(&mut self, bin: Bin) {
        self.bin = bin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = Drawable::new(LineMaterial::default(), false);
        let b = Drawable::new(LineMaterial::default(), false);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn replacing_geometry_bumps_version() {
        let mut d = Drawable::new(LineMaterial::default(), false);
        assert!(!d.geometry_version().is_set());
        d.replace_geometry(Arc::new(BufferSet::default()));
        let first = d.geometry_version();
        d.replace_geometry(Arc::new(BufferSet::default()));
        assert!(d.geometry_version() > first);
    }

    #[test]
    fn default_threshold() {
        assert_eq!(LineMaterial::default().join_cos_threshold, 0.1);
    }
}
