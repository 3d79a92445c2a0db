use crate::projection::Crs;
use crate::scene::Bin;
use crate::version::Version;

/// Lifecycle state shared by every feature.
///
/// Three logical stamps drive the rebuild decision:
/// - `data`: last dataset mutation
/// - `built`: last successful rebuild
/// - `updated`: last completed update
///
/// plus `modified`, the last configuration change that affects geometry.
/// A rebuild is required when `data >= built`, or when `modified` is newer
/// than both the last update and the last build.
#[derive(Debug, Clone)]
pub struct FeatureBase {
    modified: Version,
    data: Version,
    built: Version,
    updated: Version,

    visible: bool,
    bin: Bin,
    source_crs: Crs,
    exited: bool,
}

impl FeatureBase {
    pub fn new(source_crs: Crs, visible: bool, bin: Bin) -> Self {
        Self {
            modified: Version::UNSET,
            data: Version::UNSET,
            built: Version::UNSET,
            updated: Version::UNSET,
            visible,
            bin,
            source_crs,
            exited: false,
        }
    }

    pub fn needs_rebuild(&self) -> bool {
        self.data >= self.built || (self.updated <= self.modified && self.built <= self.modified)
    }

    /// Records a configuration change that invalidates the geometry.
    pub fn modified(&mut self) {
        self.modified.touch();
    }

    /// Records a dataset mutation.
    pub fn data_modified(&mut self) {
        self.data.touch();
    }

    pub fn mark_built(&mut self) {
        self.built.touch();
    }

    pub fn mark_updated(&mut self) {
        self.updated.touch();
    }

    pub fn mark_exited(&mut self) {
        self.exited = true;
    }

    #[inline]
    pub fn is_exited(&self) -> bool {
        self.exited
    }

    /// Whether a build has ever succeeded.
    #[inline]
    pub fn is_built(&self) -> bool {
        self.built.is_set()
    }

    #[inline]
    pub fn built_version(&self) -> Version {
        self.built
    }

    #[inline]
    pub fn updated_version(&self) -> Version {
        self.updated
    }

    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Visibility is pushed to the drawable on the next update; no rebuild.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn bin(&self) -> Bin {
        self.bin
    }

    /// The bin is pushed to the drawable on the next update; no rebuild.
    pub fn set_bin(&mut self, bin: Bin) {
        self.bin = bin;
    }

    #[inline]
    pub fn source_crs(&self) -> &Crs {
        &self.source_crs
    }

    pub fn set_source_crs(&mut self, crs: Crs) {
        if crs != self.source_crs {
            self.source_crs = crs;
            self.modified();
        }
    }
}

impl Default for FeatureBase {
    fn default() -> Self {
        Self::new(Crs::default(), true, Bin::default())
    }
}
