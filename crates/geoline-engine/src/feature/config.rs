use crate::projection::Crs;
use crate::scene::Bin;

/// Join shader tuning.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct JoinConfig {
    /// Half-angle cosine below which a join is treated as a reversal and drawn
    /// at plain stroke width instead of mitered.
    pub cos_threshold: f32,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self { cos_threshold: 0.1 }
    }
}

/// Construction parameters of a [`LineFeature`](super::LineFeature).
#[derive(Debug, Clone, PartialEq)]
pub struct LineFeatureConfig {
    /// CRS of the positions returned by the position accessor.
    pub source_crs: Crs,
    pub visible: bool,
    pub bin: Bin,
    /// Geometry is expected to change often; GPU buffers are allocated for
    /// in-place rewrites.
    pub dynamic_draw: bool,
    pub join: JoinConfig,
}

impl Default for LineFeatureConfig {
    fn default() -> Self {
        Self {
            source_crs: Crs::default(),
            visible: true,
            bin: Bin::default(),
            dynamic_draw: false,
            join: JoinConfig::default(),
        }
    }
}
