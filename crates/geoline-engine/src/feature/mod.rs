//! Features: datasets that own drawables and keep them in sync with the scene.
//!
//! A feature tracks its own lifecycle stamps (see [`FeatureBase`]) and decides
//! on every [`Feature::update`] whether its geometry must be rebuilt or only
//! its per-frame parameters refreshed.

mod base;
mod config;
mod ctx;
mod line;

pub use base::FeatureBase;
pub use config::{JoinConfig, LineFeatureConfig};
pub use ctx::FeatureCtx;
pub use line::{LineFeature, LineGetter};

use crate::geometry::BuildError;
use crate::scene::{Drawable, DrawableSink};

/// Contract between a feature and its host.
pub trait Feature {
    fn base(&self) -> &FeatureBase;
    fn base_mut(&mut self) -> &mut FeatureBase;

    /// Rebuilds geometry unconditionally and hands it to the sink.
    ///
    /// On failure the previously built geometry stays in place.
    fn build(&mut self, ctx: &mut FeatureCtx<'_>) -> Result<(), BuildError>;

    /// Per-frame entry point: rebuilds when required, then refreshes pixel
    /// width, visibility and bin. The refresh runs even when the rebuild
    /// fails; the build error is returned afterwards.
    fn update(&mut self, ctx: &mut FeatureCtx<'_>) -> Result<(), BuildError>;

    /// Drawables owned by the feature; empty before the first build.
    fn drawables(&self) -> &[Drawable];

    /// Detaches every drawable from the sink. Terminal.
    fn exit(&mut self, sink: &mut dyn DrawableSink);

    fn needs_rebuild(&self) -> bool {
        self.base().needs_rebuild()
    }
}
