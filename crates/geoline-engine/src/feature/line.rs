use std::sync::Arc;

use crate::coords::{Position, Viewport};
use crate::geometry::{self, BuildError, TemplateEntry};
use crate::projection::Crs;
use crate::scene::{Bin, Drawable, DrawableSink, LineMaterial};
use crate::style::{Accessor, LineAccessors, StrokeColor};

use super::{Feature, FeatureBase, FeatureCtx, JoinConfig, LineFeatureConfig};

/// Extracts the polyline of one record: `(record, record_index) -> points`.
pub type LineGetter<R, P> = Box<dyn Fn(&R, usize) -> Vec<P>>;

/// A dataset of polylines drawn as constant-pixel-width mitered lines.
///
/// `R` is the record type of the dataset and `P` the point type produced by
/// the line getter. Style accessors are evaluated per point on rebuild;
/// changing any of them (or the data) schedules a rebuild for the next
/// [`update`](Feature::update). Visibility, bin and join tuning are applied
/// without rebuilding.
pub struct LineFeature<R, P> {
    base: FeatureBase,
    join: JoinConfig,
    dynamic_draw: bool,

    data: Vec<R>,
    line: LineGetter<R, P>,
    accessors: LineAccessors<P>,

    drawable: Option<Drawable>,
    warned_surface: bool,
}

impl<R, P: 'static> LineFeature<R, P> {
    pub fn new<F>(config: LineFeatureConfig, line: F, position: Accessor<P, Position>) -> Self
    where
        F: Fn(&R, usize) -> Vec<P> + 'static,
    {
        let LineFeatureConfig {
            source_crs,
            visible,
            bin,
            dynamic_draw,
            join,
        } = config;

        Self {
            base: FeatureBase::new(source_crs, visible, bin),
            join,
            dynamic_draw,
            data: Vec::new(),
            line: Box::new(line),
            accessors: LineAccessors::new(position),
            drawable: None,
            warned_surface: false,
        }
    }
}

impl<P> LineFeature<Vec<P>, P>
where
    P: Copy + Into<Position> + 'static,
{
    /// Feature whose records are the polylines themselves.
    pub fn from_point_lists(config: LineFeatureConfig) -> Self {
        Self::new(config, |points: &Vec<P>, _| points.clone(), Accessor::identity())
    }
}

impl<R, P> LineFeature<R, P> {
    /// The constant per-segment expansion template.
    pub fn vertex_template() -> &'static [TemplateEntry] {
        geometry::vertex_template()
    }

    pub fn vertices_per_segment() -> usize {
        geometry::vertices_per_segment()
    }

    pub fn data(&self) -> &[R] {
        &self.data
    }

    pub fn set_data(&mut self, data: Vec<R>) {
        self.data = data;
        self.base.data_modified();
    }

    /// Mutates the dataset in place and schedules a rebuild.
    pub fn edit_data(&mut self, f: impl FnOnce(&mut Vec<R>)) {
        f(&mut self.data);
        self.base.data_modified();
    }

    pub fn set_line<F>(&mut self, line: F)
    where
        F: Fn(&R, usize) -> Vec<P> + 'static,
    {
        self.line = Box::new(line);
        self.base.modified();
    }

    pub fn set_position(&mut self, accessor: Accessor<P, Position>) {
        self.accessors.position = accessor;
        self.base.modified();
    }

    pub fn set_stroke_width(&mut self, accessor: Accessor<P, f32>) {
        self.accessors.stroke_width = accessor;
        self.base.modified();
    }

    pub fn set_stroke_color(&mut self, accessor: Accessor<P, StrokeColor>) {
        self.accessors.stroke_color = accessor;
        self.base.modified();
    }

    pub fn set_stroke_opacity(&mut self, accessor: Accessor<P, f32>) {
        self.accessors.stroke_opacity = accessor;
        self.base.modified();
    }

    pub fn set_source_crs(&mut self, crs: Crs) {
        self.base.set_source_crs(crs);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.base.set_visible(visible);
    }

    pub fn set_bin(&mut self, bin: Bin) {
        self.base.set_bin(bin);
    }

    pub fn join(&self) -> JoinConfig {
        self.join
    }

    /// Applied through the material on the next update.
    pub fn set_join(&mut self, join: JoinConfig) {
        self.join = join;
    }

    pub fn dynamic_draw(&self) -> bool {
        self.dynamic_draw
    }

    fn material(&mut self, surface: Viewport) -> LineMaterial {
        if !(surface.width > 0.0 && surface.width.is_finite()) && !self.warned_surface {
            log::warn!("line feature: unusable surface width {}; strokes collapse", surface.width);
            self.warned_surface = true;
        }
        LineMaterial {
            pixel_width: surface.pixel_width(),
            join_cos_threshold: self.join.cos_threshold,
        }
    }
}

impl<R, P> Feature for LineFeature<R, P> {
    fn base(&self) -> &FeatureBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FeatureBase {
        &mut self.base
    }

    fn build(&mut self, ctx: &mut FeatureCtx<'_>) -> Result<(), BuildError> {
        if self.base.is_exited() {
            log::debug!("line feature: build after exit ignored");
            return Ok(());
        }

        let polylines: Vec<Vec<P>> = self
            .data
            .iter()
            .enumerate()
            .map(|(i, record)| (self.line)(record, i))
            .collect();

        // Built completely before anything is swapped.
        let geometry = geometry::build_line_buffers(
            &polylines,
            &self.accessors,
            ctx.transform,
            self.base.source_crs(),
            ctx.map_crs,
        )?;

        let material = self.material(ctx.surface);
        let drawable = self
            .drawable
            .get_or_insert_with(|| Drawable::new(material, self.dynamic_draw));
        drawable.replace_geometry(Arc::new(geometry));
        drawable.set_material(material);
        drawable.set_visible(self.base.visible());
        drawable.set_bin(self.base.bin());
        ctx.sink.add_drawable(drawable);

        self.base.mark_built();
        log::debug!(
            "line feature: built {} lines into {} vertices",
            polylines.len(),
            drawable.geometry().vertex_count()
        );
        Ok(())
    }

    fn update(&mut self, ctx: &mut FeatureCtx<'_>) -> Result<(), BuildError> {
        if self.base.is_exited() {
            return Ok(());
        }

        // On failure the previous drawable is still refreshed below; the
        // feature stays dirty and retries on the next update.
        let built = if self.base.needs_rebuild() { self.build(ctx) } else { Ok(()) };

        let material = self.material(ctx.surface);
        if let Some(drawable) = self.drawable.as_mut() {
            drawable.set_material(material);
            drawable.set_visible(self.base.visible());
            drawable.set_bin(self.base.bin());

            let id = drawable.id();
            ctx.sink.set_material(id, material);
            ctx.sink.set_visible(id, self.base.visible());
            ctx.sink.set_bin(id, self.base.bin());
        }

        built?;
        self.base.mark_updated();
        log::trace!("line feature: updated (pixel width {})", material.pixel_width);
        Ok(())
    }

    fn drawables(&self) -> &[Drawable] {
        self.drawable.as_slice()
    }

    fn exit(&mut self, sink: &mut dyn DrawableSink) {
        if let Some(drawable) = self.drawable.take() {
            sink.remove_drawable(drawable.id());
        }
        self.base.mark_exited();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projector;
    use crate::scene::Scene;

    fn feature() -> LineFeature<Vec<[f64; 2]>, [f64; 2]> {
        LineFeature::from_point_lists(LineFeatureConfig::default())
    }

    fn update(f: &mut LineFeature<Vec<[f64; 2]>, [f64; 2]>, scene: &mut Scene, width: f32) {
        let crs = Crs::WGS84;
        let projector = Projector::new();
        let mut ctx = FeatureCtx::new(scene, Viewport::new(width, 600.0), &crs, &projector);
        f.update(&mut ctx).unwrap();
    }

    #[test]
    fn template_is_exposed() {
        type F = LineFeature<Vec<[f64; 2]>, [f64; 2]>;
        assert_eq!(F::vertices_per_segment(), 6);
        assert_eq!(F::vertex_template().len(), 6);
    }

    #[test]
    fn record_getter_receives_record_index() {
        struct Track {
            points: Vec<[f64; 2]>,
        }
        let mut f: LineFeature<Track, [f64; 2]> = LineFeature::new(
            LineFeatureConfig::default(),
            |t: &Track, i| t.points.iter().map(|p| [p[0], p[1] + i as f64]).collect(),
            Accessor::identity(),
        );
        f.set_data(vec![
            Track { points: vec![[0.0, 0.0], [1.0, 0.0]] },
            Track { points: vec![[0.0, 0.0], [1.0, 0.0]] },
        ]);

        let mut scene = Scene::new();
        let crs = Crs::WGS84;
        let projector = Projector::new();
        let mut ctx = FeatureCtx::new(&mut scene, Viewport::new(800.0, 600.0), &crs, &projector);
        f.update(&mut ctx).unwrap();

        let geometry = f.drawables()[0].geometry();
        assert_eq!(geometry.vertex_count(), 12);
        assert_eq!(geometry.vertices()[6].pos[1], 1.0);
    }

    #[test]
    fn join_change_does_not_rebuild() {
        let mut f = feature();
        let mut scene = Scene::new();
        f.set_data(vec![vec![[0.0, 0.0], [1.0, 0.0]]]);
        update(&mut f, &mut scene, 800.0);
        let version = f.drawables()[0].geometry_version();

        f.set_join(JoinConfig { cos_threshold: 0.5 });
        assert!(!f.needs_rebuild());
        update(&mut f, &mut scene, 800.0);

        let d = &f.drawables()[0];
        assert_eq!(d.geometry_version(), version);
        assert_eq!(d.material().join_cos_threshold, 0.5);
        assert_eq!(scene.get(d.id()).map(|d| d.material().join_cos_threshold), Some(0.5));
    }

    #[test]
    fn update_after_exit_is_a_no_op() {
        let mut f = feature();
        let mut scene = Scene::new();
        f.set_data(vec![vec![[0.0, 0.0], [1.0, 0.0]]]);
        update(&mut f, &mut scene, 800.0);
        f.exit(&mut scene);
        update(&mut f, &mut scene, 800.0);
        assert!(f.drawables().is_empty());
        assert!(scene.is_empty());
    }
}
