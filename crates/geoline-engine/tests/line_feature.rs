use std::cell::Cell;
use std::sync::Arc;

use geoline_engine::coords::Viewport;
use geoline_engine::feature::{Feature, FeatureCtx, LineFeature, LineFeatureConfig};
use geoline_engine::geometry::BuildError;
use geoline_engine::projection::{CoordinateTransform, Crs, ProjectionError, Projector};
use geoline_engine::scene::{Bin, DrawableSink, Scene};
use geoline_engine::style::{Accessor, AccessorError, StrokeColor, StyleKey};

/// Projector that counts batched calls; one call per rebuild.
#[derive(Default)]
struct CountingTransform {
    calls: Cell<usize>,
}

impl CoordinateTransform for CountingTransform {
    fn transform(
        &self,
        source: &Crs,
        target: &Crs,
        coords: &[f64],
        dimension: usize,
    ) -> Result<Vec<f64>, ProjectionError> {
        self.calls.set(self.calls.get() + 1);
        Projector.transform(source, target, coords, dimension)
    }
}

struct Host {
    scene: Scene,
    map_crs: Crs,
    transform: CountingTransform,
}

impl Host {
    fn new() -> Self {
        Self::with_crs(Crs::WGS84)
    }

    fn with_crs(map_crs: Crs) -> Self {
        Self {
            scene: Scene::new(),
            map_crs,
            transform: CountingTransform::default(),
        }
    }

    fn update(&mut self, feature: &mut dyn Feature, width: f32) -> Result<(), BuildError> {
        let mut ctx = FeatureCtx::new(
            &mut self.scene,
            Viewport::new(width, 600.0),
            &self.map_crs,
            &self.transform,
        );
        feature.update(&mut ctx)
    }

    fn build(&mut self, feature: &mut dyn Feature, width: f32) -> Result<(), BuildError> {
        let mut ctx = FeatureCtx::new(
            &mut self.scene,
            Viewport::new(width, 600.0),
            &self.map_crs,
            &self.transform,
        );
        feature.build(&mut ctx)
    }

    fn builds(&self) -> usize {
        self.transform.calls.get()
    }
}

type Lines = LineFeature<Vec<[f64; 2]>, [f64; 2]>;

fn corner() -> Vec<[f64; 2]> {
    vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]
}

fn feature_with(lines: Vec<Vec<[f64; 2]>>) -> Lines {
    let mut f = Lines::from_point_lists(LineFeatureConfig::default());
    f.set_data(lines);
    f
}

#[test]
fn drawables_are_empty_until_first_update() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);
    assert!(f.drawables().is_empty());
    assert!(f.needs_rebuild());

    host.update(&mut f, 800.0).unwrap();

    assert_eq!(f.drawables().len(), 1);
    assert_eq!(host.scene.len(), 1);
    assert_eq!(host.builds(), 1);
    assert!(!f.needs_rebuild());
}

#[test]
fn corner_geometry_is_shared_with_the_scene() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);
    host.update(&mut f, 800.0).unwrap();

    let owned = &f.drawables()[0];
    let registered = host.scene.get(owned.id()).unwrap();
    assert!(Arc::ptr_eq(owned.geometry(), registered.geometry()));

    let geometry = owned.geometry();
    assert_eq!(geometry.vertex_count(), 12);
    // First vertex of the second segment sits on the corner.
    let join = geometry.vertices()[6];
    assert_eq!(join.pos, [10.0, 0.0, 0.0]);
    assert_eq!(join.prev, [0.0, 0.0, 0.0]);
    assert_eq!(join.next, [10.0, 10.0, 0.0]);
}

#[test]
fn unchanged_update_refreshes_pixel_width_without_rebuilding() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);
    host.update(&mut f, 800.0).unwrap();
    let version = f.drawables()[0].geometry_version();
    assert_eq!(f.drawables()[0].material().pixel_width, 1.0 / 800.0);

    host.update(&mut f, 400.0).unwrap();

    assert_eq!(host.builds(), 1);
    let d = &f.drawables()[0];
    assert_eq!(d.geometry_version(), version);
    assert_eq!(d.material().pixel_width, 1.0 / 400.0);
    assert_eq!(host.scene.get(d.id()).unwrap().material().pixel_width, 1.0 / 400.0);
}

#[test]
fn data_change_rebuilds() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);
    host.update(&mut f, 800.0).unwrap();

    f.set_data(vec![corner(), vec![[0.0, 0.0], [5.0, 5.0]]]);
    assert!(f.needs_rebuild());
    host.update(&mut f, 800.0).unwrap();

    assert_eq!(host.builds(), 2);
    assert_eq!(f.drawables()[0].geometry().vertex_count(), 18);
}

#[test]
fn in_place_edit_rebuilds() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);
    host.update(&mut f, 800.0).unwrap();

    f.edit_data(|lines| lines[0].push([0.0, 10.0]));
    host.update(&mut f, 800.0).unwrap();

    assert_eq!(host.builds(), 2);
    assert_eq!(f.drawables()[0].geometry().vertex_count(), 18);
}

#[test]
fn style_change_rebuilds_with_exact_values() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);
    host.update(&mut f, 800.0).unwrap();

    f.set_stroke_width(Accessor::new(|_, i, _, _| 2.0 + i as f32));
    f.set_stroke_color(Accessor::constant(StrokeColor::new(0.25, 0.5, 0.75)));
    f.set_stroke_opacity(Accessor::constant(0.5));
    host.update(&mut f, 800.0).unwrap();

    assert_eq!(host.builds(), 2);
    let vertices = f.drawables()[0].geometry().vertices();
    // Segment 0 start vertex is point 0; segment 1 start vertex is point 1.
    assert_eq!(vertices[0].stroke_width, 2.0);
    assert_eq!(vertices[6].stroke_width, 3.0);
    assert!(vertices.iter().all(|v| v.stroke_color == [0.25, 0.5, 0.75]));
    assert!(vertices.iter().all(|v| v.stroke_opacity == 0.5));
}

#[test]
fn visibility_and_bin_propagate_without_rebuilding() {
    let mut host = Host::new();
    let mut a = feature_with(vec![corner()]);
    let mut b = feature_with(vec![corner()]);
    host.update(&mut a, 800.0).unwrap();
    host.update(&mut b, 800.0).unwrap();

    a.set_visible(false);
    host.update(&mut a, 800.0).unwrap();
    assert_eq!(host.builds(), 2);
    let a_id = a.drawables()[0].id();
    assert!(!host.scene.get(a_id).unwrap().visible());
    assert_eq!(host.scene.visible_in_draw_order().count(), 1);

    a.set_visible(true);
    a.set_bin(Bin(2));
    b.set_bin(Bin(1));
    host.update(&mut a, 800.0).unwrap();
    host.update(&mut b, 800.0).unwrap();
    assert_eq!(host.builds(), 2);

    let order: Vec<_> = host.scene.visible_in_draw_order().map(|d| d.id()).collect();
    assert_eq!(order, vec![b.drawables()[0].id(), a_id]);
}

#[test]
fn unusable_surface_width_collapses_strokes() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);

    host.update(&mut f, 0.0).unwrap();
    assert_eq!(f.drawables()[0].material().pixel_width, 0.0);

    host.update(&mut f, f32::NAN).unwrap();
    assert_eq!(f.drawables()[0].material().pixel_width, 0.0);
}

#[test]
fn accessor_failure_keeps_previous_geometry() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);
    host.update(&mut f, 800.0).unwrap();
    let before = Arc::clone(f.drawables()[0].geometry());
    let version = f.drawables()[0].geometry_version();

    f.set_stroke_width(Accessor::fallible(|_, i, _, _| {
        if i == 1 { Err(AccessorError::new("no width")) } else { Ok(1.0) }
    }));
    let err = host.update(&mut f, 800.0).unwrap_err();

    assert!(matches!(
        err,
        BuildError::Accessor { key: StyleKey::StrokeWidth, line: 0, point: 1, .. }
    ));
    let d = &f.drawables()[0];
    assert_eq!(d.geometry_version(), version);
    assert!(Arc::ptr_eq(d.geometry(), &before));
    assert!(Arc::ptr_eq(host.scene.get(d.id()).unwrap().geometry(), &before));

    // Still dirty, so fixing the accessor rebuilds on the next update.
    assert!(f.needs_rebuild());
    f.set_stroke_width(Accessor::constant(1.0));
    host.update(&mut f, 800.0).unwrap();
    assert!(f.drawables()[0].geometry_version() > version);
}

#[test]
fn failed_rebuild_still_refreshes_the_previous_drawable() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);
    host.update(&mut f, 800.0).unwrap();
    let version = f.drawables()[0].geometry_version();

    f.set_stroke_width(Accessor::fallible(|_, _, _, _| Err(AccessorError::new("no width"))));
    f.set_visible(false);
    f.set_bin(Bin(4));
    assert!(host.update(&mut f, 400.0).is_err());

    let d = &f.drawables()[0];
    assert_eq!(d.geometry_version(), version);
    assert!(!d.visible());
    assert_eq!(d.material().pixel_width, 1.0 / 400.0);

    let registered = host.scene.get(d.id()).unwrap();
    assert!(!registered.visible());
    assert_eq!(registered.bin(), Bin(4));
    assert_eq!(registered.material().pixel_width, 1.0 / 400.0);
    assert_eq!(host.scene.visible_in_draw_order().count(), 0);
    assert!(f.needs_rebuild());
}

#[test]
fn explicit_build_then_update_builds_once() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);

    host.build(&mut f, 800.0).unwrap();
    host.update(&mut f, 800.0).unwrap();
    assert_eq!(host.builds(), 1);

    f.set_stroke_width(Accessor::constant(3.0));
    host.build(&mut f, 800.0).unwrap();
    host.update(&mut f, 800.0).unwrap();
    assert_eq!(host.builds(), 2);
    assert!(!f.needs_rebuild());
}

#[test]
fn invalid_width_is_rejected() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);
    f.set_stroke_width(Accessor::constant(-1.0));

    let err = host.update(&mut f, 800.0).unwrap_err();
    assert!(matches!(err, BuildError::InvalidStyle { key: StyleKey::StrokeWidth, .. }));
    assert!(f.drawables().is_empty());
}

#[test]
fn positions_are_projected_to_the_map_crs() {
    let mut host = Host::with_crs(Crs::WEB_MERCATOR);
    let mut f = feature_with(vec![vec![[0.0, 0.0], [10.0, 0.0]]]);
    host.update(&mut f, 800.0).unwrap();

    let bounds = f.drawables()[0].geometry().bounds().unwrap();
    assert!((bounds.max[0] - 1_113_194.9).abs() < 1.0);
    assert!(bounds.max[1].abs() < 1e-3);
}

#[test]
fn source_crs_change_rebuilds() {
    let mut host = Host::with_crs(Crs::WEB_MERCATOR);
    let mut f = feature_with(vec![vec![[0.0, 0.0], [10.0, 0.0]]]);
    host.update(&mut f, 800.0).unwrap();

    f.set_source_crs(Crs::WEB_MERCATOR);
    host.update(&mut f, 800.0).unwrap();

    assert_eq!(host.builds(), 2);
    assert_eq!(f.drawables()[0].geometry().vertices()[1].pos[0], 10.0);
}

#[test]
fn exit_detaches_the_drawable() {
    let mut host = Host::new();
    let mut f = feature_with(vec![corner()]);
    host.update(&mut f, 800.0).unwrap();

    f.exit(&mut host.scene);

    assert!(f.drawables().is_empty());
    assert!(host.scene.is_empty());
}

#[test]
fn host_sink_can_be_any_implementation() {
    #[derive(Default)]
    struct Log(Vec<&'static str>);

    impl DrawableSink for Log {
        fn add_drawable(&mut self, _: &geoline_engine::scene::Drawable) {
            self.0.push("add");
        }
        fn remove_drawable(&mut self, _: geoline_engine::scene::DrawableId) {
            self.0.push("remove");
        }
        fn set_visible(&mut self, _: geoline_engine::scene::DrawableId, _: bool) {
            self.0.push("visible");
        }
        fn set_bin(&mut self, _: geoline_engine::scene::DrawableId, _: Bin) {
            self.0.push("bin");
        }
        fn set_material(&mut self, _: geoline_engine::scene::DrawableId, _: geoline_engine::scene::LineMaterial) {
            self.0.push("material");
        }
    }

    let mut sink = Log::default();
    let crs = Crs::WGS84;
    let projector = Projector::new();
    let mut f = feature_with(vec![corner()]);
    {
        let mut ctx = FeatureCtx::new(&mut sink, Viewport::new(800.0, 600.0), &crs, &projector);
        f.update(&mut ctx).unwrap();
        f.update(&mut ctx).unwrap();
    }
    f.exit(&mut sink);

    assert_eq!(
        sink.0,
        vec!["add", "material", "visible", "bin", "material", "visible", "bin", "remove"]
    );
}
