use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use geoline_engine::coords::{LatLng, Position, Viewport};
use geoline_engine::device::{Gpu, SurfaceErrorAction};
use geoline_engine::feature::{Feature, FeatureCtx, JoinConfig, LineFeature, LineFeatureConfig};
use geoline_engine::projection::{CoordinateTransform, Crs, Projector};
use geoline_engine::render::{Camera, LineRenderer};
use geoline_engine::scene::{Bin, Scene};
use geoline_engine::style::{Accessor, StrokeColor};

use crate::config::StudioConfig;
use crate::dataset::{self, Route, Sample};

const CLEAR: wgpu::Color = wgpu::Color { r: 0.02, g: 0.03, b: 0.05, a: 1.0 };
const WIDTH_SCALES: [f32; 3] = [1.0, 2.0, 0.5];
const JOIN_THRESHOLDS: [f32; 2] = [0.1, 0.9];

/// Pan/zoom state in map units.
#[derive(Debug, Copy, Clone)]
struct MapView {
    center: Vec2,
    units_per_pixel: f32,
}

impl MapView {
    fn camera(&self, viewport: Viewport) -> Camera {
        Camera::map_view(self.center, self.units_per_pixel, viewport)
    }

    fn pan_pixels(&mut self, dx: f32, dy: f32) {
        // Screen +Y is down, map +Y is up.
        self.center.x -= dx * self.units_per_pixel;
        self.center.y += dy * self.units_per_pixel;
    }

    fn zoom(&mut self, steps: f32) {
        self.units_per_pixel = (self.units_per_pixel * 0.85_f32.powf(steps)).clamp(0.01, 10_000.0);
    }
}

pub struct Studio {
    config: StudioConfig,

    gpu: Option<Gpu>,
    scene: Scene,
    renderer: LineRenderer,
    projector: Projector,

    routes: LineFeature<Route, Sample>,
    graticule: LineFeature<Vec<LatLng>, LatLng>,

    home: MapView,
    view: MapView,
    cursor: Option<PhysicalPosition<f64>>,
    dragging: bool,

    width_scale: usize,
    join_threshold: usize,
}

impl Studio {
    pub fn new(config: StudioConfig) -> Result<Self> {
        let projector = Projector::new();
        let home = MapView {
            center: project_center(&projector, &config.map_crs, config.center)?,
            units_per_pixel: config.units_per_pixel,
        };

        let routes = dataset::routes(config.center);
        for r in &routes {
            log::info!("route {:<10} {} samples", r.name, r.samples.len());
        }

        let mut route_feature = LineFeature::new(
            LineFeatureConfig {
                source_crs: Crs::WGS84,
                bin: Bin(1),
                dynamic_draw: true,
                ..LineFeatureConfig::default()
            },
            |r: &Route, _| r.samples.clone(),
            Accessor::new(|s: &Sample, _, _, _| Position::from(s.at)),
        );
        route_feature.set_stroke_width(route_width(WIDTH_SCALES[0]));
        route_feature.set_stroke_color(Accessor::new(|s: &Sample, _, _, _| speed_color(s.speed)));
        route_feature.set_stroke_opacity(Accessor::new(|s: &Sample, _, _, _| {
            if s.hidden { -1.0 } else { 0.9 }
        }));
        route_feature.set_data(routes);

        let mut graticule = LineFeature::from_point_lists(LineFeatureConfig {
            source_crs: Crs::WGS84,
            bin: Bin(0),
            ..LineFeatureConfig::default()
        });
        graticule.set_stroke_color(Accessor::constant(StrokeColor::new(0.35, 0.4, 0.45)));
        graticule.set_stroke_opacity(Accessor::constant(0.5));
        graticule.set_data(dataset::graticule(config.center, 0.05, 0.01));

        Ok(Self {
            config,
            gpu: None,
            scene: Scene::new(),
            renderer: LineRenderer::new(),
            projector,
            routes: route_feature,
            graticule,
            home,
            view: home,
            cursor: None,
            dragging: false,
            width_scale: 0,
            join_threshold: 0,
        })
    }

    fn request_redraw(&self) {
        if let Some(gpu) = self.gpu.as_ref() {
            gpu.window().request_redraw();
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu = Gpu::new_blocking(Arc::new(window), self.config.gpu.clone())
            .context("GPU initialization failed")?;
        log::info!("surface format {:?}", gpu.surface_format());

        self.gpu = Some(gpu);
        Ok(())
    }

    /// Runs feature updates, then renders the scene. Returns `false` on a
    /// fatal surface error.
    fn redraw(&mut self) -> bool {
        let Some(gpu) = self.gpu.as_mut() else { return true };
        let viewport = gpu.viewport();

        {
            let mut ctx = FeatureCtx::new(&mut self.scene, viewport, &self.config.map_crs, &self.projector);
            let features: [&mut dyn Feature; 2] = [&mut self.graticule, &mut self.routes];
            for feature in features {
                if let Err(e) = feature.update(&mut ctx) {
                    log::error!("feature update failed: {e}");
                }
            }
        }

        let camera = self.view.camera(viewport);
        let (renderer, scene) = (&mut self.renderer, &mut self.scene);
        match gpu.render_frame(CLEAR, camera, |ctx, target| renderer.render(ctx, target, scene)) {
            Ok(()) => true,
            Err(SurfaceErrorAction::Fatal) => false,
            Err(SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame) => true,
        }
    }

    fn on_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Escape => return false,

            // Style change: rebuilds geometry.
            KeyCode::KeyW => {
                self.width_scale = (self.width_scale + 1) % WIDTH_SCALES.len();
                let scale = WIDTH_SCALES[self.width_scale];
                self.routes.set_stroke_width(route_width(scale));
                log::info!("route width x{scale}");
            }

            // Data change: rebuilds geometry (in place on the GPU when it fits).
            KeyCode::KeyA => {
                self.routes.edit_data(|routes| {
                    if let Some(coast) = routes.first_mut() {
                        coast.extend();
                    }
                });
            }

            // Uniform-only changes: no rebuild.
            KeyCode::KeyT => {
                self.join_threshold = (self.join_threshold + 1) % JOIN_THRESHOLDS.len();
                let cos_threshold = JOIN_THRESHOLDS[self.join_threshold];
                self.routes.set_join(JoinConfig { cos_threshold });
                log::info!("join cos threshold {cos_threshold}");
            }
            KeyCode::KeyV => {
                let visible = !self.graticule.base().visible();
                self.graticule.set_visible(visible);
            }
            KeyCode::KeyB => {
                let bin = if self.routes.base().bin() == Bin(1) { Bin(-1) } else { Bin(1) };
                self.routes.set_bin(bin);
                log::info!("routes moved to bin {}", bin.0);
            }

            KeyCode::KeyR => self.view = self.home,
            KeyCode::Equal => self.view.zoom(1.0),
            KeyCode::Minus => self.view.zoom(-1.0),
            KeyCode::ArrowLeft => self.view.pan_pixels(40.0, 0.0),
            KeyCode::ArrowRight => self.view.pan_pixels(-40.0, 0.0),
            KeyCode::ArrowUp => self.view.pan_pixels(0.0, 40.0),
            KeyCode::ArrowDown => self.view.pan_pixels(0.0, -40.0),
            _ => {}
        }
        true
    }
}

impl ApplicationHandler for Studio {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            log::error!("failed to create window: {e:#}");
            event_loop.exit();
            return;
        }
        self.request_redraw();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.routes.exit(&mut self.scene);
                self.graticule.exit(&mut self.scene);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size);
                }
                self.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(gpu) = self.gpu.as_mut() {
                    let size = gpu.window().inner_size();
                    gpu.resize(size);
                }
                self.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if !self.on_key(code) {
                        event_loop.exit();
                        return;
                    }
                    self.request_redraw();
                }
            }

            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                self.dragging = state == ElementState::Pressed;
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last)) = (self.dragging, self.cursor) {
                    self.view
                        .pan_pixels((position.x - last.x) as f32, (position.y - last.y) as f32);
                    self.request_redraw();
                }
                self.cursor = Some(position);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 40.0) as f32,
                };
                self.view.zoom(steps);
                self.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                if !self.redraw() {
                    log::error!("fatal surface error; exiting");
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

fn project_center(projector: &Projector, map_crs: &Crs, center: LatLng) -> Result<Vec2> {
    let xy = projector
        .transform(&Crs::WGS84, map_crs, &[center.lng, center.lat], 2)
        .with_context(|| format!("cannot project the view center into {map_crs}"))?;
    Ok(Vec2::new(xy[0] as f32, xy[1] as f32))
}

fn route_width(scale: f32) -> Accessor<Sample, f32> {
    Accessor::new(move |s: &Sample, _, _, _| (2.0 + s.speed / 15.0) * scale)
}

/// Slow is blue, fast is orange.
fn speed_color(speed: f32) -> StrokeColor {
    let t = (speed / 80.0).clamp(0.0, 1.0);
    StrokeColor::new(0.2 + 0.8 * t, 0.45, 1.0 - 0.8 * t)
}
