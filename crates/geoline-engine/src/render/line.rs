use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::geometry::{BufferSet, LineVertex};
use crate::render::{LineUniforms, RenderCtx, RenderTarget, LINE_JOIN_SHADER};
use crate::scene::{Drawable, DrawableId, Scene};
use crate::version::Version;

use super::common::{alpha_blend, dynamic_capacity, line_ubo_min_binding_size};

/// Wide-line renderer.
///
/// Draws every visible drawable of a [`Scene`] with the `line_join` program.
/// GPU buffers are cached per drawable and re-uploaded only when the drawable's
/// geometry version changes. Drawables flagged `dynamic_draw` get `COPY_DST`
/// buffers with headroom that are rewritten in place while the data fits.
#[derive(Default)]
pub struct LineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    lines: HashMap<DrawableId, GpuLine>,
}

struct GpuLine {
    geometry_version: Version,
    dynamic: bool,

    vbo: wgpu::Buffer,
    vbo_capacity: u64,
    ibo: wgpu::Buffer,
    ibo_capacity: u64,
    vertex_bytes: u64,
    index_bytes: u64,
    index_count: u32,

    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drawables with resident GPU buffers.
    pub fn resident_count(&self) -> usize {
        self.lines.len()
    }

    /// Renders the visible drawables of `scene` into `target`, in draw order.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, scene: &mut Scene) {
        self.ensure_pipeline(ctx);

        // Drop buffers of drawables that left the scene.
        self.lines.retain(|id, _| scene.contains(*id));

        // Drawables are cheap to clone (geometry is shared); cloning ends the
        // borrow of the scene before GPU state is mutated.
        let visible: Vec<Drawable> = scene.visible_in_draw_order().cloned().collect();
        if visible.is_empty() {
            return;
        }

        for drawable in &visible {
            self.sync_geometry(ctx, drawable);
            self.write_uniforms(ctx, drawable);
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("geoline line pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);

        for drawable in &visible {
            let Some(gpu) = self.lines.get(&drawable.id()) else { continue };
            if gpu.index_count == 0 {
                continue;
            }
            rpass.set_bind_group(0, &gpu.bind_group, &[]);
            rpass.set_vertex_buffer(0, gpu.vbo.slice(..gpu.vertex_bytes));
            rpass.set_index_buffer(gpu.ibo.slice(..gpu.index_bytes), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = LINE_JOIN_SHADER.create_module(ctx.device);

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("geoline line bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(line_ubo_min_binding_size()),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("geoline line pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("geoline line pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(LINE_JOIN_SHADER.vertex_entry),
                compilation_options: Default::default(),
                buffers: &[LineVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(LINE_JOIN_SHADER.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Offsets flip sides between triangles, so winding is not meaningful.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("line pipeline created for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        // Bind groups belong to the old layout.
        self.lines.clear();
    }

    fn sync_geometry(&mut self, ctx: &RenderCtx<'_>, drawable: &Drawable) {
        let id = drawable.id();
        let version = drawable.geometry_version();
        let geometry = drawable.geometry();

        if let Some(gpu) = self.lines.get_mut(&id) {
            if gpu.geometry_version == version {
                return;
            }
            if gpu.dynamic && drawable.dynamic_draw() && gpu.fits(geometry) {
                gpu.rewrite(ctx, geometry, version);
                return;
            }
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let previous = self.lines.remove(&id);
        let (ubo, bind_group) = match previous {
            Some(old) => (old.ubo, old.bind_group),
            None => create_binding(ctx, bgl),
        };

        let gpu = GpuLine::upload(ctx, geometry, version, drawable.dynamic_draw(), ubo, bind_group);
        log::debug!(
            "uploaded drawable {id:?}: {} vertices{}",
            geometry.vertex_count(),
            if gpu.dynamic { " (dynamic)" } else { "" }
        );
        self.lines.insert(id, gpu);
    }

    fn write_uniforms(&self, ctx: &RenderCtx<'_>, drawable: &Drawable) {
        let Some(gpu) = self.lines.get(&drawable.id()) else { return };
        let u = LineUniforms::new(&ctx.camera, drawable.material());
        ctx.queue.write_buffer(&gpu.ubo, 0, bytemuck::bytes_of(&u));
    }
}

fn create_binding(ctx: &RenderCtx<'_>, bgl: &wgpu::BindGroupLayout) -> (wgpu::Buffer, wgpu::BindGroup) {
    let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("geoline line ubo"),
        size: std::mem::size_of::<LineUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("geoline line bind group"),
        layout: bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: ubo.as_entire_binding(),
        }],
    });

    (ubo, bind_group)
}

impl GpuLine {
    fn upload(
        ctx: &RenderCtx<'_>,
        geometry: &BufferSet,
        version: Version,
        dynamic: bool,
        ubo: wgpu::Buffer,
        bind_group: wgpu::BindGroup,
    ) -> Self {
        let vertex_bytes = geometry.vertex_bytes();
        let index_bytes = geometry.index_bytes();

        let (vbo, vbo_capacity, ibo, ibo_capacity) = if dynamic {
            let vbo_capacity = dynamic_capacity(vertex_bytes.len() as u64);
            let ibo_capacity = dynamic_capacity(index_bytes.len() as u64);
            let vbo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("geoline line vbo (dynamic)"),
                size: vbo_capacity,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let ibo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("geoline line ibo (dynamic)"),
                size: ibo_capacity,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            if !vertex_bytes.is_empty() {
                ctx.queue.write_buffer(&vbo, 0, vertex_bytes);
                ctx.queue.write_buffer(&ibo, 0, index_bytes);
            }
            (vbo, vbo_capacity, ibo, ibo_capacity)
        } else {
            let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("geoline line vbo"),
                contents: vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX,
            });
            let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("geoline line ibo"),
                contents: index_bytes,
                usage: wgpu::BufferUsages::INDEX,
            });
            (vbo, vertex_bytes.len() as u64, ibo, index_bytes.len() as u64)
        };

        Self {
            geometry_version: version,
            dynamic,
            vbo,
            vbo_capacity,
            ibo,
            ibo_capacity,
            vertex_bytes: vertex_bytes.len() as u64,
            index_bytes: index_bytes.len() as u64,
            index_count: geometry.indices().len() as u32,
            ubo,
            bind_group,
        }
    }

    fn fits(&self, geometry: &BufferSet) -> bool {
        geometry.vertex_bytes().len() as u64 <= self.vbo_capacity
            && geometry.index_bytes().len() as u64 <= self.ibo_capacity
    }

    fn rewrite(&mut self, ctx: &RenderCtx<'_>, geometry: &BufferSet, version: Version) {
        let vertex_bytes = geometry.vertex_bytes();
        let index_bytes = geometry.index_bytes();
        if !vertex_bytes.is_empty() {
            ctx.queue.write_buffer(&self.vbo, 0, vertex_bytes);
            ctx.queue.write_buffer(&self.ibo, 0, index_bytes);
        }
        self.vertex_bytes = vertex_bytes.len() as u64;
        self.index_bytes = index_bytes.len() as u64;
        self.index_count = geometry.indices().len() as u32;
        self.geometry_version = version;
        log::trace!("rewrote dynamic line buffers in place ({} vertices)", geometry.vertex_count());
    }
}
