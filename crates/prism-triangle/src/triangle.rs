use anyhow::{Context, Result};
use glam::{Mat4, Vec2};
use prism_common::input::{InputFrame, InputState, Key, MouseButton};
use prism_common::{
    Camera, Control, Example, GpuCtx, InitCtx, RenderCtx, Resolution, ScissorRect, UpdateCtx,
    Viewport,
};
use wgpu::util::DeviceExt;

use crate::geometry::{Transforms, Vertex, INDEX_COUNT, INDICES, VERTICES};

const SHADER_SRC: &str = include_str!("shaders/pass_through.wgsl");

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.2,
    a: 1.0,
};

/// Camera orbit per logical pixel of left-drag, in degrees.
const ROTATE_DEGREES_PER_PIXEL: f32 = 0.5;

/// Camera zoom per wheel line, in world units.
const ZOOM_PER_LINE: f32 = 0.5;

/// Camera orbit speed while an arrow key is held, in degrees per second.
const ROTATE_DEGREES_PER_SECOND: f32 = 90.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Options {
    /// Upload geometry through a staging buffer and a GPU copy instead of
    /// creating the buffers from host memory directly.
    pub use_staging_buffer: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            use_staging_buffer: true,
        }
    }
}

/// Vertex and index buffers of the triangle.
struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl Mesh {
    fn new(gpu: &GpuCtx<'_>, options: Options) -> Self {
        let vertices: &[u8] = bytemuck::cast_slice(&VERTICES);
        let indices: &[u8] = bytemuck::cast_slice(&INDICES);

        if !options.use_staging_buffer {
            let vertex_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("triangle vertex buffer"),
                contents: vertices,
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("triangle index buffer"),
                contents: indices,
                usage: wgpu::BufferUsages::INDEX,
            });
            return Self {
                vertex_buffer,
                index_buffer,
            };
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("triangle upload encoder"),
            });

        let vertex_buffer = upload_via_staging(
            gpu.device,
            &mut encoder,
            "triangle vertex buffer",
            vertices,
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = upload_via_staging(
            gpu.device,
            &mut encoder,
            "triangle index buffer",
            indices,
            wgpu::BufferUsages::INDEX,
        );

        gpu.queue.submit(std::iter::once(encoder.finish()));

        Self {
            vertex_buffer,
            index_buffer,
        }
    }
}

/// Creates a device-local buffer and records a copy of `contents` into it.
///
/// The staging buffer is released once the copy has executed.
fn upload_via_staging(
    device: &wgpu::Device,
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    contents: &[u8],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    let staging = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("triangle staging buffer"),
        contents,
        usage: wgpu::BufferUsages::COPY_SRC,
    });

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: contents.len() as u64,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    encoder.copy_buffer_to_buffer(&staging, 0, &buffer, 0, contents.len() as u64);
    buffer
}

/// One `Transforms` uniform buffer per drawable slot.
struct SlotUniform {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct TriangleGpu {
    pipeline: wgpu::RenderPipeline,
    mesh: Mesh,
    slots: Vec<SlotUniform>,
}

impl TriangleGpu {
    fn new(gpu: &GpuCtx<'_>, options: Options) -> Result<Self> {
        let shader = gpu.create_shader("triangle pass_through shader", SHADER_SRC);

        let uniform_size = wgpu::BufferSize::new(std::mem::size_of::<Transforms>() as u64)
            .context("transforms uniform has zero size")?;

        let bind_group_layout =
            gpu.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("triangle transforms layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(uniform_size),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("triangle pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = gpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("triangle pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // The camera orbits behind the triangle.
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

        let slots = (0..gpu.drawable_count)
            .map(|slot| {
                let buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("triangle transforms {slot}")),
                    contents: bytemuck::bytes_of(&Transforms::default()),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("triangle transforms bind group {slot}")),
                    layout: &bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                SlotUniform { buffer, bind_group }
            })
            .collect();

        Ok(Self {
            pipeline,
            mesh: Mesh::new(gpu, options),
            slots,
        })
    }
}

/// Indexed, vertex-coloured triangle viewed through an orbiting camera.
///
/// Left-drag or the arrow keys orbit, the wheel zooms and `S` toggles
/// staging uploads.
pub struct Triangle {
    options: Options,
    camera: Camera,
    transforms: Transforms,
    viewport: Viewport,
    scissor_rect: ScissorRect,
    gpu: Option<TriangleGpu>,
}

impl Triangle {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            camera: Camera::new(),
            transforms: Transforms::default(),
            viewport: Viewport::default(),
            scissor_rect: ScissorRect::default(),
            gpu: None,
        }
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Rebuilds the transforms from the camera.
    fn refresh_transforms(&mut self) {
        self.transforms = Transforms {
            projection: self.camera.projection(),
            view: self.camera.view(),
            model: Mat4::IDENTITY,
        };
    }
}

impl Default for Triangle {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Orbits on left-drag or held arrow keys and zooms on wheel.
///
/// `dt` is the frame delta in seconds. Returns whether the camera moved.
pub fn apply_camera_input(
    camera: &mut Camera,
    input: &InputState,
    frame: &InputFrame,
    dt: f32,
) -> bool {
    let mut moved = false;

    let axis = |negative: Key, positive: Key| {
        (input.key_down(positive) as i8 - input.key_down(negative) as i8) as f32
    };
    let keys = Vec2::new(
        axis(Key::ArrowLeft, Key::ArrowRight),
        axis(Key::ArrowDown, Key::ArrowUp),
    );
    if keys != Vec2::ZERO {
        camera.rotate_by(keys * ROTATE_DEGREES_PER_SECOND * dt);
        moved = true;
    }

    let (dx, dy) = frame.pointer_delta;
    if input.button_down(MouseButton::Left) && (dx != 0.0 || dy != 0.0) {
        camera.rotate_by(Vec2::new(dx, dy) * ROTATE_DEGREES_PER_PIXEL);
        moved = true;
    }

    let (_, lines) = frame.wheel_lines;
    if lines != 0.0 {
        camera.zoom_by(lines * ZOOM_PER_LINE);
        moved = true;
    }

    moved
}

impl Example for Triangle {
    fn title(&self) -> &str {
        "Triangle"
    }

    fn on_init(&mut self, ctx: &mut InitCtx<'_>) -> Result<()> {
        self.gpu = Some(TriangleGpu::new(&ctx.gpu, self.options)?);
        self.refresh_transforms();
        log::debug!(
            "triangle resources ready: {} uniform slots, staging upload {}",
            ctx.gpu.drawable_count,
            self.options.use_staging_buffer
        );
        Ok(())
    }

    fn on_term(&mut self) {
        self.gpu = None;
    }

    fn on_resize(&mut self, resolution: Resolution) {
        self.camera.set_aspect_ratio(resolution.aspect_ratio());
        self.viewport = Viewport::from_resolution(resolution);
        self.scissor_rect = ScissorRect::from_resolution(resolution);
    }

    fn on_update(&mut self, ctx: &mut UpdateCtx<'_>, index: usize) -> Control {
        if ctx.input_frame.key_pressed(Key::S) {
            self.options.use_staging_buffer = !self.options.use_staging_buffer;
            if let Some(gpu) = self.gpu.as_mut() {
                gpu.mesh = Mesh::new(&ctx.gpu, self.options);
            }
            log::info!("use staging buffer: {}", self.options.use_staging_buffer);
        }

        apply_camera_input(&mut self.camera, ctx.input, ctx.input_frame, ctx.time.dt);
        self.refresh_transforms();

        if let Some(slot) = self.gpu.as_ref().and_then(|gpu| gpu.slots.get(index)) {
            ctx.gpu
                .queue
                .write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&self.transforms));
        }

        Control::Continue
    }

    fn on_render(&mut self, ctx: &mut RenderCtx<'_>, index: usize) -> Control {
        let mut pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        self.viewport.apply(&mut pass);
        self.scissor_rect.apply(&mut pass);

        let Some(gpu) = self.gpu.as_ref() else {
            return Control::Continue;
        };
        let Some(slot) = gpu.slots.get(index) else {
            log::warn!("no uniform slot for frame index {index}");
            return Control::Continue;
        };

        pass.set_pipeline(&gpu.pipeline);
        pass.set_bind_group(0, &slot.bind_group, &[]);
        pass.set_vertex_buffer(0, gpu.mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(gpu.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..INDEX_COUNT, 0, 0..1);
        Control::Continue
    }
}
