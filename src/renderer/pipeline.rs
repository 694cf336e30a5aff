//! WebGPU render pipeline setup
//!
//! One vertex buffer lives for the whole session. It is rewritten with
//! `Queue::write_buffer` each frame and only reallocated when the grid holds
//! more quads than it has room for.

use super::shapes::grid_quads;
use super::vertex::{Vertex, colors};
use crate::sim::Grid;

/// Convert a pixel position (origin top-left, y down) to NDC
///
/// `world` is the pixel extent of the grid; it is stretched over the surface.
#[inline]
pub fn pixel_to_ndc(x: f32, y: f32, world: (f32, f32)) -> (f32, f32) {
    (x / world.0 * 2.0 - 1.0, 1.0 - y / world.1 * 2.0)
}

/// Smallest vertex capacity at least `needed`, or `current` if it already fits
///
/// Growth rounds up to a power of two so a slowly filling grid reallocates
/// a handful of times rather than every frame.
pub fn buffer_capacity(needed: usize, current: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.max(MIN_VERTEX_CAPACITY).next_power_of_two()
    }
}

/// Initial vertex capacity (1024 cells)
const MIN_VERTEX_CAPACITY: usize = 6 * 1024;

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("vertex_buffer"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_cell_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("cell_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("cell_pipeline_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    // Cells are opaque and never overlap
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("cell_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    /// Vertices `vertex_buffer` can hold
    pub vertex_capacity: usize,
    pub vertex_count: u32,
    /// Per-frame NDC vertices, reused to avoid reallocating
    scratch: Vec<Vertex>,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Pixels per cell side
    pub cell_size: f32,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        cell_size: f32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sand-sandbox-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_cell_pipeline(&device, config.format);
        let vertex_capacity = MIN_VERTEX_CAPACITY;
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity,
            vertex_count: 0,
            scratch: Vec::new(),
            size: (width, height),
            cell_size,
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Draw every non-empty cell of `grid` over the background
    pub fn render(&mut self, grid: &Grid) -> Result<(), wgpu::SurfaceError> {
        let world = (
            grid.width() as f32 * self.cell_size,
            grid.height() as f32 * self.cell_size,
        );
        self.scratch.clear();
        self.scratch
            .extend(grid_quads(grid, self.cell_size).iter().map(|v| {
                let (x, y) = pixel_to_ndc(v.position[0], v.position[1], world);
                Vertex::new(x, y, v.color)
            }));

        let capacity = buffer_capacity(self.scratch.len(), self.vertex_capacity);
        if capacity != self.vertex_capacity {
            log::debug!("Growing vertex buffer to {} vertices", capacity);
            self.vertex_buffer = create_vertex_buffer(&self.device, capacity);
            self.vertex_capacity = capacity;
        }

        self.vertex_count = self.scratch.len() as u32;
        if self.vertex_count > 0 {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.scratch));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
