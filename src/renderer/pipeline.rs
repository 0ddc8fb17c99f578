//! wgpu backend: presents a tessellated `DrawList` on the canvas surface

use anyhow::{Context, Result, anyhow};

use super::draw::DrawList;
use super::shapes;
use super::vertex::Vertex;

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.04,
    g: 0.04,
    b: 0.04,
    a: 1.0,
};

/// Room for this many vertices before the first grow
const INITIAL_VERTICES: u64 = 4096;

/// Device, surface and the single triangle-list pipeline
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertices: VertexBuffer,
    /// Backing store size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("club-arcade-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| anyhow!("Failed to create device: {e}"))?;

        let config = surface_config(&surface.get_capabilities(adapter), width, height)?;
        surface.configure(&device, &config);
        let pipeline = build_pipeline(&device, config.format);
        let vertices = VertexBuffer::new(&device, INITIAL_VERTICES);
        log::info!("Surface {}x{} as {:?}", config.width, config.height, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertices,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Tessellate the list and present it
    pub fn render(&mut self, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let (w, h) = (list.width().max(1.0), list.height().max(1.0));
        let clip: Vec<Vertex> = shapes::tessellate(list)
            .into_iter()
            .map(|v| v.to_clip(w, h))
            .collect();
        let count = self.vertices.upload(&self.device, &self.queue, &clip);

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("draw_list"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            if count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertices.buffer.slice(..vertex_bytes(count)));
                pass.draw(0..count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Prefer an sRGB format; fall back to whatever the surface offers first
fn surface_config(caps: &wgpu::SurfaceCapabilities, width: u32, height: u32) -> Result<wgpu::SurfaceConfiguration> {
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first().copied())
        .context("Surface reports no texture formats")?;

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}

fn build_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("draw_list_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("draw_list_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("draw_list_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Tessellated shapes have mixed winding
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn vertex_bytes(count: u32) -> wgpu::BufferAddress {
    count as u64 * std::mem::size_of::<Vertex>() as u64
}

/// Vertex buffer reused across frames, regrown when a frame outgrows it
struct VertexBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl VertexBuffer {
    fn new(device: &wgpu::Device, capacity: u64) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_list_vertices"),
            size: capacity * std::mem::size_of::<Vertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity }
    }

    /// Copy `vertices` in, growing first if needed; returns the draw count
    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[Vertex]) -> u32 {
        if vertices.is_empty() {
            return 0;
        }
        let needed = vertices.len() as u64;
        if needed > self.capacity {
            *self = Self::new(device, grown_capacity(self.capacity, needed));
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(vertices));
        vertices.len() as u32
    }
}

fn grown_capacity(current: u64, needed: u64) -> u64 {
    needed.next_power_of_two().max(current * 2)
}
