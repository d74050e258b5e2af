use std::{
    borrow::Cow,
    collections::HashMap,
    sync::Arc
};

use bytemuck::{
    Pod,
    Zeroable
};

use image::RgbaImage;

use wgpu::{
    util::DeviceExt, Device, RenderPipeline
};

use winit::window::Window;

use crate::{
    assets::{
        Assets,
        TextureId
    },
    game::{
        config::{
            BACKGROUND_COLOR,
            VIEWPORT_HEIGHT,
            VIEWPORT_WIDTH
        },
        entities::SpriteKind,
        math::{
            Vector2F,
            Vector2U
        }
    }
};

use super::{
    letterbox_viewport,
    srgb_to_linear,
    SpriteDraw
};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("Failed to create surface, reason='{0}'")]
    CreateSurfaceError(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to request device, reason='{0}'")]
    RequestDeviceError(#[from] wgpu::RequestDeviceError),

    #[error("Failed to acquire swapchain texture, reason='{0}'")]
    SurfaceError(#[from] wgpu::SurfaceError),
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    uv: [f32; 2],
}

/// Four corners of a quad in NDC, from a rect in logical viewport pixels.
fn create_sprite_quad_vertices(draw: &SpriteDraw, texture_size: Vector2U) -> [Vertex; 4] {
    let logical = Vector2F::new(VIEWPORT_WIDTH as f32, VIEWPORT_HEIGHT as f32);
    let to_ndc = |p: Vector2F| [
        p.x / logical.x * 2.0 - 1.0,
        1.0 - p.y / logical.y * 2.0
    ];

    let texture_size = Vector2F::from(texture_size);
    let src_min = Vector2F::from(draw.src.pos);
    let src_max = Vector2F::from(draw.src.max_corner());
    let uv_min = [src_min.x / texture_size.x, src_min.y / texture_size.y];
    let uv_max = [src_max.x / texture_size.x, src_max.y / texture_size.y];

    let top_left = draw.dest.pos;
    let bottom_right = draw.dest.max_corner();

    [
        Vertex { position: to_ndc(Vector2F::new(top_left.x, bottom_right.y)), uv: [uv_min[0], uv_max[1]] },       // Bottom-left
        Vertex { position: to_ndc(bottom_right), uv: uv_max },                                                  // Bottom-right
        Vertex { position: to_ndc(Vector2F::new(bottom_right.x, top_left.y)), uv: [uv_max[0], uv_min[1]] },     // Top-right
        Vertex { position: to_ndc(top_left), uv: uv_min },                                                      // Top-left
    ]
}

/// The adapter's preferred format comes first.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Result<wgpu::TextureFormat, RenderError> {
    formats
        .first()
        .copied()
        .ok_or(RenderError::NoSurfaceFormat)
}

const QUAD_INDICES: [u32; 6] = [
    0, 1, 2, // First triangle
    2, 3, 0, // Second triangle
];

struct GpuTexture {
    bind_group: wgpu::BindGroup,
    size: Vector2U,
}

pub struct Renderer {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: winit::dpi::PhysicalSize<u32>,
    surface: wgpu::Surface<'static>,
    surface_format: wgpu::TextureFormat,
    render_pipeline: RenderPipeline,
    textures: HashMap<TextureId, GpuTexture>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, assets: &Assets) -> Result<Renderer, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor::default(),
                None
            )
            .await?;

        let size = window.inner_size();
        let cap = surface.get_capabilities(&adapter);
        let surface_format = pick_surface_format(&cap.formats)?;

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Sprite Texture Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let render_pipeline = Self::prepare_pipeline(
            &device,
            surface_format.add_srgb_suffix(),
            &texture_bind_group_layout
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Pixel Art Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let texture_ids = [
            TextureId::Sprite(SpriteKind::Ninja),
            TextureId::Sprite(SpriteKind::Skeleton),
            TextureId::Sprite(SpriteKind::Potion),
            TextureId::Tileset,
        ];

        let textures = texture_ids
            .into_iter()
            .map(|texture_id| {
                let texture = Self::upload_texture(
                    &device,
                    &queue,
                    &texture_bind_group_layout,
                    &sampler,
                    assets.image(texture_id)
                );
                (texture_id, texture)
            })
            .collect();

        let renderer = Renderer {
            window,
            device,
            queue,
            size,
            surface,
            surface_format,
            render_pipeline,
            textures,
        };

        // Configure surface for the first time
        renderer.configure_surface();
        log::info!("Renderer ready, surface format {:?}, size {}x{}", surface_format, size.width, size.height);

        Ok(renderer)
    }

    fn upload_texture(
        device: &Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &RgbaImage,
    ) -> GpuTexture {
        let (width, height) = image.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Sprite Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image,
        );

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        GpuTexture {
            bind_group,
            size: Vector2U::new(width, height),
        }
    }

    fn prepare_pipeline(
        device: &Device,
        target_format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shader.wgsl"))),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    pub fn get_window(&self) -> &Window {
        &self.window
    }

    fn configure_surface(&self) {
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.surface_format,
            view_formats: vec![self.surface_format.add_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: self.size.width,
            height: self.size.height,
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::AutoVsync,
        };
        self.surface.configure(&self.device, &surface_config);
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.size = new_size;

        // A minimized window reports zero size, the surface cannot be configured like that.
        if self.is_drawable() {
            log::info!("Surface resized to {}x{}", new_size.width, new_size.height);
            self.configure_surface();
        }
    }

    fn is_drawable(&self) -> bool {
        self.size.width > 0 && self.size.height > 0
    }

    pub fn render(&mut self, draws: &[SpriteDraw]) -> Result<(), RenderError> {
        if !self.is_drawable() {
            return Ok(());
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.configure_surface();
                return Ok(());
            },
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out, skipping frame");
                return Ok(());
            },
            Err(err) => return Err(err.into()),
        };

        let texture_view = surface_texture.texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.surface_format.add_srgb_suffix()),
                ..Default::default()
            });

        let mut vertices: Vec<Vertex> = Vec::with_capacity(draws.len() * 4);
        let mut indices: Vec<u32> = Vec::with_capacity(draws.len() * 6);
        let mut batches: Vec<(TextureId, std::ops::Range<u32>)> = Vec::with_capacity(draws.len());

        for draw in draws.iter() {
            let Some(texture) = self.textures.get(&draw.texture) else {
                continue;
            };
            let base = vertices.len() as u32;
            let first_index = indices.len() as u32;
            vertices.extend_from_slice(&create_sprite_quad_vertices(draw, texture.size));
            indices.extend(QUAD_INDICES.iter().map(|i| base + i));
            batches.push((draw.texture, first_index..first_index + QUAD_INDICES.len() as u32));
        }

        let mut encoder = self.device.create_command_encoder(&Default::default());

        {
            let [r, g, b] = BACKGROUND_COLOR;
            let mut renderpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: srgb_to_linear(r),
                            g: srgb_to_linear(g),
                            b: srgb_to_linear(b),
                            a: 1.0
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !batches.is_empty() {
                let viewport = letterbox_viewport(self.size.width, self.size.height, VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
                renderpass.set_viewport(viewport.x, viewport.y, viewport.width, viewport.height, 0.0, 1.0);
                renderpass.set_pipeline(&self.render_pipeline);

                let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Sprite Vertex Buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });

                let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Sprite Index Buffer"),
                    contents: bytemuck::cast_slice(&indices),
                    usage: wgpu::BufferUsages::INDEX,
                });

                renderpass.set_vertex_buffer(0, vertex_buffer.slice(..));
                renderpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                let mut bound_texture = None;
                for (texture_id, index_range) in batches {
                    if bound_texture != Some(texture_id) {
                        if let Some(texture) = self.textures.get(&texture_id) {
                            renderpass.set_bind_group(0, &texture.bind_group, &[]);
                        }
                        bound_texture = Some(texture_id);
                    }
                    renderpass.draw_indexed(index_range, 0, 0..1);
                }
            }
        }

        // Submit the command in the queue to execute
        self.queue.submit([encoder.finish()]);
        self.window.pre_present_notify();
        surface_texture.present();
        Ok(())
    }
}

#[test]
fn test_pick_surface_format_takes_first() {
    let formats = [wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Rgba8Unorm];
    assert_eq!(pick_surface_format(&formats).unwrap(), wgpu::TextureFormat::Bgra8Unorm);
}

#[test]
fn test_pick_surface_format_rejects_empty_list() {
    assert!(matches!(pick_surface_format(&[]), Err(RenderError::NoSurfaceFormat)));
}
