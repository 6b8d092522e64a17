//! GPU-facing data and the wgpu renderer.
//!
//! Vertex and uniform layouts are built here from the scene world on every
//! target so they can be checked natively; only the wasm32 build talks to
//! an actual device.

use scene::World;
use scene::components::{LightingSummary, Material, Shape3D};
use scene::mesh::{TriangleMesh, starfield_positions, uv_sphere};

use crate::camera::Camera;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// 1.0 samples the globe texture, 0.0 uses `color` alone.
    pub textured: f32,
    pub color: [f32; 4],
}

/// One corner of a star billboard; six per star.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StarVertex {
    pub center: [f32; 3],
    pub corner: [f32; 2],
    pub color: [f32; 4],
}

const STAR_CORNERS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshBatch {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshBatch {
    fn append(&mut self, mesh: &TriangleMesh, color: [f32; 4], textured: bool) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(mesh.vertices.iter().map(|v| MeshVertex {
            position: v.position.as_f32(),
            normal: v.normal.as_f32(),
            uv: [v.uv[0] as f32, v.uv[1] as f32],
            textured: if textured { 1.0 } else { 0.0 },
            color,
        }));
        self.indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Everything the renderer uploads once at startup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneGeometry {
    pub lit: MeshBatch,
    pub unlit: MeshBatch,
    pub stars: Vec<StarVertex>,
    /// World-space star billboard edge length.
    pub star_size: f32,
}

impl SceneGeometry {
    /// Tessellate every visible drawable, grouped by pipeline.
    pub fn from_world(world: &World) -> Self {
        let mut geometry = SceneGeometry::default();
        for (_, transform, drawable) in world.drawables_3d() {
            match (drawable.shape, drawable.material) {
                (
                    Shape3D::Sphere {
                        radius,
                        width_segments,
                        height_segments,
                    },
                    material,
                ) => {
                    let mesh = uv_sphere(radius, width_segments, height_segments)
                        .translated(transform.position);
                    match material {
                        Material::Lit { color, textured } => {
                            geometry.lit.append(&mesh, color, textured)
                        }
                        Material::Unlit { color } | Material::Points { color, .. } => {
                            geometry.unlit.append(&mesh, color, false)
                        }
                    }
                }
                (
                    Shape3D::PointCloud {
                        count,
                        half_extent,
                        seed,
                    },
                    material,
                ) => {
                    let (color, size) = match material {
                        Material::Points { color, size } => (color, size),
                        Material::Lit { color, .. } | Material::Unlit { color } => (color, 1.0),
                    };
                    geometry.star_size = size;
                    for p in starfield_positions(count, half_extent, seed) {
                        let center = transform.apply(p).as_f32();
                        geometry.stars.extend(STAR_CORNERS.iter().map(|&corner| StarVertex {
                            center,
                            corner,
                            color,
                        }));
                    }
                }
            }
        }
        geometry
    }
}

/// Per-frame uniform block shared by every pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// xyz: unit vector toward the directional light.
    pub light_dir: [f32; 4],
    pub ambient: [f32; 4],
    pub directional: [f32; 4],
    /// x: star size (world units), y/z: viewport size in physical pixels.
    pub star_params: [f32; 4],
}

impl Globals {
    pub fn new(
        camera: &Camera,
        lighting: &LightingSummary,
        star_size: f32,
        viewport_px: [f32; 2],
    ) -> Self {
        let [lx, ly, lz] = lighting.direction.as_f32();
        let [ar, ag, ab] = lighting.ambient;
        let [dr, dg, db] = lighting.directional;
        Self {
            view: camera.view_matrix(),
            proj: camera.projection_matrix(),
            light_dir: [lx, ly, lz, 0.0],
            ambient: [ar, ag, ab, 0.0],
            directional: [dr, dg, db, 0.0],
            star_params: [star_size, viewport_px[0].max(1.0), viewport_px[1].max(1.0), 0.0],
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use std::borrow::Cow;
    use tracing::info;

    use super::{Globals, MeshBatch, MeshVertex, SceneGeometry, StarVertex};
    use crate::assets::TextureImage;
    use crate::error::ViewerError;

    const GLOBALS_WGSL: &str = r#"
struct Globals {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    light_dir: vec4<f32>,
    ambient: vec4<f32>,
    directional: vec4<f32>,
    star_params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
"#;

    const MESH_WGSL: &str = r#"
@group(1) @binding(0)
var globe_tex: texture_2d<f32>;
@group(1) @binding(1)
var globe_sampler: sampler;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) textured: f32,
    @location(3) color: vec4<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) textured: f32,
    @location(4) color: vec4<f32>,
) -> VsOut {
    let clip = globals.proj * globals.view * vec4<f32>(position, 1.0);
    return VsOut(clip, normal, uv, textured, color);
}

@fragment
fn fs_lit(in: VsOut) -> @location(0) vec4<f32> {
    let texel = textureSample(globe_tex, globe_sampler, in.uv);
    let base = in.color * mix(vec4<f32>(1.0), texel, in.textured);
    let n = normalize(in.normal);
    let ndotl = max(dot(n, globals.light_dir.xyz), 0.0);
    let light = globals.ambient.rgb + globals.directional.rgb * ndotl;
    return vec4<f32>(min(base.rgb * light, vec3<f32>(1.0)), base.a);
}

@fragment
fn fs_unlit(in: VsOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

    const STARS_WGSL: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(
    @location(0) center: vec3<f32>,
    @location(1) corner: vec2<f32>,
    @location(2) color: vec4<f32>,
) -> VsOut {
    var clip = globals.proj * globals.view * vec4<f32>(center, 1.0);
    // Perspective-scaled size in pixels, never below one pixel.
    let viewport = globals.star_params.yz;
    let size_px = max(globals.star_params.x * globals.proj[1][1] * viewport.y * 0.5 / max(clip.w, 1e-6), 1.0);
    clip = vec4<f32>(clip.xy + corner * size_px / viewport * clip.w, clip.z, clip.w);
    return VsOut(clip, color);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

    const DEPTH_FORMAT: ::wgpu::TextureFormat = ::wgpu::TextureFormat::Depth24Plus;

    pub struct Renderer {
        _instance: &'static ::wgpu::Instance,
        surface: ::wgpu::Surface<'static>,
        device: ::wgpu::Device,
        queue: ::wgpu::Queue,
        config: ::wgpu::SurfaceConfiguration,
        depth_view: ::wgpu::TextureView,
        globals_buffer: ::wgpu::Buffer,
        globals_bind_group: ::wgpu::BindGroup,
        texture_layout: ::wgpu::BindGroupLayout,
        texture_bind_group: ::wgpu::BindGroup,
        stars_pipeline: ::wgpu::RenderPipeline,
        lit_pipeline: ::wgpu::RenderPipeline,
        unlit_pipeline: ::wgpu::RenderPipeline,
        stars: Option<(::wgpu::Buffer, u32)>,
        lit: Option<GpuMesh>,
        unlit: Option<GpuMesh>,
    }

    impl std::fmt::Debug for Renderer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Renderer")
                .field("width", &self.config.width)
                .field("height", &self.config.height)
                .field("format", &self.config.format)
                .finish_non_exhaustive()
        }
    }

    struct GpuMesh {
        vertices: ::wgpu::Buffer,
        indices: ::wgpu::Buffer,
        index_count: u32,
    }

    fn upload_mesh(device: &::wgpu::Device, label: &str, batch: &MeshBatch) -> Option<GpuMesh> {
        if batch.is_empty() {
            return None;
        }
        let vertices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&batch.vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&batch.indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });
        Some(GpuMesh {
            vertices,
            indices,
            index_count: batch.indices.len() as u32,
        })
    }

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("globe-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    fn create_texture_bind_group(
        device: &::wgpu::Device,
        queue: &::wgpu::Queue,
        layout: &::wgpu::BindGroupLayout,
        image: &TextureImage,
    ) -> ::wgpu::BindGroup {
        let size = ::wgpu::Extent3d {
            width: image.width.max(1),
            height: image.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("globe-texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: ::wgpu::TextureUsages::TEXTURE_BINDING | ::wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            ::wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: ::wgpu::Origin3d::ZERO,
                aspect: ::wgpu::TextureAspect::All,
            },
            &image.rgba,
            ::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            size,
        );
        let view = texture.create_view(&::wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&::wgpu::SamplerDescriptor {
            label: Some("globe-sampler"),
            address_mode_u: ::wgpu::AddressMode::Repeat,
            address_mode_v: ::wgpu::AddressMode::ClampToEdge,
            mag_filter: ::wgpu::FilterMode::Linear,
            min_filter: ::wgpu::FilterMode::Linear,
            ..Default::default()
        });
        device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-texture-bg"),
            layout,
            entries: &[
                ::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ::wgpu::BindingResource::TextureView(&view),
                },
                ::wgpu::BindGroupEntry {
                    binding: 1,
                    resource: ::wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        })
    }

    fn primitive(topology: ::wgpu::PrimitiveTopology) -> ::wgpu::PrimitiveState {
        ::wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: ::wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: ::wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        }
    }

    fn depth_state(write: bool) -> Option<::wgpu::DepthStencilState> {
        Some(::wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: write,
            depth_compare: ::wgpu::CompareFunction::LessEqual,
            stencil: ::wgpu::StencilState::default(),
            bias: ::wgpu::DepthBiasState::default(),
        })
    }

    const MESH_ATTRIBUTES: [::wgpu::VertexAttribute; 5] = ::wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Float32,
        4 => Float32x4
    ];

    const STAR_ATTRIBUTES: [::wgpu::VertexAttribute; 3] = ::wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2,
        2 => Float32x4
    ];

    impl Renderer {
        pub async fn new(
            canvas: web_sys::HtmlCanvasElement,
            geometry: &SceneGeometry,
        ) -> Result<Self, ViewerError> {
            let width = canvas.width();
            let height = canvas.height();

            // `Surface<'static>` must not outlive its instance, so the
            // instance lives for the rest of the page.
            let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
                &::wgpu::InstanceDescriptor {
                    backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                    ..Default::default()
                },
            )));

            let surface = instance
                .create_surface(::wgpu::SurfaceTarget::Canvas(canvas))
                .map_err(|e| ViewerError::Surface(e.to_string()))?;

            let adapter = instance
                .request_adapter(&::wgpu::RequestAdapterOptions {
                    power_preference: ::wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .map_err(|e| ViewerError::Adapter(e.to_string()))?;

            let (device, queue) = adapter
                .request_device(&::wgpu::DeviceDescriptor {
                    label: Some("globe-device"),
                    required_features: ::wgpu::Features::empty(),
                    required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                    ..Default::default()
                })
                .await
                .map_err(|e| ViewerError::Device(e.to_string()))?;

            let caps = surface.get_capabilities(&adapter);
            let format = caps
                .formats
                .iter()
                .copied()
                .find(|f| f.is_srgb())
                .or_else(|| caps.formats.first().copied())
                .ok_or_else(|| ViewerError::Surface("no supported surface format".to_string()))?;
            let alpha_mode = caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

            let config = ::wgpu::SurfaceConfiguration {
                usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: width.max(1),
                height: height.max(1),
                desired_maximum_frame_latency: 2,
                present_mode: ::wgpu::PresentMode::Fifo,
                alpha_mode,
                view_formats: vec![],
            };
            surface.configure(&device, &config);
            let depth_view = create_depth_view(&device, &config);

            let mesh_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
                label: Some("globe-mesh-shader"),
                source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(format!("{GLOBALS_WGSL}{MESH_WGSL}"))),
            });
            let stars_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
                label: Some("globe-stars-shader"),
                source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(format!("{GLOBALS_WGSL}{STARS_WGSL}"))),
            });

            let globals_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
                label: Some("globe-globals"),
                size: std::mem::size_of::<Globals>() as u64,
                usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let globals_layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some("globe-globals-bgl"),
                entries: &[::wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: ::wgpu::BindingType::Buffer {
                        ty: ::wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
            let globals_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
                label: Some("globe-globals-bg"),
                layout: &globals_layout,
                entries: &[::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                }],
            });

            let texture_layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some("globe-texture-bgl"),
                entries: &[
                    ::wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: ::wgpu::ShaderStages::FRAGMENT,
                        ty: ::wgpu::BindingType::Texture {
                            sample_type: ::wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: ::wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    ::wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: ::wgpu::ShaderStages::FRAGMENT,
                        ty: ::wgpu::BindingType::Sampler(::wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });
            let texture_bind_group =
                create_texture_bind_group(&device, &queue, &texture_layout, &TextureImage::white());

            let mesh_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
                label: Some("globe-mesh-pipeline-layout"),
                bind_group_layouts: &[&globals_layout, &texture_layout],
                immediate_size: 0,
            });
            let stars_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
                label: Some("globe-stars-pipeline-layout"),
                bind_group_layouts: &[&globals_layout],
                immediate_size: 0,
            });

            let mesh_buffers = [::wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as ::wgpu::BufferAddress,
                step_mode: ::wgpu::VertexStepMode::Vertex,
                attributes: &MESH_ATTRIBUTES,
            }];
            let star_buffers = [::wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<StarVertex>() as ::wgpu::BufferAddress,
                step_mode: ::wgpu::VertexStepMode::Vertex,
                attributes: &STAR_ATTRIBUTES,
            }];

            let mesh_pipeline = |label: &str, fs: &str, blend: ::wgpu::BlendState| {
                device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
                    label: Some(label),
                    layout: Some(&mesh_layout),
                    vertex: ::wgpu::VertexState {
                        module: &mesh_shader,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &mesh_buffers,
                    },
                    fragment: Some(::wgpu::FragmentState {
                        module: &mesh_shader,
                        entry_point: Some(fs),
                        compilation_options: Default::default(),
                        targets: &[Some(::wgpu::ColorTargetState {
                            format: config.format,
                            blend: Some(blend),
                            write_mask: ::wgpu::ColorWrites::ALL,
                        })],
                    }),
                    primitive: primitive(::wgpu::PrimitiveTopology::TriangleList),
                    depth_stencil: depth_state(true),
                    multisample: ::wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                })
            };
            let lit_pipeline = mesh_pipeline("globe-lit-pipeline", "fs_lit", ::wgpu::BlendState::REPLACE);
            let unlit_pipeline =
                mesh_pipeline("globe-unlit-pipeline", "fs_unlit", ::wgpu::BlendState::ALPHA_BLENDING);

            let stars_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
                label: Some("globe-stars-pipeline"),
                layout: Some(&stars_layout),
                vertex: ::wgpu::VertexState {
                    module: &stars_shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &star_buffers,
                },
                fragment: Some(::wgpu::FragmentState {
                    module: &stars_shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(::wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: ::wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: primitive(::wgpu::PrimitiveTopology::TriangleList),
                depth_stencil: depth_state(true),
                multisample: ::wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

            let stars = (!geometry.stars.is_empty()).then(|| {
                let buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                    label: Some("globe-star-vertices"),
                    contents: bytemuck::cast_slice(&geometry.stars),
                    usage: ::wgpu::BufferUsages::VERTEX,
                });
                (buffer, geometry.stars.len() as u32)
            });
            let lit = upload_mesh(&device, "globe-lit-mesh", &geometry.lit);
            let unlit = upload_mesh(&device, "globe-unlit-mesh", &geometry.unlit);

            info!(width = config.width, height = config.height, ?format, "renderer ready");

            Ok(Self {
                _instance: instance,
                surface,
                device,
                queue,
                config,
                depth_view,
                globals_buffer,
                globals_bind_group,
                texture_layout,
                texture_bind_group,
                stars_pipeline,
                lit_pipeline,
                unlit_pipeline,
                stars,
                lit,
                unlit,
            })
        }

        pub fn set_globe_texture(&mut self, image: &TextureImage) {
            self.texture_bind_group =
                create_texture_bind_group(&self.device, &self.queue, &self.texture_layout, image);
        }

        pub fn resize(&mut self, width: u32, height: u32) {
            self.config.width = width.max(1);
            self.config.height = height.max(1);
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }

        pub fn render(&self, globals: &Globals) -> Result<(), ViewerError> {
            let frame = self
                .surface
                .get_current_texture()
                .map_err(|e| ViewerError::Surface(format!("surface acquire failed: {e}")))?;
            let view = frame
                .texture
                .create_view(&::wgpu::TextureViewDescriptor::default());

            self.queue
                .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(globals));

            let mut encoder = self
                .device
                .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                    label: Some("globe-frame-encoder"),
                });

            {
                let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                    label: Some("globe-scene-pass"),
                    color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        depth_slice: None,
                        ops: ::wgpu::Operations {
                            load: ::wgpu::LoadOp::Clear(::wgpu::Color::BLACK),
                            store: ::wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth_view,
                        depth_ops: Some(::wgpu::Operations {
                            load: ::wgpu::LoadOp::Clear(1.0),
                            store: ::wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                    multiview_mask: None,
                });

                rpass.set_bind_group(0, &self.globals_bind_group, &[]);

                if let Some((buffer, count)) = &self.stars {
                    rpass.set_pipeline(&self.stars_pipeline);
                    rpass.set_vertex_buffer(0, buffer.slice(..));
                    rpass.draw(0..*count, 0..1);
                }

                if let Some(mesh) = &self.lit {
                    rpass.set_pipeline(&self.lit_pipeline);
                    rpass.set_bind_group(1, &self.texture_bind_group, &[]);
                    rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
                    rpass.set_index_buffer(mesh.indices.slice(..), ::wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }

                if let Some(mesh) = &self.unlit {
                    rpass.set_pipeline(&self.unlit_pipeline);
                    rpass.set_bind_group(1, &self.texture_bind_group, &[]);
                    rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
                    rpass.set_index_buffer(mesh.indices.slice(..), ::wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }

            }

            self.queue.submit(std::iter::once(encoder.finish()));
            frame.present();
            Ok(())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use super::{Globals, SceneGeometry};
    use crate::assets::TextureImage;
    use crate::error::ViewerError;

    /// Native builds have no canvas; the app runs without drawing.
    #[derive(Debug, Default)]
    pub struct Renderer;

    impl Renderer {
        pub async fn new(
            _canvas: web_sys::HtmlCanvasElement,
            _geometry: &SceneGeometry,
        ) -> Result<Self, ViewerError> {
            Err(ViewerError::Surface(
                "wgpu rendering is only available on wasm32 targets".to_string(),
            ))
        }

        pub fn set_globe_texture(&mut self, _image: &TextureImage) {}

        pub fn resize(&mut self, _width: u32, _height: u32) {}

        pub fn render(&self, _globals: &Globals) -> Result<(), ViewerError> {
            Ok(())
        }
    }
}

pub use imp::Renderer;
