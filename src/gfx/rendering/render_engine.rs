//! WGPU-based rendering engine for the viewer
//!
//! Owns the surface, device and queue, the depth buffer and the two render
//! pipelines. Each frame is one render pass: the foreground objects with the
//! lit environment pipeline, then the sky dome with the skybox pipeline.

use std::sync::Arc;

use crate::{
    config::{LightConfig, MaterialConfig, ViewerConfig},
    error::RenderError,
    frame::FrameContext,
    gfx::{
        resources::{
            FrameUBO, FrameUniforms, GlobalBindings, TextureResource, UploadContext,
        },
        scene::{
            vertex::{SkyVertex, Vertex3D},
            SceneObject,
        },
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

pub const ENVIRONMENT_PIPELINE: &str = "Environment";
pub const SKYBOX_PIPELINE: &str = "Skybox";

/// Frame uniforms bind group slot in the environment pipeline.
const FRAME_GROUP: u32 = 0;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pub pipeline_manager: PipelineManager,
    bindings: GlobalBindings,
    frame_ubo: FrameUBO,
    frame_bind_group: wgpu::BindGroup,
    clear_color: wgpu::Color,
    light: LightConfig,
    material: MaterialConfig,
}

impl RenderEngine {
    /// Creates the GPU device for `window` and builds both pipelines.
    ///
    /// Any failure here is fatal: the viewer cannot run without a device.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        viewer: &ViewerConfig,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                // large street and sky textures
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let bindings = GlobalBindings::new(&device);
        let frame_ubo = FrameUBO::new(&device);
        let frame_bind_group = bindings.frame_group(&device, &frame_ubo);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("environment", include_str!("environment.wgsl"));
        pipeline_manager.load_shader("skybox", include_str!("skybox.wgsl"));

        let color_target = Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        });

        pipeline_manager.register_pipeline(
            ENVIRONMENT_PIPELINE,
            PipelineConfig::default_with_shader("environment")
                .with_label("Environment Pipeline")
                .with_bind_group_layouts(
                    bindings.environment_layouts().into_iter().cloned().collect(),
                )
                .with_vertex_buffers(vec![Vertex3D::desc()])
                .with_depth(TextureResource::DEPTH_FORMAT, wgpu::CompareFunction::Less, true)
                .with_color_targets(vec![color_target.clone()]),
        );

        // drawn last; the dome faces sit inside the far plane
        pipeline_manager.register_pipeline(
            SKYBOX_PIPELINE,
            PipelineConfig::default_with_shader("skybox")
                .with_label("Skybox Pipeline")
                .with_bind_group_layouts(bindings.skybox_layouts().into_iter().cloned().collect())
                .with_vertex_buffers(vec![SkyVertex::desc()])
                .with_depth(TextureResource::DEPTH_FORMAT, wgpu::CompareFunction::Less, true)
                .with_color_targets(vec![color_target]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }

        let [r, g, b] = viewer.clear_color;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            pipeline_manager,
            bindings,
            frame_ubo,
            frame_bind_group,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            light: viewer.light,
            material: viewer.material,
        })
    }

    /// Borrowed device handles for creating object resources.
    pub fn upload_context(&self) -> UploadContext<'_> {
        UploadContext {
            device: &self.device,
            queue: &self.queue,
            bindings: &self.bindings,
        }
    }

    /// Uploads this frame's uniforms, then draws the foreground in list order
    /// and the sky dome last.
    pub fn render_frame(&mut self, ctx: &mut FrameContext) {
        // queued writes land before the submit below
        self.frame_ubo.update_content(
            &self.queue,
            FrameUniforms::new(ctx.camera(), &self.light, &self.material),
        );
        ctx.upload_uniforms(&self.queue);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.pipeline(ENVIRONMENT_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(FRAME_GROUP, &self.frame_bind_group, &[]);
                for object in &ctx.objects {
                    object.render(&mut render_pass);
                }
            }

            if let Some(pipeline) = self.pipeline_manager.pipeline(SKYBOX_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                ctx.sky.render(&mut render_pass);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Reconfigures the surface and depth buffer. Zero sizes (minimised
    /// windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }
}
