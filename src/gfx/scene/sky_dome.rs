//! Inside-out cube textured with a cube map, kept centred on the viewer.

use std::path::PathBuf;

use cgmath::{Deg, Matrix4, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    gfx::{
        camera::FlyCamera,
        geometry,
        resources::{texture_resource, SkyUBO, SkyUniforms, TextureResource, UploadContext},
        scene::vertex::SkyVertex,
    },
};

use super::object::{ObjectKind, SceneObject, Transform};

/// The face images are authored upside down.
pub const FLIP_ANGLE: Deg<f32> = Deg(180.0);

struct SkyGpuResources {
    vertex_buffer: wgpu::Buffer,
    ubo: SkyUBO,
    uniform_bind_group: wgpu::BindGroup,
    cube_map_bind_group: wgpu::BindGroup,
}

pub struct SkyDome {
    transform: Transform,
    vertices: Vec<SkyVertex>,
    faces: [PathBuf; 6],
    gpu_resources: Option<SkyGpuResources>,
}

impl SkyDome {
    pub fn new(scale: f32, faces: [PathBuf; 6]) -> Self {
        Self {
            transform: Transform::new(
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(scale, scale, scale),
            ),
            vertices: geometry::sky_cube(),
            faces,
            gpu_resources: None,
        }
    }

    /// Moves the dome onto the viewer.
    pub fn recentre(&mut self, camera_position: Vector3<f32>) {
        self.set_position(camera_position);
    }
}

impl SceneObject for SkyDome {
    fn name(&self) -> &str {
        "sky dome"
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::SkyDome
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn compute_model_matrix(&self) -> Matrix4<f32> {
        self.transform
            .matrix_with_rotation(Matrix4::from_angle_x(FLIP_ANGLE))
    }

    fn init_gpu_resources(&mut self, ctx: &UploadContext<'_>) {
        let cube_map = texture_resource::load_cube_map(ctx.device, ctx.queue, &self.faces)
            .unwrap_or_else(|err| {
                log::warn!("Cubemap texture failed to load: {}", err);
                TextureResource::white_cube(ctx.device, ctx.queue)
            });

        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sky Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let ubo = SkyUBO::new(ctx.device);
        let uniform_bind_group = ctx.bindings.sky_group(ctx.device, &ubo);
        let cube_map_bind_group = ctx.bindings.cube_map_group(ctx.device, &cube_map);

        self.gpu_resources = Some(SkyGpuResources {
            vertex_buffer,
            ubo,
            uniform_bind_group,
            cube_map_bind_group,
        });
    }

    fn upload_uniforms(&mut self, queue: &wgpu::Queue, camera: &FlyCamera) {
        let model = self.compute_model_matrix();
        if let Some(gpu) = &mut self.gpu_resources {
            gpu.ubo.update_content(queue, SkyUniforms::new(camera, model));
        }
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(gpu) = &self.gpu_resources else {
            return;
        };
        pass.set_bind_group(0, &gpu.uniform_bind_group, &[]);
        pass.set_bind_group(1, &gpu.cube_map_bind_group, &[]);
        pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        pass.draw(0..self.vertices.len() as u32, 0..1);
    }
}
