//! GPU-resident vertex data plus the texture it is drawn with.

use wgpu::util::DeviceExt;

use super::{texture_resource::TextureResource, UploadContext};
use crate::gfx::scene::vertex::Vertex3D;

/// Diffuse texture bind group slot in the environment pipeline.
pub const DIFFUSE_GROUP: u32 = 2;

/// Immutable non-indexed triangle list with its diffuse texture. Created once,
/// released when dropped.
pub struct GeometryResource {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    texture_bind_group: wgpu::BindGroup,
}

impl GeometryResource {
    pub fn new(
        ctx: &UploadContext<'_>,
        label: &str,
        vertices: &[Vertex3D],
        texture: &TextureResource,
    ) -> Self {
        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", label)),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let texture_bind_group =
            ctx.bindings
                .diffuse_group(ctx.device, texture, &format!("{} Texture", label));

        log::debug!("Uploaded {} vertices for {}", vertices.len(), label);

        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            texture_bind_group,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(DIFFUSE_GROUP, &self.texture_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}
