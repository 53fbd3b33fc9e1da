//! GPU resource management
//!
//! Handles textures, buffers, and bind groups for rendering.

pub mod geometry_resource;
pub mod global_bindings;
pub mod texture_resource;

pub use geometry_resource::GeometryResource;
pub use global_bindings::{FrameUBO, FrameUniforms, GlobalBindings, ModelUBO, ModelUniform, SkyUBO, SkyUniforms};
pub use texture_resource::TextureResource;

/// Everything a scene object needs to create its GPU resources.
pub struct UploadContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub bindings: &'a GlobalBindings,
}
