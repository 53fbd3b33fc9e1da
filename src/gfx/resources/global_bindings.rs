//! Uniform layouts shared by the two render pipelines
//!
//! The environment pipeline binds per-frame camera, light and material data at
//! group 0, the per-object model matrices at group 1 and the diffuse texture at
//! group 2. The skybox pipeline binds its matrices at group 0 and the cube map
//! at group 1.

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::{
    config::{LightConfig, MaterialConfig},
    gfx::camera::FlyCamera,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::texture_resource::TextureResource;

/// Per-frame data for the environment shader.
///
/// Every field is a `vec4` or `mat4` so the layout matches WGSL without
/// padding. MUST match `FrameUniforms` in `environment.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub object_color: [f32; 4],
    /// xyz: specular tint, w: shininess
    pub material_specular: [f32; 4],
    pub light_position: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
}

fn vec4(v: cgmath::Vector3<f32>, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

impl FrameUniforms {
    pub fn new(camera: &FlyCamera, light: &LightConfig, material: &MaterialConfig) -> Self {
        Self {
            view: camera.view_matrix().into(),
            projection: camera.projection_matrix().into(),
            view_position: vec4(camera.position, 1.0),
            object_color: vec4(material.object_color, 1.0),
            material_specular: vec4(material.specular, material.shininess),
            light_position: vec4(light.position, 1.0),
            light_ambient: vec4(light.ambient, 0.0),
            light_diffuse: vec4(light.diffuse, 0.0),
            light_specular: vec4(light.specular, 0.0),
        }
    }
}

/// Model matrix plus the matrix that carries normals into world space.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn new(model: Matrix4<f32>) -> Self {
        // a zero scale has no inverse; lighting is meaningless then anyway
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        Self {
            model: model.into(),
            normal: normal.into(),
        }
    }
}

/// Matrices for the skybox shader. MUST match `SkyUniforms` in `skybox.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl SkyUniforms {
    pub fn new(camera: &FlyCamera, model: Matrix4<f32>) -> Self {
        Self {
            projection: camera.projection_matrix().into(),
            view: camera.view_matrix().into(),
            model: model.into(),
        }
    }
}

pub type FrameUBO = UniformBuffer<FrameUniforms>;
pub type ModelUBO = UniformBuffer<ModelUniform>;
pub type SkyUBO = UniformBuffer<SkyUniforms>;

/// Bind group layouts for both pipelines, created once per device.
pub struct GlobalBindings {
    pub frame: BindGroupLayoutWithDesc,
    pub model: BindGroupLayoutWithDesc,
    pub diffuse: BindGroupLayoutWithDesc,
    pub sky: BindGroupLayoutWithDesc,
    pub cube_map: BindGroupLayoutWithDesc,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Frame Bind Group Layout");

        let model = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "Model Bind Group Layout");

        let diffuse = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Filtering,
            ))
            .create(device, "Diffuse Bind Group Layout");

        let sky = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "Sky Bind Group Layout");

        let cube_map = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_cube())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Filtering,
            ))
            .create(device, "Cube Map Bind Group Layout");

        Self {
            frame,
            model,
            diffuse,
            sky,
            cube_map,
        }
    }

    /// Layouts for the environment pipeline, in group order.
    pub fn environment_layouts(&self) -> Vec<&wgpu::BindGroupLayout> {
        vec![&self.frame.layout, &self.model.layout, &self.diffuse.layout]
    }

    /// Layouts for the skybox pipeline, in group order.
    pub fn skybox_layouts(&self) -> Vec<&wgpu::BindGroupLayout> {
        vec![&self.sky.layout, &self.cube_map.layout]
    }

    pub fn frame_group(&self, device: &wgpu::Device, ubo: &FrameUBO) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.frame)
            .resource(ubo.binding_resource())
            .create(device, "Frame Bind Group")
    }

    pub fn model_group(&self, device: &wgpu::Device, ubo: &ModelUBO, label: &str) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.model)
            .resource(ubo.binding_resource())
            .create(device, label)
    }

    pub fn diffuse_group(
        &self,
        device: &wgpu::Device,
        texture: &TextureResource,
        label: &str,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.diffuse)
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, label)
    }

    pub fn sky_group(&self, device: &wgpu::Device, ubo: &SkyUBO) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.sky)
            .resource(ubo.binding_resource())
            .create(device, "Sky Bind Group")
    }

    pub fn cube_map_group(&self, device: &wgpu::Device, texture: &TextureResource) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.cube_map)
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, "Cube Map Bind Group")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Vector4};

    #[test]
    fn uniform_sizes_are_wgsl_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 2 * 64 + 7 * 16);
        assert_eq!(std::mem::size_of::<ModelUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<SkyUniforms>(), 3 * 64);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let uniform = ModelUniform::new(Matrix4::from_nonuniform_scale(2.0, 1.0, 1.0));
        let normal = Matrix4::from(uniform.normal);
        let n = normal * Vector4::new(1.0, 0.0, 0.0, 0.0);
        assert!((n.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn singular_model_falls_back_to_identity_normals() {
        let uniform = ModelUniform::new(Matrix4::from_scale(0.0));
        assert_eq!(Matrix4::from(uniform.normal), Matrix4::identity());
    }

    #[test]
    fn frame_uniforms_pack_shininess_into_specular_w() {
        let camera = FlyCamera::new(Vector3::new(0.0, 5.0, 3.0), 1.0, 0.1, 100.0);
        let frame = FrameUniforms::new(
            &camera,
            &LightConfig::default(),
            &MaterialConfig::default(),
        );
        assert_eq!(frame.material_specular, [0.5, 0.5, 0.5, 32.0]);
        assert_eq!(frame.view_position, [0.0, 5.0, 3.0, 1.0]);
        assert_eq!(frame.light_position, [0.0, 32.0, 0.0, 1.0]);
    }
}
