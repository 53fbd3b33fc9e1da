//! # Scene Objects
//!
//! Every renderable entity in the world implements [`SceneObject`]. An object
//! owns its [`Transform`] and whatever it draws; GPU resources are created in
//! a separate step so construction and the per-frame state updates never need
//! a device.
//!
//! Per frame the orchestrator calls, in order: [`SceneObject::set_orientation`],
//! [`SceneObject::handle_directional_input`] for every held direction,
//! [`SceneObject::resolve_frame_rotation`] once, then
//! [`SceneObject::upload_uniforms`] and [`SceneObject::render`].
//! [`SceneObject::compute_model_matrix`] is a pure read and may be called any
//! number of times.

use cgmath::{Matrix4, Vector3};

use crate::{
    gfx::{
        camera::FlyCamera,
        resources::{global_bindings::ModelUBO, ModelUniform, UploadContext},
    },
    input::Direction,
};

/// Model matrix bind group slot in the environment pipeline.
pub const MODEL_GROUP: u32 = 1;

/// Variant tag, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    StaticProp,
    Container,
    Planter,
    RollingBall,
    SkyDome,
}

/// Position and scale of one object. Rotation, where there is any, is
/// variant state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn new(position: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self { position, scale }
    }

    pub fn translation(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
    }

    pub fn scaling(&self) -> Matrix4<f32> {
        Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// `T * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        self.translation() * self.scaling()
    }

    /// `T * R * S`: scale first, then rotate, then translate.
    pub fn matrix_with_rotation(&self, rotation: Matrix4<f32>) -> Matrix4<f32> {
        self.translation() * rotation * self.scaling()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))
    }
}

pub trait SceneObject {
    fn name(&self) -> &str;

    fn kind(&self) -> ObjectKind;

    fn transform(&self) -> &Transform;

    fn transform_mut(&mut self) -> &mut Transform;

    fn set_position(&mut self, position: Vector3<f32>) {
        self.transform_mut().position = position;
    }

    fn set_scale(&mut self, scale: Vector3<f32>) {
        self.transform_mut().scale = scale;
    }

    /// Local-to-world matrix. Pure.
    fn compute_model_matrix(&self) -> Matrix4<f32> {
        self.transform().matrix()
    }

    fn handle_directional_input(&mut self, _direction: Direction, _delta_time: f32) {}

    /// Viewer basis used by objects that move relative to the camera.
    fn set_orientation(&mut self, _front: Vector3<f32>, _right: Vector3<f32>) {}

    /// Consumes whatever input was latched this frame.
    fn resolve_frame_rotation(&mut self) {}

    fn init_gpu_resources(&mut self, ctx: &UploadContext<'_>);

    fn upload_uniforms(&mut self, queue: &wgpu::Queue, camera: &FlyCamera);

    /// Records draw commands. Does nothing before `init_gpu_resources`.
    fn render(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// Per-object model matrix uniform and its bind group.
pub struct ObjectBinding {
    ubo: ModelUBO,
    bind_group: wgpu::BindGroup,
}

impl ObjectBinding {
    pub fn new(ctx: &UploadContext<'_>, name: &str, model: Matrix4<f32>) -> Self {
        let ubo = ModelUBO::new_with_data(ctx.device, &ModelUniform::new(model));
        let bind_group =
            ctx.bindings
                .model_group(ctx.device, &ubo, &format!("{} Model Bind Group", name));
        Self { ubo, bind_group }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, model: Matrix4<f32>) {
        self.ubo.update_content(queue, ModelUniform::new(model));
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(MODEL_GROUP, &self.bind_group, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, SquareMatrix, Vector4};

    #[test]
    fn unit_transform_is_identity() {
        assert_eq!(Transform::default().matrix(), Matrix4::identity());
    }

    #[test]
    fn translation_is_applied_after_scale() {
        let transform = Transform::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(2.0, 2.0, 2.0));
        let corner = transform.matrix() * Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(corner, Vector4::new(3.0, 4.0, 5.0, 1.0));
    }

    #[test]
    fn rotation_sits_between_translation_and_scale() {
        let transform = Transform::new(Vector3::new(10.0, 0.0, 0.0), Vector3::new(2.0, 1.0, 1.0));
        let rotated = transform.matrix_with_rotation(Matrix4::from_angle_y(Deg(90.0)))
            * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // scaled to x = 2, turned onto -z, then moved
        assert!((rotated.x - 10.0).abs() < 1e-5);
        assert!((rotated.z + 2.0).abs() < 1e-5);
    }
}
