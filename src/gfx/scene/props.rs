//! Static scene objects: model props and the textured boxes.

use std::path::PathBuf;

use crate::{
    config::Placement,
    gfx::{
        camera::FlyCamera,
        geometry::GeometryData,
        resources::{texture_resource, GeometryResource, UploadContext},
    },
};

use super::{
    model::{DrawModel, Model},
    object::{ObjectBinding, ObjectKind, SceneObject, Transform},
};

/// A model that never reacts to input.
pub struct StaticProp {
    name: String,
    transform: Transform,
    model: Option<Model>,
    binding: Option<ObjectBinding>,
}

impl StaticProp {
    pub fn new(name: impl Into<String>, transform: Transform, model: Option<Model>) -> Self {
        Self {
            name: name.into(),
            transform,
            model,
            binding: None,
        }
    }

    pub fn from_placement(placement: &Placement, model: Option<Model>) -> Self {
        Self::new(
            placement.name,
            Transform::new(placement.position, placement.scale),
            model,
        )
    }
}

impl SceneObject for StaticProp {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::StaticProp
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn init_gpu_resources(&mut self, ctx: &UploadContext<'_>) {
        if let Some(model) = &mut self.model {
            model.init_gpu_resources(ctx);
        }
        self.binding = Some(ObjectBinding::new(ctx, &self.name, self.compute_model_matrix()));
    }

    fn upload_uniforms(&mut self, queue: &wgpu::Queue, _camera: &FlyCamera) {
        let model = self.compute_model_matrix();
        if let Some(binding) = &mut self.binding {
            binding.update(queue, model);
        }
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        let (Some(binding), Some(model)) = (&self.binding, &self.model) else {
            return;
        };
        binding.bind(pass);
        pass.draw_model(model);
    }
}

/// Built-in vertex table drawn with one diffuse texture: the container cube
/// or the planter box.
pub struct TexturedBox {
    name: String,
    kind: ObjectKind,
    transform: Transform,
    geometry: GeometryData,
    texture_path: PathBuf,
    gpu_resources: Option<(GeometryResource, ObjectBinding)>,
}

impl TexturedBox {
    pub fn container(placement: &Placement, texture_path: PathBuf) -> Self {
        Self::new(
            placement,
            ObjectKind::Container,
            crate::gfx::geometry::container_cube(),
            texture_path,
        )
    }

    pub fn planter(placement: &Placement, texture_path: PathBuf) -> Self {
        Self::new(
            placement,
            ObjectKind::Planter,
            crate::gfx::geometry::planter_box(),
            texture_path,
        )
    }

    fn new(
        placement: &Placement,
        kind: ObjectKind,
        geometry: GeometryData,
        texture_path: PathBuf,
    ) -> Self {
        Self {
            name: placement.name.to_string(),
            kind,
            transform: Transform::new(placement.position, placement.scale),
            geometry,
            texture_path,
            gpu_resources: None,
        }
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }
}

impl SceneObject for TexturedBox {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn init_gpu_resources(&mut self, ctx: &UploadContext<'_>) {
        let texture =
            texture_resource::load_texture_2d_or_fallback(ctx.device, ctx.queue, &self.texture_path);
        let geometry = GeometryResource::new(ctx, &self.name, &self.geometry.vertices, &texture);
        let binding = ObjectBinding::new(ctx, &self.name, self.compute_model_matrix());
        self.gpu_resources = Some((geometry, binding));
    }

    fn upload_uniforms(&mut self, queue: &wgpu::Queue, _camera: &FlyCamera) {
        let model = self.compute_model_matrix();
        if let Some((_, binding)) = &mut self.gpu_resources {
            binding.update(queue, model);
        }
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Some((geometry, binding)) = &self.gpu_resources {
            binding.bind(pass);
            geometry.draw(pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SceneLayout, input::Direction};
    use cgmath::{Matrix4, SquareMatrix, Vector3};

    #[test]
    fn unit_static_prop_yields_identity() {
        let prop = StaticProp::new("street", Transform::default(), None);
        assert_eq!(prop.compute_model_matrix(), Matrix4::identity());
    }

    #[test]
    fn static_matrix_is_translate_times_scale_and_repeatable() {
        let layout = SceneLayout::default();
        let mut plant = StaticProp::from_placement(&layout.plant, None);
        let expected = Matrix4::from_translation(Vector3::new(10.0, 0.1, 0.0))
            * Matrix4::from_scale(0.1);

        let first = plant.compute_model_matrix();
        plant.handle_directional_input(Direction::Forward, 1.0);
        plant.resolve_frame_rotation();
        let second = plant.compute_model_matrix();

        assert_eq!(first, expected);
        assert_eq!(first, second);
        assert_eq!(plant.transform().position, Vector3::new(10.0, 0.1, 0.0));
    }

    #[test]
    fn boxes_carry_their_variant_and_table() {
        let layout = SceneLayout::default();
        let container = TexturedBox::container(&layout.container, PathBuf::from("c.jpg"));
        let planter = TexturedBox::planter(&layout.planter, PathBuf::from("p.jpg"));

        assert_eq!(container.kind(), ObjectKind::Container);
        assert_eq!(planter.kind(), ObjectKind::Planter);
        assert_eq!(container.geometry().vertex_count(), 36);
        assert_ne!(container.geometry(), planter.geometry());
        assert_eq!(
            container.compute_model_matrix(),
            Matrix4::from_translation(Vector3::new(8.0, 0.6, 2.0))
        );
    }
}
