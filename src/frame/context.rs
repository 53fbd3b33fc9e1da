use cgmath::Vector3;

use crate::{
    config::ViewerConfig,
    gfx::{
        camera::{CameraController, CameraManager, FlyCamera},
        resources::UploadContext,
        scene::{Model, RollingBall, SceneObject, SkyDome, StaticProp, TexturedBox},
    },
};

/// Everything one frame reads and mutates: the camera, the time step and the
/// scene objects.
///
/// `objects` holds the foreground in draw order; the sky dome is kept apart
/// because it is always drawn last, with its own pipeline.
pub struct FrameContext {
    pub camera_manager: CameraManager,
    pub delta_time: f32,
    pub objects: Vec<Box<dyn SceneObject>>,
    pub sky: SkyDome,
}

impl FrameContext {
    pub fn new(
        camera_manager: CameraManager,
        objects: Vec<Box<dyn SceneObject>>,
        sky: SkyDome,
    ) -> Self {
        Self {
            camera_manager,
            delta_time: 0.0,
            objects,
            sky,
        }
    }

    /// Builds the scene described by `config.layout`, loading model files.
    /// Models that fail to load are logged and left empty.
    pub fn from_config(config: &ViewerConfig) -> Self {
        let layout = &config.layout;
        let camera = FlyCamera::new(
            config.camera_start,
            config.aspect(),
            config.znear,
            config.zfar,
        );
        let camera_manager = CameraManager::new(camera, CameraController::default());

        let load = |asset: &str| Model::load_or_log(&config.asset(asset));

        let objects: Vec<Box<dyn SceneObject>> = vec![
            Box::new(StaticProp::from_placement(
                &layout.street,
                load(layout.street.asset),
            )),
            Box::new(RollingBall::from_placement(
                &layout.ball,
                load(layout.ball.asset),
            )),
            Box::new(TexturedBox::planter(
                &layout.planter,
                config.asset(layout.planter.asset),
            )),
            Box::new(TexturedBox::container(
                &layout.container,
                config.asset(layout.container.asset),
            )),
            Box::new(StaticProp::from_placement(
                &layout.plant,
                load(layout.plant.asset),
            )),
        ];

        let sky = SkyDome::new(
            layout.sky_scale,
            layout.sky_faces.map(|face| config.asset(face)),
        );

        log::info!("Scene built with {} foreground objects", objects.len());
        Self::new(camera_manager, objects, sky)
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera_manager.camera
    }

    pub fn camera_position(&self) -> Vector3<f32> {
        self.camera_manager.camera.position
    }

    pub fn init_gpu_resources(&mut self, ctx: &UploadContext<'_>) {
        for object in &mut self.objects {
            object.init_gpu_resources(ctx);
            log::debug!("Uploaded {}", object.name());
        }
        self.sky.init_gpu_resources(ctx);
    }

    /// Queues this frame's model matrices (and the sky's camera matrices).
    pub fn upload_uniforms(&mut self, queue: &wgpu::Queue) {
        let camera = self.camera_manager.camera;
        for object in &mut self.objects {
            object.upload_uniforms(queue, &camera);
        }
        self.sky.upload_uniforms(queue, &camera);
    }

    /// Drops the foreground objects last-to-first, then the sky dome.
    /// Returns the names in release order.
    pub fn release(mut self) -> Vec<String> {
        let mut released = Vec::with_capacity(self.objects.len() + 1);
        while let Some(object) = self.objects.pop() {
            log::debug!("Releasing {}", object.name());
            released.push(object.name().to_string());
        }
        log::debug!("Releasing {}", self.sky.name());
        released.push(self.sky.name().to_string());
        released
    }
}
