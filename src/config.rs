//! Viewer settings and scene layout.
//!
//! Everything here is a compile-time default; the only runtime override is the
//! asset directory, read from `KICKABOUT_ASSETS`.

use std::path::{Path, PathBuf};

use cgmath::Vector3;

/// Environment variable that relocates the asset directory.
pub const ASSETS_ENV: &str = "KICKABOUT_ASSETS";

/// Phong light parameters uploaded once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 32.0, 0.0),
            ambient: Vector3::new(0.3, 0.3, 0.3),
            // dimmed a little so the street does not wash out
            diffuse: Vector3::new(0.6, 0.6, 0.6),
            specular: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Shared material constants for the environment shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialConfig {
    pub object_color: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            object_color: Vector3::new(1.0, 1.0, 1.0),
            specular: Vector3::new(0.5, 0.5, 0.5),
            shininess: 32.0,
        }
    }
}

/// Top level viewer configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: [f64; 3],
    pub znear: f32,
    pub zfar: f32,
    pub camera_start: Vector3<f32>,
    pub light: LightConfig,
    pub material: MaterialConfig,
    pub asset_root: PathBuf,
    pub layout: SceneLayout,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Kickabout".to_string(),
            width: 1920,
            height: 1080,
            clear_color: [0.1, 0.1, 0.1],
            znear: 0.1,
            zfar: 100.0,
            camera_start: Vector3::new(0.0, 5.0, 3.0),
            light: LightConfig::default(),
            material: MaterialConfig::default(),
            asset_root: PathBuf::from("."),
            layout: SceneLayout::default(),
        }
    }
}

impl ViewerConfig {
    /// Defaults plus the `KICKABOUT_ASSETS` override, if set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = std::env::var(ASSETS_ENV) {
            if !root.is_empty() {
                config.asset_root = PathBuf::from(root);
            }
        }
        config
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Resolves an asset path against the asset root.
    pub fn asset(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.asset_root.join(relative)
    }
}

/// Initial placement and assets of one scene object.
#[derive(Debug, Clone)]
pub struct Placement {
    pub name: &'static str,
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub asset: &'static str,
}

impl Placement {
    fn new(name: &'static str, position: [f32; 3], scale: f32, asset: &'static str) -> Self {
        Self {
            name,
            position: position.into(),
            scale: Vector3::new(scale, scale, scale),
            asset,
        }
    }
}

/// Where everything goes at startup.
#[derive(Debug, Clone)]
pub struct SceneLayout {
    pub street: Placement,
    pub ball: Placement,
    pub planter: Placement,
    pub container: Placement,
    pub plant: Placement,
    pub sky_scale: f32,
    /// Cube-map faces in upload order.
    pub sky_faces: [&'static str; 6],
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            street: Placement::new(
                "street",
                [0.0, 0.0, 0.0],
                1.0,
                "model/street/Street environment_V01.obj",
            ),
            ball: Placement::new(
                "ball",
                [0.0, 0.2, 0.0],
                0.0025,
                "model/football/soccer ball.obj",
            ),
            planter: Placement::new("planter", [5.0, 0.6, 0.0], 1.0, "pic/container2.jpg"),
            container: Placement::new("container", [8.0, 0.6, 2.0], 1.0, "pic/container.jpg"),
            plant: Placement::new(
                "plant",
                [10.0, 0.1, 0.0],
                0.1,
                "model/plant/indoor plant_02.obj",
            ),
            sky_scale: 70.0,
            // bottom before top: the sky dome's 180 degree flip about X swaps them back
            sky_faces: [
                "pic/skyboxes/sky/right.jpg",
                "pic/skyboxes/sky/left.jpg",
                "pic/skyboxes/sky/bottom.jpg",
                "pic/skyboxes/sky/top.jpg",
                "pic/skyboxes/sky/front.jpg",
                "pic/skyboxes/sky/back.jpg",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_viewer_constants() {
        let config = ViewerConfig::default();
        assert_eq!((config.width, config.height), (1920, 1080));
        assert_eq!(config.camera_start, Vector3::new(0.0, 5.0, 3.0));
        assert_eq!(config.layout.ball.scale, Vector3::new(0.0025, 0.0025, 0.0025));
    }

    #[test]
    fn assets_resolve_against_root() {
        let config = ViewerConfig {
            asset_root: PathBuf::from("/srv/assets"),
            ..Default::default()
        };
        assert_eq!(
            config.asset("pic/container.jpg"),
            PathBuf::from("/srv/assets/pic/container.jpg")
        );
    }
}
