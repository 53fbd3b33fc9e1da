//! # Graphics Module
//!
//! Camera, geometry, GPU resources, render pipelines and the scene objects.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - First person fly camera and mouse controller
//! - **Geometry** ([`geometry`]) - Built-in vertex tables
//! - **Rendering Pipeline** ([`rendering`]) - Phong environment pass plus skybox
//! - **Scene Objects** ([`scene`]) - Props, the rolling ball and the sky dome
//! - **Resource Management** ([`resources`]) - Textures, buffers and bind groups

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::FlyCamera;
pub use rendering::render_engine::RenderEngine;
