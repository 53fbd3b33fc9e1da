//! Error types for asset loading and GPU setup.

use std::path::PathBuf;

use thiserror::Error;

/// A texture (or one cube-map face) could not be decoded or uploaded.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not load texture file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cube map face {path} is {width}x{height}, expected {expected}x{expected}")]
    FaceSize {
        path: PathBuf,
        width: u32,
        height: u32,
        expected: u32,
    },

    #[error("texture {path} is {width}x{height}, the device allows at most {max}")]
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },
}

/// An external model file could not be read.
#[derive(Debug, Error)]
#[error("failed to load model {path}: {source}")]
pub struct ModelError {
    pub path: PathBuf,
    #[source]
    pub source: tobj::LoadError,
}

/// Fatal initialisation failures; the viewer exits before the render loop.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create the window surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open the GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to create the window: {0}")]
    Window(#[from] winit::error::OsError),
}
