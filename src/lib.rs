//! Kickabout
//!
//! A small wgpu scene viewer: fly a free camera around a street scene and
//! roll a football with the arrow keys.

pub mod app;
pub mod config;
pub mod error;
pub mod frame;
pub mod gfx;
pub mod input;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::KickaboutApp;
pub use config::ViewerConfig;
