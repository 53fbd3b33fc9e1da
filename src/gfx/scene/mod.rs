//! # Scene Objects
//!
//! The renderable entities of the viewer and the vertex formats they upload.
//!
//! ## Key Components
//!
//! - [`SceneObject`] - The contract every object implements
//! - [`StaticProp`] - A model that never moves
//! - [`TexturedBox`] - The container cube and the planter box
//! - [`RollingBall`] - A model rolled around with the arrow keys
//! - [`SkyDome`] - The cube-mapped background
//! - [`Model`] - OBJ meshes loaded through `tobj`

pub mod model;
pub mod object;
pub mod props;
pub mod rolling_ball;
pub mod sky_dome;
pub mod vertex;

// Re-export main types
pub use model::{DrawModel, Model};
pub use object::{ObjectKind, SceneObject, Transform};
pub use props::{StaticProp, TexturedBox};
pub use rolling_ball::RollingBall;
pub use sky_dome::SkyDome;
pub use vertex::{SkyVertex, Vertex3D};
