pub mod camera;
pub mod point;
pub mod sdf_instance;

pub use camera::{OrbitCamera, Projection};
pub use point::{BlendMode, PointBuffer, PointSprite};
pub use sdf_instance::{SDFBuffer, SDFInstance};
