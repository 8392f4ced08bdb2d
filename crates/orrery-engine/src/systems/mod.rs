pub mod effects;
pub mod lighting;
pub mod points;
pub mod sdf_render;
pub mod trail;
#[cfg(feature = "vectors")]
pub mod vector;
