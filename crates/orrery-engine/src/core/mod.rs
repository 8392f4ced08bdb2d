pub mod color;
pub mod scene;
pub mod time;
