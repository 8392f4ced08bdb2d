//! Time-shaping helpers the game calls directly. Nothing here touches the scene.

pub mod easing;
pub mod envelope;

pub use easing::Easing;
pub use envelope::Envelope;
