pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::error::ConfigError;
pub use api::game::{Game, GameConfig, EngineContext, RenderContext, PostFx};
pub use api::types::{EntityId, GameEvent};
pub use components::entity::Entity;
pub use components::mesh::{MeshComponent, SDFShape};
pub use core::color::Rgb;
pub use core::scene::Scene;
pub use core::time::{FixedTimestep, SimClock, TIME_SCALES, next_time_scale};
pub use renderer::camera::{OrbitCamera, Projection};
pub use renderer::point::{BlendMode, PointBuffer, PointSprite};
pub use renderer::sdf_instance::{SDFInstance, SDFBuffer};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use systems::effects::{Arc3D, Effect, EffectId, EffectQueue, EffectsState, Particle, Rng};
pub use systems::lighting::{Light, LightHandle, LightKind, LightState, LIGHT_FLOATS};
pub use systems::points::{push_point, project_cloud, PointStyle};
pub use systems::sdf_render::build_sdf_buffer;
pub use systems::trail::Trail;

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorState, VectorVertex};

// Extensions: decoupled optional helpers
pub use extensions::{Easing, Envelope};
