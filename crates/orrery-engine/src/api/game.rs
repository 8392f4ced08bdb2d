use serde::Deserialize;

use crate::api::error::ConfigError;
use crate::api::types::{EntityId, GameEvent};
use crate::core::scene::Scene;
use crate::core::time::SimClock;
use crate::input::queue::InputQueue;
use crate::renderer::camera::OrbitCamera;
use crate::renderer::point::PointBuffer;
use crate::systems::effects::EffectsState;
use crate::systems::lighting::LightState;
#[cfg(feature = "vectors")]
use crate::systems::vector::VectorState;

/// Post-processing parameters forwarded to the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostFx {
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub bloom_threshold: f32,
    pub exposure: f32,
    /// ACES filmic tone mapping when true, linear otherwise.
    pub tone_mapping: bool,
}

impl Default for PostFx {
    fn default() -> Self {
        Self {
            bloom_strength: 0.6,
            bloom_radius: 0.5,
            bloom_threshold: 0.15,
            exposure: 1.2,
            tone_mapping: true,
        }
    }
}

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Initial viewport width in pixels.
    pub world_width: f32,
    /// Initial viewport height in pixels.
    pub world_height: f32,
    /// Maximum number of SDF instances per frame (default: 512).
    pub max_sdf_instances: usize,
    /// Maximum number of point sprites per frame (default: 8192).
    pub max_points: usize,
    /// Maximum number of effects vertices (default: 16384).
    pub max_effects_vertices: usize,
    /// Maximum number of vector vertices (default: 16384).
    pub max_vector_vertices: usize,
    /// Maximum number of lights (default: 8).
    pub max_lights: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    pub post: PostFx,
    /// Seed for the effects RNG.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 1600.0,
            world_height: 900.0,
            max_sdf_instances: 512,
            max_points: 8192,
            max_effects_vertices: 16384,
            max_vector_vertices: 16384,
            max_lights: 8,
            max_events: 32,
            post: PostFx::default(),
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt > 0.0) {
            return Err(ConfigError::invalid("fixed_dt", "must be positive"));
        }
        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err(ConfigError::invalid("world_width", "viewport must be non-empty"));
        }
        if self.max_sdf_instances == 0 {
            return Err(ConfigError::invalid("max_sdf_instances", "must be at least 1"));
        }
        Ok(())
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed simulation step. The clock has already been advanced.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Per-frame read-only pass, called once after all fixed steps.
    fn render(&self, _ctx: &mut RenderContext) {}

    /// Apply a JSON configuration document supplied by the host.
    fn load_config(&mut self, _json: &str) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub camera: OrbitCamera,
    pub effects: EffectsState,
    pub lights: LightState,
    pub points: PointBuffer,
    #[cfg(feature = "vectors")]
    pub vectors: VectorState,
    pub events: Vec<GameEvent>,
    pub clock: SimClock,
    pub post: PostFx,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    /// Size every buffer from the game's config.
    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            camera: OrbitCamera::new(config.world_width, config.world_height),
            effects: EffectsState::with_capacity(config.seed, config.max_effects_vertices),
            lights: LightState::with_capacity(config.max_lights),
            points: PointBuffer::with_capacity(config.max_points),
            #[cfg(feature = "vectors")]
            vectors: VectorState::with_capacity(config.max_vector_vertices),
            events: Vec::with_capacity(config.max_events),
            clock: SimClock::new(),
            post: config.post,
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (events, points, vectors, arcs).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
        self.points.clear();
        #[cfg(feature = "vectors")]
        self.vectors.clear();
        self.effects.clear_arcs();
    }

    /// Borrow the per-frame output buffers for the render pass.
    pub fn render_context(&mut self) -> RenderContext<'_> {
        RenderContext {
            camera: &self.camera,
            points: &mut self.points,
            #[cfg(feature = "vectors")]
            vectors: &mut self.vectors,
            effects: &mut self.effects,
            clock: &self.clock,
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for per-frame draw commands.
pub struct RenderContext<'a> {
    pub camera: &'a OrbitCamera,
    pub points: &'a mut PointBuffer,
    #[cfg(feature = "vectors")]
    pub vectors: &'a mut VectorState,
    pub effects: &'a mut EffectsState,
    pub clock: &'a SimClock,
}
