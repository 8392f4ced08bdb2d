/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 24 floats]
/// [Camera: 8 floats]
/// [SDF instances: max_sdf_instances × 20 floats]
/// [Points: max_points × 8 floats]
/// [Effects: max_effects_vertices × 8 floats]
/// [Vectors: max_vector_vertices × 6 floats]
/// [Lights: max_lights × 12 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 24;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_WORLD_WIDTH: usize = 3;
pub const HEADER_WORLD_HEIGHT: usize = 4;
pub const HEADER_MAX_SDF_INSTANCES: usize = 5;
pub const HEADER_SDF_INSTANCE_COUNT: usize = 6;
pub const HEADER_MAX_POINTS: usize = 7;
pub const HEADER_POINT_COUNT: usize = 8;
pub const HEADER_MAX_EFFECTS_VERTICES: usize = 9;
pub const HEADER_EFFECTS_VERTEX_COUNT: usize = 10;
pub const HEADER_MAX_VECTOR_VERTICES: usize = 11;
pub const HEADER_VECTOR_VERTEX_COUNT: usize = 12;
pub const HEADER_MAX_LIGHTS: usize = 13;
pub const HEADER_LIGHT_COUNT: usize = 14;
pub const HEADER_MAX_EVENTS: usize = 15;
pub const HEADER_EVENT_COUNT: usize = 16;
pub const HEADER_ELAPSED: usize = 17;
pub const HEADER_BLOOM_STRENGTH: usize = 18;
pub const HEADER_BLOOM_RADIUS: usize = 19;
pub const HEADER_BLOOM_THRESHOLD: usize = 20;
pub const HEADER_EXPOSURE: usize = 21;
pub const HEADER_TONE_MAPPING: usize = 22;
pub const HEADER_TIME_SCALE: usize = 23;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 2.0;

/// Floats in the camera block: eye x, y, z, fov_y, view quaternion x, y, z, w.
pub const CAMERA_FLOATS: usize = 8;

/// Floats per SDF instance (see `SDFInstance`).
pub const SDF_INSTANCE_FLOATS: usize = 20;

/// Floats per point sprite: x, y, size, r, g, b, a, blend.
pub const POINT_FLOATS: usize = 8;

/// Floats per effects vertex: x, y, r, g, b, a, u, v.
pub const EFFECTS_VERTEX_FLOATS: usize = 8;

/// Floats per vector vertex: x, y, r, g, b, a.
pub const VECTOR_VERTEX_FLOATS: usize = 6;

/// Floats per light (see `Light`).
pub const LIGHT_FLOATS: usize = 12;

/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_sdf_instances: usize,
    pub max_points: usize,
    pub max_effects_vertices: usize,
    pub max_vector_vertices: usize,
    pub max_lights: usize,
    pub max_events: usize,

    pub camera_offset: usize,
    pub sdf_data_offset: usize,
    pub point_data_offset: usize,
    pub effects_data_offset: usize,
    pub vector_data_offset: usize,
    pub light_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(
        max_sdf_instances: usize,
        max_points: usize,
        max_effects_vertices: usize,
        max_vector_vertices: usize,
        max_lights: usize,
        max_events: usize,
    ) -> Self {
        let camera_offset = HEADER_FLOATS;
        let sdf_data_offset = camera_offset + CAMERA_FLOATS;
        let point_data_offset = sdf_data_offset + max_sdf_instances * SDF_INSTANCE_FLOATS;
        let effects_data_offset = point_data_offset + max_points * POINT_FLOATS;
        let vector_data_offset = effects_data_offset + max_effects_vertices * EFFECTS_VERTEX_FLOATS;
        let light_data_offset = vector_data_offset + max_vector_vertices * VECTOR_VERTEX_FLOATS;
        let event_data_offset = light_data_offset + max_lights * LIGHT_FLOATS;
        let buffer_total_floats = event_data_offset + max_events * EVENT_FLOATS;

        Self {
            max_sdf_instances,
            max_points,
            max_effects_vertices,
            max_vector_vertices,
            max_lights,
            max_events,
            camera_offset,
            sdf_data_offset,
            point_data_offset,
            effects_data_offset,
            vector_data_offset,
            light_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.max_sdf_instances,
            config.max_points,
            config.max_effects_vertices,
            config.max_vector_vertices,
            config.max_lights,
            config.max_events,
        )
    }

    /// Header values that never change after init.
    pub fn static_header(&self, config: &GameConfig) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_WORLD_WIDTH] = config.world_width;
        header[HEADER_WORLD_HEIGHT] = config.world_height;
        header[HEADER_MAX_SDF_INSTANCES] = self.max_sdf_instances as f32;
        header[HEADER_MAX_POINTS] = self.max_points as f32;
        header[HEADER_MAX_EFFECTS_VERTICES] = self.max_effects_vertices as f32;
        header[HEADER_MAX_VECTOR_VERTICES] = self.max_vector_vertices as f32;
        header[HEADER_MAX_LIGHTS] = self.max_lights as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_BLOOM_STRENGTH] = config.post.bloom_strength;
        header[HEADER_BLOOM_RADIUS] = config.post.bloom_radius;
        header[HEADER_BLOOM_THRESHOLD] = config.post.bloom_threshold;
        header[HEADER_EXPOSURE] = config.post.exposure;
        header[HEADER_TONE_MAPPING] = if config.post.tone_mapping { 1.0 } else { 0.0 };
        header[HEADER_TIME_SCALE] = 1.0;
        header
    }
}
