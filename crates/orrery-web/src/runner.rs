use glam::Vec2;
use orrery_engine::bridge::protocol::{
    CAMERA_FLOATS, HEADER_EFFECTS_VERTEX_COUNT, HEADER_ELAPSED, HEADER_EVENT_COUNT, HEADER_FLOATS,
    HEADER_FRAME_COUNTER, HEADER_LIGHT_COUNT, HEADER_POINT_COUNT, HEADER_SDF_INSTANCE_COUNT,
    HEADER_TIME_SCALE, HEADER_VECTOR_VERTEX_COUNT, HEADER_WORLD_HEIGHT, HEADER_WORLD_WIDTH,
    HEADER_BLOOM_RADIUS, HEADER_BLOOM_STRENGTH, HEADER_BLOOM_THRESHOLD, HEADER_EXPOSURE,
    HEADER_TONE_MAPPING,
};
use orrery_engine::{
    build_sdf_buffer, EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue,
    ProtocolLayout, SDFBuffer,
};

/// Custom event kind the host sends when the canvas is resized (a = width, b = height).
pub const RESIZE_EVENT: u32 = 99;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    /// Passed to the extra fixed steps of a frame so input is seen once.
    no_input: InputQueue,
    sdf_buffer: SDFBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    camera_block: [f32; CAMERA_FLOATS],
    drag_from: Option<Vec2>,
    /// Queued events already applied to the camera.
    routed: usize,
    frame: u32,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            ctx: EngineContext::with_config(&config),
            timestep: FixedTimestep::new(config.fixed_dt),
            sdf_buffer: SDFBuffer::with_capacity(config.max_sdf_instances),
            header: layout.static_header(&config),
            camera_block: [0.0; CAMERA_FLOATS],
            game,
            input: InputQueue::new(),
            no_input: InputQueue::new(),
            layout,
            config,
            drag_from: None,
            routed: 0,
            frame: 0,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.publish();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Forward a JSON config document to the game. Errors are logged.
    pub fn load_config(&mut self, json: &str) {
        if let Err(e) = self.game.load_config(json) {
            log::error!("config rejected: {}", e);
        }
    }

    /// Run one frame tick: update game, build buffers, run effects.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();
        self.route_camera_input();

        // Fixed timestep accumulation
        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            self.ctx.clock.advance(self.timestep.dt());
            let input = if step == 0 { &self.input } else { &self.no_input };
            self.game.update(&mut self.ctx, input);
            self.ctx.effects.tick(self.timestep.dt());
        }

        // Input survives frames with no fixed step
        if steps > 0 {
            self.input.clear();
            self.routed = 0;
        }

        self.ctx.camera.update(dt);

        {
            let mut render_ctx = self.ctx.render_context();
            self.game.render(&mut render_ctx);
        }

        build_sdf_buffer(self.ctx.scene.iter(), &self.ctx.camera, &mut self.sdf_buffer);
        self.ctx.effects.rebuild_effects_buffer(&self.ctx.camera);
        self.ctx.effects.draw_particles(&self.ctx.camera, &mut self.ctx.points);

        if self.ctx.events.len() > self.layout.max_events {
            log::warn!("{} game events dropped", self.ctx.events.len() - self.layout.max_events);
            self.ctx.events.truncate(self.layout.max_events);
        }

        self.frame = self.frame.wrapping_add(1);
        self.publish();
    }

    /// Orbit drag and wheel zoom go straight to the camera, once per event.
    /// Events still waiting for a fixed step are not routed again.
    fn route_camera_input(&mut self) {
        for event in self.input.iter().skip(self.routed) {
            match *event {
                InputEvent::PointerDown { x, y } => self.drag_from = Some(Vec2::new(x, y)),
                InputEvent::PointerUp { .. } => self.drag_from = None,
                InputEvent::PointerMove { x, y } => {
                    if let Some(from) = self.drag_from {
                        self.ctx.camera.drag(x - from.x, y - from.y);
                        self.drag_from = Some(Vec2::new(x, y));
                    }
                }
                InputEvent::Wheel { delta } => self.ctx.camera.zoom(delta),
                InputEvent::Custom { kind: RESIZE_EVENT, a, b, .. } => {
                    if a > 0.0 && b > 0.0 {
                        self.ctx.camera.resize(a, b);
                        self.header[HEADER_WORLD_WIDTH] = a;
                        self.header[HEADER_WORLD_HEIGHT] = b;
                    }
                }
                _ => {}
            }
        }
        self.routed = self.input.len();
    }

    /// Write the per-frame header fields and the camera block.
    fn publish(&mut self) {
        let vector_count = self.vector_vertex_count();
        let h = &mut self.header;
        h[HEADER_FRAME_COUNTER] = self.frame as f32;
        h[HEADER_SDF_INSTANCE_COUNT] = self.sdf_buffer.instance_count() as f32;
        h[HEADER_POINT_COUNT] = self.ctx.points.point_count() as f32;
        h[HEADER_EFFECTS_VERTEX_COUNT] = self.ctx.effects.effects_vertex_count() as f32;
        h[HEADER_VECTOR_VERTEX_COUNT] = vector_count as f32;
        h[HEADER_LIGHT_COUNT] = self.ctx.lights.count() as f32;
        h[HEADER_EVENT_COUNT] = self.ctx.events.len() as f32;
        h[HEADER_ELAPSED] = self.ctx.clock.elapsed();
        h[HEADER_TIME_SCALE] = self.ctx.clock.scale();
        h[HEADER_BLOOM_STRENGTH] = self.ctx.post.bloom_strength;
        h[HEADER_BLOOM_RADIUS] = self.ctx.post.bloom_radius;
        h[HEADER_BLOOM_THRESHOLD] = self.ctx.post.bloom_threshold;
        h[HEADER_EXPOSURE] = self.ctx.post.exposure;
        h[HEADER_TONE_MAPPING] = if self.ctx.post.tone_mapping { 1.0 } else { 0.0 };

        let eye = self.ctx.camera.position();
        let rot = self.ctx.camera.view_rotation();
        self.camera_block = [
            eye.x,
            eye.y,
            eye.z,
            self.ctx.camera.fov_y,
            rot.x,
            rot.y,
            rot.z,
            rot.w,
        ];
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.camera_block.as_ptr()
    }

    pub fn sdf_instances_ptr(&self) -> *const f32 {
        self.sdf_buffer.instances_ptr()
    }

    pub fn sdf_instance_count(&self) -> u32 {
        self.sdf_buffer.instance_count() as u32
    }

    pub fn points_ptr(&self) -> *const f32 {
        self.ctx.points.points_ptr()
    }

    pub fn point_count(&self) -> u32 {
        self.ctx.points.point_count() as u32
    }

    pub fn effects_ptr(&self) -> *const f32 {
        self.ctx.effects.effects_buffer_ptr()
    }

    pub fn effects_vertex_count(&self) -> u32 {
        self.ctx.effects.effects_vertex_count() as u32
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.ctx.vectors.buffer_ptr()
    }

    #[cfg(not(feature = "vectors"))]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        std::ptr::null()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.ctx.vectors.vertex_count() as u32
    }

    #[cfg(not(feature = "vectors"))]
    pub fn vector_vertex_count(&self) -> u32 {
        0
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.ctx.lights.buffer_ptr()
    }

    pub fn light_count(&self) -> u32 {
        self.ctx.lights.count() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.ctx.camera.viewport().x
    }

    pub fn world_height(&self) -> f32 {
        self.ctx.camera.viewport().y
    }

    pub fn elapsed(&self) -> f32 {
        self.ctx.clock.elapsed()
    }

    pub fn time_scale(&self) -> f32 {
        self.ctx.clock.scale()
    }

    pub fn bloom_strength(&self) -> f32 {
        self.ctx.post.bloom_strength
    }

    pub fn bloom_radius(&self) -> f32 {
        self.ctx.post.bloom_radius
    }

    pub fn bloom_threshold(&self) -> f32 {
        self.ctx.post.bloom_threshold
    }

    pub fn exposure(&self) -> f32 {
        self.ctx.post.exposure
    }

    pub fn tone_mapping(&self) -> bool {
        self.ctx.post.tone_mapping
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_sdf_instances(&self) -> u32 {
        self.layout.max_sdf_instances as u32
    }

    pub fn max_points(&self) -> u32 {
        self.layout.max_points as u32
    }

    pub fn max_effects_vertices(&self) -> u32 {
        self.layout.max_effects_vertices as u32
    }

    pub fn max_vector_vertices(&self) -> u32 {
        self.layout.max_vector_vertices as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::{Entity, GameEvent, MeshComponent, Rgb, SDFShape};
    use approx::assert_relative_eq;
    use glam::Vec3;

    #[derive(Default)]
    struct Counter {
        updates: u32,
        customs: u32,
        renders: std::cell::Cell<u32>,
    }

    impl Game for Counter {
        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id)
                    .with_pos(Vec3::ZERO)
                    .with_mesh(MeshComponent::new(SDFShape::Sphere { radius: 1.0 }, Rgb::WHITE)),
            );
            ctx.camera.set_position(Vec3::new(0.0, 10.0, 30.0));
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            for event in input.iter() {
                if let InputEvent::Custom { kind: 1, .. } = event {
                    self.customs += 1;
                    ctx.emit_event(GameEvent { kind: 1.0, ..Default::default() });
                }
            }
        }

        fn render(&self, _ctx: &mut orrery_engine::RenderContext) {
            self.renders.set(self.renders.get() + 1);
        }
    }

    fn runner() -> GameRunner<Counter> {
        let mut r = GameRunner::new(Counter::default());
        r.init();
        r
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut r = GameRunner::new(Counter::default());
        r.tick(1.0 / 60.0);
        assert_eq!(r.game().updates, 0);
    }

    #[test]
    fn custom_event_seen_once_across_steps() {
        let mut r = runner();
        r.push_input(InputEvent::Custom { kind: 1, a: 0.0, b: 0.0, c: 0.0 });
        r.tick(3.0 / 60.0 + 0.001);
        assert_eq!(r.game().updates, 3);
        assert_eq!(r.game().customs, 1);
        assert_eq!(r.game_events_len(), 1);
        assert_eq!(r.game().renders.get(), 1);
    }

    #[test]
    fn tick_builds_sdf_and_header() {
        let mut r = runner();
        r.tick(1.0 / 60.0 + 0.0001);
        assert_eq!(r.sdf_instance_count(), 1);
        assert_eq!(r.header[HEADER_SDF_INSTANCE_COUNT], 1.0);
        assert_eq!(r.header[HEADER_FRAME_COUNTER], 1.0);
        assert!(r.elapsed() > 0.0);
    }

    #[test]
    fn resize_event_updates_viewport() {
        let mut r = runner();
        r.push_input(InputEvent::Custom { kind: RESIZE_EVENT, a: 640.0, b: 480.0, c: 0.0 });
        r.tick(1.0 / 60.0 + 0.0001);
        assert_eq!(r.world_width(), 640.0);
        assert_eq!(r.world_height(), 480.0);
        assert_eq!(r.header[HEADER_WORLD_WIDTH], 640.0);
    }

    #[test]
    fn wheel_applies_once_across_short_frames() {
        let mut single = runner();
        single.push_input(InputEvent::Wheel { delta: 5.0 });
        single.tick(1.0 / 60.0 + 0.0001);

        let mut split = runner();
        split.push_input(InputEvent::Wheel { delta: 5.0 });
        split.push_input(InputEvent::Custom { kind: 1, a: 0.0, b: 0.0, c: 0.0 });
        for _ in 0..3 {
            split.tick(1.0 / 240.0);
        }
        assert_eq!(split.game().updates, 0);
        split.tick(1.0 / 60.0);

        assert_relative_eq!(
            split.context().camera.distance,
            single.context().camera.distance,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            split.context().camera.distance,
            1000f32.sqrt() * 0.95f32.powi(5),
            epsilon = 1e-3
        );
        assert_eq!(split.game().customs, 1);
    }

    #[test]
    fn drag_rotates_camera() {
        let mut r = runner();
        let before = r.context().camera.azimuth;
        r.push_input(InputEvent::PointerDown { x: 100.0, y: 100.0 });
        r.push_input(InputEvent::PointerMove { x: 160.0, y: 100.0 });
        r.push_input(InputEvent::PointerUp { x: 160.0, y: 100.0 });
        for _ in 0..120 {
            r.tick(1.0 / 60.0);
        }
        assert!((r.context().camera.azimuth - before).abs() > 1e-3);
    }
}
