//! Celestial orrery: stylized planets around a shader-lit star.
//!
//! Scene bodies are SDF instances. Trails, comet tails, ship lights and the
//! starfield are point sprites; orbit and resonance rings are lyon vectors.

use orrery_engine::*;
#[cfg(feature = "vectors")]
use glam::{Vec2, Vec3};

use crate::asteroids::AsteroidField;
use crate::comets::CometSwarm;
use crate::config::{OrreryConfig, Viewport};
use crate::resonance;
use crate::spaceships::Fleet;
use crate::starfield::Starfield;
use crate::theme::ThemeBook;
use crate::world::World;

const FIXED_DT: f32 = 1.0 / 60.0;

// ── Custom event kinds from the UI ──────────────────────────────────

const CUSTOM_RESONANCE: u32 = 1;
const CUSTOM_RESET_VIEW: u32 = 2;
const CUSTOM_TIME_SCALE: u32 = 3;
const CUSTOM_THEME: u32 = 4;
const CUSTOM_TOGGLE_ASTEROIDS: u32 = 5;
const CUSTOM_TOGGLE_FLEET: u32 = 6;
const CUSTOM_ASTEROID_COUNT: u32 = 7;
/// Viewport resize (sent by the host as kind=99).
const CUSTOM_RESIZE: u32 = orrery_web::RESIZE_EVENT;

// ── Game event kinds to the UI ──────────────────────────────────────

/// `a` = resonance active, `b` = time scale, `c` = theme index.
pub const EVENT_STATUS: f32 = 1.0;
/// `a` = asteroid count, `b` = asteroids visible, `c` = fleet visible.
pub const EVENT_FLEET: f32 = 2.0;

// ── Orbit rings ─────────────────────────────────────────────────────

#[cfg(feature = "vectors")]
const ORBIT_SAMPLES: usize = 128;
#[cfg(feature = "vectors")]
const ORBIT_LINE_WIDTH: f32 = 1.0;
#[cfg(feature = "vectors")]
const ORBIT_ALPHA: f32 = 0.15;

// ── Ship / asteroid sparks ──────────────────────────────────────────

const SPARK_RADIUS: f32 = 2.0;
const SPARK_COUNT: usize = 12;

fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

/// Screen-space runs of a projected orbit circle, split where points fall behind the camera.
/// A single run covering the whole circle means the ring is fully visible.
#[cfg(feature = "vectors")]
fn orbit_ring_runs(camera: &OrbitCamera, radius: f32) -> Vec<Vec<Vec2>> {
    let mut runs = Vec::new();
    let mut run = Vec::new();
    for i in 0..ORBIT_SAMPLES {
        let a = i as f32 / ORBIT_SAMPLES as f32 * std::f32::consts::TAU;
        match camera.project(Vec3::new(a.cos() * radius, 0.0, a.sin() * radius)) {
            Some(p) => run.push(p.pos),
            None if run.len() > 1 => runs.push(std::mem::take(&mut run)),
            None => run.clear(),
        }
    }
    if run.len() > 1 {
        runs.push(run);
    }
    runs
}

fn load_themes(start: usize) -> ThemeBook {
    ThemeBook::builtin(start).unwrap_or_else(|e| {
        log::error!("built-in themes failed to load: {}", e);
        ThemeBook::fallback()
    })
}

pub struct Orrery {
    config: OrreryConfig,
    themes: ThemeBook,
    world: Option<World>,
    effects: EffectQueue<World>,
    asteroids: AsteroidField,
    fleet: Fleet,
    comets: CometSwarm,
    starfield: Starfield,
    rng: Rng,
    viewport: Viewport,
    needs_rebuild: bool,
}

impl Orrery {
    pub fn new() -> Self {
        Self::with_config(OrreryConfig::default())
    }

    pub fn with_config(config: OrreryConfig) -> Self {
        Self {
            themes: load_themes(config.default_theme),
            world: None,
            effects: EffectQueue::new(),
            asteroids: AsteroidField::new(&config.asteroids),
            fleet: Fleet::new(&config.spaceships),
            comets: CometSwarm::default(),
            starfield: Starfield::default(),
            rng: Rng::new(config.seed),
            viewport: Viewport::Desktop,
            needs_rebuild: false,
            config,
        }
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn asteroids(&self) -> &AsteroidField {
        &self.asteroids
    }

    pub fn themes(&self) -> &ThemeBook {
        &self.themes
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Spawn everything from `self.config`, ending effects and despawning any previous scene.
    fn build(&mut self, ctx: &mut EngineContext) {
        if let Some(mut old) = self.world.take() {
            self.effects.clear(&mut old, ctx);
        }
        self.asteroids.clear(&mut ctx.scene);
        self.fleet.clear(&mut ctx.scene);
        ctx.scene.clear();
        ctx.lights.clear();
        ctx.effects.clear();

        if self.needs_rebuild {
            self.themes = load_themes(self.config.default_theme);
        }
        self.rng = Rng::new(self.config.seed);
        let world = World::build(ctx, &self.config, self.themes.current(), &mut self.rng);

        let scale = ctx.clock.scale();
        self.asteroids = AsteroidField::new(&self.config.asteroids);
        self.asteroids.populate(ctx, &mut self.rng);
        self.asteroids.set_speed(scale);
        self.fleet = Fleet::new(&self.config.spaceships);
        self.fleet.populate(ctx, &world.metal, &mut self.rng);
        self.fleet.set_speed(scale, &mut self.rng);
        self.comets = CometSwarm::spawn(ctx, &self.config.comets, &mut self.rng);
        self.starfield = Starfield::generate(&self.config.starfield, &mut self.rng);

        self.world = Some(world);
        self.apply_zoom_limits(&mut ctx.camera);
        self.needs_rebuild = false;
    }

    fn apply_zoom_limits(&self, camera: &mut OrbitCamera) {
        let (min, max) = self.viewport.zoom_limits(self.config.system_radius());
        camera.min_distance = min;
        camera.max_distance = max;
        camera.auto_rotate_speed = self.viewport.auto_rotate_speed();
    }

    fn command(&mut self, ctx: &mut EngineContext, kind: u32, a: f32, b: f32) {
        match kind {
            CUSTOM_RESONANCE => {
                if let Some(world) = self.world.as_mut() {
                    resonance::trigger(world, &mut self.effects, ctx.clock.elapsed());
                }
            }
            CUSTOM_RESET_VIEW => {
                ctx.camera.reset();
                ctx.camera.set_position(self.viewport.reset_position());
            }
            CUSTOM_TIME_SCALE => {
                let scale = ctx.clock.cycle_scale();
                self.asteroids.set_speed(scale);
                self.fleet.set_speed(scale, &mut self.rng);
                log::info!("time scale: {}x", scale);
            }
            CUSTOM_THEME => {
                let theme = self.themes.cycle();
                if let Some(world) = self.world.as_mut() {
                    world.apply_theme(theme, &mut ctx.lights);
                }
            }
            CUSTOM_TOGGLE_ASTEROIDS => {
                let visible = !self.asteroids.visible();
                self.asteroids.set_visible(&mut ctx.scene, visible);
            }
            CUSTOM_TOGGLE_FLEET => {
                let visible = !self.fleet.visible();
                self.fleet.set_visible(&mut ctx.scene, visible);
            }
            CUSTOM_ASTEROID_COUNT => {
                if a > 0.0 {
                    self.asteroids.add(ctx, &mut self.rng);
                } else if a < 0.0 {
                    self.asteroids.remove(&mut ctx.scene);
                }
            }
            CUSTOM_RESIZE => {
                self.viewport = Viewport::classify(a, b);
                ctx.camera.set_position(self.viewport.reset_position());
                self.apply_zoom_limits(&mut ctx.camera);
            }
            _ => log::debug!("unknown custom event {}", kind),
        }
    }

    /// Ships grazing an asteroid throw off a small spark burst.
    fn spark_collisions(&mut self, effects: &mut EffectsState) {
        if !self.fleet.visible() || !self.asteroids.visible() {
            return;
        }
        let hits = self.asteroids.check_collisions(&self.fleet.positions(), SPARK_RADIUS);
        for hit in hits {
            if let Some(ship) = self.fleet.ships_mut().get_mut(hit.point_index) {
                if ship.try_spark() {
                    effects.spawn_burst(hit.point, SPARK_COUNT, (2.0, 5.0), 0.15, Rgb::from_hex(0xffaa44), 0.6);
                }
            }
        }
    }

    fn emit_status(&self, ctx: &mut EngineContext) {
        let resonance = self.world.as_ref().is_some_and(|w| w.resonance_active);
        ctx.events.retain(|e| e.kind != EVENT_STATUS && e.kind != EVENT_FLEET);
        let scale = ctx.clock.scale();
        ctx.emit_event(GameEvent::new(EVENT_STATUS, flag(resonance), scale, self.themes.index() as f32));
        ctx.emit_event(GameEvent::new(
            EVENT_FLEET,
            self.asteroids.len() as f32,
            flag(self.asteroids.visible()),
            flag(self.fleet.visible()),
        ));
    }
}

impl Default for Orrery {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Orrery {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: FIXED_DT,
            max_sdf_instances: 512,
            max_points: 12288,
            max_events: 16,
            seed: self.config.seed,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let size = ctx.camera.viewport();
        self.viewport = Viewport::classify(size.x, size.y);
        self.build(ctx);

        let camera = &mut ctx.camera;
        camera.set_position(self.viewport.initial_position(self.config.system_radius()));
        camera.save_home();
        camera.auto_rotate = true;
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if self.needs_rebuild {
            self.build(ctx);
        }

        // ── Handle input ─────────────────────────────────────────────
        for (kind, a, b, _) in input.customs() {
            self.command(ctx, kind, a, b);
        }

        let Some(world) = self.world.as_mut() else {
            return;
        };
        let dt = ctx.clock.delta();
        let now = ctx.clock.elapsed();

        // ── Bodies ───────────────────────────────────────────────────
        world.step(ctx, &self.config, dt);
        self.comets.step(&mut ctx.scene, dt);
        // Fleets and effects run on real time; the time scale reaches fleets through set_speed.
        self.asteroids.step(&mut ctx.scene, FIXED_DT, now);
        self.fleet.apply_metal(&mut ctx.scene, &world.metal);
        self.fleet.step(&mut ctx.scene, FIXED_DT, now);

        // ── Effects ──────────────────────────────────────────────────
        self.effects.tick(world, ctx, now, FIXED_DT);
        self.spark_collisions(&mut ctx.effects);

        self.emit_status(ctx);
    }

    fn render(&self, out: &mut RenderContext) {
        let Some(world) = self.world.as_ref() else {
            return;
        };
        let t = out.clock.elapsed();

        self.starfield.draw(out.camera, out.points);
        for trail in &world.trails {
            trail.draw(out.camera, out.points);
        }
        self.comets.draw(out.camera, out.points);
        self.fleet.draw_glows(out.camera, out.points, t);

        #[cfg(feature = "vectors")]
        {
            let rgba = world.ring_color.with_alpha(ORBIT_ALPHA);
            for planet in &world.planets {
                for run in orbit_ring_runs(out.camera, planet.distance) {
                    if run.len() == ORBIT_SAMPLES {
                        out.vectors.stroke_polygon(&run, ORBIT_LINE_WIDTH, rgba);
                    } else {
                        out.vectors.stroke_polyline(&run, ORBIT_LINE_WIDTH, rgba);
                    }
                }
            }
        }

        self.effects.draw(world, out);
    }

    fn load_config(&mut self, json: &str) -> Result<(), ConfigError> {
        let config = OrreryConfig::from_json(json)?;
        log::info!("config accepted: {} planets", config.planets.len());
        self.config = config;
        self.needs_rebuild = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rig {
        game: Orrery,
        ctx: EngineContext,
    }

    impl Rig {
        fn new() -> Self {
            let mut game = Orrery::new();
            let mut ctx = EngineContext::with_config(&game.config());
            game.init(&mut ctx);
            Self { game, ctx }
        }

        fn step(&mut self, input: &InputQueue) {
            self.ctx.clear_frame_data();
            self.ctx.clock.advance(FIXED_DT);
            self.game.update(&mut self.ctx, input);
        }

        fn idle(&mut self, steps: usize) {
            let none = InputQueue::new();
            for _ in 0..steps {
                self.step(&none);
            }
        }

        fn send(&mut self, kind: u32, a: f32, b: f32) {
            let mut q = InputQueue::new();
            q.push(InputEvent::Custom { kind, a, b, c: 0.0 });
            self.step(&q);
        }

        fn event(&self, kind: f32) -> GameEvent {
            *self.ctx.events.iter().find(|e| e.kind == kind).unwrap()
        }
    }

    #[test]
    fn init_builds_the_scene() {
        let rig = Rig::new();
        let world = rig.game.world().unwrap();
        assert_eq!(world.planets.len(), 7);
        // star + planets + asteroid pairs + ships + comets
        assert_eq!(rig.ctx.scene.len(), 1 + 7 + 50 + 8 + 3);
        assert_eq!(rig.ctx.lights.count(), 4);
        assert!(rig.ctx.camera.auto_rotate);
        assert_eq!(rig.game.viewport(), Viewport::Desktop);
        assert_eq!(rig.ctx.camera.max_distance, 192.0);
    }

    #[test]
    fn status_is_reported_once_per_frame() {
        let mut rig = Rig::new();
        let none = InputQueue::new();
        rig.ctx.clear_frame_data();
        for _ in 0..3 {
            rig.ctx.clock.advance(FIXED_DT);
            rig.game.update(&mut rig.ctx, &none);
        }
        assert_eq!(rig.ctx.events.iter().filter(|e| e.kind == EVENT_STATUS).count(), 1);
        let status = rig.event(EVENT_STATUS);
        assert_eq!(status.a, 0.0);
        assert_eq!(status.b, 1.0);
        assert_eq!(status.c, 2.0);
    }

    #[test]
    fn resonance_command_activates_once() {
        let mut rig = Rig::new();
        rig.send(CUSTOM_RESONANCE, 0.0, 0.0);
        assert_eq!(rig.event(EVENT_STATUS).a, 1.0);
        let scheduled = rig.game.effects.len();
        rig.send(CUSTOM_RESONANCE, 0.0, 0.0);
        assert!(rig.game.effects.len() <= scheduled);
        rig.idle(60 * 13);
        assert_eq!(rig.event(EVENT_STATUS).a, 0.0);
        assert!(rig.game.effects.is_empty());
    }

    #[test]
    fn time_scale_and_theme_cycle() {
        let mut rig = Rig::new();
        rig.send(CUSTOM_TIME_SCALE, 0.0, 0.0);
        assert_eq!(rig.event(EVENT_STATUS).b, 2.0);
        let a = &rig.game.asteroids().asteroids()[0];
        assert_eq!(a.speed, a.base_speed * 2.0);

        rig.send(CUSTOM_THEME, 0.0, 0.0);
        assert_eq!(rig.event(EVENT_STATUS).c, 0.0);
        assert_eq!(rig.game.themes().current().name, "Inferno");
        assert_eq!(rig.game.world().unwrap().ring_color, Rgb::from_hex(0xff8866));
    }

    #[test]
    fn visibility_toggles_and_asteroid_count() {
        let mut rig = Rig::new();
        rig.send(CUSTOM_TOGGLE_ASTEROIDS, 0.0, 0.0);
        rig.send(CUSTOM_TOGGLE_FLEET, 0.0, 0.0);
        let fleet = rig.event(EVENT_FLEET);
        assert_eq!(fleet.b, 0.0);
        assert_eq!(fleet.c, 1.0);

        rig.send(CUSTOM_ASTEROID_COUNT, 1.0, 0.0);
        assert_eq!(rig.event(EVENT_FLEET).a, 26.0);
        rig.send(CUSTOM_ASTEROID_COUNT, -1.0, 0.0);
        rig.send(CUSTOM_ASTEROID_COUNT, -1.0, 0.0);
        assert_eq!(rig.event(EVENT_FLEET).a, 24.0);
        assert_eq!(rig.ctx.scene.len(), 1 + 7 + 48 + 8 + 3);
    }

    #[test]
    fn resize_switches_camera_presets() {
        let mut rig = Rig::new();
        rig.ctx.camera.resize(400.0, 800.0);
        rig.send(CUSTOM_RESIZE, 400.0, 800.0);
        assert_eq!(rig.game.viewport(), Viewport::Small);
        assert_eq!(rig.ctx.camera.min_distance, 8.0);
        assert_eq!(rig.ctx.camera.max_distance, 160.0);
        assert_eq!(rig.ctx.camera.auto_rotate_speed, 0.15);
    }

    #[test]
    fn reset_view_uses_the_viewport_preset() {
        let mut rig = Rig::new();
        rig.ctx.camera.drag(200.0, 50.0);
        rig.ctx.camera.update(1.0);
        rig.send(CUSTOM_RESET_VIEW, 0.0, 0.0);
        let pos = rig.ctx.camera.position();
        assert!((pos - glam::Vec3::new(35.0, 28.0, 35.0)).length() < 1e-3);
    }

    #[test]
    fn load_config_rebuilds_on_next_step() {
        let mut rig = Rig::new();
        assert!(rig.game.load_config(r#"{ "planets": [] }"#).is_err());
        assert!(rig.game.load_config("not json").is_err());
        assert!(!rig.game.needs_rebuild);

        rig.send(CUSTOM_RESONANCE, 0.0, 0.0);
        rig.game
            .load_config(r#"{ "planets": [{ "size": 1.0, "distance": 10.0, "speed": 0.5 }], "asteroids": { "count": 3 } }"#)
            .unwrap();
        rig.idle(1);
        let world = rig.game.world().unwrap();
        assert_eq!(world.planets.len(), 1);
        assert!(!world.resonance_active);
        assert_eq!(rig.game.asteroids().len(), 3);
        assert_eq!(rig.ctx.scene.len(), 1 + 1 + 6 + 8 + 3);
        assert_eq!(rig.ctx.lights.count(), 4);
    }

    #[test]
    fn spikes_spin_on_real_frames_at_any_time_scale() {
        let mut rig = Rig::new();
        rig.ctx.clock.set_scale(10.0);
        rig.send(CUSTOM_RESONANCE, 0.0, 0.0);
        rig.idle(2);
        let spins: Vec<f32> = rig.ctx.scene.tagged("spike").map(|e| e.rotation.y).collect();
        assert_eq!(spins.len(), 8);
        for spin in spins {
            assert!((spin - 0.3).abs() < 1e-4, "{spin}");
        }
    }

    #[test]
    fn reloaded_config_selects_its_theme() {
        let mut rig = Rig::new();
        assert_eq!(rig.game.themes().index(), 2);
        rig.send(CUSTOM_THEME, 0.0, 0.0);
        assert_eq!(rig.game.themes().index(), 0);

        rig.game.load_config(r#"{ "default_theme": 1 }"#).unwrap();
        rig.idle(1);
        assert_eq!(rig.game.themes().index(), 1);
        let theme = rig.game.themes().current();
        let world = rig.game.world().unwrap();
        assert_eq!(world.theme_star.color1, theme.star_colors.color1);
        assert_eq!(world.ring_color, theme.ring_color);
    }

    #[test]
    fn render_fills_points_and_vectors() {
        let mut rig = Rig::new();
        rig.idle(10);
        let mut out = rig.ctx.render_context();
        rig.game.render(&mut out);
        assert!(rig.ctx.points.point_count() > 1000);
        #[cfg(feature = "vectors")]
        assert!(rig.ctx.vectors.vertex_count() > 0);
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn orbit_ring_splits_behind_the_camera() {
        let mut cam = OrbitCamera::new(800.0, 600.0);
        cam.set_position(glam::Vec3::new(0.0, 30.0, 60.0));
        let whole = orbit_ring_runs(&cam, 20.0);
        assert_eq!(whole.len(), 1);
        assert_eq!(whole[0].len(), ORBIT_SAMPLES);

        cam.set_position(glam::Vec3::new(0.0, 1.0, 20.0));
        let cut = orbit_ring_runs(&cam, 40.0);
        assert!(cut.iter().map(Vec::len).sum::<usize>() < ORBIT_SAMPLES);
    }
}
