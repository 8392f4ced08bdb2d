//! A fleet of small metal ships cruising between the planets.

use std::f32::consts::TAU;

use glam::{EulerRot, Quat, Vec3};
use orrery_engine::{
    push_point, BlendMode, EngineContext, Entity, EntityId, MeshComponent, OrbitCamera,
    PointBuffer, Rgb, Rng, SDFShape, Scene,
};

use crate::config::SpaceshipSpec;
use crate::world::Metal;

pub const SHIP_TAG: &str = "ship";

const HULL: SDFShape = SDFShape::Cone { radius: 0.5, height: 3.0 };
const MAX_HEIGHT: f32 = 10.0;
const HEIGHT_LIMIT: f32 = 15.0;
const MAX_VERTICAL_SPEED: f32 = 0.0005;
const BOB: f32 = 0.2;
/// Seconds between spark bursts for the same ship.
pub const SPARK_COOLDOWN: f32 = 1.0;

const ENGINE_GLOW: Rgb = Rgb::new(0.0, 1.0, 1.0);
const NAV_RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
const NAV_GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);

#[derive(Debug, Clone)]
pub struct Ship {
    pub id: EntityId,
    pub angle: f32,
    pub radius: f32,
    pub height: f32,
    /// Radians per 60 Hz frame, before the fleet multiplier.
    pub base_speed: f32,
    pub speed: f32,
    /// Units per 60 Hz frame.
    pub vertical_speed: f32,
    pub pos: Vec3,
    /// Unit direction of travel.
    pub dir: Vec3,
    spark_cooldown: f32,
}

impl Ship {
    fn step(&mut self, scene: &mut Scene, dt: f32, t: f32) {
        let frames = dt * 60.0;
        self.angle = (self.angle + self.speed * frames).rem_euclid(TAU);
        self.height += self.vertical_speed * frames;
        if self.height.abs() > HEIGHT_LIMIT {
            self.vertical_speed = -self.vertical_speed;
            self.height = self.height.clamp(-HEIGHT_LIMIT, HEIGHT_LIMIT);
        }
        let bob = (t * 3.0 + self.angle).sin() * BOB;
        let next = Vec3::new(
            self.angle.cos() * self.radius,
            self.height + bob,
            self.angle.sin() * self.radius,
        );
        if let Some(dir) = (next - self.pos).try_normalize() {
            self.dir = dir;
        }
        self.pos = next;
        self.spark_cooldown = (self.spark_cooldown - dt).max(0.0);

        if let Some(e) = scene.get_mut(self.id) {
            e.pos = self.pos;
            let (x, y, z) = Quat::from_rotation_arc(Vec3::Y, self.dir).to_euler(EulerRot::XYZ);
            e.rotation = Vec3::new(x, y, z);
        }
    }

    /// Consume the spark cooldown. Returns true if a burst may be spawned now.
    pub fn try_spark(&mut self) -> bool {
        if self.spark_cooldown > 0.0 {
            return false;
        }
        self.spark_cooldown = SPARK_COOLDOWN;
        true
    }
}

pub struct Fleet {
    ships: Vec<Ship>,
    spec: SpaceshipSpec,
    speed_multiplier: f32,
    visible: bool,
}

impl Fleet {
    pub fn new(spec: &SpaceshipSpec) -> Self {
        Self {
            ships: Vec::new(),
            spec: spec.clone(),
            speed_multiplier: 1.0,
            visible: spec.enabled,
        }
    }

    /// Spawn the configured count. Ships exist even while hidden.
    pub fn populate(&mut self, ctx: &mut EngineContext, metal: &Metal, rng: &mut Rng) {
        for _ in 0..self.spec.count {
            self.add(ctx, metal, rng);
        }
        log::info!("fleet: {} ships", self.ships.len());
    }

    pub fn add(&mut self, ctx: &mut EngineContext, metal: &Metal, rng: &mut Rng) -> EntityId {
        let id = ctx.next_id();
        let accent = rng.pick(&self.spec.colors).copied().unwrap_or(ENGINE_GLOW);
        let base_speed = self.spec.speed * (0.75 + rng.next_f32() * 0.5);
        let mut ship = Ship {
            id,
            angle: rng.next_f32() * TAU,
            radius: self.spec.orbit.sample(rng),
            height: rng.range(-MAX_HEIGHT, MAX_HEIGHT),
            base_speed,
            speed: base_speed * self.speed_multiplier,
            vertical_speed: rng.range(-MAX_VERTICAL_SPEED, MAX_VERTICAL_SPEED),
            pos: Vec3::ZERO,
            dir: Vec3::Z,
            spark_cooldown: 0.0,
        };
        ship.pos = Vec3::new(ship.angle.cos() * ship.radius, ship.height, ship.angle.sin() * ship.radius);
        ship.dir = Vec3::new(-ship.angle.sin(), 0.0, ship.angle.cos());

        ctx.scene.spawn(
            Entity::new(id)
                .with_tag(SHIP_TAG)
                .with_pos(ship.pos)
                .with_visible(self.visible)
                .with_mesh(
                    MeshComponent::new(HULL, metal.color)
                        .with_accent(accent)
                        .with_shininess(100.0)
                        .with_emissive(metal.emissive),
                ),
        );
        self.ships.push(ship);
        id
    }

    pub fn remove(&mut self, scene: &mut Scene) -> bool {
        match self.ships.pop() {
            Some(s) => {
                scene.despawn(s.id);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, scene: &mut Scene) {
        while self.remove(scene) {}
    }

    /// Scale ship speeds, with a little per-ship jitter so they drift apart.
    pub fn set_speed(&mut self, multiplier: f32, rng: &mut Rng) {
        self.speed_multiplier = multiplier;
        for s in &mut self.ships {
            s.speed = s.base_speed * multiplier * (0.9 + rng.next_f32() * 0.2);
        }
    }

    pub fn set_visible(&mut self, scene: &mut Scene, visible: bool) {
        self.visible = visible;
        scene.set_visible_by_tag(SHIP_TAG, visible);
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Push the shared metal material onto every hull.
    pub fn apply_metal(&self, scene: &mut Scene, metal: &Metal) {
        for s in &self.ships {
            if let Some(mesh) = scene.get_mut(s.id).and_then(|e| e.mesh.as_mut()) {
                mesh.color = metal.color;
                mesh.emissive = metal.emissive;
            }
        }
    }

    /// Advance by the real fixed step `dt`; `t` is elapsed real time.
    pub fn step(&mut self, scene: &mut Scene, dt: f32, t: f32) {
        for s in &mut self.ships {
            s.step(scene, dt, t);
        }
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.ships.iter().map(|s| s.pos).collect()
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ships_mut(&mut self) -> &mut [Ship] {
        &mut self.ships
    }

    /// Engine glow behind each ship plus red/green navigation lights.
    pub fn draw_glows(&self, camera: &OrbitCamera, points: &mut PointBuffer, t: f32) {
        if !self.visible {
            return;
        }
        let glow = 0.3 + (t * 10.0).sin() * 0.2;
        for s in &self.ships {
            let side = s.dir.cross(Vec3::Y).normalize_or_zero();
            push_point(camera, points, s.pos - s.dir * 1.5, glow, ENGINE_GLOW, 0.9, BlendMode::Additive);
            push_point(camera, points, s.pos + side * 0.6, 0.12, NAV_RED, 0.9, BlendMode::Additive);
            push_point(camera, points, s.pos - side * 0.6, 0.12, NAV_GREEN, 0.9, BlendMode::Additive);
        }
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::world::METAL_EMISSIVE;

    fn metal() -> Metal {
        Metal {
            color: Rgb::from_hex(0x444466),
            emissive: METAL_EMISSIVE,
        }
    }

    fn fleet(ctx: &mut EngineContext, spec: SpaceshipSpec) -> Fleet {
        let mut rng = Rng::new(21);
        let mut f = Fleet::new(&spec);
        f.populate(ctx, &metal(), &mut rng);
        f
    }

    #[test]
    fn hidden_by_default_but_populated() {
        let mut ctx = EngineContext::new();
        let f = fleet(&mut ctx, SpaceshipSpec::default());
        assert_eq!(f.len(), 8);
        assert!(!f.visible());
        assert!(ctx.scene.iter().all(|e| !e.visible && e.tag == SHIP_TAG));
        let mesh = ctx.scene.iter().next().unwrap().mesh.unwrap();
        assert_eq!(mesh.color, metal().color);
        assert_eq!(mesh.emissive, METAL_EMISSIVE);
    }

    #[test]
    fn vertical_speed_bounces() {
        let mut ctx = EngineContext::new();
        let mut f = fleet(&mut ctx, SpaceshipSpec { count: 1, ..SpaceshipSpec::default() });
        let s = &mut f.ships_mut()[0];
        s.height = 14.99;
        s.vertical_speed = 0.02;
        s.step(&mut ctx.scene, 1.0 / 60.0, 0.0);
        assert!(s.vertical_speed < 0.0);
        assert!(s.height <= HEIGHT_LIMIT);
    }

    #[test]
    fn ships_bob_gently() {
        let mut ctx = EngineContext::new();
        let mut f = fleet(&mut ctx, SpaceshipSpec::default());
        let before: Vec<f32> = f.ships_mut().iter().map(|s| s.height).collect();
        for _ in 0..60 {
            f.step(&mut ctx.scene, 1.0 / 60.0, 0.0);
        }
        for (s, h) in f.ships_mut().iter().zip(before) {
            assert!(s.vertical_speed.abs() <= MAX_VERTICAL_SPEED);
            assert!((s.height - h).abs() <= 60.0 * MAX_VERTICAL_SPEED + 1e-5);
        }
    }

    #[test]
    fn ships_face_their_travel() {
        let mut ctx = EngineContext::new();
        let mut f = fleet(&mut ctx, SpaceshipSpec { count: 1, ..SpaceshipSpec::default() });
        f.step(&mut ctx.scene, 1.0 / 60.0, 0.0);
        f.step(&mut ctx.scene, 1.0 / 60.0, 0.0);
        let s = &f.ships()[0];
        let e = ctx.scene.get(s.id).unwrap();
        let nose = e.orientation() * Vec3::Y;
        assert_relative_eq!(nose.dot(s.dir), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn spark_is_rate_limited() {
        let mut ctx = EngineContext::new();
        let mut f = fleet(&mut ctx, SpaceshipSpec { count: 1, ..SpaceshipSpec::default() });
        assert!(f.ships_mut()[0].try_spark());
        assert!(!f.ships_mut()[0].try_spark());
        for _ in 0..61 {
            f.step(&mut ctx.scene, 1.0 / 60.0, 0.0);
        }
        assert!(f.ships_mut()[0].try_spark());
    }

    #[test]
    fn glows_only_when_visible() {
        let mut ctx = EngineContext::new();
        let mut f = fleet(&mut ctx, SpaceshipSpec::default());
        let mut cam = OrbitCamera::new(800.0, 600.0);
        cam.set_position(Vec3::new(0.0, 80.0, 120.0));
        let mut points = PointBuffer::with_capacity(64);
        f.draw_glows(&cam, &mut points, 0.0);
        assert_eq!(points.point_count(), 0);
        f.set_visible(&mut ctx.scene, true);
        f.draw_glows(&cam, &mut points, 0.0);
        assert_eq!(points.point_count(), 24);
    }

    #[test]
    fn remove_and_set_speed() {
        let mut ctx = EngineContext::new();
        let mut rng = Rng::new(4);
        let mut f = fleet(&mut ctx, SpaceshipSpec { count: 3, ..SpaceshipSpec::default() });
        f.set_speed(2.0, &mut rng);
        for s in f.ships() {
            assert!(s.speed >= s.base_speed * 1.8 && s.speed <= s.base_speed * 2.2);
        }
        assert!(f.remove(&mut ctx.scene));
        assert_eq!(f.len(), 2);
        assert_eq!(ctx.scene.len(), 2);
    }
}
