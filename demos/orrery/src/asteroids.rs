//! Ambient asteroid field: drifting, spinning rocks with a faint glow shell.

use std::f32::consts::TAU;

use glam::Vec3;
use orrery_engine::{EngineContext, Entity, EntityId, MeshComponent, Rgb, Rng, SDFShape, Scene};

use crate::config::{AsteroidSpec, Span};

pub const ASTEROID_TAG: &str = "asteroid";
pub const ASTEROID_GLOW_TAG: &str = "asteroid-glow";

const MAX_HEIGHT: f32 = 4.0;
const BELT_HEIGHT: f32 = 1.5;
const MAX_INCLINATION: f32 = 0.15;
const GLOW_SCALE: f32 = 1.15;
const GLOW_ALPHA: f32 = 0.15;
const PULSE: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub id: EntityId,
    pub glow: EntityId,
    pub angle: f32,
    pub radius: f32,
    pub height: f32,
    pub inclination: f32,
    /// Radians per 60 Hz frame, before the field multiplier.
    pub base_speed: f32,
    pub speed: f32,
    /// Per-axis spin, radians per 60 Hz frame.
    pub spin: Vec3,
    pub size: f32,
    pub pos: Vec3,
}

impl Asteroid {
    pub fn position_at(&self, angle: f32) -> Vec3 {
        Vec3::new(
            angle.cos() * self.radius,
            self.height + (angle + self.inclination).sin() * 2.0,
            angle.sin() * self.radius,
        )
    }
}

/// A point that came within range of an asteroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub asteroid: usize,
    pub point_index: usize,
    pub point: Vec3,
    pub distance: f32,
}

/// Placement of a new asteroid before it is spawned.
struct Placement {
    angle: f32,
    radius: f32,
    height: f32,
    size: f32,
    speed: f32,
    alpha: f32,
}

pub struct AsteroidField {
    asteroids: Vec<Asteroid>,
    spec: AsteroidSpec,
    speed_multiplier: f32,
    visible: bool,
}

impl AsteroidField {
    pub fn new(spec: &AsteroidSpec) -> Self {
        Self {
            asteroids: Vec::new(),
            spec: spec.clone(),
            speed_multiplier: 1.0,
            visible: spec.enabled,
        }
    }

    /// Spawn the configured count plus the optional belt.
    pub fn populate(&mut self, ctx: &mut EngineContext, rng: &mut Rng) {
        for _ in 0..self.spec.count {
            self.add(ctx, rng);
        }
        if let Some(belt) = self.spec.belt {
            self.add_belt(ctx, rng, belt.inner, belt.outer, belt.count);
        }
        log::info!("asteroid field: {} asteroids", self.asteroids.len());
    }

    /// Add one asteroid at a random spot within the configured orbit range.
    pub fn add(&mut self, ctx: &mut EngineContext, rng: &mut Rng) -> EntityId {
        let placement = Placement {
            angle: rng.next_f32() * TAU,
            radius: self.spec.orbit.sample(rng),
            height: rng.range(-MAX_HEIGHT, MAX_HEIGHT),
            size: self.spec.size.sample(rng),
            speed: self.spec.speed * (0.75 + rng.next_f32() * 0.5),
            alpha: 0.9,
        };
        self.spawn(ctx, rng, placement)
    }

    /// Add `count` smaller asteroids evenly spread around a ring.
    pub fn add_belt(&mut self, ctx: &mut EngineContext, rng: &mut Rng, inner: f32, outer: f32, count: usize) {
        let band = Span::new(inner.min(outer), inner.max(outer));
        for i in 0..count {
            let placement = Placement {
                angle: i as f32 / count as f32 * TAU + rng.next_f32() * 0.5,
                radius: band.sample(rng),
                height: rng.range(-BELT_HEIGHT, BELT_HEIGHT),
                size: self.spec.size.min + rng.next_f32() * self.spec.size.max * 0.7,
                speed: self.spec.speed * (0.5 + rng.next_f32() * 0.5),
                alpha: 0.8,
            };
            self.spawn(ctx, rng, placement);
        }
    }

    fn spawn(&mut self, ctx: &mut EngineContext, rng: &mut Rng, at: Placement) -> EntityId {
        let color = rng.pick(&self.spec.colors).copied().unwrap_or(Rgb::from_hex(0x8b7355));
        let spin = Vec3::new(rng.signed(), rng.signed(), rng.signed()) * 2.0 * self.spec.rotation_speed;
        let mut asteroid = Asteroid {
            id: ctx.next_id(),
            glow: ctx.next_id(),
            angle: at.angle,
            radius: at.radius,
            height: at.height,
            inclination: rng.range(-MAX_INCLINATION, MAX_INCLINATION),
            base_speed: at.speed,
            speed: at.speed * self.speed_multiplier,
            spin,
            size: at.size,
            pos: Vec3::ZERO,
        };
        asteroid.pos = asteroid.position_at(asteroid.angle);

        ctx.scene.spawn(
            Entity::new(asteroid.id)
                .with_tag(ASTEROID_TAG)
                .with_pos(asteroid.pos)
                .with_rotation(Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32()) * TAU)
                .with_visible(self.visible)
                .with_mesh(
                    MeshComponent::new(SDFShape::Icosahedron { radius: at.size }, color)
                        .with_alpha(at.alpha)
                        .with_shininess(8.0)
                        .with_emissive(0.15),
                ),
        );
        ctx.scene.spawn(
            Entity::new(asteroid.glow)
                .with_tag(ASTEROID_GLOW_TAG)
                .with_pos(asteroid.pos)
                .with_visible(self.visible)
                .with_mesh(
                    MeshComponent::new(SDFShape::Sphere { radius: at.size * GLOW_SCALE }, color)
                        .with_alpha(GLOW_ALPHA)
                        .with_emissive(0.5),
                ),
        );
        let id = asteroid.id;
        self.asteroids.push(asteroid);
        id
    }

    /// Remove the most recently added asteroid. Returns false if the field is empty.
    pub fn remove(&mut self, scene: &mut Scene) -> bool {
        match self.asteroids.pop() {
            Some(a) => {
                scene.despawn(a.id);
                scene.despawn(a.glow);
                true
            }
            None => false,
        }
    }

    /// Despawn every asteroid.
    pub fn clear(&mut self, scene: &mut Scene) {
        while self.remove(scene) {}
    }

    /// Scale every asteroid's orbit speed relative to its base speed.
    pub fn set_speed(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier;
        for a in &mut self.asteroids {
            a.speed = a.base_speed * multiplier;
        }
    }

    pub fn set_visible(&mut self, scene: &mut Scene, visible: bool) {
        self.visible = visible;
        scene.set_visible_by_tag(ASTEROID_TAG, visible);
        scene.set_visible_by_tag(ASTEROID_GLOW_TAG, visible);
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Advance by the real fixed step `dt`; `t` is elapsed real time and drives the pulse.
    pub fn step(&mut self, scene: &mut Scene, dt: f32, t: f32) {
        let frames = dt * 60.0;
        for a in &mut self.asteroids {
            a.angle = (a.angle + a.speed * frames).rem_euclid(TAU);
            a.pos = a.position_at(a.angle);
            let pulse = 1.0 + (t + a.angle).sin() * PULSE;
            if let Some(e) = scene.get_mut(a.id) {
                e.pos = a.pos;
                e.rotation += a.spin * frames;
                e.scale = Vec3::splat(pulse);
            }
            if let Some(g) = scene.get_mut(a.glow) {
                g.pos = a.pos;
                g.scale = Vec3::splat(pulse);
            }
        }
    }

    /// Every (asteroid, point) pair closer than `radius`.
    pub fn check_collisions(&self, points: &[Vec3], radius: f32) -> Vec<Collision> {
        let mut hits = Vec::new();
        for (ai, a) in self.asteroids.iter().enumerate() {
            for (pi, p) in points.iter().enumerate() {
                let distance = a.pos.distance(*p);
                if distance < radius {
                    hits.push(Collision {
                        asteroid: ai,
                        point_index: pi,
                        point: *p,
                        distance,
                    });
                }
            }
        }
        hits
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }
}
