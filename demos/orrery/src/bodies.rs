//! The star and its planets: spawning and per-step orbital motion.

use std::f32::consts::TAU;

use glam::Vec3;
use orrery_engine::{
    EngineContext, Entity, EntityId, Easing, MeshComponent, Rgb, Rng, SDFShape, Scene, Trail,
};

use crate::config::{IntroSpec, PlanetSpec, StarSpec};
use crate::theme::{PlanetColors, Theme};

pub const STAR_TAG: &str = "star";
pub const PLANET_TAG: &str = "planet";

/// Trail sprites are additive and semi-transparent.
const TRAIL_ALPHA: f32 = 0.6;

#[derive(Debug, Clone)]
pub struct Star {
    pub id: EntityId,
    pub color1: Rgb,
    pub color2: Rgb,
    /// Glow multiplier; 1.0 at rest.
    pub intensity: f32,
    spin_y: f32,
    spin_x: f32,
}

impl Star {
    pub fn spawn(ctx: &mut EngineContext, spec: &StarSpec, theme: &Theme) -> Self {
        let id = ctx.next_id();
        let star = Self {
            id,
            color1: theme.star_colors.color1,
            color2: theme.star_colors.color2,
            intensity: 1.0,
            spin_y: spec.spin_y,
            spin_x: spec.spin_x,
        };
        ctx.scene.spawn(
            Entity::new(id)
                .with_tag(STAR_TAG)
                .with_mesh(
                    MeshComponent::new(SDFShape::Icosahedron { radius: spec.radius }, star.color1)
                        .with_accent(star.color2)
                        .with_emissive(star.intensity),
                ),
        );
        star
    }

    pub fn step(&self, scene: &mut Scene, dt: f32) {
        if let Some(e) = scene.get_mut(self.id) {
            e.rotation.y += dt * self.spin_y;
            e.rotation.x += dt * self.spin_x;
            if let Some(mesh) = e.mesh.as_mut() {
                mesh.color = self.color1;
                mesh.accent = self.color2;
                mesh.emissive = self.intensity;
            }
        }
    }

    /// World position; the star sits at the origin.
    pub fn position(&self) -> Vec3 {
        Vec3::ZERO
    }
}

/// Planet mesh by index: the seven solids in order, repeating.
pub fn planet_shape(index: usize, size: f32) -> SDFShape {
    match index % 7 {
        0 => SDFShape::Octahedron { radius: size },
        1 => SDFShape::Dodecahedron { radius: size },
        2 => SDFShape::Icosahedron { radius: size },
        3 => SDFShape::Tetrahedron { radius: size },
        4 => SDFShape::Sphere { radius: size },
        5 => SDFShape::Box { radius: size * 0.5 },
        _ => SDFShape::Cone { radius: size, height: size * 2.0 },
    }
}

#[derive(Debug, Clone)]
pub struct Planet {
    pub id: EntityId,
    pub index: usize,
    /// Orbit angle around +Y, radians.
    pub angle: f32,
    pub orbit_speed: f32,
    /// Orbit speed outside of resonance.
    pub base_orbit_speed: f32,
    pub self_rotation: f32,
    pub distance: f32,
    pub size: f32,
    /// Seconds after the world is built before this planet starts moving out.
    pub intro_delay: f32,
    pub energy: f32,
    pub scale: f32,
    pub colors: PlanetColors,
    /// Position after the latest step.
    pub pos: Vec3,
}

impl Planet {
    pub fn spawn(
        ctx: &mut EngineContext,
        index: usize,
        spec: &PlanetSpec,
        self_rotation: f32,
        intro: &IntroSpec,
        colors: PlanetColors,
        rng: &mut Rng,
    ) -> Self {
        let id = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(id)
                .with_tag(PLANET_TAG)
                .with_mesh(
                    MeshComponent::new(planet_shape(index, spec.size), colors.base_color)
                        .with_accent(colors.accent_color)
                        .with_shininess(48.0),
                ),
        );
        Self {
            id,
            index,
            angle: rng.next_f32() * TAU,
            orbit_speed: spec.speed,
            base_orbit_speed: spec.speed,
            self_rotation,
            distance: spec.distance,
            size: spec.size,
            intro_delay: index as f32 * intro.stagger,
            energy: 0.0,
            scale: 1.0,
            colors,
            pos: Vec3::ZERO,
        }
    }

    /// Orbit radius at `since_build` seconds, easing out from the star.
    pub fn current_distance(&self, since_build: f32, intro: &IntroSpec) -> f32 {
        if intro.duration <= 0.0 {
            return self.distance;
        }
        let t = (since_build - self.intro_delay) / intro.duration;
        self.distance * Easing::CubicOut.apply(t)
    }

    pub fn orbit_position(&self, radius: f32) -> Vec3 {
        Vec3::new(self.angle.cos() * radius, 0.0, -self.angle.sin() * radius)
    }

    /// Advance orbit and spin by the scaled `dt`, then sync the entity.
    pub fn step(&mut self, scene: &mut Scene, dt: f32, since_build: f32, intro: &IntroSpec) {
        self.angle = (self.angle + self.orbit_speed * dt).rem_euclid(TAU);
        self.pos = self.orbit_position(self.current_distance(since_build, intro));

        if let Some(e) = scene.get_mut(self.id) {
            e.pos = self.pos;
            e.rotation.y += dt * self.self_rotation;
            e.rotation.z += dt * self.self_rotation * 0.3;
            e.scale = Vec3::splat(self.scale);
            if let Some(mesh) = e.mesh.as_mut() {
                mesh.color = self.colors.base_color;
                mesh.accent = self.colors.accent_color;
                mesh.energy = self.energy;
            }
        }
    }

    /// A trail seeded with the full orbit circle.
    pub fn make_trail(&self, length: usize, rng: &mut Rng) -> Trail {
        let circle = (0..length).map(|i| {
            let a = i as f32 / length as f32 * TAU;
            Vec3::new(a.cos() * self.distance, 0.0, a.sin() * self.distance)
        });
        Trail::filled_with(length, circle)
            .with_sizes(|_| rng.next_f32() * 0.5 + 0.1)
            .with_color(self.colors.trail_color, TRAIL_ALPHA)
    }

    /// Arc length between trail samples.
    pub fn trail_spacing(&self, length: usize) -> f32 {
        TAU * self.distance / length.max(1) as f32
    }
}

/// Push the planet's position into its trail once it has moved a full sample spacing.
pub fn feed_trail(trail: &mut Trail, pos: Vec3, spacing: f32) {
    let moved = trail.newest().map_or(f32::INFINITY, |last| last.distance(pos));
    if moved >= spacing {
        trail.push(pos);
    }
}
