//! Resonance: a burst of timed effects that drives the whole system for a few seconds.
//!
//! `trigger` schedules one wave (star, lights, planets), five expanding rings,
//! spikes around every planet, a particle cloud and two kinds of energy arcs.
//! Everything the wave changes is put back when it ends.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};
use orrery_engine::{
    push_point, BlendMode, Effect, EffectQueue, EngineContext, Entity, EntityId, Envelope,
    MeshComponent, RenderContext, Rgb, SDFShape,
};

use crate::world::{World, METAL_EMISSIVE};

pub const WAVE_DURATION: f32 = 12.0;
pub const RING_DURATION: f32 = 4.0;
pub const RING_COUNT: usize = 5;
pub const RING_STAGGER: f32 = 0.3;
pub const SPIKE_DURATION: f32 = 6.0;
pub const SPIKES_PER_PLANET: usize = 8;
pub const SPIKE_STAGGER: f32 = 0.2;
pub const BURST_DURATION: f32 = 8.0;
pub const BURST_PARTICLES: usize = 200;
pub const ARC_DURATION: f32 = 8.0;
pub const SPIRAL_DURATION: f32 = 6.0;

const RING_SAMPLES: usize = 64;
const ARC_SAMPLES: usize = 50;
const SPIRAL_SAMPLES: usize = 101;
const BURST_MAX_RADIUS: f32 = 2000.0;
const SPIKE_RING_RADIUS: f32 = 2.0;

fn progress(elapsed: f32, duration: f32) -> f32 {
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Schedule a resonance starting at `now`. Ignored while one is running.
pub fn trigger(world: &mut World, queue: &mut EffectQueue<World>, now: f32) -> bool {
    if world.resonance_active {
        log::debug!("resonance already active");
        return false;
    }
    world.resonance_active = true;

    queue.spawn(Box::new(ResonanceWave::default()), now, WAVE_DURATION);
    for i in 0..RING_COUNT {
        queue.spawn(Box::new(ResonanceRing::default()), now + i as f32 * RING_STAGGER, RING_DURATION);
    }
    queue.spawn(Box::new(ParticleBurst::default()), now, BURST_DURATION);
    for k in 0..world.planets.len() {
        let delay = k as f32 * SPIKE_STAGGER;
        for slot in 0..SPIKES_PER_PLANET {
            queue.spawn(Box::new(EnergySpike::new(k, slot)), now + delay, SPIKE_DURATION);
        }
        queue.spawn(Box::new(EnergyArc::new(k)), now, ARC_DURATION);
        queue.spawn(Box::new(SpiralArc::new(k)), now, SPIRAL_DURATION);
    }
    log::info!("resonance started: {} effects", queue.len());
    true
}

/// Drives star, lights, metal and planets with a damped oscillation.
#[derive(Debug, Default)]
pub struct ResonanceWave;

impl Effect<World> for ResonanceWave {
    fn kind(&self) -> &'static str {
        "resonance-wave"
    }

    fn start(&mut self, world: &mut World, _ctx: &mut EngineContext) {
        world.resonance_active = true;
    }

    fn update(&mut self, world: &mut World, ctx: &mut EngineContext, elapsed: f32, _dt: f32) {
        let p = progress(elapsed, WAVE_DURATION);
        let i = 5.0 * Envelope::DampedWave { cycles: 4.0, decay: 2.0 }.sample(p);

        if let Some(lights) = world.lights {
            lights.set_intensities(
                &mut ctx.lights,
                0.8 + 2.0 * i,
                3.0 + 4.0 * i,
                0.5 + 3.0 * i,
                0.3 + 2.0 * i,
            );
        }
        world.star.intensity = 1.0 + 3.0 * i;
        world.star.color1 = Rgb::from_hsl(0.1 + 0.3 * p, 1.0, 0.5 + 0.2 * i);
        world.star.color2 = Rgb::from_hsl(0.6 - 0.2 * p, 1.0, 0.5 + 0.2 * i);
        world.metal.emissive = METAL_EMISSIVE + 3.0 * i;

        for (k, planet) in world.planets.iter_mut().enumerate() {
            let k = k as f32;
            planet.orbit_speed = planet.base_orbit_speed * (1.0 + 2.0 * i + 0.5 * (8.0 * PI * p + k).sin());
            planet.energy = i * (1.0 + 0.5 * (6.0 * PI * p + k).sin());
            planet.scale = 1.0 + (3.0 * PI * p + 0.5 * k).sin() * i * 0.3;
        }
    }

    fn end(&mut self, world: &mut World, ctx: &mut EngineContext) {
        if let Some(lights) = world.lights {
            lights.restore(&mut ctx.lights);
        }
        world.star.intensity = 1.0;
        world.star.color1 = world.theme_star.color1;
        world.star.color2 = world.theme_star.color2;
        world.metal.emissive = METAL_EMISSIVE;
        for planet in &mut world.planets {
            planet.orbit_speed = planet.base_orbit_speed;
            planet.energy = 0.0;
            planet.scale = 1.0;
        }
        world.resonance_active = false;
        log::info!("resonance ended");
    }
}

/// Flat ring expanding out of the star.
#[derive(Debug, Default)]
pub struct ResonanceRing {
    p: f32,
}

impl Effect<World> for ResonanceRing {
    fn kind(&self) -> &'static str {
        "resonance-ring"
    }

    fn update(&mut self, _world: &mut World, _ctx: &mut EngineContext, elapsed: f32, _dt: f32) {
        self.p = progress(elapsed, RING_DURATION);
    }

    fn draw(&self, world: &World, out: &mut RenderContext) {
        let scale = 1.0 + 15.0 * self.p;
        let alpha = Envelope::FadeOut { from: 0.8 }.sample(self.p);
        let color = Rgb::from_hsl(0.6 + 0.4 * self.p, 1.0, 0.5);
        let center = world.star.position();
        let circle = move |radius: f32| {
            (0..RING_SAMPLES).map(move |j| {
                let a = j as f32 / RING_SAMPLES as f32 * TAU;
                center + Vec3::new(a.cos() * radius, 0.0, a.sin() * radius)
            })
        };

        #[cfg(feature = "vectors")]
        {
            let outer: Option<Vec<_>> = circle(scale).map(|p| out.camera.project(p).map(|s| s.pos)).collect();
            let inner: Option<Vec<_>> = circle(scale * 0.5).map(|p| out.camera.project(p).map(|s| s.pos)).collect();
            if let (Some(outer), Some(inner)) = (outer, inner) {
                out.vectors.fill_annulus(&outer, &inner, color.with_alpha(alpha));
            }
        }
        #[cfg(not(feature = "vectors"))]
        {
            let mut loop_points: Vec<Vec3> = circle(scale * 0.75).collect();
            loop_points.push(loop_points[0]);
            out.effects.add_arc(loop_points, scale * 0.25, color, alpha);
        }
    }
}

/// One upright cone of the spike crown around planet `planet`. It spins
/// about its own axis and stretches along Y with the pulse.
#[derive(Debug)]
pub struct EnergySpike {
    planet: usize,
    slot: usize,
    id: Option<EntityId>,
    spin: f32,
}

impl EnergySpike {
    pub fn new(planet: usize, slot: usize) -> Self {
        Self {
            planet,
            slot,
            id: None,
            spin: 0.0,
        }
    }

    fn color(&self) -> Rgb {
        Rgb::from_hsl(0.8 + 0.1 * self.planet as f32, 1.0, 0.6)
    }

    /// Fixed slot on a radius-2 circle around the planet.
    fn offset(&self) -> Vec3 {
        let angle = self.slot as f32 / SPIKES_PER_PLANET as f32 * TAU;
        Vec3::new(angle.cos(), 0.0, angle.sin()) * SPIKE_RING_RADIUS
    }
}

impl Effect<World> for EnergySpike {
    fn kind(&self) -> &'static str {
        "energy-spike"
    }

    fn start(&mut self, world: &mut World, ctx: &mut EngineContext) {
        let id = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(id)
                .with_tag("spike")
                .with_pos(world.body_position(Some(self.planet)) + self.offset())
                .with_mesh(
                    MeshComponent::new(SDFShape::Cone { radius: 0.1, height: 3.0 }, self.color())
                        .with_alpha(0.9)
                        .with_emissive(1.5),
                ),
        );
        self.id = Some(id);
    }

    fn update(&mut self, world: &mut World, ctx: &mut EngineContext, elapsed: f32, dt: f32) {
        let Some(id) = self.id else { return };
        let p = progress(elapsed, SPIKE_DURATION);
        let pulse = Envelope::DampedWave { cycles: 6.0, decay: 1.5 }.sample(p);
        self.spin += 6.0 * dt;

        if let Some(e) = ctx.scene.get_mut(id) {
            e.pos = world.body_position(Some(self.planet)) + self.offset();
            e.rotation = Vec3::new(0.0, self.spin, 0.0);
            e.scale = Vec3::new(1.0, 1.0 + 2.0 * pulse, 1.0);
            if let Some(mesh) = e.mesh.as_mut() {
                mesh.alpha = (Envelope::FadeOut { from: 0.9 }.sample(p) + 0.5 * pulse).clamp(0.0, 1.0);
            }
        }
    }

    fn end(&mut self, _world: &mut World, ctx: &mut EngineContext) {
        if let Some(id) = self.id.take() {
            ctx.scene.despawn(id);
        }
    }
}

/// Spinning cloud of colored sparks flung out from the star.
#[derive(Debug, Default)]
pub struct ParticleBurst {
    dirs: Vec<Vec3>,
    radii: Vec<f32>,
    speeds: Vec<f32>,
    colors: Vec<Rgb>,
    rotation: f32,
    p: f32,
}

impl Effect<World> for ParticleBurst {
    fn kind(&self) -> &'static str {
        "particle-burst"
    }

    fn start(&mut self, _world: &mut World, ctx: &mut EngineContext) {
        for _ in 0..BURST_PARTICLES {
            let dir = ctx.effects.random_direction();
            let rng = &mut ctx.effects.rng;
            self.dirs.push(dir);
            self.radii.push(0.5);
            self.speeds.push(rng.range(0.5, 1.0));
            self.colors.push(Rgb::from_hsl(rng.next_f32(), 1.0, 0.6));
        }
    }

    fn update(&mut self, _world: &mut World, _ctx: &mut EngineContext, elapsed: f32, dt: f32) {
        self.p = progress(elapsed, BURST_DURATION);
        self.rotation += 1.2 * dt;
        let frames = dt * 60.0;
        for (r, speed) in self.radii.iter_mut().zip(&self.speeds) {
            *r = (*r * (1.0 + speed * 0.1).powf(frames)).min(BURST_MAX_RADIUS);
        }
    }

    fn draw(&self, world: &World, out: &mut RenderContext) {
        let alpha = Envelope::FadeOut { from: 0.8 }.sample(self.p);
        let spin = Quat::from_rotation_y(self.rotation);
        let center = world.star.position();
        for ((dir, r), color) in self.dirs.iter().zip(&self.radii).zip(&self.colors) {
            let pos = center + spin * (*dir * *r);
            push_point(out.camera, out.points, pos, 2.0, *color, alpha, BlendMode::Additive);
        }
    }
}

/// Arched beam from a planet to its inner neighbour (or the star).
#[derive(Debug)]
pub struct EnergyArc {
    planet: usize,
    p: f32,
}

impl EnergyArc {
    pub fn new(planet: usize) -> Self {
        Self { planet, p: 0.0 }
    }
}

/// Quadratic Bézier from `a` to `b` whose control point is lifted by half the span.
pub fn lifted_bezier(a: Vec3, b: Vec3, samples: usize) -> Vec<Vec3> {
    let control = (a + b) * 0.5 + Vec3::Y * (a.distance(b) * 0.5);
    (0..samples)
        .map(|j| {
            let t = j as f32 / (samples - 1).max(1) as f32;
            let u = 1.0 - t;
            a * (u * u) + control * (2.0 * u * t) + b * (t * t)
        })
        .collect()
}

impl Effect<World> for EnergyArc {
    fn kind(&self) -> &'static str {
        "energy-arc"
    }

    fn update(&mut self, _world: &mut World, _ctx: &mut EngineContext, elapsed: f32, _dt: f32) {
        self.p = progress(elapsed, ARC_DURATION);
    }

    fn draw(&self, world: &World, out: &mut RenderContext) {
        let hump = Envelope::Hump.sample(self.p);
        let energy = 2.0 * hump;
        let from = world.body_position(Some(self.planet));
        let to = world.body_position(self.planet.checked_sub(1));
        out.effects.add_arc(
            lifted_bezier(from, to, ARC_SAMPLES),
            0.15,
            world.arc_color.scale(1.0 + energy),
            0.9 * hump,
        );
    }
}

/// Corkscrew beam from a planet down to the star.
#[derive(Debug)]
pub struct SpiralArc {
    planet: usize,
    p: f32,
}

impl SpiralArc {
    pub fn new(planet: usize) -> Self {
        Self { planet, p: 0.0 }
    }
}

/// Points along `a -> b` wound around the segment.
pub fn spiral_between(a: Vec3, b: Vec3, samples: usize) -> Vec<Vec3> {
    (0..samples)
        .map(|j| {
            let t = j as f32 / (samples - 1).max(1) as f32;
            let r = 2.0 * (4.0 * PI * t).sin();
            a.lerp(b, t)
                + Vec3::new(
                    (8.0 * PI * t).cos() * r,
                    (6.0 * PI * t).sin() * r * 0.5,
                    (8.0 * PI * t).sin() * r,
                )
        })
        .collect()
}

impl Effect<World> for SpiralArc {
    fn kind(&self) -> &'static str {
        "spiral-arc"
    }

    fn update(&mut self, _world: &mut World, _ctx: &mut EngineContext, elapsed: f32, _dt: f32) {
        self.p = progress(elapsed, SPIRAL_DURATION);
    }

    fn draw(&self, world: &World, out: &mut RenderContext) {
        let intensity = Envelope::DampedHump { decay: 0.5 }.sample(self.p);
        out.effects.add_arc(
            spiral_between(world.body_position(Some(self.planet)), world.star.position(), SPIRAL_SAMPLES),
            0.1,
            Rgb::from_hsl(0.7, 1.0, 0.6),
            0.7 * intensity,
        );
    }
}
