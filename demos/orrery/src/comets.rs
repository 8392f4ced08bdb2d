//! Comets on wide, wobbling orbits with particle tails.

use std::f32::consts::TAU;

use glam::Vec3;
use orrery_engine::{
    push_point, BlendMode, EngineContext, Entity, EntityId, MeshComponent, OrbitCamera,
    PointBuffer, Rgb, Rng, SDFShape, Scene,
};

use crate::config::CometSpec;

pub const COMET_TAG: &str = "comet";

const HEAD_RADIUS: f32 = 0.15;
const HEAD_ALPHA: f32 = 0.8;
const TAIL_LENGTH: f32 = 2.0;
const TAIL_JITTER: f32 = 0.3;
const TAIL_SIZE: f32 = 0.1;
const TAIL_ALPHA: f32 = 0.6;

/// A tail sample relative to the head: distance behind it plus sideways jitter.
#[derive(Debug, Clone, Copy)]
struct TailPoint {
    behind: f32,
    side: f32,
    up: f32,
    color: Rgb,
}

#[derive(Debug, Clone)]
pub struct Comet {
    pub id: EntityId,
    pub distance: f32,
    pub speed: f32,
    pub angle: f32,
    pub inclination: f32,
    pub pos: Vec3,
    tail: Vec<TailPoint>,
}

impl Comet {
    fn spawn(ctx: &mut EngineContext, spec: &CometSpec, rng: &mut Rng) -> Self {
        let id = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(id).with_tag(COMET_TAG).with_mesh(
                MeshComponent::new(SDFShape::Sphere { radius: HEAD_RADIUS }, Rgb::from_hex(0x88ccff))
                    .with_alpha(HEAD_ALPHA)
                    .with_emissive(1.0),
            ),
        );
        let count = spec.tail.max(1);
        let tail = (0..count)
            .map(|j| {
                let t = j as f32 / count as f32;
                let fade = 1.0 - t;
                TailPoint {
                    behind: t * TAIL_LENGTH,
                    side: rng.signed() * TAIL_JITTER,
                    up: rng.signed() * TAIL_JITTER,
                    color: Rgb::new(0.5 + fade * 0.5, 0.7 + fade * 0.3, 1.0),
                }
            })
            .collect();

        let mut comet = Self {
            id,
            distance: spec.distance.sample(rng),
            speed: spec.speed.sample(rng),
            angle: rng.next_f32() * TAU,
            inclination: rng.range(-spec.inclination, spec.inclination),
            pos: Vec3::ZERO,
            tail,
        };
        comet.pos = comet.position_at(comet.angle);
        comet
    }

    pub fn position_at(&self, angle: f32) -> Vec3 {
        Vec3::new(
            angle.cos() * self.distance,
            (angle * 2.0).sin() * self.inclination * 10.0,
            angle.sin() * self.distance,
        )
    }

    /// Unit direction of travel.
    pub fn heading(&self) -> Vec3 {
        let a = self.angle + 0.1;
        Vec3::new(a.cos(), 0.0, a.sin())
    }

    fn step(&mut self, scene: &mut Scene, dt: f32) {
        self.angle = (self.angle + self.speed * dt).rem_euclid(TAU);
        self.pos = self.position_at(self.angle);
        if let Some(e) = scene.get_mut(self.id) {
            e.pos = self.pos;
        }
    }

    /// World positions of the tail samples, head first.
    pub fn tail_points(&self) -> impl Iterator<Item = (Vec3, Rgb)> + '_ {
        let back = -self.heading();
        let side = back.cross(Vec3::Y).normalize_or_zero();
        self.tail
            .iter()
            .map(move |t| (self.pos + back * t.behind + side * t.side + Vec3::Y * t.up, t.color))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CometSwarm {
    comets: Vec<Comet>,
}

impl CometSwarm {
    pub fn spawn(ctx: &mut EngineContext, spec: &CometSpec, rng: &mut Rng) -> Self {
        Self {
            comets: (0..spec.count).map(|_| Comet::spawn(ctx, spec, rng)).collect(),
        }
    }

    pub fn step(&mut self, scene: &mut Scene, dt: f32) {
        for comet in &mut self.comets {
            comet.step(scene, dt);
        }
    }

    pub fn draw(&self, camera: &OrbitCamera, points: &mut PointBuffer) {
        for comet in &self.comets {
            for (pos, color) in comet.tail_points() {
                push_point(camera, points, pos, TAIL_SIZE, color, TAIL_ALPHA, BlendMode::Additive);
            }
        }
    }

    pub fn comets(&self) -> &[Comet] {
        &self.comets
    }

    pub fn len(&self) -> usize {
        self.comets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn swarm(ctx: &mut EngineContext) -> CometSwarm {
        let mut rng = Rng::new(5);
        CometSwarm::spawn(ctx, &CometSpec::default(), &mut rng)
    }

    #[test]
    fn spawns_within_ranges() {
        let mut ctx = EngineContext::new();
        let s = swarm(&mut ctx);
        assert_eq!(s.len(), 3);
        assert_eq!(ctx.scene.len(), 3);
        for c in s.comets() {
            assert!((70.0..=100.0).contains(&c.distance));
            assert!((0.02..=0.05).contains(&c.speed));
            assert!(c.inclination.abs() <= 0.25);
            assert_eq!(c.tail.len(), 30);
        }
    }

    #[test]
    fn orbit_formula() {
        let mut ctx = EngineContext::new();
        let mut s = swarm(&mut ctx);
        let c = &mut s.comets[0];
        c.angle = 0.0;
        c.speed = 0.5;
        c.step(&mut ctx.scene, 1.0);
        let a = 0.5f32;
        assert_relative_eq!(c.pos.x, a.cos() * c.distance, epsilon = 1e-3);
        assert_relative_eq!(c.pos.y, (2.0 * a).sin() * c.inclination * 10.0, epsilon = 1e-4);
        assert_relative_eq!(c.pos.z, a.sin() * c.distance, epsilon = 1e-3);
        assert_eq!(ctx.scene.get(c.id).unwrap().pos, c.pos);
    }

    #[test]
    fn tail_trails_behind_the_head() {
        let mut ctx = EngineContext::new();
        let s = swarm(&mut ctx);
        let c = &s.comets()[0];
        let last = c.tail_points().last().unwrap().0;
        assert!((last - c.pos).dot(c.heading()) < 0.0);
        let first = c.tail_points().next().unwrap();
        assert_eq!(first.1, Rgb::new(1.0, 1.0, 1.0));
    }
}
