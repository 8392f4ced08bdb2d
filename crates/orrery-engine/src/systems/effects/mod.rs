//! Visual effects: the timed effect scheduler, energy arcs and free particles.
//!
//! `EffectsState` owns the per-frame arc list, persistent particles and the
//! effect-strip vertex buffer. Timed effects live in an [`EffectQueue`]
//! owned by the game, since they are generic over the game's world.

mod geometry;
mod particle;
mod rng;
mod timeline;

pub use geometry::{build_strip_vertices, strip_to_triangles, EFFECTS_VERTEX_FLOATS};
pub use particle::Particle;
pub use rng::Rng;
pub use timeline::{Effect, EffectId, EffectQueue};

use glam::{Vec2, Vec3};
use crate::core::color::Rgb;
use crate::renderer::camera::OrbitCamera;
use crate::renderer::point::{BlendMode, PointBuffer};
use crate::systems::points::push_point;

/// A glowing world-space polyline, rebuilt every frame.
#[derive(Debug, Clone)]
pub struct Arc3D {
    pub points: Vec<Vec3>,
    /// Tube radius in world units.
    pub width: f32,
    pub color: Rgb,
    pub alpha: f32,
}

/// Container for arcs, particles and the effect vertex buffer.
pub struct EffectsState {
    pub arcs: Vec<Arc3D>,
    pub particles: Vec<Particle>,
    pub effects_buffer: Vec<f32>,
    pub rng: Rng,
    max_vertices: usize,
}

impl EffectsState {
    /// Create a new EffectsState with the given RNG seed.
    pub fn new(seed: u64) -> Self {
        Self::with_capacity(seed, 16384)
    }

    /// Create a new EffectsState with a bounded vertex buffer.
    pub fn with_capacity(seed: u64, max_vertices: usize) -> Self {
        EffectsState {
            arcs: Vec::new(),
            particles: Vec::new(),
            effects_buffer: Vec::with_capacity(max_vertices * EFFECTS_VERTEX_FLOATS),
            rng: Rng::new(seed.wrapping_add(7919)),
            max_vertices,
        }
    }

    /// Queue an arc for this frame.
    pub fn add_arc(&mut self, points: Vec<Vec3>, width: f32, color: Rgb, alpha: f32) {
        if points.len() < 2 || alpha <= 0.0 {
            return;
        }
        self.arcs.push(Arc3D { points, width, color, alpha });
    }

    /// Spawn `count` particles flying out of `center` in random directions.
    pub fn spawn_burst(
        &mut self,
        center: Vec3,
        count: usize,
        speed: (f32, f32),
        size: f32,
        color: Rgb,
        lifetime: f32,
    ) {
        for _ in 0..count {
            let dir = self.random_direction();
            let s = self.rng.range(speed.0, speed.1);
            self.particles.push(Particle::new(center, dir * s, size, color, lifetime));
        }
    }

    /// Uniformly distributed unit vector.
    pub fn random_direction(&mut self) -> Vec3 {
        let z = self.rng.range(-1.0, 1.0);
        let theta = self.rng.next_f32() * std::f32::consts::TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * theta.cos(), r * theta.sin(), z)
    }

    /// Advance particles.
    pub fn tick(&mut self, dt: f32) {
        self.particles.retain_mut(|p| p.tick(dt));
    }

    /// Drop this frame's arcs (particles persist).
    pub fn clear_arcs(&mut self) {
        self.arcs.clear();
    }

    /// Project arcs into the triangle-list vertex buffer. An arc crossing the
    /// near plane is drawn as one strip per visible stretch.
    pub fn rebuild_effects_buffer(&mut self, camera: &OrbitCamera) {
        self.effects_buffer.clear();
        let limit = self.max_vertices * EFFECTS_VERTEX_FLOATS;

        for (drawn, arc) in self.arcs.iter().enumerate() {
            let rgba = arc.color.with_alpha(arc.alpha);
            let mut tris = Vec::new();
            for (screen, widths) in visible_runs(camera, arc) {
                let strip = build_strip_vertices(&screen, &widths, rgba);
                tris.extend(strip_to_triangles(&strip, EFFECTS_VERTEX_FLOATS));
            }
            if self.effects_buffer.len() + tris.len() > limit {
                log::warn!("effects buffer full, {} arcs not drawn", self.arcs.len() - drawn);
                break;
            }
            self.effects_buffer.extend_from_slice(&tris);
        }
    }

    /// Emit particles as additive point sprites fading with remaining life.
    pub fn draw_particles(&self, camera: &OrbitCamera, points: &mut PointBuffer) {
        for p in &self.particles {
            push_point(camera, points, p.position, p.size, p.color, p.life_fraction(), BlendMode::Additive);
        }
    }

    /// Clear all effects.
    pub fn clear(&mut self) {
        self.arcs.clear();
        self.particles.clear();
        self.effects_buffer.clear();
    }

    pub fn effects_vertex_count(&self) -> usize {
        self.effects_buffer.len() / EFFECTS_VERTEX_FLOATS
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    pub fn effects_buffer_ptr(&self) -> *const f32 {
        self.effects_buffer.as_ptr()
    }
}

/// Screen positions and pixel widths of each contiguous in-front stretch
/// of `arc`. Stretches shorter than two points are dropped.
fn visible_runs(camera: &OrbitCamera, arc: &Arc3D) -> Vec<(Vec<Vec2>, Vec<f32>)> {
    let mut runs = Vec::new();
    let mut run: (Vec<Vec2>, Vec<f32>) = (Vec::new(), Vec::new());
    for p in &arc.points {
        match camera.project(*p) {
            Some(proj) => {
                run.0.push(proj.pos);
                run.1.push((arc.width * proj.scale).max(0.5));
            }
            None if run.0.len() > 1 => runs.push(std::mem::take(&mut run)),
            None => {
                run.0.clear();
                run.1.clear();
            }
        }
    }
    if run.0.len() > 1 {
        runs.push(run);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        let mut cam = OrbitCamera::new(800.0, 600.0);
        cam.set_position(Vec3::new(0.0, 20.0, 60.0));
        cam
    }

    #[test]
    fn arc_builds_triangles() {
        let mut effects = EffectsState::new(42);
        effects.add_arc(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(20.0, 5.0, 0.0)], 0.15, Rgb::WHITE, 0.9);
        assert_eq!(effects.arcs.len(), 1);
        effects.rebuild_effects_buffer(&camera());
        // 3 points + 2 caps = 5 pairs = 10 strip verts = 8 triangles
        assert_eq!(effects.effects_vertex_count(), 24);
    }

    #[test]
    fn invisible_or_degenerate_arcs_are_ignored() {
        let mut effects = EffectsState::new(42);
        effects.add_arc(vec![Vec3::ZERO], 0.1, Rgb::WHITE, 1.0);
        effects.add_arc(vec![Vec3::ZERO, Vec3::X], 0.1, Rgb::WHITE, 0.0);
        assert!(effects.arcs.is_empty());
    }

    #[test]
    fn vertex_budget_is_respected() {
        let mut effects = EffectsState::with_capacity(1, 30);
        for _ in 0..4 {
            effects.add_arc(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(20.0, 5.0, 0.0)], 0.15, Rgb::WHITE, 0.9);
        }
        effects.rebuild_effects_buffer(&camera());
        assert!(effects.effects_vertex_count() <= 30);
        assert_eq!(effects.effects_vertex_count(), 24);
    }

    #[test]
    fn arc_through_the_camera_splits_into_visible_stretches() {
        let mut cam = OrbitCamera::new(800.0, 600.0);
        cam.set_position(Vec3::new(0.0, 1.0, 20.0));
        let mut effects = EffectsState::new(42);
        // Runs along +Z from well in front of the eye to well behind it.
        let through: Vec<Vec3> = (0..9).map(|i| Vec3::new(0.0, 1.0, i as f32 * 5.0)).collect();
        effects.add_arc(through.clone(), 0.15, Rgb::WHITE, 1.0);
        effects.rebuild_effects_buffer(&cam);
        // Points at z = 0..15 are in front; the four behind are dropped whole.
        assert_eq!(visible_runs(&cam, &effects.arcs[0]).len(), 1);
        assert_eq!(effects.effects_vertex_count(), 6 * 4 + 6);

        // Front, behind, front again: two separate strips, no bridge.
        let mut there_and_back = through.clone();
        there_and_back.extend(through.iter().rev().skip(1));
        effects.clear_arcs();
        effects.add_arc(there_and_back, 0.15, Rgb::WHITE, 1.0);
        let runs = visible_runs(&cam, &effects.arcs[0]);
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|(screen, widths)| screen.len() == 4 && widths.len() == 4));
        effects.rebuild_effects_buffer(&cam);
        assert_eq!(effects.effects_vertex_count(), 2 * (6 * 4 + 6));
    }

    #[test]
    fn burst_particles_expire() {
        let mut effects = EffectsState::new(42);
        effects.spawn_burst(Vec3::ZERO, 12, (1.0, 2.0), 0.2, Rgb::WHITE, 0.5);
        assert_eq!(effects.particles.len(), 12);
        effects.tick(0.25);
        assert_eq!(effects.particles.len(), 12);
        effects.tick(0.5);
        assert!(effects.particles.is_empty());
    }

    #[test]
    fn random_direction_is_unit() {
        let mut effects = EffectsState::new(9);
        for _ in 0..100 {
            assert!((effects.random_direction().length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn clear_empties_everything() {
        let mut effects = EffectsState::new(42);
        effects.add_arc(vec![Vec3::ZERO, Vec3::X], 0.1, Rgb::WHITE, 1.0);
        effects.spawn_burst(Vec3::ZERO, 3, (1.0, 2.0), 0.2, Rgb::WHITE, 1.0);
        effects.clear();
        assert!(effects.arcs.is_empty());
        assert!(effects.particles.is_empty());
    }
}
