//! Free-flying 3D particles (collision sparks, bursts without a driving effect).

use glam::Vec3;
use crate::core::color::Rgb;

/// A single particle with motion and fade state.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Rgb,
    /// World-space sprite size.
    pub size: f32,
    /// Seconds left to live.
    pub lifetime: f32,
    /// Lifetime at spawn, for the fade-out.
    pub max_lifetime: f32,
    /// Fraction of velocity lost per second.
    pub drag: f32,
}

impl Particle {
    pub const DEFAULT_DRAG: f32 = 1.2;

    pub fn new(position: Vec3, velocity: Vec3, size: f32, color: Rgb, lifetime: f32) -> Self {
        Particle {
            position,
            velocity,
            color,
            size,
            lifetime,
            max_lifetime: lifetime.max(f32::EPSILON),
            drag: Self::DEFAULT_DRAG,
        }
    }

    /// Advance motion. Returns false when expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            return false;
        }
        self.velocity *= (1.0 - self.drag * dt).max(0.0);
        self.position += self.velocity * dt;
        true
    }

    /// Remaining life as 1.0 (fresh) .. 0.0 (expired).
    pub fn life_fraction(&self) -> f32 {
        (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_expires() {
        let mut p = Particle::new(Vec3::ZERO, Vec3::X, 0.2, Rgb::WHITE, 0.1);
        assert!(!p.tick(0.2), "particle should expire");
    }

    #[test]
    fn particle_moves_and_slows() {
        let mut p = Particle::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.2, Rgb::WHITE, 5.0);
        assert!(p.tick(0.1));
        assert!(p.position.x > 0.0);
        assert!(p.velocity.x < 10.0);
    }

    #[test]
    fn life_fraction_decreases() {
        let mut p = Particle::new(Vec3::ZERO, Vec3::ZERO, 0.2, Rgb::WHITE, 1.0);
        p.tick(0.25);
        assert!((p.life_fraction() - 0.75).abs() < 1e-5);
    }
}
