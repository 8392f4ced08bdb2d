//! Static background stars on concentric spherical shells.

use std::f32::consts::TAU;

use glam::Vec3;
use orrery_engine::{project_cloud, BlendMode, OrbitCamera, PointBuffer, PointStyle, Rng};

use crate::config::StarLayer;

const STAR_ALPHA: f32 = 0.8;

struct Shell {
    positions: Vec<Vec3>,
    sizes: Vec<f32>,
    style: PointStyle,
}

#[derive(Default)]
pub struct Starfield {
    shells: Vec<Shell>,
}

impl Starfield {
    pub fn generate(layers: &[StarLayer], rng: &mut Rng) -> Self {
        let shells = layers
            .iter()
            .map(|layer| {
                let mut positions = Vec::with_capacity(layer.count);
                let mut sizes = Vec::with_capacity(layer.count);
                for _ in 0..layer.count {
                    let r = layer.distance.sample(rng);
                    let theta = rng.next_f32() * TAU;
                    let phi = (2.0 * rng.next_f32() - 1.0).acos();
                    positions.push(Vec3::new(
                        r * phi.sin() * theta.cos(),
                        r * phi.sin() * theta.sin(),
                        r * phi.cos(),
                    ));
                    sizes.push(layer.size.sample(rng));
                }
                Shell {
                    positions,
                    sizes,
                    style: PointStyle {
                        color: layer.color,
                        alpha: STAR_ALPHA,
                        blend: BlendMode::Normal,
                    },
                }
            })
            .collect();
        Self { shells }
    }

    pub fn draw(&self, camera: &OrbitCamera, points: &mut PointBuffer) -> usize {
        self.shells
            .iter()
            .map(|s| project_cloud(camera, points, s.positions.iter().zip(&s.sizes), s.style))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.shells.iter().map(|s| s.positions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrreryConfig;

    #[test]
    fn shells_respect_their_radii() {
        let mut rng = Rng::new(8);
        let config = OrreryConfig::default();
        let field = Starfield::generate(&config.starfield, &mut rng);
        assert_eq!(field.len(), 6000);
        for (shell, layer) in field.shells.iter().zip(&config.starfield) {
            for p in &shell.positions {
                let r = p.length();
                assert!(r >= layer.distance.min - 0.5 && r <= layer.distance.max + 0.5);
            }
        }
    }

    #[test]
    fn draw_is_bounded_by_the_buffer() {
        let mut rng = Rng::new(8);
        let field = Starfield::generate(&OrreryConfig::default().starfield, &mut rng);
        let mut cam = OrbitCamera::new(800.0, 600.0);
        cam.set_position(Vec3::new(30.0, 30.0, 30.0));
        let mut points = PointBuffer::with_capacity(100);
        field.draw(&cam, &mut points);
        assert!(points.point_count() <= 100);
        assert!(points.point_count() > 0);
    }
}
