//! World-space point clouds projected into the point sprite buffer.

use glam::Vec3;
use crate::core::color::Rgb;
use crate::renderer::camera::OrbitCamera;
use crate::renderer::point::{BlendMode, PointBuffer, PointSprite};

/// Smallest sprite the host will rasterize.
const MIN_POINT_PX: f32 = 0.5;

/// Shared look of a point cloud.
#[derive(Debug, Clone, Copy)]
pub struct PointStyle {
    pub color: Rgb,
    pub alpha: f32,
    pub blend: BlendMode,
}

/// Project one world-space point with distance attenuation.
/// Returns false if the point was culled or the buffer is full.
pub fn push_point(
    camera: &OrbitCamera,
    buffer: &mut PointBuffer,
    pos: Vec3,
    size: f32,
    color: Rgb,
    alpha: f32,
    blend: BlendMode,
) -> bool {
    if alpha <= 0.0 {
        return false;
    }
    let proj = match camera.project(pos) {
        Some(p) => p,
        None => return false,
    };
    let px = camera.point_size(size, proj.depth).max(MIN_POINT_PX);
    buffer.push(PointSprite::new(proj.pos.x, proj.pos.y, px, color.with_alpha(alpha), blend))
}

/// Project a cloud of `(position, size)` samples sharing one style.
pub fn project_cloud<'a>(
    camera: &OrbitCamera,
    buffer: &mut PointBuffer,
    samples: impl IntoIterator<Item = (&'a Vec3, &'a f32)>,
    style: PointStyle,
) -> usize {
    let mut drawn = 0;
    for (pos, size) in samples {
        if push_point(camera, buffer, *pos, *size, style.color, style.alpha, style.blend) {
            drawn += 1;
        }
    }
    drawn
}
