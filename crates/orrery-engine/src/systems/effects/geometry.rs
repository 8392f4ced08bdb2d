//! Triangle strip mesh generation for energy arcs.

use glam::Vec2;

/// Floats per effects vertex: x, y, r, g, b, a, u, v.
pub const EFFECTS_VERTEX_FLOATS: usize = 8;

/// Generate triangle strip vertices from a screen-space polyline.
///
/// `widths` gives the half-width at each point (pixels) and must match `points`.
/// `u` runs 0..1 across the strip, `v` is 0 on the end caps and 1 on the body,
/// so the fragment shader can feather both edges and tips.
pub fn build_strip_vertices(points: &[Vec2], widths: &[f32], rgba: [f32; 4]) -> Vec<f32> {
    let n = points.len();
    if n < 2 || widths.len() != n {
        return Vec::new();
    }

    let mut verts = Vec::with_capacity((n + 2) * 2 * EFFECTS_VERTEX_FLOATS);

    let dir = |a: Vec2, b: Vec2| -> (Vec2, Vec2) {
        let d = (b - a).normalize_or_zero();
        (d, d.perp())
    };

    let push_pair = |verts: &mut Vec<f32>, center: Vec2, perp: Vec2, w: f32, v: f32| {
        let left = center + perp * w;
        let right = center - perp * w;
        verts.extend_from_slice(&[left.x, left.y, rgba[0], rgba[1], rgba[2], rgba[3], 0.0, v]);
        verts.extend_from_slice(&[right.x, right.y, rgba[0], rgba[1], rgba[2], rgba[3], 1.0, v]);
    };

    // Start cap
    let (d0, p0) = dir(points[0], points[1]);
    push_pair(&mut verts, points[0] - d0 * widths[0], p0, widths[0], 0.0);
    push_pair(&mut verts, points[0], p0, widths[0], 1.0);

    // Middle points use the averaged normal of both neighbouring segments
    for i in 1..n - 1 {
        let (_, p_prev) = dir(points[i - 1], points[i]);
        let (_, p_next) = dir(points[i], points[i + 1]);
        let perp = (p_prev + p_next).normalize_or_zero();
        push_pair(&mut verts, points[i], perp, widths[i], 1.0);
    }

    // End cap
    let (d_last, p_last) = dir(points[n - 2], points[n - 1]);
    push_pair(&mut verts, points[n - 1], p_last, widths[n - 1], 1.0);
    push_pair(&mut verts, points[n - 1] + d_last * widths[n - 1], p_last, widths[n - 1], 0.0);

    verts
}

/// Convert triangle strip vertices to a triangle list (for WebGPU compatibility).
pub fn strip_to_triangles(strip_verts: &[f32], floats_per_vert: usize) -> Vec<f32> {
    let num_verts = strip_verts.len() / floats_per_vert;
    if num_verts < 3 {
        return Vec::new();
    }
    let num_tris = num_verts - 2;
    let mut out = Vec::with_capacity(num_tris * 3 * floats_per_vert);
    for i in 0..num_tris {
        let (a, b, c) = if i % 2 == 0 {
            (i, i + 1, i + 2)
        } else {
            (i + 1, i, i + 2)
        };
        for idx in [a, b, c] {
            let base = idx * floats_per_vert;
            out.extend_from_slice(&strip_verts[base..base + floats_per_vert]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    #[test]
    fn strip_vertices_for_simple_line() {
        let points = [Vec2::ZERO, Vec2::new(100.0, 0.0)];
        let verts = build_strip_vertices(&points, &[4.0, 4.0], WHITE);
        // 2 points + 2 caps = 4 vertex pairs
        assert_eq!(verts.len(), 8 * EFFECTS_VERTEX_FLOATS);
        // Left vertex of the first body pair sits 4px above the line
        assert_eq!(verts[EFFECTS_VERTEX_FLOATS * 2 + 1], 4.0);
    }

    #[test]
    fn strip_to_triangles_correct_count() {
        let strip = vec![0.0; 6 * EFFECTS_VERTEX_FLOATS];
        let tris = strip_to_triangles(&strip, EFFECTS_VERTEX_FLOATS);
        assert_eq!(tris.len() / EFFECTS_VERTEX_FLOATS, 12);
    }

    #[test]
    fn degenerate_input_returns_empty() {
        assert!(build_strip_vertices(&[], &[], WHITE).is_empty());
        assert!(build_strip_vertices(&[Vec2::ZERO], &[1.0], WHITE).is_empty());
        assert!(build_strip_vertices(&[Vec2::ZERO, Vec2::X], &[1.0], WHITE).is_empty());
    }
}
