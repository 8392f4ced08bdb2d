//! Fixed-size particle trails.
//!
//! A trail is a ring buffer of world positions: pushing a new sample
//! overwrites the oldest one, and sprites fade from newest to oldest.

use glam::Vec3;
use crate::core::color::Rgb;
use crate::renderer::camera::OrbitCamera;
use crate::renderer::point::{BlendMode, PointBuffer};
use crate::systems::points::push_point;

/// Alpha multiplier applied to the oldest sample; the newest gets 1.0.
const TAIL_FADE: f32 = 0.35;

#[derive(Debug, Clone)]
pub struct Trail {
    points: Vec<Vec3>,
    /// Per-slot sprite sizes, fixed at creation.
    sizes: Vec<f32>,
    /// Next slot to write.
    head: usize,
    capacity: usize,
    pub color: Rgb,
    pub alpha: f32,
}

impl Trail {
    /// Empty trail. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: Vec::with_capacity(capacity),
            sizes: vec![1.0; capacity],
            head: 0,
            capacity,
            color: Rgb::WHITE,
            alpha: 1.0,
        }
    }

    /// Trail pre-filled from `positions`, oldest first.
    pub fn filled_with(capacity: usize, positions: impl IntoIterator<Item = Vec3>) -> Self {
        let mut trail = Self::new(capacity);
        for p in positions {
            trail.push(p);
        }
        trail
    }

    /// Assign per-slot sprite sizes; `size_of(slot)` is called once per slot.
    pub fn with_sizes(mut self, mut size_of: impl FnMut(usize) -> f32) -> Self {
        for (i, s) in self.sizes.iter_mut().enumerate() {
            *s = size_of(i);
        }
        self
    }

    pub fn with_color(mut self, color: Rgb, alpha: f32) -> Self {
        self.color = color;
        self.alpha = alpha;
        self
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Record a new sample, overwriting the oldest once full.
    pub fn push(&mut self, pos: Vec3) {
        if self.points.len() < self.capacity {
            self.points.push(pos);
        } else {
            self.points[self.head] = pos;
        }
        self.head = (self.head + 1) % self.capacity;
    }

    /// Most recently pushed sample.
    pub fn newest(&self) -> Option<Vec3> {
        if self.points.is_empty() {
            return None;
        }
        let idx = (self.head + self.capacity - 1) % self.capacity;
        self.points.get(idx).copied()
    }

    /// Samples from oldest to newest.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = Vec3> + '_ {
        let n = self.points.len();
        let start = if n < self.capacity { 0 } else { self.head };
        (0..n).map(move |i| self.points[(start + i) % n])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Project the trail as additive sprites, fading toward the tail.
    pub fn draw(&self, camera: &OrbitCamera, buffer: &mut PointBuffer) {
        let n = self.points.len();
        if n == 0 {
            return;
        }
        for (age_rank, pos) in self.iter_oldest_first().enumerate() {
            let t = if n > 1 { age_rank as f32 / (n - 1) as f32 } else { 1.0 };
            let fade = TAIL_FADE + (1.0 - TAIL_FADE) * t;
            let size = self.sizes[age_rank % self.sizes.len()];
            push_point(camera, buffer, pos, size, self.color, self.alpha * fade, BlendMode::Additive);
        }
    }
}
