use bytemuck::{Pod, Zeroable};

/// Blend mode for point sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
}

impl BlendMode {
    fn wire(self) -> f32 {
        match self {
            BlendMode::Normal => 0.0,
            BlendMode::Additive => 1.0,
        }
    }
}

/// A projected, round point sprite.
/// 8 floats = 32 bytes: `[x, y, size, r, g, b, a, blend]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct PointSprite {
    pub x: f32,
    pub y: f32,
    /// Diameter in pixels.
    pub size: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    pub blend: f32,
}

impl PointSprite {
    pub const FLOATS: usize = 8;

    pub fn new(x: f32, y: f32, size: f32, rgba: [f32; 4], blend: BlendMode) -> Self {
        Self {
            x,
            y,
            size,
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
            blend: blend.wire(),
        }
    }
}

/// Per-frame point sprite buffer (starfield, trails, particles).
pub struct PointBuffer {
    points: Vec<PointSprite>,
    capacity: usize,
    overflowed: bool,
}

impl PointBuffer {
    pub fn with_capacity(max: usize) -> Self {
        Self {
            points: Vec::with_capacity(max),
            capacity: max,
            overflowed: false,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.overflowed = false;
    }

    /// Append a sprite; extra sprites are dropped with one warning per frame.
    pub fn push(&mut self, point: PointSprite) -> bool {
        if self.points.len() >= self.capacity {
            if !self.overflowed {
                log::warn!("point buffer full ({} sprites), dropping the rest of this frame", self.capacity);
                self.overflowed = true;
            }
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn as_slice(&self) -> &[PointSprite] {
        &self.points
    }

    pub fn points_ptr(&self) -> *const f32 {
        self.points.as_ptr() as *const f32
    }
}

impl Default for PointBuffer {
    fn default() -> Self {
        Self::with_capacity(8192)
    }
}
