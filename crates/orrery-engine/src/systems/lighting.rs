//! Scene lights for the 3D lighting pass.
//!
//! Lights are persistent: add them once, keep the handle, and retune
//! color or intensity in place. The host reads the flat buffer each frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::core::color::Rgb;

/// Floats per light on the wire.
pub const LIGHT_FLOATS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Point,
    /// Shines from `position` toward the origin.
    Directional,
}

impl LightKind {
    fn wire(self) -> f32 {
        match self {
            LightKind::Ambient => 0.0,
            LightKind::Point => 1.0,
            LightKind::Directional => 2.0,
        }
    }
}

/// Wire format (12 floats / 48 bytes):
/// `[kind, x, y, z, r, g, b, intensity, range, decay, pad, pad]`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Light {
    pub kind: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    /// Cut-off distance for point lights (0 = infinite).
    pub range: f32,
    pub decay: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl Light {
    fn with_kind(kind: LightKind, pos: Vec3, color: Rgb, intensity: f32) -> Self {
        Self {
            kind: kind.wire(),
            x: pos.x,
            y: pos.y,
            z: pos.z,
            r: color.r,
            g: color.g,
            b: color.b,
            intensity,
            ..Default::default()
        }
    }

    pub fn ambient(color: Rgb, intensity: f32) -> Self {
        Self::with_kind(LightKind::Ambient, Vec3::ZERO, color, intensity)
    }

    pub fn point(pos: Vec3, color: Rgb, intensity: f32, range: f32, decay: f32) -> Self {
        Self {
            range,
            decay,
            ..Self::with_kind(LightKind::Point, pos, color, intensity)
        }
    }

    pub fn directional(from: Vec3, color: Rgb, intensity: f32) -> Self {
        Self::with_kind(LightKind::Directional, from, color, intensity)
    }

    pub fn color(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.r = color.r;
        self.g = color.g;
        self.b = color.b;
    }
}

/// Index of a light inside [`LightState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightHandle(usize);

/// Manages the scene's lights.
pub struct LightState {
    lights: Vec<Light>,
    capacity: usize,
}

impl LightState {
    pub fn new() -> Self {
        Self::with_capacity(8)
    }

    pub fn with_capacity(max_lights: usize) -> Self {
        Self {
            lights: Vec::with_capacity(max_lights),
            capacity: max_lights,
        }
    }

    /// Add a light. Returns `None` once the light budget is used up.
    pub fn add(&mut self, light: Light) -> Option<LightHandle> {
        if self.lights.len() >= self.capacity {
            log::warn!("light budget of {} exhausted", self.capacity);
            return None;
        }
        self.lights.push(light);
        Some(LightHandle(self.lights.len() - 1))
    }

    pub fn get(&self, handle: LightHandle) -> Option<&Light> {
        self.lights.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: LightHandle) -> Option<&mut Light> {
        self.lights.get_mut(handle.0)
    }

    pub fn set_color(&mut self, handle: LightHandle, color: Rgb) {
        if let Some(l) = self.get_mut(handle) {
            l.set_color(color);
        }
    }

    pub fn set_intensity(&mut self, handle: LightHandle, intensity: f32) {
        if let Some(l) = self.get_mut(handle) {
            l.intensity = intensity;
        }
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pointer to the lights data for SAB serialization.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.lights.as_ptr() as *const f32
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}
