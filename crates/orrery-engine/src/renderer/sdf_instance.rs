use bytemuck::{Pod, Zeroable};

/// One screen-space body for the host's SDF pass. The host reads these as
/// 20 consecutive floats; field order is part of the buffer protocol.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct SDFInstance {
    pub x: f32,
    pub y: f32,
    /// Bounding radius in pixels.
    pub radius: f32,
    pub depth: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
    pub accent_r: f32,
    pub accent_g: f32,
    pub accent_b: f32,
    pub energy: f32,
    pub shininess: f32,
    pub emissive: f32,
    pub shape: f32,
    /// Length over girth along local +Y.
    pub stretch: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
}

impl SDFInstance {
    pub const FLOATS: usize = 20;
}

/// Per-frame instance list, capped at the layout's `max_sdf_instances`.
pub struct SDFBuffer {
    instances: Vec<SDFInstance>,
    limit: usize,
}

impl SDFBuffer {
    pub fn with_capacity(limit: usize) -> Self {
        Self { instances: Vec::with_capacity(limit), limit }
    }

    /// Replace the contents with `items`, keeping the first `limit`.
    /// Returns how many were cut.
    pub fn fill(&mut self, items: impl IntoIterator<Item = SDFInstance>) -> usize {
        self.instances.clear();
        let mut cut = 0;
        for item in items {
            if self.instances.len() < self.limit {
                self.instances.push(item);
            } else {
                cut += 1;
            }
        }
        cut
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn as_slice(&self) -> &[SDFInstance] {
        &self.instances
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}
