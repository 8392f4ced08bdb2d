use crate::core::color::Rgb;

/// SDF shape primitive. The host raymarches each kind by its wire id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SDFShape {
    Sphere { radius: f32 },
    Octahedron { radius: f32 },
    Dodecahedron { radius: f32 },
    Icosahedron { radius: f32 },
    Tetrahedron { radius: f32 },
    /// Cube with half-extent `radius`.
    Box { radius: f32 },
    /// Cone along local +Y with base radius `radius`.
    Cone { radius: f32, height: f32 },
}

impl SDFShape {
    /// Bounding radius in local units.
    pub fn radius(&self) -> f32 {
        match *self {
            SDFShape::Sphere { radius }
            | SDFShape::Octahedron { radius }
            | SDFShape::Dodecahedron { radius }
            | SDFShape::Icosahedron { radius }
            | SDFShape::Tetrahedron { radius }
            | SDFShape::Box { radius } => radius,
            SDFShape::Cone { radius, height } => radius.max(height * 0.5),
        }
    }

    /// Stable numeric id written into the instance buffer.
    pub fn shape_id(&self) -> f32 {
        match self {
            SDFShape::Sphere { .. } => 0.0,
            SDFShape::Octahedron { .. } => 1.0,
            SDFShape::Dodecahedron { .. } => 2.0,
            SDFShape::Icosahedron { .. } => 3.0,
            SDFShape::Tetrahedron { .. } => 4.0,
            SDFShape::Box { .. } => 5.0,
            SDFShape::Cone { .. } => 6.0,
        }
    }

    /// Height-to-radius ratio baked into the instance (1.0 for symmetric solids).
    pub fn aspect(&self) -> f32 {
        match *self {
            SDFShape::Cone { radius, height } if radius > 0.0 => height / radius,
            _ => 1.0,
        }
    }
}

/// Surface parameters for an SDF-rendered body.
#[derive(Debug, Clone, Copy)]
pub struct MeshComponent {
    pub shape: SDFShape,
    pub color: Rgb,
    /// Secondary color the planet shader blends toward on facets.
    pub accent: Rgb,
    pub alpha: f32,
    /// Phong specular exponent (default: 32.0).
    pub shininess: f32,
    /// HDR glow multiplier (values > 1 feed the bloom pass).
    pub emissive: f32,
    /// Shader "energy" uniform; drives the resonance pulse.
    pub energy: f32,
}

impl Default for MeshComponent {
    fn default() -> Self {
        Self {
            shape: SDFShape::Sphere { radius: 1.0 },
            color: Rgb::new(0.6, 0.6, 0.8),
            accent: Rgb::WHITE,
            alpha: 1.0,
            shininess: 32.0,
            emissive: 0.0,
            energy: 0.0,
        }
    }
}

impl MeshComponent {
    pub fn new(shape: SDFShape, color: Rgb) -> Self {
        Self {
            shape,
            color,
            accent: color,
            ..Default::default()
        }
    }

    pub fn with_accent(mut self, accent: Rgb) -> Self {
        self.accent = accent;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_ids_are_distinct() {
        let shapes = [
            SDFShape::Sphere { radius: 1.0 },
            SDFShape::Octahedron { radius: 1.0 },
            SDFShape::Dodecahedron { radius: 1.0 },
            SDFShape::Icosahedron { radius: 1.0 },
            SDFShape::Tetrahedron { radius: 1.0 },
            SDFShape::Box { radius: 1.0 },
            SDFShape::Cone { radius: 1.0, height: 2.0 },
        ];
        let mut ids: Vec<i32> = shapes.iter().map(|s| s.shape_id() as i32).collect();
        ids.dedup();
        assert_eq!(ids.len(), shapes.len());
    }

    #[test]
    fn cone_bounds_cover_height() {
        let cone = SDFShape::Cone { radius: 0.1, height: 3.0 };
        assert_eq!(cone.radius(), 1.5);
        assert_eq!(cone.aspect(), 30.0);
    }

    #[test]
    fn new_mesh_uses_color_as_accent() {
        let m = MeshComponent::new(SDFShape::Sphere { radius: 2.0 }, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(m.accent, m.color);
        assert_eq!(m.alpha, 1.0);
    }
}
