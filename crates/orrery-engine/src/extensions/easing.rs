use std::f32::consts::FRAC_PI_2;

/// Shaping curve for one-shot transitions such as the planet intro.
/// Input is clamped to `[0, 1]`; every curve maps 0 to 0 and 1 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Fast start, long glide into place.
    CubicOut,
    /// Quarter sine, gentler than `CubicOut`.
    SineOut,
    CubicInOut,
}

impl Easing {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::SineOut => (t * FRAC_PI_2).sin(),
            Easing::CubicInOut if t < 0.5 => 4.0 * t * t * t,
            Easing::CubicInOut => {
                let u = 2.0 - 2.0 * t;
                1.0 - u * u * u / 2.0
            }
        }
    }
}
