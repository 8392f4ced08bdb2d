// extensions/envelope.rs
//
// Intensity curves for timed effects, keyed by progress in [0, 1].

use std::f32::consts::PI;

/// Shape of an effect's intensity over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// `sin(pπ)`: rises and falls back to zero.
    Hump,
    /// Hump with exponential decay.
    DampedHump { decay: f32 },
    /// Oscillation with exponential decay.
    DampedWave { cycles: f32, decay: f32 },
    /// Linear fade from `from` to zero.
    FadeOut { from: f32 },
    Ramp { from: f32, to: f32 },
}

impl Envelope {
    /// Sample the curve. `p` is clamped to [0, 1].
    pub fn sample(self, p: f32) -> f32 {
        let p = p.clamp(0.0, 1.0);
        match self {
            Envelope::Hump => (p * PI).sin(),
            Envelope::DampedHump { decay } => (p * PI).sin() * (-p * decay).exp(),
            Envelope::DampedWave { cycles, decay } => (p * PI * cycles).sin() * (-p * decay).exp(),
            Envelope::FadeOut { from } => (1.0 - p) * from,
            Envelope::Ramp { from, to } => from + (to - from) * p,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hump_peaks_midway() {
        assert_relative_eq!(Envelope::Hump.sample(0.5), 1.0, epsilon = 1e-6);
        assert!(Envelope::Hump.sample(0.0).abs() < 1e-6);
        assert!(Envelope::Hump.sample(1.0).abs() < 1e-6);
    }

    #[test]
    fn damped_hump_is_lower_than_hump() {
        let d = Envelope::DampedHump { decay: 2.0 };
        assert!(d.sample(0.5) < Envelope::Hump.sample(0.5));
        assert_relative_eq!(d.sample(0.5), (-1.0f32).exp(), epsilon = 1e-6);
    }

    #[test]
    fn damped_wave_oscillates() {
        let w = Envelope::DampedWave { cycles: 4.0, decay: 1.0 };
        assert!(w.sample(0.125) > 0.0);
        assert!(w.sample(0.375) < 0.0);
    }

    #[test]
    fn fade_and_ramp_are_linear() {
        assert_relative_eq!(Envelope::FadeOut { from: 0.8 }.sample(0.25), 0.6);
        assert_relative_eq!(Envelope::Ramp { from: 1.0, to: 3.0 }.sample(0.5), 2.0);
        assert_relative_eq!(Envelope::Ramp { from: 1.0, to: 3.0 }.sample(7.0), 3.0);
    }
}
