/// Fixed timestep accumulator.
/// Ensures scene logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Time multipliers offered by the time-scale button, in cycle order.
pub const TIME_SCALES: [f32; 5] = [1.0, 2.0, 5.0, 10.0, 0.5];

/// Next entry in the [`TIME_SCALES`] cycle. Unknown values fall back to 1x.
pub fn next_time_scale(current: f32) -> f32 {
    match TIME_SCALES.iter().position(|s| (s - current).abs() < 1e-6) {
        Some(i) => TIME_SCALES[(i + 1) % TIME_SCALES.len()],
        None => 1.0,
    }
}

/// Simulation clock.
///
/// `elapsed` tracks real (unscaled) seconds and drives timed effects.
/// `delta` is the most recent step scaled by the time multiplier and drives motion.
#[derive(Debug, Clone)]
pub struct SimClock {
    elapsed: f32,
    delta: f32,
    scale: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            delta: 0.0,
            scale: 1.0,
        }
    }

    /// Advance by one step of real time. Returns the scaled delta.
    pub fn advance(&mut self, real_dt: f32) -> f32 {
        self.elapsed += real_dt;
        self.delta = real_dt * self.scale;
        self.delta
    }

    /// Real seconds since the clock started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Scaled delta of the most recent step.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }

    /// Step to the next time multiplier and return it.
    pub fn cycle_scale(&mut self) -> f32 {
        self.scale = next_time_scale(self.scale);
        self.scale
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(0.008); // half a frame
        assert_eq!(steps, 0);
        let steps = ts.accumulate(0.010); // over one frame total
        assert_eq!(steps, 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0);
        assert_eq!(steps, 10);
    }

    #[test]
    fn time_scale_cycle_wraps() {
        let mut scale = 1.0;
        let mut seen = Vec::new();
        for _ in 0..5 {
            scale = next_time_scale(scale);
            seen.push(scale);
        }
        assert_eq!(seen, vec![2.0, 5.0, 10.0, 0.5, 1.0]);
    }

    #[test]
    fn unknown_time_scale_resets() {
        assert_eq!(next_time_scale(3.0), 1.0);
    }

    #[test]
    fn clock_scales_delta_but_not_elapsed() {
        let mut clock = SimClock::new();
        clock.set_scale(5.0);
        let d = clock.advance(0.1);
        assert!((d - 0.5).abs() < 1e-6);
        assert!((clock.elapsed() - 0.1).abs() < 1e-6);
        assert!((clock.delta() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn clock_cycle_scale() {
        let mut clock = SimClock::new();
        assert_eq!(clock.cycle_scale(), 2.0);
        assert_eq!(clock.scale(), 2.0);
    }
}
