//! Scene content configuration.
//!
//! Every field has a default, so a JSON document only needs the values it
//! overrides. `OrreryConfig::from_json` validates before anything is rebuilt.

use glam::Vec3;
use serde::Deserialize;

use orrery_engine::{ConfigError, Rgb, Rng};

/// Inclusive `[min, max]` range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut Rng) -> f32 {
        rng.range(self.min, self.max)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::invalid(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlanetSpec {
    pub size: f32,
    pub distance: f32,
    /// Orbit speed in radians per second.
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarSpec {
    pub radius: f32,
    pub spin_y: f32,
    pub spin_x: f32,
}

impl Default for StarSpec {
    fn default() -> Self {
        Self {
            radius: 2.2,
            spin_y: 0.3,
            spin_x: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BeltSpec {
    pub inner: f32,
    pub outer: f32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AsteroidSpec {
    pub enabled: bool,
    pub count: usize,
    pub size: Span,
    pub orbit: Span,
    /// Radians per 60 Hz frame.
    pub speed: f32,
    /// Maximum spin per axis, radians per 60 Hz frame.
    pub rotation_speed: f32,
    pub colors: Vec<Rgb>,
    pub belt: Option<BeltSpec>,
}

impl Default for AsteroidSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 25,
            size: Span::new(0.3, 2.5),
            orbit: Span::new(25.0, 55.0),
            speed: 0.0008,
            rotation_speed: 0.01,
            colors: [0x8b7355, 0xa0956b, 0x6b5b47, 0x9c8a6b, 0x7a6b4f, 0xb8a082]
                .into_iter()
                .map(Rgb::from_hex)
                .collect(),
            belt: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpaceshipSpec {
    pub enabled: bool,
    pub count: usize,
    pub orbit: Span,
    /// Radians per 60 Hz frame.
    pub speed: f32,
    pub colors: Vec<Rgb>,
}

impl Default for SpaceshipSpec {
    fn default() -> Self {
        Self {
            enabled: false,
            count: 8,
            orbit: Span::new(15.0, 45.0),
            speed: 0.002,
            colors: [0x4a90e2, 0x7ed321, 0xf5a623, 0xd0021b, 0x9013fe, 0x50e3c2]
                .into_iter()
                .map(Rgb::from_hex)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CometSpec {
    pub count: usize,
    pub distance: Span,
    /// Radians per second.
    pub speed: Span,
    /// Inclination is drawn from `[-inclination, inclination]`.
    pub inclination: f32,
    pub tail: usize,
}

impl Default for CometSpec {
    fn default() -> Self {
        Self {
            count: 3,
            distance: Span::new(70.0, 100.0),
            speed: Span::new(0.02, 0.05),
            inclination: 0.25,
            tail: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StarLayer {
    pub count: usize,
    pub distance: Span,
    pub size: Span,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntroSpec {
    /// Seconds each planet takes to ease out to its orbit.
    pub duration: f32,
    /// Extra delay per planet index.
    pub stagger: f32,
}

impl Default for IntroSpec {
    fn default() -> Self {
        Self {
            duration: 2.5,
            stagger: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    pub planets: Vec<PlanetSpec>,
    /// Planet spin around Y in radians per second; Z spins at 0.3×.
    pub self_rotation: f32,
    pub star: StarSpec,
    pub asteroids: AsteroidSpec,
    pub spaceships: SpaceshipSpec,
    pub comets: CometSpec,
    pub starfield: Vec<StarLayer>,
    pub trail_length: usize,
    pub default_theme: usize,
    pub intro: IntroSpec,
    pub seed: u64,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        let planet = |size, distance, speed| PlanetSpec { size, distance, speed };
        let layer = |count, near, far, small, big, hex| StarLayer {
            count,
            distance: Span::new(near, far),
            size: Span::new(small, big),
            color: Rgb::from_hex(hex),
        };
        Self {
            planets: vec![
                planet(0.6, 8.0, 0.6),
                planet(0.9, 14.0, 0.35),
                planet(0.7, 22.0, 0.25),
                planet(0.8, 30.0, 0.18),
                planet(0.5, 38.0, 0.12),
                planet(0.6, 46.0, 0.08),
                planet(0.4, 54.0, 0.06),
            ],
            self_rotation: 0.6,
            star: StarSpec::default(),
            asteroids: AsteroidSpec::default(),
            spaceships: SpaceshipSpec::default(),
            comets: CometSpec::default(),
            starfield: vec![
                layer(3000, 600.0, 1000.0, 0.8, 1.5, 0x6688bb),
                layer(2000, 1000.0, 1500.0, 1.0, 2.0, 0x88aadd),
                layer(1000, 1500.0, 2000.0, 1.5, 3.0, 0xaaccff),
            ],
            trail_length: 50,
            default_theme: 2,
            intro: IntroSpec::default(),
            seed: 0x0dd5_eed5,
        }
    }
}

impl OrreryConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: OrreryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.planets.is_empty() {
            return Err(ConfigError::invalid("planets", "at least one planet is required"));
        }
        if self.planets.iter().any(|p| p.size <= 0.0 || p.distance <= 0.0) {
            return Err(ConfigError::invalid("planets", "size and distance must be positive"));
        }
        if self.trail_length == 0 {
            return Err(ConfigError::invalid("trail_length", "must be at least 1"));
        }
        self.asteroids.size.check("asteroids.size")?;
        self.asteroids.orbit.check("asteroids.orbit")?;
        if let Some(belt) = self.asteroids.belt {
            if belt.inner > belt.outer {
                return Err(ConfigError::invalid("asteroids.belt", "inner radius exceeds outer"));
            }
        }
        self.spaceships.orbit.check("spaceships.orbit")?;
        self.comets.distance.check("comets.distance")?;
        self.comets.speed.check("comets.speed")?;
        for layer in &self.starfield {
            layer.distance.check("starfield.distance")?;
            layer.size.check("starfield.size")?;
        }
        Ok(())
    }

    /// Radius that frames the whole system: outermost orbit plus a margin.
    pub fn system_radius(&self) -> f32 {
        self.planets.last().map_or(10.0, |p| p.distance + 10.0)
    }
}

/// Viewport class used to pick camera presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Small,
    Mobile,
    Desktop,
}

impl Viewport {
    pub fn classify(width: f32, height: f32) -> Self {
        if width <= 480.0 || height <= 600.0 {
            Viewport::Small
        } else if width <= 768.0 || height <= 700.0 {
            Viewport::Mobile
        } else {
            Viewport::Desktop
        }
    }

    /// Camera position on first load, scaled to the system radius.
    pub fn initial_position(self, radius: f32) -> Vec3 {
        let lift = match self {
            Viewport::Small => 0.3,
            Viewport::Mobile => 0.35,
            Viewport::Desktop => 0.4,
        };
        Vec3::new(radius * 0.5, radius * lift, radius * 0.5)
    }

    /// Camera position after "reset view" or a resize.
    pub fn reset_position(self) -> Vec3 {
        match self {
            Viewport::Small => Vec3::new(40.0, 20.0, 40.0),
            Viewport::Mobile => Vec3::new(35.0, 22.0, 35.0),
            Viewport::Desktop => Vec3::new(35.0, 28.0, 35.0),
        }
    }

    /// `(min, max)` orbit distance.
    pub fn zoom_limits(self, radius: f32) -> (f32, f32) {
        match self {
            Viewport::Desktop => (15.0, radius * 3.0),
            _ => (8.0, radius * 2.5),
        }
    }

    pub fn auto_rotate_speed(self) -> f32 {
        match self {
            Viewport::Desktop => 0.1,
            _ => 0.15,
        }
    }
}
