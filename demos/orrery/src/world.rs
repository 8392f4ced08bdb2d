//! Scene state shared by the frame loop and the timed resonance effects.

use glam::Vec3;
use orrery_engine::{EngineContext, Light, LightHandle, LightState, Rgb, Rng, Trail};

use crate::bodies::{feed_trail, Planet, Star};
use crate::config::OrreryConfig;
use crate::theme::{ColorPair, Theme};

pub const AMBIENT_INTENSITY: f32 = 0.8;
pub const STAR_LIGHT_INTENSITY: f32 = 3.0;
pub const STAR_LIGHT_RANGE: f32 = 120.0;
pub const STAR_LIGHT_DECAY: f32 = 1.8;
pub const BLUE_INTENSITY: f32 = 0.5;
pub const PURPLE_INTENSITY: f32 = 0.3;
pub const METAL_EMISSIVE: f32 = 0.4;

/// Handles to the four scene lights.
#[derive(Debug, Clone, Copy)]
pub struct SceneLights {
    pub ambient: LightHandle,
    pub star: LightHandle,
    pub blue: LightHandle,
    pub purple: LightHandle,
}

impl SceneLights {
    /// Returns `None` if the light budget cannot hold all four.
    pub fn install(lights: &mut LightState, theme: &Theme) -> Option<Self> {
        Some(Self {
            ambient: lights.add(Light::ambient(theme.ambient_light_color, AMBIENT_INTENSITY))?,
            star: lights.add(Light::point(
                Vec3::ZERO,
                theme.star_light_color,
                STAR_LIGHT_INTENSITY,
                STAR_LIGHT_RANGE,
                STAR_LIGHT_DECAY,
            ))?,
            blue: lights.add(Light::directional(
                Vec3::new(-50.0, 30.0, -30.0),
                theme.directional_lights.color1,
                BLUE_INTENSITY,
            ))?,
            purple: lights.add(Light::directional(
                Vec3::new(30.0, -20.0, 50.0),
                theme.directional_lights.color2,
                PURPLE_INTENSITY,
            ))?,
        })
    }

    pub fn set_intensities(&self, lights: &mut LightState, ambient: f32, star: f32, blue: f32, purple: f32) {
        lights.set_intensity(self.ambient, ambient);
        lights.set_intensity(self.star, star);
        lights.set_intensity(self.blue, blue);
        lights.set_intensity(self.purple, purple);
    }

    pub fn restore(&self, lights: &mut LightState) {
        self.set_intensities(lights, AMBIENT_INTENSITY, STAR_LIGHT_INTENSITY, BLUE_INTENSITY, PURPLE_INTENSITY);
    }
}

/// Shared hull material for spaceships.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    pub color: Rgb,
    pub emissive: f32,
}

pub struct World {
    pub star: Star,
    pub planets: Vec<Planet>,
    pub trails: Vec<Trail>,
    pub lights: Option<SceneLights>,
    pub metal: Metal,
    pub ring_color: Rgb,
    pub arc_color: Rgb,
    /// Star colors of the active theme; the star returns to these after a resonance.
    pub theme_star: ColorPair,
    pub resonance_active: bool,
    /// Real time at which the world was built; drives the intro.
    built_at: f32,
    trail_length: usize,
}

impl World {
    pub fn build(ctx: &mut EngineContext, config: &OrreryConfig, theme: &Theme, rng: &mut Rng) -> Self {
        let star = Star::spawn(ctx, &config.star, theme);
        let planets: Vec<Planet> = config
            .planets
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                Planet::spawn(ctx, i, spec, config.self_rotation, &config.intro, theme.planet(i), rng)
            })
            .collect();
        let trails = planets
            .iter()
            .map(|p| p.make_trail(config.trail_length, rng))
            .collect();

        let lights = SceneLights::install(&mut ctx.lights, theme);
        if lights.is_none() {
            log::warn!("light budget too small, scene lights disabled");
        }

        log::info!("orrery built: {} planets", planets.len());
        Self {
            star,
            planets,
            trails,
            lights,
            metal: Metal {
                color: theme.metal_material_color,
                emissive: METAL_EMISSIVE,
            },
            ring_color: theme.ring_color,
            arc_color: theme.arc_color,
            theme_star: theme.star_colors,
            resonance_active: false,
            built_at: ctx.clock.elapsed(),
            trail_length: config.trail_length,
        }
    }

    /// Move the star and planets by the scaled `dt` and feed trails.
    pub fn step(&mut self, ctx: &mut EngineContext, config: &OrreryConfig, dt: f32) {
        let since_build = ctx.clock.elapsed() - self.built_at;
        self.star.step(&mut ctx.scene, dt);
        for (planet, trail) in self.planets.iter_mut().zip(self.trails.iter_mut()) {
            planet.step(&mut ctx.scene, dt, since_build, &config.intro);
            feed_trail(trail, planet.pos, planet.trail_spacing(self.trail_length));
        }
    }

    /// Position of planet `index`, or the star when `index` is `None`.
    pub fn body_position(&self, index: Option<usize>) -> Vec3 {
        index
            .and_then(|i| self.planets.get(i))
            .map_or(self.star.position(), |p| p.pos)
    }

    /// Recolor everything the theme covers. Star colors are left alone
    /// while a resonance is driving them.
    pub fn apply_theme(&mut self, theme: &Theme, lights: &mut LightState) {
        self.theme_star = theme.star_colors;
        if !self.resonance_active {
            self.star.color1 = theme.star_colors.color1;
            self.star.color2 = theme.star_colors.color2;
        }
        for (i, (planet, trail)) in self.planets.iter_mut().zip(self.trails.iter_mut()).enumerate() {
            planet.colors = theme.planet(i);
            trail.set_color(planet.colors.trail_color);
        }
        if let Some(l) = self.lights {
            lights.set_color(l.ambient, theme.ambient_light_color);
            lights.set_color(l.star, theme.star_light_color);
            lights.set_color(l.blue, theme.directional_lights.color1);
            lights.set_color(l.purple, theme.directional_lights.color2);
        }
        self.metal.color = theme.metal_material_color;
        self.ring_color = theme.ring_color;
        self.arc_color = theme.arc_color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeBook;

    fn world(ctx: &mut EngineContext, theme: usize) -> (World, ThemeBook) {
        let book = ThemeBook::builtin(theme).unwrap();
        let mut rng = Rng::new(9);
        let w = World::build(ctx, &OrreryConfig::default(), book.current(), &mut rng);
        (w, book)
    }

    #[test]
    fn build_spawns_star_planets_and_lights() {
        let mut ctx = EngineContext::new();
        let (w, _) = world(&mut ctx, 2);
        assert_eq!(w.planets.len(), 7);
        assert_eq!(w.trails.len(), 7);
        assert_eq!(ctx.scene.len(), 8);
        assert_eq!(ctx.lights.count(), 4);
        assert!(w.lights.is_some());
        assert_eq!(w.metal.emissive, METAL_EMISSIVE);
    }

    #[test]
    fn planets_reach_their_orbits_after_intro() {
        let mut ctx = EngineContext::new();
        let (mut w, _) = world(&mut ctx, 2);
        let config = OrreryConfig::default();
        for _ in 0..(60 * 6) {
            let dt = ctx.clock.advance(1.0 / 60.0);
            w.step(&mut ctx, &config, dt);
        }
        for (p, spec) in w.planets.iter().zip(&config.planets) {
            assert!((p.pos.length() - spec.distance).abs() < 1e-3);
        }
    }

    #[test]
    fn theme_switch_recolors_everything() {
        let mut ctx = EngineContext::new();
        let (mut w, mut book) = world(&mut ctx, 2);
        let inferno = book.cycle().clone();
        w.apply_theme(&inferno, &mut ctx.lights);

        assert_eq!(w.star.color1, Rgb::from_hex(0xffffff));
        assert_eq!(w.planets[0].colors, inferno.planet(0));
        assert_eq!(w.trails[3].color, Rgb::from_hex(0xffcc44));
        assert_eq!(w.metal.color, Rgb::from_hex(0x332222));
        assert_eq!(w.ring_color, Rgb::from_hex(0xff8866));
        let l = w.lights.unwrap();
        assert_eq!(ctx.lights.get(l.ambient).unwrap().color(), Rgb::from_hex(0x401008));
    }

    #[test]
    fn active_resonance_keeps_star_colors() {
        let mut ctx = EngineContext::new();
        let (mut w, mut book) = world(&mut ctx, 2);
        w.star.color1 = Rgb::new(0.1, 0.2, 0.3);
        w.resonance_active = true;
        let next = book.cycle().clone();
        w.apply_theme(&next, &mut ctx.lights);
        assert_eq!(w.star.color1, Rgb::new(0.1, 0.2, 0.3));
        assert_eq!(w.theme_star, next.star_colors);
    }

    #[test]
    fn body_position_falls_back_to_star() {
        let mut ctx = EngineContext::new();
        let (w, _) = world(&mut ctx, 0);
        assert_eq!(w.body_position(None), Vec3::ZERO);
        assert_eq!(w.body_position(Some(99)), Vec3::ZERO);
        assert_eq!(w.body_position(Some(1)), w.planets[1].pos);
    }
}
