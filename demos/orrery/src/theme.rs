//! Color themes, shipped as JSON and embedded at compile time.

use serde::Deserialize;

use orrery_engine::{ConfigError, Rgb};

const BUILTIN_THEMES: &str = include_str!("../assets/themes.json");

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ColorPair {
    pub color1: Rgb,
    pub color2: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetColors {
    pub base_color: Rgb,
    pub accent_color: Rgb,
    pub trail_color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub star_colors: ColorPair,
    pub planet_data: Vec<PlanetColors>,
    pub ambient_light_color: Rgb,
    pub star_light_color: Rgb,
    pub directional_lights: ColorPair,
    pub metal_material_color: Rgb,
    pub ring_color: Rgb,
    pub arc_color: Rgb,
}

impl Theme {
    /// Colors for planet `index`; wraps when the theme lists fewer planets.
    pub fn planet(&self, index: usize) -> PlanetColors {
        self.planet_data[index % self.planet_data.len()]
    }
}

/// The theme list plus the index of the active theme.
#[derive(Debug, Clone)]
pub struct ThemeBook {
    themes: Vec<Theme>,
    current: usize,
}

impl ThemeBook {
    /// The three embedded themes, starting at `start` (wrapped).
    pub fn builtin(start: usize) -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_THEMES, start)
    }

    /// A single neutral theme, used if the embedded themes fail to load.
    pub fn fallback() -> Self {
        let grey = Rgb::new(0.6, 0.6, 0.7);
        let pair = ColorPair { color1: Rgb::WHITE, color2: grey };
        let theme = Theme {
            name: "Plain".into(),
            star_colors: pair,
            planet_data: vec![PlanetColors {
                base_color: grey,
                accent_color: Rgb::WHITE,
                trail_color: grey,
            }],
            ambient_light_color: Rgb::new(0.2, 0.2, 0.25),
            star_light_color: Rgb::WHITE,
            directional_lights: pair,
            metal_material_color: Rgb::new(0.3, 0.3, 0.35),
            ring_color: grey,
            arc_color: Rgb::WHITE,
        };
        Self { themes: vec![theme], current: 0 }
    }

    pub fn from_json(json: &str, start: usize) -> Result<Self, ConfigError> {
        let themes: Vec<Theme> = serde_json::from_str(json)?;
        if themes.is_empty() {
            return Err(ConfigError::invalid("themes", "at least one theme is required"));
        }
        if let Some(t) = themes.iter().find(|t| t.planet_data.is_empty()) {
            return Err(ConfigError::invalid(
                "themes",
                format!("theme `{}` has no planet colors", t.name),
            ));
        }
        let current = start % themes.len();
        Ok(Self { themes, current })
    }

    pub fn current(&self) -> &Theme {
        &self.themes[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Advance to the next theme and return it.
    pub fn cycle(&mut self) -> &Theme {
        self.current = (self.current + 1) % self.themes.len();
        log::info!("theme: {}", self.themes[self.current].name);
        &self.themes[self.current]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_themes_parse() {
        let book = ThemeBook::builtin(2).unwrap();
        assert_eq!(book.len(), 3);
        assert_eq!(book.current().name, "Celestial");
        assert_eq!(book.current().star_colors.color1, Rgb::from_hex(0xffe4b5));
        assert_eq!(book.current().planet_data.len(), 7);
        assert_eq!(book.current().planet(2).base_color, Rgb::new(0.3, 0.4, 1.0));
    }

    #[test]
    fn cycle_wraps() {
        let mut book = ThemeBook::builtin(2).unwrap();
        assert_eq!(book.cycle().name, "Inferno");
        assert_eq!(book.cycle().name, "Veridian");
        assert_eq!(book.cycle().name, "Celestial");
        assert_eq!(book.index(), 2);
    }

    #[test]
    fn start_index_wraps() {
        let book = ThemeBook::builtin(4).unwrap();
        assert_eq!(book.index(), 1);
    }

    #[test]
    fn short_theme_wraps_planet_colors() {
        let book = ThemeBook::builtin(0).unwrap();
        let theme = book.current();
        assert_eq!(theme.planet(7), theme.planet(0));
        assert_eq!(theme.planet(9).trail_color, Rgb::from_hex(0xffaa33));
    }

    #[test]
    fn fallback_has_one_theme() {
        let mut book = ThemeBook::fallback();
        assert_eq!(book.len(), 1);
        assert_eq!(book.cycle().name, "Plain");
        assert_eq!(book.current().planet(4), book.current().planet(0));
    }

    #[test]
    fn rejects_empty_theme_list() {
        assert!(matches!(
            ThemeBook::from_json("[]", 0),
            Err(ConfigError::Invalid { field: "themes", .. })
        ));
        assert!(matches!(ThemeBook::from_json("{", 0), Err(ConfigError::Json(_))));
    }
}
