use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub const DEFAULT_THEME: &str = "default";
const NEUTRAL_COLOR: &str = "#6b7280";

/// Named colour palette; always at least five `#rrggbb` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTheme {
    pub name: String,
    pub colors: Vec<String>,
}

impl ColorTheme {
    pub const MIN_COLORS: usize = 5;

    pub fn new(name: impl Into<String>, colors: Vec<String>) -> ChartResult<Self> {
        let name = name.into();
        if colors.len() < Self::MIN_COLORS {
            return Err(ChartError::InvalidData(format!(
                "theme `{name}` needs at least {} colors, got {}",
                Self::MIN_COLORS,
                colors.len()
            )));
        }
        for color in &colors {
            if !is_hex_color(color) {
                return Err(ChartError::InvalidData(format!(
                    "theme `{name}` has invalid color `{color}`"
                )));
            }
        }
        Ok(Self { name, colors })
    }

    #[must_use]
    pub fn primary(&self) -> &str {
        self.colors.first().map_or(NEUTRAL_COLOR, String::as_str)
    }

    #[must_use]
    pub fn accent(&self) -> &str {
        self.colors.get(1).map_or_else(|| self.primary(), String::as_str)
    }

    /// Evenly spaced `[stop, color]` pairs spanning 0..=1.
    #[must_use]
    pub fn color_scale(&self) -> Vec<(f64, String)> {
        let last = self.colors.len().saturating_sub(1).max(1) as f64;
        self.colors
            .iter()
            .enumerate()
            .map(|(i, color)| (i as f64 / last, color.clone()))
            .collect()
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCatalog {
    themes: IndexMap<String, ColorTheme>,
    fallback: ColorTheme,
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ThemeCatalog {
    #[must_use]
    pub fn standard() -> Self {
        const PALETTES: [(&str, [&str; 5]); 5] = [
            (
                DEFAULT_THEME,
                ["#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6"],
            ),
            (
                "ocean",
                ["#0077b6", "#00b4d8", "#90e0ef", "#023e8a", "#48cae4"],
            ),
            (
                "sunset",
                ["#ff6b35", "#f7c59f", "#efa00b", "#d62246", "#4b1d3f"],
            ),
            (
                "forest",
                ["#2d6a4f", "#52b788", "#95d5b2", "#1b4332", "#74c69d"],
            ),
            (
                "monochrome",
                ["#212529", "#495057", "#868e96", "#adb5bd", "#dee2e6"],
            ),
        ];

        let palette = |(name, colors): &(&str, [&str; 5])| ColorTheme {
            name: (*name).to_owned(),
            colors: colors.iter().map(|c| (*c).to_owned()).collect(),
        };
        Self {
            themes: PALETTES
                .iter()
                .map(|entry| (entry.0.to_owned(), palette(entry)))
                .collect(),
            fallback: palette(&PALETTES[0]),
        }
    }

    /// Adds or replaces a palette.
    #[must_use]
    pub fn with_theme(mut self, theme: ColorTheme) -> Self {
        if theme.name == DEFAULT_THEME {
            self.fallback = theme.clone();
        }
        self.themes.insert(theme.name.clone(), theme);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColorTheme> {
        self.themes.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    pub fn require(&self, name: &str) -> ChartResult<&ColorTheme> {
        self.get(name)
            .ok_or_else(|| ChartError::UnknownTheme(name.to_owned()))
    }

    /// Resolves `name`, falling back to the default palette.
    ///
    /// The second element is `false` when the fallback was used.
    #[must_use]
    pub fn resolve(&self, name: &str) -> (&ColorTheme, bool) {
        match self.get(name) {
            Some(theme) => (theme, true),
            None => (&self.fallback, false),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}
