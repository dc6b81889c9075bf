//! Palette configuration for colorizing height grids.
//!
//! A palette is an ordered list of category rules. A cell value selects the
//! category `value % rules.len()`; categories without a rule fall back to the
//! default color.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Ordered category → color rules plus a fallback color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Category rules; their count is the palette size
    pub rules: Vec<ColorRule>,

    /// Color for categories without a rule
    #[serde(default = "default_fallback_color")]
    pub default_color: Color,
}

fn default_fallback_color() -> Color {
    Color::Array(vec![0, 0, 0])
}

impl Default for PaletteConfig {
    /// Water, grass, dirt and snow.
    fn default() -> Self {
        Self {
            rules: vec![
                ColorRule::new(0, Color::Array(vec![0, 0, 255]), "water"),
                ColorRule::new(1, Color::Array(vec![34, 139, 34]), "grass"),
                ColorRule::new(2, Color::Array(vec![139, 69, 19]), "dirt"),
                ColorRule::new(255, Color::Array(vec![255, 255, 255]), "snow"),
            ],
            default_color: default_fallback_color(),
        }
    }
}

impl PaletteConfig {
    /// Load a palette from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PaletteError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PaletteError::IoError(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse a palette from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        serde_json::from_str(json).map_err(|e| PaletteError::ParseError(e.to_string()))
    }

    /// Number of categories, i.e. the modulus applied to cell values.
    pub fn palette_size(&self) -> usize {
        self.rules.len()
    }

    /// Check the one-color-per-category invariant and that every color parses.
    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.rules.is_empty() {
            return Err(PaletteError::ValidationError(
                "palette must have at least 1 rule".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.category) {
                return Err(PaletteError::ValidationError(format!(
                    "category {} has more than one color",
                    rule.category
                )));
            }
            rule.color.to_rgb().ok_or_else(|| {
                PaletteError::ValidationError(format!(
                    "category {}: unrecognised color {:?}",
                    rule.category, rule.color
                ))
            })?;
        }

        self.default_color.to_rgb().ok_or_else(|| {
            PaletteError::ValidationError(format!(
                "unrecognised default color {:?}",
                self.default_color
            ))
        })?;

        Ok(())
    }

    /// Color of a category, or the default color when no rule matches.
    pub fn lookup(&self, category: u8) -> [u8; 3] {
        self.rules
            .iter()
            .find(|rule| rule.category == category)
            .and_then(|rule| rule.color.to_rgb())
            .or_else(|| self.default_color.to_rgb())
            .unwrap_or([0, 0, 0])
    }
}

/// A single category → color mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorRule {
    /// Category index the rule applies to
    pub category: u8,

    /// Color of the category
    pub color: Color,

    /// Optional label for legends and logs
    #[serde(default)]
    pub label: Option<String>,
}

impl ColorRule {
    pub fn new(category: u8, color: Color, label: &str) -> Self {
        Self {
            category,
            color,
            label: Some(label.to_string()),
        }
    }
}

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Hex string "#RRGGBB", or a color name such as "blue"
    Hex(String),

    /// RGB array: [r, g, b]
    Array(Vec<u8>),

    /// Explicit RGBA (alpha is ignored, tiles are opaque)
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Array(vec![r, g, b])
    }

    /// Convert to an RGB triple, `None` if the color cannot be interpreted.
    pub fn to_rgb(&self) -> Option<[u8; 3]> {
        match self {
            Color::Hex(s) if s.starts_with('#') => parse_hex_color(s),
            Color::Hex(s) => named_color(s),
            Color::Array(arr) if arr.len() == 3 || arr.len() == 4 => Some([arr[0], arr[1], arr[2]]),
            Color::Array(_) => None,
            Color::Rgba { r, g, b, .. } => Some([*r, *g, *b]),
        }
    }
}

fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let s = s.trim_start_matches('#');
    if s.len() != 6 && s.len() != 8 {
        return None;
    }

    let r = u8::from_str_radix(s.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(s.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(s.get(4..6)?, 16).ok()?;
    Some([r, g, b])
}

fn named_color(name: &str) -> Option<[u8; 3]> {
    let rgb = match name.to_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" => [0, 255, 255],
        "magenta" => [255, 0, 255],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "gray" | "grey" => [128, 128, 128],
        "forestgreen" => [34, 139, 34],
        "saddlebrown" => [139, 69, 19],
        _ => return None,
    };
    Some(rgb)
}

/// Palette-related errors.
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<PaletteError> for crate::TilerError {
    fn from(err: PaletteError) -> Self {
        crate::TilerError::Configuration(format!("palette: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = PaletteConfig::default();
        palette.validate().unwrap();
        assert_eq!(palette.palette_size(), 4);
        assert_eq!(palette.lookup(0), [0, 0, 255]);
        assert_eq!(palette.lookup(1), [34, 139, 34]);
        assert_eq!(palette.lookup(2), [139, 69, 19]);
        assert_eq!(palette.lookup(3), [0, 0, 0]);
        assert_eq!(palette.lookup(255), [255, 255, 255]);
    }

    #[test]
    fn test_parse_palette_json() {
        let json = r##"{"rules":[{"category":0,"color":"#102030","label":"deep"},{"category":1,"color":"white"},{"category":2,"color":[1,2,3]}],"default_color":{"r":9,"g":8,"b":7,"a":255}}"##;

        let palette = PaletteConfig::from_json(json).unwrap();
        palette.validate().unwrap();
        assert_eq!(palette.palette_size(), 3);
        assert_eq!(palette.lookup(0), [0x10, 0x20, 0x30]);
        assert_eq!(palette.lookup(1), [255, 255, 255]);
        assert_eq!(palette.lookup(2), [1, 2, 3]);
        assert_eq!(palette.lookup(7), [9, 8, 7]);
    }

    #[test]
    fn test_default_color_is_black_when_omitted() {
        let palette = PaletteConfig::from_json(r##"{"rules":[{"category":5,"color":"red"}]}"##).unwrap();
        assert_eq!(palette.lookup(0), [0, 0, 0]);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let palette = PaletteConfig {
            rules: vec![
                ColorRule::new(1, Color::rgb(1, 1, 1), "a"),
                ColorRule::new(1, Color::rgb(2, 2, 2), "b"),
            ],
            default_color: Color::rgb(0, 0, 0),
        };
        assert!(matches!(palette.validate(), Err(PaletteError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_empty_and_bad_colors() {
        let empty = PaletteConfig {
            rules: vec![],
            default_color: Color::rgb(0, 0, 0),
        };
        assert!(empty.validate().is_err());

        let bad = PaletteConfig {
            rules: vec![ColorRule::new(0, Color::Hex("not-a-color".to_string()), "x")],
            default_color: Color::rgb(0, 0, 0),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::Hex("#FF5500".to_string()).to_rgb(), Some([255, 85, 0]));
        assert_eq!(Color::Hex("#FF550080".to_string()).to_rgb(), Some([255, 85, 0]));
        assert_eq!(Color::Hex("#FF55".to_string()).to_rgb(), None);
        assert_eq!(Color::Hex("Blue".to_string()).to_rgb(), Some([0, 0, 255]));
        assert_eq!(Color::Array(vec![100, 150]).to_rgb(), None);
    }
}
