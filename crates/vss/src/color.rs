//! Colour parsing, manipulation and theme-aware resolution.
//!
//! [`Color`] is a plain RGBA value with parsing and HSL-based adjustments.
//! [`ColorResolver`] turns whatever a style map carries for a colour property into
//! a canonical hex string:
//!
//! - `[r, g, b]` triples, clamped to `0..=255`, become `#rrggbb`
//! - `@colors.NAME` tokens and bare palette keys resolve through the theme
//! - `#rgb` and `#rrggbb` become lowercase six-digit hex
//! - `rgb(...)` strings become hex
//! - anything else (named colours, system colours, `#rrggbbaa`) passes through
//!
//! Token references resolve a single level; a palette entry that is itself a
//! token is returned as that token string.

use std::cell::RefCell;
use std::collections::HashMap;

use phf::phf_set;
use thiserror::Error;

use crate::parser::{parse_hex_color, parse_hsl_function, parse_rgb_function};
use crate::theme::{Theme, ThemeId};
use crate::value::StyleValue;

/// Prefix of colour palette tokens.
pub const COLOR_TOKEN_PREFIX: &str = "@colors.";

/// Error returned when colour parsing fails.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("{message}")]
pub struct ColorParseError {
    pub message: String,
}

impl ColorParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An RGBA colour. Alpha is `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Builds a colour from arbitrary integer channels, clamping each to `0..=255`.
    pub fn from_clamped(r: i64, g: i64, b: i64) -> Self {
        let clamp = |v: i64| v.clamp(0, 255) as u8;
        Self::rgb(clamp(r), clamp(g), clamp(b))
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()`,
    /// `hsl()`/`hsla()` and the keywords `white`, `black` and `transparent`.
    ///
    /// Other names are not colours this type can blend with and fail to parse;
    /// the [`ColorResolver`] passes them through instead.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let input = input.trim();
        let parsed = match input.to_ascii_lowercase().as_str() {
            "" => return Err(ColorParseError::new("empty color string")),
            "white" => Some(Self::white()),
            "black" => Some(Self::black()),
            "transparent" => Some(Self::rgba(0, 0, 0, 0.0)),
            _ => parse_hex_color(input)
                .map(|(r, g, b, a)| Self::rgba(r, g, b, a as f32 / 255.0))
                .or_else(|| parse_rgb_function(input).map(|(r, g, b)| Self::rgb(r, g, b)))
                .or_else(|| parse_hsl_function(input).map(|(h, s, l)| Self::from_hsl(h, s, l))),
        };
        parsed.ok_or_else(|| ColorParseError::new(format!("unknown color: {}", input)))
    }

    /// Checks a palette entry. Hex and functional notations must parse; any
    /// other non-empty string is accepted as a named or system colour.
    pub fn check_literal(input: &str) -> Result<(), ColorParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ColorParseError::new("empty color string"));
        }
        let functional = input
            .get(..3)
            .is_some_and(|head| head.eq_ignore_ascii_case("rgb") || head.eq_ignore_ascii_case("hsl"));
        if input.starts_with('#') || functional {
            Self::parse(input).map(|_| ())
        } else {
            Ok(())
        }
    }

    /// `h` in degrees, `s` and `l` as fractions.
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let (s, l) = (s.clamp(0.0, 1.0), l.clamp(0.0, 1.0));
        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let sector = h.rem_euclid(360.0) / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (r, g, b) = match sector as u8 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }

    /// Lowercase `#rrggbb`. Alpha is dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance, `0.0` for black to `1.0` for white.
    pub fn luminance(&self) -> f32 {
        let linear = |channel: u8| {
            let c = channel as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// WCAG contrast ratio, `1.0..=21.0`.
    pub fn contrast_ratio(&self, other: &Color) -> f32 {
        let (a, b) = (self.luminance(), other.luminance());
        (a.max(b) + 0.05) / (a.min(b) + 0.05)
    }

    pub fn is_dark(&self) -> bool {
        self.luminance() < 0.5
    }

    /// Mixes `amount` (`0.0..=1.0`) of white in.
    pub fn lighten(&self, amount: f32) -> Self {
        self.blend(&Color::rgba(255, 255, 255, self.a), amount)
    }

    /// Mixes `amount` (`0.0..=1.0`) of black in.
    pub fn darken(&self, amount: f32) -> Self {
        self.blend(&Color::rgba(0, 0, 0, self.a), amount)
    }

    /// Linear blend towards `other`; `ratio` 0.0 keeps `self`, 1.0 yields `other`.
    pub fn blend(&self, other: &Color, ratio: f32) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * ratio).round() as u8;
        Self::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            self.a + (other.a - self.a) * ratio,
        )
    }
}

static COLOR_PROPERTIES: phf::Set<&'static str> = phf_set! {
    "bg", "fg", "troughcolor", "highlightcolor", "highlightbackground",
    "insertbackground", "selectbackground", "selectforeground",
    "activebackground", "activeforeground", "disabledforeground",
    "placeholder_fg", "border_color", "shadow_color", "color",
};

/// Returns true for properties whose values are colours.
pub fn is_color_property(key: &str) -> bool {
    COLOR_PROPERTIES.contains(key)
        || key.ends_with("_bg")
        || key.ends_with("_fg")
        || key.ends_with("color")
        || key.ends_with("background")
        || key.ends_with("foreground")
}

/// Normalizes a hex string to six lowercase digits, or `None` when it is not a
/// three- or six-digit hex colour.
fn normalize_hex(input: &str) -> Option<String> {
    let hex = input.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => Some(
            std::iter::once('#')
                .chain(hex.chars().flat_map(|c| [c, c]))
                .collect::<String>()
                .to_lowercase(),
        ),
        6 => Some(format!("#{}", hex.to_lowercase())),
        _ => None,
    }
}

/// Resolves colour values against a theme palette.
///
/// Results for string inputs are cached per `(theme id, value)`. The cache is
/// dropped whenever a different theme is seen, or explicitly via
/// [`invalidate`](Self::invalidate).
#[derive(Debug, Default)]
pub struct ColorResolver {
    cache_enabled: bool,
    cache: RefCell<HashMap<(Option<ThemeId>, String), String>>,
    cached_theme: RefCell<Option<Option<ThemeId>>>,
}

impl ColorResolver {
    pub fn new() -> Self {
        Self::with_cache(true)
    }

    pub fn with_cache(enabled: bool) -> Self {
        Self {
            cache_enabled: enabled,
            ..Default::default()
        }
    }

    /// Drops every cached resolution.
    pub fn invalidate(&self) {
        self.cache.borrow_mut().clear();
        *self.cached_theme.borrow_mut() = None;
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Resolves a colour value. Non-colour shapes are returned unchanged.
    pub fn resolve(&self, value: &StyleValue, theme: Option<&Theme>) -> StyleValue {
        match value {
            StyleValue::List(items) if items.len() == 3 => {
                let channels: Option<Vec<i64>> = items
                    .iter()
                    .map(|v| v.as_number().map(|n| n.round() as i64))
                    .collect();
                match channels {
                    Some(c) => StyleValue::Str(Color::from_clamped(c[0], c[1], c[2]).to_hex()),
                    None => value.clone(),
                }
            }
            StyleValue::Str(s) => StyleValue::Str(self.resolve_str(s, theme)),
            _ => value.clone(),
        }
    }

    /// Resolves a colour string.
    pub fn resolve_str(&self, value: &str, theme: Option<&Theme>) -> String {
        if !self.cache_enabled {
            return Self::resolve_uncached(value, theme);
        }

        let theme_id = theme.map(Theme::id);
        {
            let mut cached_theme = self.cached_theme.borrow_mut();
            if *cached_theme != Some(theme_id) {
                if cached_theme.is_some() {
                    log::debug!("Color cache invalidated for theme {:?}", theme_id);
                }
                self.cache.borrow_mut().clear();
                *cached_theme = Some(theme_id);
            }
        }

        let key = (theme_id, value.to_string());
        if let Some(hit) = self.cache.borrow().get(&key) {
            return hit.clone();
        }
        let resolved = Self::resolve_uncached(value, theme);
        self.cache.borrow_mut().insert(key, resolved.clone());
        resolved
    }

    fn resolve_uncached(value: &str, theme: Option<&Theme>) -> String {
        let trimmed = value.trim();

        if let Some(name) = trimmed.strip_prefix(COLOR_TOKEN_PREFIX) {
            return match theme.and_then(|t| t.color(name)) {
                Some(color) => normalize_hex(color).unwrap_or_else(|| color.to_string()),
                None => {
                    log::debug!("Unresolved color token '{}'", trimmed);
                    value.to_string()
                }
            };
        }

        if let Some(color) = theme.and_then(|t| t.color(trimmed)) {
            return normalize_hex(color).unwrap_or_else(|| color.to_string());
        }

        if let Some(hex) = normalize_hex(trimmed) {
            return hex;
        }

        if let Some((r, g, b)) = parse_rgb_function(trimmed) {
            return Color::rgb(r, g, b).to_hex();
        }

        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_3_digit() {
        let color = Color::parse("#f00").unwrap();
        assert_eq!(color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_hex_8_digit() {
        let color = Color::parse("#00000080").unwrap();
        assert_eq!((color.r, color.g, color.b), (0, 0, 0));
        assert!((color.a - 128.0 / 255.0).abs() < 0.01);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(Color::parse("#gg0000").is_err());
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("").is_err());
    }

    #[test]
    fn test_hsl() {
        let gray = Color::parse("hsl(0, 0%, 50%)").unwrap();
        assert_eq!(gray.to_hex(), "#808080");
        assert_eq!(Color::parse("hsl(0, 100%, 50%)").unwrap().to_hex(), "#ff0000");
        assert_eq!(Color::parse("hsl(240, 100%, 25%)").unwrap().to_hex(), "#000080");
        assert!(Color::parse("hsl)(").is_err());
        assert!(Color::parse("hsl(").is_err());
    }

    #[test]
    fn test_non_ascii_input_is_an_error() {
        assert!(Color::parse("ññ").is_err());
        assert!(Color::parse("#ñ0").is_err());
        assert!(Color::parse("rgñ(1,2,3)").is_err());
    }

    #[test]
    fn test_check_literal() {
        for ok in ["red", "SystemButtonFace", "light blue", "#0af", "rgb(1, 2, 3)", "@colors.primary"] {
            assert!(Color::check_literal(ok).is_ok(), "{} should be accepted", ok);
        }
        for bad in ["", "  ", "#12345", "#ggg", "rgb(1,2)", "hsl)(", "HSL(x)"] {
            assert!(Color::check_literal(bad).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_resolve_non_ascii_passes_through() {
        let resolver = ColorResolver::new();
        assert_eq!(resolver.resolve_str("ññ", None), "ññ");
        assert_eq!(resolver.resolve_str("rgbñ", None), "rgbñ");
    }

    #[test]
    fn test_lighten_darken() {
        let gray = Color::rgb(128, 128, 128);
        assert!(gray.lighten(0.2).luminance() > gray.luminance());
        assert!(gray.darken(0.2).luminance() < gray.luminance());
        assert_eq!(Color::white().lighten(0.5), Color::white());
    }

    #[test]
    fn test_contrast_and_darkness() {
        let ratio = Color::black().contrast_ratio(&Color::white());
        assert!((ratio - 21.0).abs() < 0.1, "Black on white should be ~21:1, got {}", ratio);
        assert!(Color::parse("#1e1e1e").unwrap().is_dark());
        assert!(!Color::parse("#f8f9fa").unwrap().is_dark());
    }

    #[test]
    fn test_blend_midpoint() {
        let mid = Color::black().blend(&Color::white(), 0.5);
        assert_eq!(mid.to_hex(), "#808080");
    }

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("#0AF").as_deref(), Some("#00aaff"));
        assert_eq!(normalize_hex("#0078D4").as_deref(), Some("#0078d4"));
        assert_eq!(normalize_hex("#00000030"), None);
        assert_eq!(normalize_hex("red"), None);
    }

    #[test]
    fn test_color_property_detection() {
        for key in ["bg", "fg", "hover_bg", "select_fg", "border_color", "activebackground"] {
            assert!(is_color_property(key), "{} should be a color property", key);
        }
        for key in ["font", "padx", "radius", "border_width"] {
            assert!(!is_color_property(key), "{} should not be a color property", key);
        }
    }
}
