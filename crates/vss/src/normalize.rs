//! Property-name canonicalisation and shorthand decomposition.
//!
//! Callers may write CSS names (`backgroundColor`, `border-radius`), Tk names
//! (`bd`, `borderwidth`) or canonical names (`bg`, `radius`). The normalizer maps
//! them all to one canonical set and breaks shorthand into primitives:
//!
//! | Input | Output |
//! |---|---|
//! | `padding: 12` | `padx: 12, pady: 12` |
//! | `padding: [4, 8]` | `padx: 4, pady: 8` |
//! | `padding: [t, r, b, l]` | `padx: r, pady: t` |
//! | `margin: "4 8"` | `margin: Spacing(4, 8)` |
//! | `font: "Arial"` | `font: Font("Arial", 10, normal)` |
//! | `fontSize: 12` | `font: { size: 12 }` (partial, completed after the cascade) |
//! | `border: "1 solid #ccc"` | `border_width`, `border_style`, `border_color` |
//! | `shadow: true` | default [`Shadow`] |
//! | `gradient: [a, b]` | linear vertical [`Gradient`] |
//!
//! Unknown properties pass through unchanged. Malformed numeric input becomes `0`
//! with a warning, or a [`StyleError::MalformedStyleValue`] in strict mode.

use phf::{phf_map, phf_set};

use crate::color::Color;
use crate::error::{StyleError, StyleResult};
use crate::parser::{parse_border, parse_box_shadow, parse_length_list};
use crate::state::{STATE_NAMES, split_state_prefix};
use crate::value::{Border, Font, Gradient, Shadow, Spacing, StyleMap, StyleValue, number_like, number_pair};

/// Alias table, keyed by the snake_case form of the incoming name.
static ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "background" => "bg",
    "background_color" => "bg",
    "bg_color" => "bg",
    "foreground" => "fg",
    "foreground_color" => "fg",
    "text_color" => "fg",
    "fg_color" => "fg",
    "color" => "fg",
    "border_radius" => "radius",
    "corner_radius" => "radius",
    "bd" => "border_width",
    "borderwidth" => "border_width",
    "border_size" => "border_width",
    "box_shadow" => "shadow",
    "text_align" => "justify",
    "text_wrap" => "wraplength",
    "highlight_thickness" => "highlightthickness",
    "padding_x" => "padx",
    "padding_y" => "pady",
    "font_family" => "font.family",
    "font_size" => "font.size",
    "font_weight" => "font.weight",
    "padding_top" => "padding.vertical",
    "padding_bottom" => "padding.vertical",
    "padding_left" => "padding.horizontal",
    "padding_right" => "padding.horizontal",
};

static NUMERIC_PROPERTIES: phf::Set<&'static str> = phf_set! {
    "border_width", "border_bottom_width", "padx", "pady", "width", "height",
    "highlightthickness", "wraplength", "opacity", "letter_spacing", "ipadx", "ipady",
};

/// How a canonical property is normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    Padding,
    PaddingAxis(&'static str),
    Margin,
    Font,
    FontPart(&'static str),
    Border,
    Shadow,
    Gradient,
    Radius,
    Numeric,
    Plain,
}

fn rule_for(key: &str) -> Rule {
    match key {
        "padding" => Rule::Padding,
        "padding.horizontal" => Rule::PaddingAxis("padx"),
        "padding.vertical" => Rule::PaddingAxis("pady"),
        "margin" => Rule::Margin,
        "font" => Rule::Font,
        "font.family" => Rule::FontPart("family"),
        "font.size" => Rule::FontPart("size"),
        "font.weight" => Rule::FontPart("weight"),
        "border" => Rule::Border,
        "shadow" => Rule::Shadow,
        "gradient" => Rule::Gradient,
        "radius" => Rule::Radius,
        k if NUMERIC_PROPERTIES.contains(k) => Rule::Numeric,
        _ => Rule::Plain,
    }
}

/// Converts a raw property name to snake_case and applies the alias table.
///
/// Shorthand targets come back in their internal dotted form (`font.size`,
/// `padding.vertical`); [`PropertyNormalizer::normalize`] never emits those keys.
///
/// ```
/// use vss::PropertyNormalizer;
///
/// assert_eq!(PropertyNormalizer::canonical_key("backgroundColor"), "bg");
/// assert_eq!(PropertyNormalizer::canonical_key("border-radius"), "radius");
/// assert_eq!(PropertyNormalizer::canonical_key("selectbackground"), "selectbackground");
/// ```
pub fn canonical_key(raw: &str) -> String {
    let snake = to_snake_case(raw);
    match ALIASES.get(snake.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => snake,
    }
}

/// `backgroundColor` and `background-color` both become `background_color`.
pub(crate) fn to_snake_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for (i, c) in raw.trim().chars().enumerate() {
        if c == '-' || c == ' ' {
            out.push('_');
        } else if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Normalizes style maps to canonical property names and primitive values.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertyNormalizer {
    strict: bool,
}

impl PropertyNormalizer {
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// A normalizer that reports malformed values instead of degrading them.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn canonical_key(raw: &str) -> String {
        canonical_key(raw)
    }

    /// Returns a new map with canonical keys and decomposed shorthand.
    pub fn normalize(&self, map: &StyleMap) -> StyleResult<StyleMap> {
        let mut out = StyleMap::with_capacity(map.len());
        for (key, value) in map {
            self.normalize_entry(&mut out, key, value)?;
        }
        Ok(out)
    }

    fn normalize_entry(&self, out: &mut StyleMap, raw_key: &str, value: &StyleValue) -> StyleResult<()> {
        let snake = to_snake_case(raw_key);

        // Nested state blocks: `hover: { ... }`
        if STATE_NAMES.contains(&snake.as_str()) {
            if let StyleValue::Map(inner) = value {
                put(out, snake, StyleValue::Map(self.normalize(inner)?));
                return Ok(());
            }
        }

        // Prefixed state keys keep their prefix; the rest is normalized as usual.
        if let Some((state, suffix)) = split_state_prefix(&snake) {
            let mut single = StyleMap::new();
            self.normalize_entry(&mut single, suffix, value)?;
            for (key, value) in single {
                put(out, format!("{}_{}", state, key), value);
            }
            return Ok(());
        }

        let key = canonical_key(&snake);
        let rule = rule_for(&key);

        if value.is_token() {
            self.place_token(out, &key, rule, value.clone());
            return Ok(());
        }

        match rule {
            Rule::Padding => {
                let spacing = self.spacing(&key, value)?;
                put(out, "padx", spacing.horizontal);
                put(out, "pady", spacing.vertical);
            }
            Rule::PaddingAxis(axis) => {
                let n = self.number(axis, value)?;
                put(out, axis, n);
            }
            Rule::Margin => {
                let spacing = self.spacing(&key, value)?;
                put(out, "margin", spacing);
            }
            Rule::Font => {
                if let Some(font) = self.font(value)? {
                    put(out, "font", font);
                }
            }
            Rule::FontPart(part) => {
                if let Some(part_value) = self.font_part(part, value)? {
                    let mut partial = StyleMap::new();
                    partial.insert(part, part_value);
                    put(out, "font", StyleValue::Map(partial));
                }
            }
            Rule::Border => {
                if let Some(border) = self.border(value)? {
                    for (key, value) in border {
                        put(out, key, value);
                    }
                }
            }
            Rule::Shadow => {
                if let Some(shadow) = self.shadow(value)? {
                    put(out, "shadow", shadow);
                }
            }
            Rule::Gradient => {
                if let Some(gradient) = self.gradient(value)? {
                    put(out, "gradient", gradient);
                }
            }
            Rule::Radius => {
                let n = self.number(&key, value)?;
                put(out, "radius", n.max(0.0));
            }
            Rule::Numeric => {
                let n = self.number(&key, value)?;
                put(out, key, n);
            }
            Rule::Plain => put(out, key, value.clone()),
        }
        Ok(())
    }

    /// Unresolved tokens are kept verbatim under the property they were written
    /// for. Shorthand targets receive them on their primary primitive.
    fn place_token(&self, out: &mut StyleMap, key: &str, rule: Rule, token: StyleValue) {
        match rule {
            Rule::Padding => {
                put(out, "padx", token.clone());
                put(out, "pady", token);
            }
            Rule::PaddingAxis(axis) => put(out, axis, token),
            Rule::FontPart(part) => {
                let mut partial = StyleMap::new();
                partial.insert(part, token);
                put(out, "font", StyleValue::Map(partial));
            }
            Rule::Border => {
                let is_color = token.as_str().is_some_and(|t| t.starts_with("@colors."));
                put(out, if is_color { "border_color" } else { "border" }, token);
            }
            _ => put(out, key, token),
        }
    }

    fn malformed<T>(&self, property: &str, value: &StyleValue, expected: &'static str, fallback: T) -> StyleResult<T> {
        if self.strict {
            return Err(StyleError::malformed(property, value, expected));
        }
        log::warn!(
            "Malformed value for '{}': {} (expected {}), using fallback",
            property,
            value,
            expected
        );
        Ok(fallback)
    }

    fn number(&self, property: &str, value: &StyleValue) -> StyleResult<f64> {
        match number_like(value) {
            Some(n) => Ok(n),
            None => self.malformed(property, value, "a number", 0.0),
        }
    }

    fn spacing(&self, property: &str, value: &StyleValue) -> StyleResult<Spacing> {
        let parts: Option<Vec<f64>> = match value {
            StyleValue::Spacing(s) => return Ok(*s),
            StyleValue::Number(n) => Some(vec![*n]),
            StyleValue::Str(s) => parse_length_list(s),
            StyleValue::List(items) => items.iter().map(number_like).collect(),
            _ => None,
        };

        match parts.as_deref() {
            Some([n]) => Ok(Spacing::uniform(*n)),
            Some([h, v]) => Ok(Spacing::new(*h, *v)),
            Some([top, horizontal, _bottom]) => Ok(Spacing::new(*horizontal, *top)),
            Some([top, right, bottom, left]) => Ok(Spacing::from_box(*top, *right, *bottom, *left)),
            _ => self.malformed(property, value, "1, 2 or 4 numbers", Spacing::default()),
        }
    }

    fn font(&self, value: &StyleValue) -> StyleResult<Option<StyleValue>> {
        match value {
            StyleValue::Font(_) => Ok(Some(value.clone())),
            StyleValue::Map(map) => {
                let mut partial = StyleMap::new();
                for (key, part_value) in map {
                    let part = match to_snake_case(key).as_str() {
                        "family" | "font_family" => "family",
                        "size" | "font_size" => "size",
                        "weight" | "font_weight" => "weight",
                        _ => continue,
                    };
                    if let Some(v) = self.font_part(part, part_value)? {
                        partial.insert(part, v);
                    }
                }
                Ok(Some(StyleValue::Map(partial)))
            }
            other => match Font::from_value(other) {
                Some(font) => Ok(Some(StyleValue::Font(font))),
                None => self.malformed("font", other, "a family, [family, size, weight] or font map", None),
            },
        }
    }

    /// A malformed size is dropped so the size from lower layers survives.
    fn font_part(&self, part: &'static str, value: &StyleValue) -> StyleResult<Option<StyleValue>> {
        match part {
            "size" => match number_like(value) {
                Some(n) => Ok(Some(StyleValue::Number(n))),
                None => self.malformed("font.size", value, "a number", None),
            },
            _ => Ok(Some(StyleValue::Str(value.to_string()))),
        }
    }

    fn border(&self, value: &StyleValue) -> StyleResult<Option<[(&'static str, StyleValue); 3]>> {
        let border = match value {
            StyleValue::Str(s) => parse_border(s),
            StyleValue::Number(n) => Some(Border {
                width: n.max(0.0),
                ..Default::default()
            }),
            StyleValue::Bool(false) => Some(Border {
                width: 0.0,
                style: "flat".to_string(),
                ..Default::default()
            }),
            StyleValue::Map(map) => {
                let defaults = Border::default();
                Some(Border {
                    width: map.get("width").and_then(number_like).unwrap_or(defaults.width),
                    style: map
                        .get("style")
                        .map(|v| v.to_string())
                        .unwrap_or(defaults.style),
                    color: map
                        .get("color")
                        .map(|v| v.to_string())
                        .unwrap_or(defaults.color),
                })
            }
            _ => None,
        };
        match border {
            Some(border) => Ok(Some(border.into_primitives())),
            None => self.malformed("border", value, "\"width style color\" or a border map", None),
        }
    }

    fn shadow(&self, value: &StyleValue) -> StyleResult<Option<StyleValue>> {
        match value {
            StyleValue::Bool(true) => Ok(Some(Shadow::default().into())),
            StyleValue::Bool(false) => Ok(Some(Shadow::disabled().into())),
            StyleValue::Shadow(_) => Ok(Some(value.clone())),
            StyleValue::Map(map) => Ok(Some(StyleValue::Map(self.shadow_fields(map)?))),
            StyleValue::Str(s) => match parse_box_shadow(s) {
                Some(map) => Ok(Some(StyleValue::Map(map))),
                None => self.malformed("shadow", value, "true/false, a shadow map or \"dx dy blur color\"", None),
            },
            _ => self.malformed("shadow", value, "true/false or a shadow map", None),
        }
    }

    fn shadow_fields(&self, map: &StyleMap) -> StyleResult<StyleMap> {
        let mut fields = StyleMap::new();
        for (key, value) in map {
            match to_snake_case(key).as_str() {
                "offset" => match number_pair(value) {
                    Some(pair) => {
                        fields.insert("offset", pair);
                    }
                    None => {
                        let pair = self.malformed("shadow.offset", value, "[dx, dy]", (0.0, 0.0))?;
                        fields.insert("offset", pair);
                    }
                },
                "blur" => {
                    let blur = self.number("shadow.blur", value)?;
                    fields.insert("blur", blur.max(0.0));
                }
                "enabled" => {
                    fields.insert("enabled", value.as_bool().unwrap_or(true));
                }
                "color" => {
                    fields.insert("color", value.clone());
                }
                other => {
                    fields.insert(other, value.clone());
                }
            }
        }
        Ok(fields)
    }

    fn gradient(&self, value: &StyleValue) -> StyleResult<Option<StyleValue>> {
        match value {
            StyleValue::Gradient(_) => Ok(Some(value.clone())),
            StyleValue::List(items) if items.len() >= 2 => {
                Ok(Some(Gradient::linear(items.iter().map(stop_color).collect()).into()))
            }
            StyleValue::Map(map) => {
                let mut fields = StyleMap::new();
                for (key, v) in map {
                    match (to_snake_case(key).as_str(), v) {
                        ("colors", StyleValue::List(stops)) => {
                            if stops.len() < 2 {
                                return self.malformed("gradient.colors", v, "at least 2 colors", None);
                            }
                            fields.insert("colors", stops.iter().map(stop_color).collect::<Vec<_>>());
                        }
                        ("type" | "kind", _) => {
                            fields.insert("type", v.to_string());
                        }
                        (other, _) => {
                            fields.insert(other, v.clone());
                        }
                    }
                }
                Ok(Some(StyleValue::Map(fields)))
            }
            _ => self.malformed("gradient", value, "a list of at least 2 colors or a gradient map", None),
        }
    }
}

/// Gradient stops are kept as strings; `[r, g, b]` triples become hex.
fn stop_color(value: &StyleValue) -> String {
    match value {
        StyleValue::List(items) if items.len() == 3 => {
            let channel = |v: &StyleValue| number_like(v).map(|n| n.round() as i64).unwrap_or(0);
            Color::from_clamped(channel(&items[0]), channel(&items[1]), channel(&items[2])).to_hex()
        }
        other => other.to_string(),
    }
}

/// Inserts with the cascade merge rule so partial font maps from several
/// aliases combine.
fn put(out: &mut StyleMap, key: impl Into<String>, value: impl Into<StyleValue>) {
    let key = key.into();
    let value = value.into();
    match out.get_mut(&key) {
        Some(existing) => existing.merge(value),
        None => {
            out.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style;

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("backgroundColor"), "background_color");
        assert_eq!(to_snake_case("border-radius"), "border_radius");
        assert_eq!(to_snake_case("hover_bg"), "hover_bg");
        assert_eq!(to_snake_case("paddingTop"), "padding_top");
    }

    #[test]
    fn test_state_prefix_suffix_normalized() {
        let normalized = PropertyNormalizer::new()
            .normalize(&style! { "hover_backgroundColor" => "#eee", "focused-padding" => 3 })
            .unwrap();
        assert_eq!(normalized.get("hover_bg"), Some(&StyleValue::from("#eee")));
        assert_eq!(normalized.get("focused_padx"), Some(&StyleValue::Number(3.0)));
        assert_eq!(normalized.get("focused_pady"), Some(&StyleValue::Number(3.0)));
    }

    #[test]
    fn test_font_parts_combine() {
        let normalized = PropertyNormalizer::new()
            .normalize(&style! { "fontFamily" => "Inter", "fontSize" => "12" })
            .unwrap();
        let font = normalized.get("font").and_then(StyleValue::as_map).unwrap();
        assert_eq!(font.get("family"), Some(&StyleValue::from("Inter")));
        assert_eq!(font.get("size"), Some(&StyleValue::Number(12.0)));
    }

    #[test]
    fn test_unresolved_padding_token_kept() {
        let normalized = PropertyNormalizer::new()
            .normalize(&style! { "padding" => "@spacing.huge" })
            .unwrap();
        assert_eq!(normalized.get("padx"), Some(&StyleValue::from("@spacing.huge")));
        assert!(!normalized.contains_key("padding"));
    }
}
