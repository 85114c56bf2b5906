//! Style values and the ordered property map that carries them.
//!
//! A [`StyleMap`] is what callers write, what themes store and what the cascade
//! produces. Values are a small closed set: scalars, lists, nested maps, and the
//! typed compounds the normalizer builds from shorthand ([`Font`], [`Spacing`],
//! [`Shadow`], [`Gradient`]).
//!
//! ## Merging
//!
//! [`StyleMap::deep_merge`] is the single merge rule used everywhere:
//!
//! - a map merging into a map merges key by key, recursively
//! - a map merging into a typed compound lowers the compound to its map form first,
//!   so a later `{ "color": "red" }` only replaces the shadow colour
//! - anything else replaces the earlier value
//!
//! ## Serialization
//!
//! Values serialize to plain trees. Typed compounds are written in their plain form
//! (fonts as `[family, size, weight]`, spacing as `[h, v]`, shadows and gradients as
//! maps), which keeps theme files readable from both JSON and TOML.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Family used when no font family has been specified anywhere in the cascade.
pub const DEFAULT_FONT_FAMILY: &str = "TkDefaultFont";

/// Point size used when a font descriptor omits its size.
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// A single style property value.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    Bool(bool),
    Number(f64),
    /// Raw strings, hex colours, named colours and `@section.key` tokens.
    Str(String),
    List(Vec<StyleValue>),
    Map(StyleMap),
    Font(Font),
    Spacing(Spacing),
    Shadow(Shadow),
    Gradient(Gradient),
}

impl StyleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[StyleValue]> {
        match self {
            StyleValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&StyleMap> {
        match self {
            StyleValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_font(&self) -> Option<&Font> {
        match self {
            StyleValue::Font(font) => Some(font),
            _ => None,
        }
    }

    pub fn as_spacing(&self) -> Option<&Spacing> {
        match self {
            StyleValue::Spacing(spacing) => Some(spacing),
            _ => None,
        }
    }

    pub fn as_shadow(&self) -> Option<&Shadow> {
        match self {
            StyleValue::Shadow(shadow) => Some(shadow),
            _ => None,
        }
    }

    pub fn as_gradient(&self) -> Option<&Gradient> {
        match self {
            StyleValue::Gradient(gradient) => Some(gradient),
            _ => None,
        }
    }

    /// Returns true for `@section.key` token strings.
    pub fn is_token(&self) -> bool {
        matches!(self, StyleValue::Str(s) if s.starts_with('@'))
    }

    /// Short name of the value's shape, used in log and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StyleValue::Bool(_) => "bool",
            StyleValue::Number(_) => "number",
            StyleValue::Str(_) => "string",
            StyleValue::List(_) => "list",
            StyleValue::Map(_) => "map",
            StyleValue::Font(_) => "font",
            StyleValue::Spacing(_) => "spacing",
            StyleValue::Shadow(_) => "shadow",
            StyleValue::Gradient(_) => "gradient",
        }
    }

    /// Lowers typed compounds (recursively) into lists and maps.
    pub fn to_plain(&self) -> StyleValue {
        match self {
            StyleValue::List(items) => StyleValue::List(items.iter().map(Self::to_plain).collect()),
            StyleValue::Map(map) => StyleValue::Map(map.to_plain()),
            StyleValue::Font(font) => StyleValue::List(vec![
                StyleValue::Str(font.family.clone()),
                StyleValue::Number(font.size),
                StyleValue::Str(font.weight.as_str().to_string()),
            ]),
            StyleValue::Spacing(spacing) => StyleValue::List(vec![
                StyleValue::Number(spacing.horizontal),
                StyleValue::Number(spacing.vertical),
            ]),
            StyleValue::Shadow(_) | StyleValue::Gradient(_) => match self.to_map_form() {
                Some(map) => StyleValue::Map(map),
                None => self.clone(),
            },
            other => other.clone(),
        }
    }

    /// The field-by-field map view of a compound, used when a partial map is merged
    /// over it.
    pub fn to_map_form(&self) -> Option<StyleMap> {
        let mut map = StyleMap::new();
        match self {
            StyleValue::Map(existing) => return Some(existing.clone()),
            StyleValue::Font(font) => {
                map.insert("family", font.family.as_str());
                map.insert("size", font.size);
                map.insert("weight", font.weight.as_str());
            }
            StyleValue::Shadow(shadow) => {
                map.insert("enabled", shadow.enabled);
                map.insert("color", shadow.color.as_str());
                map.insert("offset", shadow.offset);
                map.insert("blur", shadow.blur);
            }
            StyleValue::Gradient(gradient) => {
                map.insert("type", gradient.kind.as_str());
                map.insert("colors", gradient.colors.clone());
                map.insert("direction", gradient.direction.as_str());
            }
            _ => return None,
        }
        Some(map)
    }

    /// Looks up one path segment inside a compound value.
    pub fn get(&self, key: &str) -> Option<StyleValue> {
        match self {
            StyleValue::Map(map) => map.get(key).cloned(),
            StyleValue::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
            StyleValue::Font(_) | StyleValue::Shadow(_) | StyleValue::Gradient(_) => {
                self.to_map_form().and_then(|map| map.get(key).cloned())
            }
            StyleValue::Spacing(spacing) => match key {
                "horizontal" | "0" => Some(StyleValue::Number(spacing.horizontal)),
                "vertical" | "1" => Some(StyleValue::Number(spacing.vertical)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Merges `incoming` over `self` using the cascade rule described in the
    /// module docs.
    pub fn merge(&mut self, incoming: StyleValue) {
        match incoming {
            StyleValue::Map(incoming) => match self.to_map_form() {
                Some(mut base) => {
                    base.deep_merge(incoming);
                    *self = StyleValue::Map(base);
                }
                None => *self = StyleValue::Map(incoming),
            },
            other => *self = other,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Bool(b) => write!(f, "{}", b),
            StyleValue::Number(n) => write!(f, "{}", format_number(*n)),
            StyleValue::Str(s) => write!(f, "{}", s),
            StyleValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            StyleValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            StyleValue::Font(font) => write!(f, "{}", font),
            StyleValue::Spacing(s) => write!(
                f,
                "{} {}",
                format_number(s.horizontal),
                format_number(s.vertical)
            ),
            StyleValue::Shadow(_) | StyleValue::Gradient(_) => write!(f, "{}", self.to_plain()),
        }
    }
}

/// Formats integral numbers without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// --- conversions -----------------------------------------------------------

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StyleValue {
                fn from(value: $ty) -> Self {
                    StyleValue::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i32, i64, u8, u16, u32, usize);

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Str(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Str(value)
    }
}

impl From<&String> for StyleValue {
    fn from(value: &String) -> Self {
        StyleValue::Str(value.clone())
    }
}

impl<T: Into<StyleValue>> From<Vec<T>> for StyleValue {
    fn from(value: Vec<T>) -> Self {
        StyleValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<StyleValue>, const N: usize> From<[T; N]> for StyleValue {
    fn from(value: [T; N]) -> Self {
        StyleValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<StyleValue>, B: Into<StyleValue>> From<(A, B)> for StyleValue {
    fn from((a, b): (A, B)) -> Self {
        StyleValue::List(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for StyleValue
where
    A: Into<StyleValue>,
    B: Into<StyleValue>,
    C: Into<StyleValue>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        StyleValue::List(vec![a.into(), b.into(), c.into()])
    }
}

impl<A, B, C, D> From<(A, B, C, D)> for StyleValue
where
    A: Into<StyleValue>,
    B: Into<StyleValue>,
    C: Into<StyleValue>,
    D: Into<StyleValue>,
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        StyleValue::List(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

impl From<StyleMap> for StyleValue {
    fn from(value: StyleMap) -> Self {
        StyleValue::Map(value)
    }
}

impl From<Font> for StyleValue {
    fn from(value: Font) -> Self {
        StyleValue::Font(value)
    }
}

impl From<Spacing> for StyleValue {
    fn from(value: Spacing) -> Self {
        StyleValue::Spacing(value)
    }
}

impl From<Shadow> for StyleValue {
    fn from(value: Shadow) -> Self {
        StyleValue::Shadow(value)
    }
}

impl From<Gradient> for StyleValue {
    fn from(value: Gradient) -> Self {
        StyleValue::Gradient(value)
    }
}

// --- serde -----------------------------------------------------------------

impl Serialize for StyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleValue::Bool(b) => serializer.serialize_bool(*b),
            StyleValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            StyleValue::Number(n) => serializer.serialize_f64(*n),
            StyleValue::Str(s) => serializer.serialize_str(s),
            StyleValue::List(items) => serializer.collect_seq(items),
            StyleValue::Map(map) => map.serialize(serializer),
            compound => compound.to_plain().serialize(serializer),
        }
    }
}

struct StyleValueVisitor;

impl<'de> Visitor<'de> for StyleValueVisitor {
    type Value = StyleValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a style value (bool, number, string, list or map)")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<StyleValue, E> {
        Ok(StyleValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<StyleValue, E> {
        Ok(StyleValue::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<StyleValue, E> {
        Ok(StyleValue::Str(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<StyleValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(StyleValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StyleValue, A::Error> {
        let mut map = StyleMap::new();
        while let Some((key, value)) = access.next_entry::<String, StyleValue>()? {
            map.insert(key, value);
        }
        Ok(StyleValue::Map(map))
    }
}

impl<'de> Deserialize<'de> for StyleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StyleValueVisitor)
    }
}

// --- StyleMap --------------------------------------------------------------

/// An insertion-ordered map from property name to [`StyleValue`].
///
/// Equality ignores ordering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(IndexMap<String, StyleValue>);

impl StyleMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut StyleValue> {
        self.0.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Option<StyleValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a key while keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, StyleValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, StyleValue> {
        self.0.keys()
    }

    /// Merges `other` over `self`. See the module docs for the rule.
    pub fn deep_merge(&mut self, other: StyleMap) {
        for (key, value) in other.0 {
            match self.0.get_mut(&key) {
                Some(existing) => existing.merge(value),
                None => {
                    self.0.insert(key, value);
                }
            }
        }
    }

    /// Consuming variant of [`deep_merge`](Self::deep_merge).
    pub fn merged(mut self, other: StyleMap) -> Self {
        self.deep_merge(other);
        self
    }

    /// Looks up a dot-separated path such as `shadow.color` or `padding.0`.
    pub fn get_path(&self, path: &str) -> Option<StyleValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.get(first)?.clone();
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Lowers every typed compound in the map to its plain form.
    pub fn to_plain(&self) -> StyleMap {
        self.iter().map(|(k, v)| (k.clone(), v.to_plain())).collect()
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<StyleValue>> Extend<(K, V)> for StyleMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.0.insert(k.into(), v.into());
        }
    }
}

impl IntoIterator for StyleMap {
    type Item = (String, StyleValue);
    type IntoIter = indexmap::map::IntoIter<String, StyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a StyleMap {
    type Item = (&'a String, &'a StyleValue);
    type IntoIter = indexmap::map::Iter<'a, String, StyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// --- typed compounds -------------------------------------------------------

/// Font weight keyword.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Medium,
    Semibold,
    Light,
    /// Any other keyword the toolkit understands, kept verbatim.
    Other(String),
}

impl FontWeight {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "" | "normal" | "regular" | "400" => FontWeight::Normal,
            "bold" | "700" => FontWeight::Bold,
            "medium" | "500" => FontWeight::Medium,
            "semibold" | "600" => FontWeight::Semibold,
            "light" | "300" => FontWeight::Light,
            other => FontWeight::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
            FontWeight::Medium => "medium",
            FontWeight::Semibold => "semibold",
            FontWeight::Light => "light",
            FontWeight::Other(s) => s,
        }
    }
}

impl From<&str> for FontWeight {
    fn from(value: &str) -> Self {
        FontWeight::parse(value)
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A font descriptor: family, point size and weight.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f64,
    pub weight: FontWeight,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: DEFAULT_FONT_SIZE,
            weight: FontWeight::Normal,
        }
    }
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64, weight: impl Into<FontWeight>) -> Self {
        Self {
            family: family.into(),
            size,
            weight: weight.into(),
        }
    }

    /// A font with the given family and the default size and weight.
    pub fn family(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            ..Default::default()
        }
    }

    /// Returns a copy scaled by `factor`, never smaller than one point.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: (self.size * factor).round().max(1.0),
            ..self.clone()
        }
    }

    /// Builds a font from a plain value: a family string, a 1-3 element list, a
    /// `{family, size, weight}` map, or an existing font.
    ///
    /// Missing parts take their defaults. Returns `None` for other shapes or when
    /// the size is not numeric.
    pub fn from_value(value: &StyleValue) -> Option<Font> {
        match value {
            StyleValue::Font(font) => Some(font.clone()),
            StyleValue::Str(family) => Some(Font::family(family.as_str())),
            StyleValue::List(items) if !items.is_empty() => {
                let family = items[0].as_str()?.to_string();
                let size = match items.get(1) {
                    Some(v) => number_like(v)?,
                    None => DEFAULT_FONT_SIZE,
                };
                let weight = match items.get(2) {
                    Some(v) => FontWeight::parse(&v.to_string()),
                    None => FontWeight::Normal,
                };
                Some(Font { family, size, weight })
            }
            StyleValue::Map(map) => Some(Font::from_partial(map, &Font::default())),
            _ => None,
        }
    }

    /// Fills the fields missing from a partial `{family, size, weight}` map from
    /// `base`.
    pub fn from_partial(map: &StyleMap, base: &Font) -> Font {
        Font {
            family: map
                .get("family")
                .and_then(StyleValue::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| base.family.clone()),
            size: map.get("size").and_then(number_like).unwrap_or(base.size),
            weight: map
                .get("weight")
                .map(|w| FontWeight::parse(&w.to_string()))
                .unwrap_or_else(|| base.weight.clone()),
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.family, format_number(self.size), self.weight)
    }
}

impl Serialize for Font {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StyleValue::Font(self.clone()).to_plain().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Font {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = StyleValue::deserialize(deserializer)?;
        Font::from_value(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid font descriptor: {}", value)))
    }
}

/// A horizontal/vertical spacing pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Spacing {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Collapses CSS box order (top, right, bottom, left) to a pair:
    /// horizontal takes `right`, vertical takes `top`.
    pub fn from_box(top: f64, right: f64, _bottom: f64, _left: f64) -> Self {
        Self::new(right, top)
    }
}

/// Default shadow colour when a shadow is enabled without one.
pub const DEFAULT_SHADOW_COLOR: &str = "#888888";

/// A drop shadow descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Shadow {
    pub enabled: bool,
    pub color: String,
    pub offset: (f64, f64),
    pub blur: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: true,
            color: DEFAULT_SHADOW_COLOR.to_string(),
            offset: (2.0, 2.0),
            blur: 4.0,
        }
    }
}

impl Shadow {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Fills the fields missing from a partial shadow map with defaults.
    pub fn from_partial(map: &StyleMap) -> Shadow {
        let defaults = Shadow::default();
        Shadow {
            enabled: map
                .get("enabled")
                .and_then(StyleValue::as_bool)
                .unwrap_or(defaults.enabled),
            color: map
                .get("color")
                .and_then(StyleValue::as_str)
                .map(str::to_string)
                .unwrap_or(defaults.color),
            offset: map
                .get("offset")
                .and_then(number_pair)
                .unwrap_or(defaults.offset),
            blur: map.get("blur").and_then(number_like).unwrap_or(defaults.blur),
        }
    }
}

/// Gradient geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

impl GradientKind {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "linear" => Some(GradientKind::Linear),
            "radial" => Some(GradientKind::Radial),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GradientKind::Linear => "linear",
            GradientKind::Radial => "radial",
        }
    }
}

/// Default gradient direction.
pub const DEFAULT_GRADIENT_DIRECTION: &str = "vertical";

/// A gradient descriptor with at least two colour stops.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    pub colors: Vec<String>,
    pub direction: String,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            colors: vec!["#ffffff".to_string(), "#000000".to_string()],
            direction: DEFAULT_GRADIENT_DIRECTION.to_string(),
        }
    }
}

impl Gradient {
    /// A linear, vertical gradient through `colors`.
    pub fn linear(colors: Vec<String>) -> Self {
        Self {
            colors,
            ..Default::default()
        }
    }

    /// Fills a partial gradient map with defaults.
    ///
    /// Returns `None` when `colors` is present but has fewer than two string stops.
    pub fn from_partial(map: &StyleMap) -> Option<Gradient> {
        let defaults = Gradient::default();
        let colors = match map.get("colors") {
            Some(StyleValue::List(items)) => {
                let colors: Vec<String> = items
                    .iter()
                    .filter_map(|c| c.as_str().map(str::to_string))
                    .collect();
                if colors.len() < 2 {
                    return None;
                }
                colors
            }
            Some(_) => return None,
            None => defaults.colors,
        };
        Some(Gradient {
            kind: map
                .get("type")
                .and_then(StyleValue::as_str)
                .and_then(GradientKind::parse)
                .unwrap_or(defaults.kind),
            colors,
            direction: map
                .get("direction")
                .and_then(StyleValue::as_str)
                .map(str::to_string)
                .unwrap_or(defaults.direction),
        })
    }
}

/// A parsed `border` shorthand. The normalizer decomposes it into primitives.
#[derive(Clone, Debug, PartialEq)]
pub struct Border {
    pub width: f64,
    pub style: String,
    pub color: String,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            width: 1.0,
            style: "solid".to_string(),
            color: "#000000".to_string(),
        }
    }
}

impl Border {
    /// The canonical primitive properties this border expands to.
    pub fn into_primitives(self) -> [(&'static str, StyleValue); 3] {
        [
            ("border_width", StyleValue::Number(self.width)),
            ("border_style", StyleValue::Str(self.style)),
            ("border_color", StyleValue::Str(self.color)),
        ]
    }
}

/// Reads a number, accepting numeric strings.
pub(crate) fn number_like(value: &StyleValue) -> Option<f64> {
    match value {
        StyleValue::Number(n) => Some(*n),
        StyleValue::Str(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Reads an `(x, y)` pair from a two-element list or a spacing value.
pub(crate) fn number_pair(value: &StyleValue) -> Option<(f64, f64)> {
    match value {
        StyleValue::List(items) if items.len() == 2 => {
            Some((number_like(&items[0])?, number_like(&items[1])?))
        }
        StyleValue::Spacing(s) => Some((s.horizontal, s.vertical)),
        StyleValue::Number(n) => Some((*n, *n)),
        _ => None,
    }
}
