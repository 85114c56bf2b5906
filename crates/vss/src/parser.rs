//! Parsers for CSS-flavoured shorthand strings.
//!
//! Style maps usually carry structured values (`padding: [4, 8]`), but callers
//! coming from CSS write strings: `"4px 8px"`, `"1 solid #ccc"`,
//! `"2px 2px 4px #888"`, `"rgb(0, 120, 212)"`. These helpers turn such strings into
//! values; the normalizer decides what to do when they do not parse.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{char, digit1, hex_digit1, multispace0, multispace1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, terminated, tuple},
};
use phf::phf_set;

use crate::value::{Border, StyleMap};

static BORDER_STYLES: phf::Set<&'static str> = phf_set! {
    "solid", "dashed", "dotted", "double", "groove", "ridge",
    "inset", "outset", "none", "flat", "raised", "sunken",
};

/// Parse a floating point or integer number.
pub(crate) fn parse_number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// Parse a number with an optional `px`/`pt` suffix.
fn parse_length(input: &str) -> IResult<&str, f64> {
    let (input, value) = parse_number(input)?;
    let (input, _) = opt(alt((tag("px"), tag("pt"))))(input)?;
    Ok((input, value))
}

fn list_separator(input: &str) -> IResult<&str, ()> {
    alt((
        map(tuple((multispace0, char(','), multispace0)), |_| ()),
        map(multispace1, |_| ()),
    ))(input)
}

/// Parses a whitespace- or comma-separated list of lengths, e.g. `"4 8"` or
/// `"4px, 8px"`.
pub fn parse_length_list(input: &str) -> Option<Vec<f64>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(list_separator, parse_length),
        multispace0,
    ))(input)
    .ok()
    .map(|(_, values)| values)
}

/// Parses a single length such as `"12"`, `"1.5"` or `"4px"`.
pub fn parse_single_length(input: &str) -> Option<f64> {
    all_consuming(delimited(multispace0, parse_length, multispace0))(input)
        .ok()
        .map(|(_, value)| value)
}

/// Parses `rgb(r, g, b)` / `rgba(r, g, b, a)` into clamped channels.
/// The alpha component, if present, is ignored.
pub fn parse_rgb_function(input: &str) -> Option<(u8, u8, u8)> {
    let comma = || tuple((multispace0, char(','), multispace0));
    let result: IResult<&str, Vec<f64>> = all_consuming(delimited(
        tuple((
            multispace0,
            alt((tag_no_case("rgba"), tag_no_case("rgb"))),
            multispace0,
            char('('),
            multispace0,
        )),
        separated_list1(comma(), parse_number),
        tuple((multispace0, char(')'), multispace0)),
    ))(input);

    let (_, parts) = result.ok()?;
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    Some((channel(parts[0]), channel(parts[1]), channel(parts[2])))
}

/// Parses `hsl(h, s%, l%)` / `hsla(h, s%, l%, a)` into hue degrees and
/// saturation/lightness fractions. The alpha component, if present, is ignored.
pub fn parse_hsl_function(input: &str) -> Option<(f64, f64, f64)> {
    let comma = || tuple((multispace0, char(','), multispace0));
    let result: IResult<&str, Vec<f64>> = all_consuming(delimited(
        tuple((
            multispace0,
            alt((tag_no_case("hsla"), tag_no_case("hsl"))),
            multispace0,
            char('('),
            multispace0,
        )),
        separated_list1(comma(), terminated(parse_number, opt(char('%')))),
        tuple((multispace0, char(')'), multispace0)),
    ))(input);

    let (_, parts) = result.ok()?;
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let fraction = |v: f64| (v / 100.0).clamp(0.0, 1.0);
    Some((parts[0], fraction(parts[1]), fraction(parts[2])))
}

/// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` into RGBA channels.
pub fn parse_hex_color(input: &str) -> Option<(u8, u8, u8, u8)> {
    let (_, digits) = all_consuming(preceded(char::<&str, nom::error::Error<&str>>('#'), hex_digit1))(input.trim()).ok()?;
    // hex_digit1 only matches ASCII, so byte offsets are char offsets
    let short = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|n| n * 17);
    let long = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match digits.len() {
        3 => Some((short(0)?, short(1)?, short(2)?, 255)),
        4 => Some((short(0)?, short(1)?, short(2)?, short(3)?)),
        6 => Some((long(0)?, long(2)?, long(4)?, 255)),
        8 => Some((long(0)?, long(2)?, long(4)?, long(6)?)),
        _ => None,
    }
}

/// Parses a `border` shorthand (`"1 solid #cccccc"`), tokens in any order.
///
/// Numbers set the width, known style keywords set the style and anything else
/// is taken as the colour. Missing parts keep [`Border::default`] values.
pub fn parse_border(input: &str) -> Option<Border> {
    let mut border = Border::default();
    let mut matched = false;
    for token in input.split_whitespace() {
        matched = true;
        let lower = token.to_lowercase();
        if let Some(width) = parse_single_length(token) {
            border.width = width.max(0.0);
        } else if BORDER_STYLES.contains(lower.as_str()) {
            border.style = lower;
        } else {
            border.color = token.to_string();
        }
    }
    matched.then_some(border)
}

/// Parses a CSS `box-shadow` style string, `"dx dy [blur] [color]"`, into a
/// partial shadow map. `"none"` yields a disabled shadow.
pub fn parse_box_shadow(input: &str) -> Option<StyleMap> {
    let trimmed = input.trim();
    let mut shadow = StyleMap::new();
    if trimmed.eq_ignore_ascii_case("none") {
        shadow.insert("enabled", false);
        return Some(shadow);
    }

    let (rest, lengths) = preceded(
        multispace0,
        separated_list1(multispace1, parse_length),
    )(trimmed)
    .ok()?;

    if lengths.len() < 2 || lengths.len() > 3 {
        return None;
    }
    shadow.insert("enabled", true);
    shadow.insert("offset", (lengths[0], lengths[1]));
    if let Some(blur) = lengths.get(2) {
        shadow.insert("blur", blur.max(0.0));
    }
    let color = rest.trim();
    if !color.is_empty() {
        shadow.insert("color", color);
    }
    Some(shadow)
}
