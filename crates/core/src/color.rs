//! Step color parsing.

use swimlane_protocol::{Color, Paint, ThemeToken};

use crate::model::Step;

/// Parse a CSS-style color: `#rgb`, `#rrggbb`, or one of a few basic names.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let rgb = match s.to_ascii_lowercase().as_str() {
        "white" => (0xff, 0xff, 0xff),
        "black" => (0x00, 0x00, 0x00),
        "red" => (0xff, 0x00, 0x00),
        "green" => (0x00, 0x80, 0x00),
        "blue" => (0x00, 0x00, 0xff),
        "yellow" => (0xff, 0xff, 0x00),
        "orange" => (0xff, 0xa5, 0x00),
        "gray" | "grey" => (0x80, 0x80, 0x80),
        "lightgrey" | "lightgray" => (0xd3, 0xd3, 0xd3),
        "lightyellow" => (0xff, 0xff, 0xe0),
        _ => return None,
    };
    Some(Color::rgb8(rgb.0, rgb.1, rgb.2))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|n| n * 17);
    match hex.len() {
        6 => Some(Color::rgb8(byte(0)?, byte(2)?, byte(4)?)),
        3 => Some(Color::rgb8(nibble(0)?, nibble(1)?, nibble(2)?)),
        _ => None,
    }
}

/// Fill for a step box. Missing or unparseable colors get the neutral fill.
pub fn step_paint(step: &Step) -> Paint {
    match step.color.as_deref().and_then(parse_color) {
        Some(color) => Paint::Custom(color),
        None => Paint::Theme(ThemeToken::StepFill),
    }
}
