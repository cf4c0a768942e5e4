//! Color parsing and normalization.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Black, the fallback for unresolvable text colors.
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// White.
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

    /// Parse a hex color, with or without a leading `#`.
    pub fn from_hex(value: &str) -> Result<Self> {
        let hex = normalize_hex(value)?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidColor(value.into()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Uppercase 6-digit hex form used in markup (`FF0000`).
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rgb::from_hex(s)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb(r, g, b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A fill color as supplied by a caller: hex text or an RGB triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorInput {
    /// Hex string such as `"#ff0000"` or `"4472C4"`
    Hex(String),
    /// Explicit channels
    Rgb(u8, u8, u8),
}

impl ColorInput {
    /// Resolve to normalized hex, rejecting malformed text.
    pub fn to_hex(&self) -> Result<String> {
        match self {
            ColorInput::Hex(s) => normalize_hex(s),
            ColorInput::Rgb(r, g, b) => Ok(Rgb(*r, *g, *b).to_hex()),
        }
    }
}

impl fmt::Display for ColorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorInput::Hex(s) => f.write_str(s),
            ColorInput::Rgb(r, g, b) => write!(f, "rgb({}, {}, {})", r, g, b),
        }
    }
}

impl From<&str> for ColorInput {
    fn from(s: &str) -> Self {
        ColorInput::Hex(s.to_string())
    }
}

impl From<String> for ColorInput {
    fn from(s: String) -> Self {
        ColorInput::Hex(s)
    }
}

impl From<Rgb> for ColorInput {
    fn from(c: Rgb) -> Self {
        ColorInput::Rgb(c.0, c.1, c.2)
    }
}

fn hex_regex() -> &'static Regex {
    static HEX: OnceLock<Regex> = OnceLock::new();
    HEX.get_or_init(|| Regex::new(r"^[0-9A-F]{6}$").expect("valid hex pattern"))
}

/// Normalize a hex color: strip one leading `#`, uppercase, and require
/// exactly six hex digits.
///
/// Idempotent on its own output.
pub fn normalize_hex(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed).to_ascii_uppercase();
    if hex_regex().is_match(&hex) {
        Ok(hex)
    } else {
        Err(Error::InvalidColor(value.to_string()))
    }
}

/// Look up one of the symbolic text colors (case-insensitive).
pub fn named_color(name: &str) -> Option<Rgb> {
    let rgb = match name.trim().to_ascii_lowercase().as_str() {
        "red" => Rgb(255, 0, 0),
        "blue" => Rgb(0, 0, 255),
        "green" => Rgb(0, 128, 0),
        "yellow" => Rgb(255, 255, 0),
        "black" => Rgb(0, 0, 0),
        "gray" => Rgb(128, 128, 128),
        "white" => Rgb(255, 255, 255),
        "purple" => Rgb(128, 0, 128),
        "orange" => Rgb(255, 165, 0),
        _ => return None,
    };
    Some(rgb)
}

/// Resolve a text color: symbolic name first, then hex.
///
/// Total over its input. Anything unresolvable becomes [`Rgb::BLACK`].
pub fn resolve_text_color(value: &str) -> Rgb {
    if let Some(rgb) = named_color(value) {
        return rgb;
    }
    Rgb::from_hex(value).unwrap_or_else(|_| {
        log::warn!("Unrecognized color '{}', using black", value);
        Rgb::BLACK
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("#ff00aa").unwrap(), "FF00AA");
        assert_eq!(normalize_hex("4472c4").unwrap(), "4472C4");
        assert!(normalize_hex("FFF").is_err());
        assert!(normalize_hex("GGGGGG").is_err());
        assert!(normalize_hex("##FFFFFF").is_err());
        assert!(normalize_hex("").is_err());
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in ["a1b2c3", "#FFFFFF", "f2f2f2", "000000", "#4472c4"] {
            let once = normalize_hex(input).unwrap();
            let twice = normalize_hex(&once).unwrap();
            assert_eq!(once, twice);
            assert_eq!(once, once.to_uppercase());
        }
    }

    #[test]
    fn test_rgb_hex() {
        let rgb = Rgb::from_hex("#4472C4").unwrap();
        assert_eq!(rgb, Rgb(0x44, 0x72, 0xC4));
        assert_eq!(rgb.to_hex(), "4472C4");
        assert!(matches!(Rgb::from_hex("blue"), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn test_color_input() {
        assert_eq!(ColorInput::from("#abcdef").to_hex().unwrap(), "ABCDEF");
        assert_eq!(ColorInput::from(Rgb(1, 2, 255)).to_hex().unwrap(), "0102FF");
        assert!(ColorInput::from("nope").to_hex().is_err());
    }

    #[test]
    fn test_color_input_serde() {
        let hex: ColorInput = serde_json::from_str("\"FF0000\"").unwrap();
        assert_eq!(hex, ColorInput::Hex("FF0000".into()));

        let rgb: ColorInput = serde_json::from_str("[255, 0, 0]").unwrap();
        assert_eq!(rgb, ColorInput::Rgb(255, 0, 0));
    }

    #[test]
    fn test_resolve_text_color() {
        assert_eq!(resolve_text_color("Red"), Rgb(255, 0, 0));
        assert_eq!(resolve_text_color("orange"), Rgb(255, 165, 0));
        assert_eq!(resolve_text_color("00FF00"), Rgb(0, 255, 0));
        assert_eq!(resolve_text_color("chartreuse-ish"), Rgb::BLACK);
    }
}
