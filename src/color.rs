// color.rs - RGBA colors parsed from CSS hex notation
//
// Configuration carries colors as "#rrggbb" strings. Layers frequently
// derive a translucent variant by appending a two-digit alpha, so that
// operation is a first-class method here instead of string concatenation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same hue with the alpha channel replaced (`"#00e8c8" + "cc"`).
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Alpha as a fraction in [0, 1].
    pub fn alpha(self) -> f32 {
        self.a as f32 / 255.0
    }

    /// CSS notation understood by canvas `fillStyle`/`strokeStyle`.
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Rgba {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Color { value: s.to_string() };
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Rgba::TRANSPARENT);
        }
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };
        match hex.len() {
            3 => Ok(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Ok(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> String {
        c.to_css()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Parse a color literal known to be valid at compile time.
///
/// Used by the built-in default table; an invalid literal is a programming
/// error caught by the config tests, so it degrades to transparent instead of
/// panicking at runtime.
pub(crate) fn hex(s: &str) -> Rgba {
    s.parse().unwrap_or(Rgba::TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_and_eight_digit_hex() {
        assert_eq!("#00e8c8".parse::<Rgba>().unwrap(), Rgba::rgb(0, 0xe8, 0xc8));
        assert_eq!(
            "#7c3aed44".parse::<Rgba>().unwrap(),
            Rgba::new(0x7c, 0x3a, 0xed, 0x44)
        );
    }

    #[test]
    fn parses_short_hex_and_transparent() {
        assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::WHITE);
        assert_eq!("transparent".parse::<Rgba>().unwrap(), Rgba::TRANSPARENT);
    }

    #[test]
    fn rejects_garbage() {
        assert!("00e8c8".parse::<Rgba>().is_err());
        assert!("#00e8c".parse::<Rgba>().is_err());
        assert!("#zzzzzz".parse::<Rgba>().is_err());
        assert!("#ééé".parse::<Rgba>().is_err());
    }

    #[test]
    fn alpha_suffix_matches_css_concatenation() {
        let c = hex("#00e8c8").with_alpha(0xcc);
        assert_eq!(c.to_css(), "#00e8c8cc");
        assert_eq!(hex("#48cae4").to_css(), "#48cae4");
    }

    #[test]
    fn serde_round_trips_through_hex_strings() {
        let c: Rgba = serde_json::from_str("\"#0096c7\"").unwrap();
        assert_eq!(c, Rgba::rgb(0x00, 0x96, 0xc7));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#0096c7\"");
        assert!(serde_json::from_str::<Rgba>("42").is_err());
    }
}
