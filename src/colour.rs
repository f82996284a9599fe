use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A colour, expressed in RGB or CMYK colour spaces
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

#[derive(Error, Debug, PartialEq)]
#[error("`{0}` is not a colour in #RRGGBB form")]
pub struct ParseColourError(String);

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Parse a hex colour of the form `#RRGGBB` (the leading `#` is optional),
    /// as used in branding configuration
    pub fn from_hex(hex: &str) -> Result<Colour, ParseColourError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ParseColourError(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ParseColourError(hex.to_string()))
        };
        Ok(Colour::new_rgb_bytes(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format the colour as `#RRGGBB`, converting from CMYK or grey if needed
    pub fn to_hex(&self) -> String {
        let (r, g, b) = match *self {
            Colour::RGB { r, g, b } => (r, g, b),
            Colour::CMYK { c, m, y, k } => ((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k)),
            Colour::Grey { g } => (g, g, g),
        };
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", byte(r), byte(g), byte(b))
    }
}

impl TryFrom<String> for Colour {
    type Error = ParseColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::from_hex(&value)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_hex()
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour::RGB {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    pub const LIGHT_GREY: Colour = Colour::Grey { g: 0.93 };
    pub const MID_GREY: Colour = Colour::Grey { g: 0.6 };
    pub const DARK_GREY: Colour = Colour::Grey { g: 0.25 };
    /// Default header band colour for tables
    pub const SLATE: Colour = Colour::RGB {
        r: 0.17,
        g: 0.24,
        b: 0.31,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Colour::from_hex("#FF0000"), Ok(Colour::new_rgb(1.0, 0.0, 0.0)));
        assert_eq!(Colour::from_hex("00ff00"), Ok(Colour::new_rgb(0.0, 1.0, 0.0)));
        assert!(Colour::from_hex("#F00").is_err());
        assert!(Colour::from_hex("#GG0000").is_err());
    }

    #[test]
    fn hex_formatting_converts_colour_spaces() {
        assert_eq!(colours::WHITE.to_hex(), "#FFFFFF");
        assert_eq!(Colour::new_rgb_bytes(18, 52, 86).to_hex(), "#123456");
        assert_eq!(Colour::CMYK { c: 0.0, m: 0.0, y: 0.0, k: 1.0 }.to_hex(), "#000000");
    }
}
