use std::{convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[inline]
fn blend_u8(a: u8, b: u8, r: f32) -> u32 {
    let af = a as f32;
    let bf = b as f32;
    (af + ((bf - af) * r)) as u32
}

/// A non-premultiplied ARGB8888 colour. Configuration files spell it as
/// `rrggbb` or `rrggbbaa`, optionally with a leading `#`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF000000);
    pub const WHITE: Color = Color(0xFFFFFFFF);
    pub const GREY: Color = Color(0xFF646464);
    pub const SLATE: Color = Color(0xFF282A36);
    pub const STEEL: Color = Color(0xFF6272A4);
    pub const DUSK: Color = Color(0xFF44475A);
    pub const MINT: Color = Color(0x4064FF64);

    pub fn new(red: u8, green: u8, blue: u8, opacity: u8) -> Color {
        Color((opacity as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | (blue as u32))
    }

    pub fn opacity(self) -> u8 {
        ((self.0 >> 24) & 0xFF) as u8
    }
    fn red(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }
    fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }
    fn blue(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub fn blend(self, other: Color, ratio: f32) -> Color {
        Color(
            blend_u8(self.opacity(), other.opacity(), ratio) << 24
                | blend_u8(self.red(), other.red(), ratio) << 16
                | blend_u8(self.green(), other.green(), ratio) << 8
                | blend_u8(self.blue(), other.blue(), ratio),
        )
    }

    /// Paints `self` over an opaque background using its own opacity.
    pub fn over(self, background: Color) -> Color {
        let alpha = self.opacity() as f32 / 255.0;
        let mixed = background.blend(self, alpha);
        Color(mixed.0 | 0xFF000000)
    }

    pub fn parse(s: &str) -> Result<Color, Error> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || Error::InvalidColor(s.to_string());
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Ok(if hex.len() == 6 {
            Color(0xFF000000 | value)
        } else {
            Color(value >> 8 | (value & 0xFF) << 24)
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.red(), self.green(), self.blue())?;
        if self.opacity() != 0xFF {
            write!(f, "{:02x}", self.opacity())?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Color, Error> {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_string()
    }
}
