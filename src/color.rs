//! Brick and effect colors
//!
//! Colors travel as `#rrggbb` strings (pixel grids, palettes) and are kept
//! as plain 8-bit channels inside the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// An opaque sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    /// Indestructible frame around uploaded layouts
    pub const BORDER: Rgb = Rgb::new(0x40, 0x40, 0x40);
    /// Sparks off indestructible bricks
    pub const GOLD: Rgb = Rgb::new(0xff, 0xd7, 0x00);
    /// Multiplier pickups and their collect burst
    pub const PICKUP: Rgb = Rgb::new(0x00, 0xff, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(GameError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| GameError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Move each channel `amount` (0-1) of the way toward white
    pub fn lighten(self, amount: f32) -> Self {
        let up = |c: u8| (c as f32 + (255.0 - c as f32) * amount).floor().clamp(0.0, 255.0) as u8;
        Self::new(up(self.r), up(self.g), up(self.b))
    }

    /// Scale each channel down by `amount` (0-1)
    pub fn darken(self, amount: f32) -> Self {
        let down = |c: u8| (c as f32 * (1.0 - amount)).floor().clamp(0.0, 255.0) as u8;
        Self::new(down(self.r), down(self.g), down(self.b))
    }

    /// Normalized RGBA for vertex colors
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha.clamp(0.0, 1.0),
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}
