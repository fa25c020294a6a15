//! Console color representation
//!
//! An immutable RGBA value. Channel setters return a new color, and hex
//! strings in `#RGB` or `#RRGGBB` form can be parsed into fully opaque
//! colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A RGBA color used for cell foregrounds and backgrounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Error returned when a hex color string can't be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    #[error("hex color must start with '#'")]
    MissingHash,
    #[error("hex color must have 3 or 6 digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create an opaque color from R,G,B values
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from R,G,B,A values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `#RGB` or `#RRGGBB` hex string into an opaque color.
    ///
    /// In the short form every digit is duplicated, so `#f80` equals
    /// `#ff8800`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = match hex.strip_prefix('#') {
            Some(digits) => digits,
            None if hex.is_empty() => return Err(ColorError::Empty),
            None => return Err(ColorError::MissingHash),
        };

        let mut values = [0u8; 6];
        let mut len = 0;
        for c in digits.chars() {
            let value = c.to_digit(16).ok_or(ColorError::InvalidDigit(c))?;
            if len < values.len() {
                values[len] = value as u8;
            }
            len += 1;
        }

        match len {
            3 => Ok(Self::rgb(values[0] * 17, values[1] * 17, values[2] * 17)),
            6 => Ok(Self::rgb(
                values[0] << 4 | values[1],
                values[2] << 4 | values[3],
                values[4] << 4 | values[5],
            )),
            n => Err(ColorError::InvalidLength(n)),
        }
    }

    /// Parse a hex color, falling back to [`Color::TRANSPARENT`] instead of
    /// returning an error
    pub fn from_hex_or_transparent(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or_else(|err| {
            tracing::trace!("color {:?} fell back to transparent: {}", hex, err);
            Self::TRANSPARENT
        })
    }

    pub const fn with_r(self, r: u8) -> Self {
        Self { r, ..self }
    }

    pub const fn with_g(self, g: u8) -> Self {
        Self { g, ..self }
    }

    pub const fn with_b(self, b: u8) -> Self {
        Self { b, ..self }
    }

    pub const fn with_a(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Whether this color is fully transparent (alpha 0)
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Channels expanded to 16 bits each (`0xab` becomes `0xabab`)
    pub fn to_rgba16(&self) -> (u32, u32, u32, u32) {
        let expand = |v: u8| {
            let v = u32::from(v);
            v | v << 8
        };
        (expand(self.r), expand(self.g), expand(self.b), expand(self.a))
    }

    /// Channels as floats in the range 0.0 - 1.0
    pub fn to_floats(&self) -> (f64, f64, f64, f64) {
        let scale = |v: u8| f64::from(v) / 255.0;
        (scale(self.r), scale(self.g), scale(self.b), scale(self.a))
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}
