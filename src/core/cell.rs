//! Console Cell
//!
//! Represents a single cell in the console grid, containing a character
//! and its foreground and background colors.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// A single cell in the console grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// The character in this cell. `'\0'` means nothing is drawn.
    pub ch: char,
    /// Foreground color, used to tint glyphs
    pub fg: Color,
    /// Background color, filled behind the glyph unless fully transparent
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// The empty cell: no character, white foreground, transparent background
    pub const EMPTY: Cell = Cell {
        ch: '\0',
        fg: Color::WHITE,
        bg: Color::TRANSPARENT,
    };

    /// Create a new cell with a single character and default colors
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            ..Self::EMPTY
        }
    }

    /// Create a new cell with character and colors
    pub fn with_colors(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }

    /// Check if this cell has no character
    pub fn is_blank(&self) -> bool {
        self.ch == '\0'
    }

    /// Check if this cell equals the empty cell
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Reset the cell to the empty cell
    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }
}
