//! Host collaborator interfaces
//!
//! The console engine does not open windows, rasterize fonts or poll
//! input devices. A host runtime provides those through the traits in
//! this module and drives a root console once per frame via [`Game`].

use crate::console::ConsoleError;
use crate::core::Color;

/// How a character is rendered by the font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphKind {
    /// Pre-colored tile image, drawn without a tint
    Tile,
    /// Glyph image, tinted with the cell's foreground color
    Glyph,
}

/// Font or tileset supplying one image per character
pub trait Font: Send + Sync {
    /// Width of one cell in pixels
    fn tile_width(&self) -> u32;

    /// Height of one cell in pixels
    fn tile_height(&self) -> u32;

    /// How `ch` is drawn, or `None` if the font has no image for it
    fn glyph_kind(&self, ch: char) -> Option<GlyphKind>;
}

/// Per-frame input and timing reported by the host
pub trait Input {
    /// Cursor position in pixels
    fn cursor_position(&self) -> (i32, i32);

    /// Whether the left mouse button went down since the previous tick
    fn left_button_just_pressed(&self) -> bool;

    /// Measured ticks per second
    fn current_tps(&self) -> f64;

    /// Configured tick rate
    fn max_tps(&self) -> f64;

    /// Measured frames per second
    fn current_fps(&self) -> f64;
}

/// Drawing target for one frame, in pixel coordinates
pub trait Surface {
    /// Fill a rectangle with a solid color
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Draw the font's image for `ch`, multiplied by `tint` if given
    fn draw_glyph(&mut self, ch: char, kind: GlyphKind, x: f64, y: f64, tint: Option<Color>);

    /// Print debug text in the top-left corner
    fn debug_text(&mut self, text: &str);
}

/// Callbacks a host run loop invokes every frame
pub trait Game {
    /// Game-logic tick
    fn update(&mut self, input: &dyn Input) -> Result<(), ConsoleError>;

    /// Render tick
    fn draw(&mut self, surface: &mut dyn Surface, input: &dyn Input) -> Result<(), ConsoleError>;

    /// Size of the drawable area in pixels for a given outer window size
    fn layout(&self, outside_width: u32, outside_height: u32) -> (u32, u32);
}

/// Windowing runtime that owns the run loop
pub trait Host {
    fn set_window_size(&mut self, width: u32, height: u32);

    fn set_window_title(&mut self, title: &str);

    /// Call `game` until the loop ends. The first error returned by a
    /// callback stops the loop and is returned.
    fn run(&mut self, game: &mut dyn Game) -> Result<(), ConsoleError>;
}
