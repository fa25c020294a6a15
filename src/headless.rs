//! Headless host
//!
//! Runs a console without a window. Useful for testing and generating
//! deterministic snapshots: [`HeadlessHost`] drives a scripted number of
//! frames, [`RecordingSurface`] records every draw call in order and
//! [`MonospaceFont`] stands in for a real font.

use std::ops::RangeInclusive;

use crate::console::ConsoleError;
use crate::core::Color;
use crate::host::{Font, Game, GlyphKind, Host, Input, Surface};

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Glyph {
        ch: char,
        kind: GlyphKind,
        x: f64,
        y: f64,
        tint: Option<Color>,
    },
    DebugText(String),
}

/// Surface that records draw calls instead of rasterizing them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls in the order they were made
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drawn glyph chars in order
    pub fn glyphs(&self) -> Vec<char> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Glyph { ch, .. } => Some(*ch),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_glyph(&mut self, ch: char, kind: GlyphKind, x: f64, y: f64, tint: Option<Color>) {
        self.ops.push(DrawOp::Glyph { ch, kind, x, y, tint });
    }

    fn debug_text(&mut self, text: &str) {
        self.ops.push(DrawOp::DebugText(text.to_string()));
    }
}

/// Fixed-size font with an image for every visible char.
///
/// Chars in the tile range are drawn as pre-colored tiles, everything else
/// as tinted glyphs. Control chars and whitespace have no image.
#[derive(Debug, Clone)]
pub struct MonospaceFont {
    tile_width: u32,
    tile_height: u32,
    tiles: Option<RangeInclusive<char>>,
}

impl MonospaceFont {
    pub fn new(tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_width,
            tile_height,
            tiles: None,
        }
    }

    /// Draw chars in `range` as untinted tiles
    pub fn with_tiles(mut self, range: RangeInclusive<char>) -> Self {
        self.tiles = Some(range);
        self
    }
}

impl Font for MonospaceFont {
    fn tile_width(&self) -> u32 {
        self.tile_width
    }

    fn tile_height(&self) -> u32 {
        self.tile_height
    }

    fn glyph_kind(&self, ch: char) -> Option<GlyphKind> {
        if ch.is_control() || ch.is_whitespace() {
            return None;
        }
        match &self.tiles {
            Some(range) if range.contains(&ch) => Some(GlyphKind::Tile),
            _ => Some(GlyphKind::Glyph),
        }
    }
}

/// Input state for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    /// Cursor position in pixels
    pub cursor: (i32, i32),
    /// Left button went down this frame
    pub clicked: bool,
    pub tps: f64,
    pub max_tps: f64,
    pub fps: f64,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            cursor: (0, 0),
            clicked: false,
            tps: 60.0,
            max_tps: 60.0,
            fps: 60.0,
        }
    }
}

impl Input for InputState {
    fn cursor_position(&self) -> (i32, i32) {
        self.cursor
    }

    fn left_button_just_pressed(&self) -> bool {
        self.clicked
    }

    fn current_tps(&self) -> f64 {
        self.tps
    }

    fn max_tps(&self) -> f64 {
        self.max_tps
    }

    fn current_fps(&self) -> f64 {
        self.fps
    }
}

/// Host that runs a fixed number of frames without a window.
///
/// Frame `i` uses `script[i]` as input, or the default input once the
/// script runs out. The surface keeps the draw calls of the last frame.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    frames: usize,
    script: Vec<InputState>,
    default_input: InputState,
    window_size: (u32, u32),
    window_title: String,
    frames_run: usize,
    surface: RecordingSurface,
}

impl HeadlessHost {
    pub fn new(frames: usize) -> Self {
        Self {
            frames,
            ..Self::default()
        }
    }

    /// Per-frame input, starting with the first frame
    pub fn with_script(mut self, script: Vec<InputState>) -> Self {
        self.script = script;
        self
    }

    /// Input used for frames past the end of the script
    pub fn with_default_input(mut self, input: InputState) -> Self {
        self.default_input = input;
        self
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    /// Frames completed by the last run
    pub fn frames_run(&self) -> usize {
        self.frames_run
    }

    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }
}

impl Host for HeadlessHost {
    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    fn set_window_title(&mut self, title: &str) {
        self.window_title = title.to_string();
    }

    fn run(&mut self, game: &mut dyn Game) -> Result<(), ConsoleError> {
        self.frames_run = 0;

        for frame in 0..self.frames {
            let input = self.script.get(frame).unwrap_or(&self.default_input);
            game.layout(self.window_size.0, self.window_size.1);

            game.update(input)?;
            self.surface.clear();
            game.draw(&mut self.surface, input)?;

            self.frames_run += 1;
            tracing::trace!("headless frame {} done", frame);
        }

        Ok(())
    }
}
