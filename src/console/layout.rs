//! Text layout
//!
//! Prints marked-up text into a console. Text is walked one char at a
//! time with a `(line, column)` cursor: a newline starts a new line, and
//! with a positive width bound the cursor wraps before a char that would
//! land at `column >= width`. Chars that fall outside the console, past the
//! height bound or on a skipped line are not written, but the cursor still
//! moves past them, so the computed line count never depends on what was
//! actually drawn.

use super::{Console, ConsoleError};
use crate::core::Transform;
use crate::markup;

/// Columns added per color tag when centering a line with
/// [`Console::print_ctr_adj`]
pub const TAG_CENTER_COMPENSATION: i32 = 7;

/// Walk `text`, calling `place(index, ch, line, column)` for every char
/// that is not a newline. Returns the number of lines laid out.
fn walk_lines(text: &str, width: i32, mut place: impl FnMut(usize, char, i32, i32)) -> i32 {
    let mut line = 0;
    let mut column = 0;

    for (i, ch) in text.chars().enumerate() {
        if ch == '\n' {
            line += 1;
            column = 0;
            continue;
        }
        if width > 0 && column >= width {
            line += 1;
            column = 0;
        }

        place(i, ch, line, column);
        column += 1;
    }

    line + 1
}

impl Console {
    /// Print text at `(x, y)` without bounds
    pub fn print(
        &self,
        x: i32,
        y: i32,
        text: &str,
        transforms: &[Transform],
    ) -> Result<(), ConsoleError> {
        self.print_bounded_offset(x, y, 0, 0, 0, text, transforms)
            .map(|_| ())
    }

    /// Print text wrapped at `width` columns and cut off after `height`
    /// lines. A bound `<= 0` means unbounded. Returns the number of lines
    /// the text occupies.
    pub fn print_bounded(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        text: &str,
        transforms: &[Transform],
    ) -> Result<i32, ConsoleError> {
        self.print_bounded_offset(x, y, width, height, 0, text, transforms)
    }

    /// Like [`Console::print_bounded`], but the first `skip_lines` lines of
    /// the laid out text are not drawn and the rest moves up to `y`.
    ///
    /// Every written cell gets the caller's transforms, then its char, then
    /// the colors of the markup tags active at its position. Returns the
    /// total line count minus `skip_lines`.
    #[allow(clippy::too_many_arguments)]
    pub fn print_bounded_offset(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        skip_lines: i32,
        text: &str,
        transforms: &[Transform],
    ) -> Result<i32, ConsoleError> {
        let markup = markup::parse(text);
        let node = self.node()?;
        let mut state = node.state.write();
        let mut colors = markup.spans.cursor();

        let lines = walk_lines(&markup.text, width, |i, ch, line, column| {
            let active = colors.advance_to(i);

            if (height > 0 && line >= height) || line < skip_lines {
                return;
            }
            // Targets past i32 range are off-console as well
            let target = x
                .checked_add(column)
                .zip(y.checked_add(line).and_then(|row| row.checked_sub(skip_lines)));
            let Some((cx, cy)) = target else {
                return;
            };
            if cx >= self.width {
                return;
            }

            let cell_transforms: Vec<Transform> = transforms
                .iter()
                .cloned()
                .chain(std::iter::once(Transform::Char(ch)))
                .chain(active.transforms())
                .collect();
            if let Err(err) = state.transform_cell(cx, cy, &cell_transforms) {
                tracing::trace!("skipped {:?} at ({}, {}): {}", ch, cx, cy, err);
            }
        });

        Ok(lines.saturating_sub(skip_lines))
    }

    /// Print text with its first line centered on `x`.
    ///
    /// The line width is measured on the raw text, so each color tag in the
    /// first line adds [`TAG_CENTER_COMPENSATION`] columns back. This is
    /// exact for single-color tags with 6 digit hex colors only.
    pub fn print_ctr_adj(
        &self,
        x: i32,
        y: i32,
        text: &str,
        transforms: &[Transform],
    ) -> Result<(), ConsoleError> {
        let first_line = text.split('\n').next().unwrap_or_default();
        let half = first_line.chars().count() as i32 / 2;
        let tags = markup::count_tags(first_line) as i32;

        let x = x
            .saturating_sub(half)
            .saturating_add(tags.saturating_mul(TAG_CENTER_COMPENSATION));
        self.print_bounded(x, y, 0, 0, text, transforms).map(|_| ())
    }

    /// Number of lines `text` occupies when wrapped at `width` columns.
    ///
    /// Agrees with the value returned by [`Console::print_bounded`] for the
    /// same text and width; the height bound only limits what gets drawn and
    /// never changes the count.
    pub fn calc_text_height(&self, width: i32, _height: i32, text: &str) -> i32 {
        let markup = markup::parse(text);
        walk_lines(&markup.text, width, |_, _, _, _| {})
    }
}
