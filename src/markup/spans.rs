//! Color spans produced by markup parsing
//!
//! A span marks the position in the cleaned text from which a foreground
//! and/or background color applies. Foreground and background are tracked
//! independently: a foreground-only span leaves the active background
//! untouched and vice versa.

use serde::{Deserialize, Serialize};

use crate::core::{Color, Transform};

/// Colors set by one markup tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpan {
    /// Char index into the cleaned text
    pub start: usize,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

/// The colors active at one position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveColors {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl ActiveColors {
    /// Transforms that apply the active colors, foreground first
    pub fn transforms(&self) -> impl Iterator<Item = Transform> {
        self.fg
            .map(Transform::Foreground)
            .into_iter()
            .chain(self.bg.map(Transform::Background))
    }

    fn apply(&mut self, span: &ColorSpan) {
        if span.fg.is_some() {
            self.fg = span.fg;
        }
        if span.bg.is_some() {
            self.bg = span.bg;
        }
    }
}

/// Ordered set of color spans, ascending by start position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpans {
    spans: Vec<ColorSpan>,
}

impl ColorSpans {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a span. Spans must be pushed in text order.
    pub(crate) fn push(&mut self, span: ColorSpan) {
        debug_assert!(self.spans.last().map_or(true, |last| last.start <= span.start));
        self.spans.push(span);
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorSpan> {
        self.spans.iter()
    }

    /// Colors active at a cleaned-text position
    pub fn active_at(&self, pos: usize) -> ActiveColors {
        let mut active = ActiveColors::default();
        for span in self.spans.iter().take_while(|span| span.start <= pos) {
            active.apply(span);
        }
        active
    }

    /// Cursor for walking positions in ascending order
    pub fn cursor(&self) -> SpanCursor<'_> {
        SpanCursor {
            spans: &self.spans,
            next: 0,
            active: ActiveColors::default(),
        }
    }
}

/// Walks a [`ColorSpans`] forward without rescanning earlier spans
#[derive(Debug, Clone)]
pub struct SpanCursor<'a> {
    spans: &'a [ColorSpan],
    next: usize,
    active: ActiveColors,
}

impl SpanCursor<'_> {
    /// Colors active at `pos`. Positions must not decrease between calls.
    pub fn advance_to(&mut self, pos: usize) -> ActiveColors {
        while let Some(span) = self.spans.get(self.next) {
            if span.start > pos {
                break;
            }
            self.active.apply(span);
            self.next += 1;
        }
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn spans(list: &[ColorSpan]) -> ColorSpans {
        let mut spans = ColorSpans::new();
        for span in list {
            spans.push(*span);
        }
        spans
    }

    #[test]
    fn test_channels_are_independent() {
        let spans = spans(&[
            ColorSpan { start: 0, fg: Some(RED), bg: None },
            ColorSpan { start: 2, fg: None, bg: Some(GREEN) },
            ColorSpan { start: 4, fg: Some(BLUE), bg: None },
        ]);

        assert_eq!(spans.active_at(1), ActiveColors { fg: Some(RED), bg: None });
        assert_eq!(spans.active_at(3), ActiveColors { fg: Some(RED), bg: Some(GREEN) });
        assert_eq!(spans.active_at(9), ActiveColors { fg: Some(BLUE), bg: Some(GREEN) });
    }

    #[test]
    fn test_nothing_active_before_first_span() {
        let spans = spans(&[ColorSpan { start: 3, fg: Some(RED), bg: None }]);
        assert_eq!(spans.active_at(2), ActiveColors::default());
        assert_eq!(spans.active_at(3).fg, Some(RED));
    }

    #[test]
    fn test_cursor_matches_active_at() {
        let spans = spans(&[
            ColorSpan { start: 1, fg: Some(RED), bg: Some(BLUE) },
            ColorSpan { start: 1, fg: Some(GREEN), bg: None },
            ColorSpan { start: 5, fg: None, bg: Some(RED) },
        ]);
        let mut cursor = spans.cursor();
        for pos in 0..8 {
            assert_eq!(cursor.advance_to(pos), spans.active_at(pos), "pos {}", pos);
        }
    }

    #[test]
    fn test_transforms_order() {
        let active = ActiveColors { fg: Some(RED), bg: Some(GREEN) };
        let transforms: Vec<_> = active.transforms().collect();
        assert_eq!(transforms.len(), 2);
        assert!(matches!(transforms[0], Transform::Foreground(c) if c == RED));
        assert!(matches!(transforms[1], Transform::Background(c) if c == GREEN));
        assert_eq!(ActiveColors::default().transforms().count(), 0);
    }
}
