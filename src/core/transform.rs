//! Cell transforms
//!
//! A transform maps one cell to a new cell or fails. Consoles apply
//! transforms in the order they are given, so later transforms see the
//! result of earlier ones.

use std::fmt;
use std::sync::Arc;

use super::cell::Cell;
use super::color::Color;

/// Error raised by a custom transform
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransformError(pub String);

impl TransformError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

type TransformFn = dyn Fn(Cell) -> Result<Cell, TransformError> + Send + Sync;

/// A single mutation applied to a cell
#[derive(Clone)]
pub enum Transform {
    /// Set the character
    Char(char),
    /// Set the foreground color
    Foreground(Color),
    /// Set the background color
    Background(Color),
    /// Replace the whole cell
    Cell(Cell),
    /// Reset to the empty cell
    Clear,
    /// User supplied transform
    Custom(Arc<TransformFn>),
}

impl Transform {
    /// Wrap a closure as a transform
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Cell) -> Result<Cell, TransformError> + Send + Sync + 'static,
    {
        Transform::Custom(Arc::new(f))
    }

    pub fn apply(&self, cell: Cell) -> Result<Cell, TransformError> {
        match self {
            Transform::Char(ch) => Ok(Cell { ch: *ch, ..cell }),
            Transform::Foreground(fg) => Ok(Cell { fg: *fg, ..cell }),
            Transform::Background(bg) => Ok(Cell { bg: *bg, ..cell }),
            Transform::Cell(replacement) => Ok(*replacement),
            Transform::Clear => Ok(Cell::EMPTY),
            Transform::Custom(f) => f(cell),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Char(ch) => f.debug_tuple("Char").field(ch).finish(),
            Transform::Foreground(c) => f.debug_tuple("Foreground").field(c).finish(),
            Transform::Background(c) => f.debug_tuple("Background").field(c).finish(),
            Transform::Cell(cell) => f.debug_tuple("Cell").field(cell).finish(),
            Transform::Clear => f.write_str("Clear"),
            Transform::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Apply every transform in order, stopping at the first failure
pub fn apply_all(transforms: &[Transform], cell: Cell) -> Result<Cell, TransformError> {
    transforms.iter().try_fold(cell, |cell, t| t.apply(cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_transforms() {
        let red = Color::rgb(255, 0, 0);
        let cell = apply_all(
            &[
                Transform::Char('@'),
                Transform::Foreground(red),
                Transform::Background(Color::BLACK),
            ],
            Cell::EMPTY,
        )
        .unwrap();
        assert_eq!(cell, Cell::with_colors('@', red, Color::BLACK));
    }

    #[test]
    fn test_order_matters() {
        let cell = apply_all(&[Transform::Char('a'), Transform::Clear], Cell::EMPTY).unwrap();
        assert!(cell.is_empty());

        let cell = apply_all(&[Transform::Clear, Transform::Char('a')], Cell::EMPTY).unwrap();
        assert_eq!(cell.ch, 'a');
    }

    #[test]
    fn test_cell_replacement() {
        let replacement = Cell::with_colors('#', Color::BLACK, Color::WHITE);
        let cell = Transform::Cell(replacement).apply(Cell::new('x')).unwrap();
        assert_eq!(cell, replacement);
    }

    #[test]
    fn test_custom_transform() {
        let invert = Transform::custom(|cell| {
            Ok(Cell {
                fg: cell.bg,
                bg: cell.fg,
                ..cell
            })
        });
        let cell = invert.apply(Cell::EMPTY).unwrap();
        assert_eq!(cell.fg, Color::TRANSPARENT);
        assert_eq!(cell.bg, Color::WHITE);
    }

    #[test]
    fn test_failing_transform_stops_chain() {
        let fail = Transform::custom(|_| Err(TransformError::new("nope")));
        let result = apply_all(&[Transform::Char('a'), fail, Transform::Char('b')], Cell::EMPTY);
        assert_eq!(result, Err(TransformError::new("nope")));
    }

    #[test]
    fn test_debug_output() {
        assert_eq!(format!("{:?}", Transform::Clear), "Clear");
        assert_eq!(format!("{:?}", Transform::custom(Ok)), "Custom(..)");
    }
}
