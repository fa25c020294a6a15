//! Console Core Module
//!
//! Host-independent building blocks of a console. This module contains:
//! - Colors with hex parsing
//! - Cells and the 2D cell grid
//! - Cell transforms
//! - Deterministic snapshot generation

mod cell;
mod color;
mod grid;
mod snapshot;
mod transform;

pub use cell::Cell;
pub use color::{Color, ColorError};
pub use grid::Grid;
pub use snapshot::{CellSnapshot, Snapshot};
pub use transform::{apply_all, Transform, TransformError};
