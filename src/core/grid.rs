//! Console Grid
//!
//! A 2D grid of cells backing a console. Cells are stored row-major.

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// The console grid - a 2D array of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// The cells, row after row
    cells: Vec<Cell>,
    /// Number of columns
    cols: usize,
    /// Number of rows
    rows: usize,
}

impl Grid {
    /// Create a grid filled with empty cells
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cells: vec![Cell::EMPTY; cols * rows],
            cols,
            rows,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Check whether a signed position lies inside the grid, returning
    /// the unsigned position if it does
    pub fn checked_position(&self, col: i32, row: i32) -> Option<(usize, usize)> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    /// Get a reference to a cell
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Get a mutable reference to a cell
    pub fn cell_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        if col >= self.cols {
            return None;
        }
        self.cells.get_mut(row * self.cols + col)
    }

    /// Get a row of cells
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    /// Iterate over every cell together with its position
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i % cols, i / cols, cell))
    }

    /// Reset every cell to the empty cell
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_new() {
        let grid = Grid::new(80, 24);
        assert_eq!(grid.cols(), 80);
        assert_eq!(grid.rows(), 24);
        assert!(grid.iter().all(|(_, _, c)| c.is_empty()));
    }

    #[test]
    fn test_grid_cell_access() {
        let mut grid = Grid::new(10, 5);
        if let Some(cell) = grid.cell_mut(3, 2) {
            cell.ch = 'Z';
        }
        assert_eq!(grid.cell(3, 2).map(|c| c.ch), Some('Z'));
        assert_eq!(grid.row(2).map(|r| r[3].ch), Some('Z'));
        assert!(grid.cell(10, 0).is_none());
        assert!(grid.cell(0, 5).is_none());
        assert!(grid.row(5).is_none());
    }

    #[test]
    fn test_grid_checked_position() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.checked_position(0, 0), Some((0, 0)));
        assert_eq!(grid.checked_position(3, 2), Some((3, 2)));
        assert_eq!(grid.checked_position(-1, 0), None);
        assert_eq!(grid.checked_position(4, 0), None);
        assert_eq!(grid.checked_position(0, 3), None);
    }

    #[test]
    fn test_grid_iter_positions() {
        let grid = Grid::new(3, 2);
        let positions: Vec<_> = grid.iter().map(|(c, r, _)| (c, r)).collect();
        assert_eq!(positions[0], (0, 0));
        assert_eq!(positions[2], (2, 0));
        assert_eq!(positions[3], (0, 1));
        assert_eq!(positions.len(), 6);
    }

    #[test]
    fn test_grid_clear() {
        let mut grid = Grid::new(2, 2);
        if let Some(cell) = grid.cell_mut(1, 1) {
            cell.ch = 'x';
        }
        grid.clear();
        assert!(grid.iter().all(|(_, _, c)| c.is_empty()));
    }
}
