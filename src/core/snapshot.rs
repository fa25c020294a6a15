//! Deterministic snapshot generation
//!
//! Snapshots capture a console's cell buffer in a serializable format
//! for testing and debugging. Printing the same text into consoles of
//! the same size must produce identical snapshots.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::color::Color;
use super::grid::Grid;

/// A snapshot of one console buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Buffer dimensions
    pub cols: usize,
    pub rows: usize,
    /// Buffer content (row-major)
    pub grid: Vec<Vec<CellSnapshot>>,
}

/// Snapshot of a single cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Character content, empty for a blank cell
    pub content: String,
    /// Foreground color as hex
    pub fg: String,
    /// Background color as hex, omitted when transparent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        CellSnapshot {
            content: if cell.is_blank() {
                String::new()
            } else {
                cell.ch.to_string()
            },
            fg: cell.fg.to_string(),
            bg: (cell.bg != Color::TRANSPARENT).then(|| cell.bg.to_string()),
        }
    }
}

impl Snapshot {
    /// Create a snapshot from a cell grid
    pub fn from_grid(grid: &Grid) -> Self {
        let rows = (0..grid.rows())
            .map(|row| {
                grid.row(row)
                    .unwrap_or_default()
                    .iter()
                    .map(CellSnapshot::from)
                    .collect()
            })
            .collect();

        Snapshot {
            cols: grid.cols(),
            rows: grid.rows(),
            grid: rows,
        }
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get a simple text representation of the buffer (for debugging)
    pub fn to_text(&self) -> String {
        let mut result = String::new();

        for row in &self.grid {
            for cell in row {
                if cell.content.is_empty() {
                    result.push(' ');
                } else {
                    result.push_str(&cell.content);
                }
            }
            // Trim trailing spaces and add newline
            while result.ends_with(' ') {
                result.pop();
            }
            result.push('\n');
        }

        // Remove trailing empty lines
        while result.ends_with("\n\n") {
            result.pop();
        }

        result
    }

    /// Compare two snapshots for equality
    pub fn content_equals(&self, other: &Snapshot) -> bool {
        self.cols == other.cols && self.rows == other.rows && self.grid == other.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(text: &str, cols: usize, rows: usize) -> Grid {
        let mut grid = Grid::new(cols, rows);
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = grid.cell_mut(i % cols, i / cols) {
                cell.ch = ch;
            }
        }
        grid
    }

    #[test]
    fn test_snapshot_from_grid() {
        let snapshot = Snapshot::from_grid(&grid_with("Hi", 10, 3));

        assert_eq!(snapshot.cols, 10);
        assert_eq!(snapshot.rows, 3);
        assert_eq!(snapshot.grid[0][0].content, "H");
        assert_eq!(snapshot.grid[0][1].content, "i");
        assert_eq!(snapshot.grid[0][2].content, "");
        assert_eq!(snapshot.grid[0][0].fg, "#ffffff");
        assert_eq!(snapshot.grid[0][0].bg, None);
    }

    #[test]
    fn test_snapshot_to_text() {
        let snapshot = Snapshot::from_grid(&grid_with("AB  C", 4, 3));
        assert_eq!(snapshot.to_text(), "AB\nC\n");
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut grid = grid_with("XY", 5, 2);
        if let Some(cell) = grid.cell_mut(1, 0) {
            cell.bg = Color::rgb(255, 0, 0);
        }

        let snapshot = Snapshot::from_grid(&grid);
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"bg\": \"#ff0000\""));

        let restored = Snapshot::from_json(&json).unwrap();
        assert!(snapshot.content_equals(&restored));
    }
}
