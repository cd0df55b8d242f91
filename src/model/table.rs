//! Table cell types.
//!
//! A table's cells are keyed by `(row, col)`. The key is the only way an
//! original cell is matched with its translation, so it must be unique
//! within a cell collection.

use serde::Serialize;

use super::BoundingBox;
use crate::error::{Error, Result};

/// Access to the identity key and text of a cell.
pub trait CellKey {
    /// Row index (0-based)
    fn row(&self) -> usize;
    /// Column index (0-based)
    fn col(&self) -> usize;
    /// Cell text
    fn text(&self) -> &str;
}

/// A table cell as extracted from the source page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    /// Cell text
    pub text: String,
    /// Cell bounding box (union of the glyphs that produced the text)
    pub position: BoundingBox,
    /// Font name of the first matched glyph
    pub font: String,
    /// Font size of the first matched glyph
    pub size: f32,
    /// Row index in the table grid
    pub row: usize,
    /// Column index in the table grid
    pub col: usize,
}

impl CellKey for TableCell {
    fn row(&self) -> usize {
        self.row
    }
    fn col(&self) -> usize {
        self.col
    }
    fn text(&self) -> &str {
        &self.text
    }
}

/// A translated cell: text plus its identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellText {
    /// Translated text
    pub text: String,
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
}

impl CellText {
    /// Create a translated cell.
    pub fn new(text: impl Into<String>, row: usize, col: usize) -> Self {
        Self {
            text: text.into(),
            row,
            col,
        }
    }
}

impl CellKey for CellText {
    fn row(&self) -> usize {
        self.row
    }
    fn col(&self) -> usize {
        self.col
    }
    fn text(&self) -> &str {
        &self.text
    }
}

/// A collection of cells with unique `(row, col)` keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CellSet<C> {
    cells: Vec<C>,
}

impl<C: CellKey> CellSet<C> {
    /// Build a cell set, rejecting duplicate `(row, col)` keys.
    pub fn new(cells: Vec<C>) -> Result<Self> {
        for (i, cell) in cells.iter().enumerate() {
            if cells[..i]
                .iter()
                .any(|c| c.row() == cell.row() && c.col() == cell.col())
            {
                return Err(Error::DuplicateCell {
                    row: cell.row(),
                    col: cell.col(),
                });
            }
        }
        Ok(Self { cells })
    }

    /// Look up a cell by its identity key.
    pub fn get(&self, row: usize, col: usize) -> Option<&C> {
        self.cells.iter().find(|c| c.row() == row && c.col() == col)
    }

    /// Iterate cells in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.cells.iter()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if there are no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of columns, derived as `max(col) + 1`.
    pub fn column_count(&self) -> usize {
        self.cells.iter().map(|c| c.col() + 1).max().unwrap_or(0)
    }

    /// Cells grouped by row in ascending row order, each row sorted by column.
    pub fn rows(&self) -> Vec<(usize, Vec<&C>)> {
        let mut sorted: Vec<&C> = self.cells.iter().collect();
        sorted.sort_by_key(|c| (c.row(), c.col()));

        let mut rows: Vec<(usize, Vec<&C>)> = Vec::new();
        for cell in sorted {
            match rows.last_mut() {
                Some((row, cells)) if *row == cell.row() => cells.push(cell),
                _ => rows.push((cell.row(), vec![cell])),
            }
        }
        rows
    }
}

impl<'a, C> IntoIterator for &'a CellSet<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
