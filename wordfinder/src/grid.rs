use crate::errors::{SearchError, SearchResult};

/// Largest number of rows or columns a grid may have.
pub const MAX_DIMENSION: usize = 64;

/// A rectangular, immutable character grid.
///
/// Rows are stored row-major; columns are materialized on demand with
/// [`Grid::column`]. Widths are measured in `char`s, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<char>>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Builds a grid from text rows, validating its shape.
    ///
    /// Fails with [`SearchError::InvalidInput`] when there are no rows, the
    /// rows are empty or of unequal length, or either dimension exceeds
    /// [`MAX_DIMENSION`].
    pub fn new<I, S>(rows: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells: Vec<Vec<char>> = rows
            .into_iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();

        if cells.is_empty() {
            return Err(SearchError::invalid_input("Grid cannot be empty."));
        }

        let rows = cells.len();
        let cols = cells[0].len();

        if cols == 0 {
            return Err(SearchError::invalid_input("Grid rows cannot be empty."));
        }

        if rows > MAX_DIMENSION || cols > MAX_DIMENSION {
            return Err(SearchError::invalid_input(format!(
                "Grid dimensions cannot exceed {MAX_DIMENSION}x{MAX_DIMENSION} (got {rows}x{cols})."
            )));
        }

        if let Some(index) = cells.iter().position(|row| row.len() != cols) {
            return Err(SearchError::invalid_input(format!(
                "All rows in the grid must have the same number of characters \
                 (row {index} has {}, expected {cols}).",
                cells[index].len()
            )));
        }

        Ok(Self { cells, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns row `index` as a slice.
    pub fn row(&self, index: usize) -> &[char] {
        &self.cells[index]
    }

    /// Reads column `index` top to bottom into a new buffer.
    pub fn column(&self, index: usize) -> Vec<char> {
        self.cells.iter().map(|row| row[index]).collect()
    }

    /// Returns the character at (`row`, `col`).
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }
}
