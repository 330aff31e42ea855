//! Grid module - the rectangular cell store
//!
//! The grid is a flat, row-major array sized for the largest supported board
//! ([`MAX_CELLS`]); only the first `rows * columns` entries are live. Index
//! `row * columns + column`, row 0 at the top. The grid never changes size
//! after construction.

use crate::types::{Cell, MAX_BOARD_DIM, MAX_CELLS, MAX_COLORS, MIN_BOARD_DIM};

/// Rectangular board of cells using flat array storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: u8,
    columns: u8,
    cells: [Cell; MAX_CELLS],
}

impl Grid {
    /// Create an empty grid. Dimensions are clamped into `2..=10`.
    pub fn new(rows: u8, columns: u8) -> Self {
        Self {
            rows: rows.clamp(MIN_BOARD_DIM, MAX_BOARD_DIM),
            columns: columns.clamp(MIN_BOARD_DIM, MAX_BOARD_DIM),
            cells: [Cell::EMPTY; MAX_CELLS],
        }
    }

    /// Build a grid from row-major colors (`None` = empty).
    ///
    /// Single-row and single-column boards are accepted here so components can
    /// be exercised in isolation. Returns `None` if `colors.len() != rows * columns`,
    /// a dimension is outside `1..=10`, or a color is not below `MAX_COLORS`.
    pub fn from_colors(rows: u8, columns: u8, colors: &[Option<u8>]) -> Option<Self> {
        if !(1..=MAX_BOARD_DIM).contains(&rows) || !(1..=MAX_BOARD_DIM).contains(&columns) {
            return None;
        }
        if colors.len() != (rows as usize) * (columns as usize) {
            return None;
        }
        if colors.iter().flatten().any(|&c| c >= MAX_COLORS) {
            return None;
        }
        let mut grid = Self {
            rows,
            columns,
            cells: [Cell::EMPTY; MAX_CELLS],
        };
        for (cell, color) in grid.cells.iter_mut().zip(colors) {
            *cell = match color {
                Some(c) => Cell::new(*c),
                None => Cell::EMPTY,
            };
        }
        Some(grid)
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    #[inline(always)]
    pub fn columns(&self) -> usize {
        self.columns as usize
    }

    /// Number of live cells (`rows * columns`).
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rows() * self.columns()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index for `(row, column)`, `None` when out of bounds.
    #[inline(always)]
    pub fn index(&self, row: usize, column: usize) -> Option<usize> {
        if row >= self.rows() || column >= self.columns() {
            return None;
        }
        Some(row * self.columns() + column)
    }

    /// `(row, column)` for a flat index.
    #[inline(always)]
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.columns(), index % self.columns())
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells().get(index)
    }

    pub fn get_at(&self, row: usize, column: usize) -> Option<&Cell> {
        self.index(row, column).map(|i| &self.cells[i])
    }

    /// Overwrite a cell. Returns false if out of bounds.
    pub fn set(&mut self, index: usize, cell: Cell) -> bool {
        match self.cells_mut().get_mut(index) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Live cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells[..self.len()]
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        let len = self.len();
        &mut self.cells[..len]
    }

    /// Number of empty cells on the board.
    pub fn empty_count(&self) -> usize {
        self.cells().iter().filter(|c| c.is_empty()).count()
    }

    /// Number of occupied cells of `color`.
    pub fn color_count(&self, color: u8) -> usize {
        self.cells()
            .iter()
            .filter(|c| !c.is_empty() && c.color == color)
            .count()
    }

    /// Length of the run of empty cells at the top of `column`.
    pub fn top_empty_run(&self, column: usize) -> usize {
        top_empty_run(self.cells(), self.rows(), self.columns(), column)
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        for cell in self.cells_mut() {
            cell.clear();
        }
    }

    /// Write colors into a fixed `[row][column]` array (`EMPTY_COLOR` for empty
    /// cells and for positions outside the board).
    pub fn write_color_grid(
        &self,
        out: &mut [[u8; MAX_BOARD_DIM as usize]; MAX_BOARD_DIM as usize],
    ) {
        for (r, row) in out.iter_mut().enumerate() {
            for (c, slot) in row.iter_mut().enumerate() {
                *slot = self
                    .get_at(r, c)
                    .map(|cell| cell.color)
                    .unwrap_or(crate::types::EMPTY_COLOR);
            }
        }
    }
}

/// Length of the run of empty cells at the top of `column` in a row-major
/// slice of `rows * columns` cells.
pub fn top_empty_run(cells: &[Cell], rows: usize, columns: usize, column: usize) -> usize {
    if column >= columns {
        return 0;
    }
    (0..rows)
        .take_while(|&row| cells[row * columns + column].is_empty())
        .count()
}
