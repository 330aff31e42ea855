//! Fall resolution - per-column gravity compaction
//!
//! Uses the same two-pointer walk as a line clear: scan each column from the
//! bottom up with a write cursor, moving every occupied cell down to the
//! cursor. Only genuine moves are recorded.

use arrayvec::ArrayVec;

use crate::grid::top_empty_run;
use crate::types::{Cell, FallRecord, MAX_BOARD_DIM, MAX_CELLS};

/// Fixed-capacity list of fall records.
pub type FallList = ArrayVec<FallRecord, MAX_CELLS>;

#[derive(Debug, Clone)]
pub struct FallResolver {
    rows: usize,
    columns: usize,
}

impl FallResolver {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Close every gap left by removed cells.
    ///
    /// Moved cells keep their color; their group tags are stale until the next
    /// detection pass. Returns the number of records written to `out`.
    pub fn resolve_falls(&self, cells: &mut [Cell], out: &mut FallList) -> usize {
        debug_assert_eq!(cells.len(), self.rows * self.columns);
        out.clear();

        for col in 0..self.columns {
            let mut write_row = self.rows;

            // Bottom-up order preserves the relative stacking inside a column.
            for row in (0..self.rows).rev() {
                let index = row * self.columns + col;
                if cells[index].is_empty() {
                    continue;
                }

                write_row -= 1;
                let target = write_row * self.columns + col;
                if target != index {
                    cells[target] = cells[index];
                    cells[index] = Cell::EMPTY;
                    out.push(FallRecord {
                        from: index,
                        to: target,
                        distance: write_row - row,
                    });
                }
            }
        }

        out.len()
    }

    /// Count the empty cells at the top of each column into `out` (one entry
    /// per column) and return the total.
    pub fn empty_runs_per_column(
        &self,
        cells: &[Cell],
        out: &mut ArrayVec<usize, { MAX_BOARD_DIM as usize }>,
    ) -> usize {
        out.clear();
        let mut total = 0;
        for col in 0..self.columns {
            let run = top_empty_run(cells, self.rows, self.columns, col);
            out.push(run);
            total += run;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn colors(grid: &Grid) -> Vec<Option<u8>> {
        grid.cells().iter().map(|c| c.color()).collect()
    }

    #[test]
    fn test_single_column_compaction() {
        let mut grid = Grid::from_colors(4, 1, &[None, Some(2), None, Some(2)]).unwrap();
        let resolver = FallResolver::new(4, 1);
        let mut out = FallList::new();

        assert_eq!(resolver.resolve_falls(grid.cells_mut(), &mut out), 1);
        assert_eq!(colors(&grid), vec![None, None, Some(2), Some(2)]);
        assert_eq!(
            out.as_slice(),
            &[FallRecord {
                from: 1,
                to: 2,
                distance: 1
            }]
        );
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut grid = Grid::from_colors(
            3,
            2,
            &[Some(0), None, None, Some(1), Some(2), None],
        )
        .unwrap();
        let resolver = FallResolver::new(3, 2);
        let mut out = FallList::new();

        assert!(resolver.resolve_falls(grid.cells_mut(), &mut out) > 0);
        assert_eq!(resolver.resolve_falls(grid.cells_mut(), &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_stacking_order_is_preserved() {
        // Column reads top-to-bottom: 3, _, 4, _, _
        let mut grid =
            Grid::from_colors(5, 1, &[Some(3), None, Some(4), None, None]).unwrap();
        let resolver = FallResolver::new(5, 1);
        let mut out = FallList::new();
        resolver.resolve_falls(grid.cells_mut(), &mut out);

        assert_eq!(colors(&grid), vec![None, None, None, Some(3), Some(4)]);
        assert_eq!(out[0], FallRecord { from: 2, to: 4, distance: 2 });
        assert_eq!(out[1], FallRecord { from: 0, to: 3, distance: 3 });
    }

    #[test]
    fn test_no_cell_has_gap_below_after_resolve() {
        let mut grid = Grid::from_colors(
            4,
            3,
            &[
                Some(0), None, Some(1),
                None, Some(2), None,
                Some(3), None, None,
                None, None, Some(4),
            ],
        )
        .unwrap();
        let resolver = FallResolver::new(4, 3);
        let mut out = FallList::new();
        resolver.resolve_falls(grid.cells_mut(), &mut out);

        for col in 0..3 {
            let mut seen_occupied = false;
            for row in 0..4 {
                let empty = grid.get_at(row, col).unwrap().is_empty();
                if seen_occupied {
                    assert!(!empty, "gap under an occupied cell at ({}, {})", row, col);
                }
                seen_occupied |= !empty;
            }
        }
        assert_eq!(out.iter().map(|r| r.distance).sum::<usize>(), 1 + 2 + 2 + 2);
    }

    #[test]
    fn test_empty_runs_per_column() {
        let grid = Grid::from_colors(
            3,
            3,
            &[None, None, Some(0), None, Some(1), Some(0), Some(2), Some(1), Some(0)],
        )
        .unwrap();
        let resolver = FallResolver::new(3, 3);
        let mut runs = ArrayVec::new();
        assert_eq!(resolver.empty_runs_per_column(grid.cells(), &mut runs), 3);
        assert_eq!(runs.as_slice(), &[2, 1, 0]);
    }
}
