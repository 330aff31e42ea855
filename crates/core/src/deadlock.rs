//! Deadlock detection - is any move left?
//!
//! A move exists iff two orthogonally adjacent occupied cells share a color.
//! The scan compares each cell only with its right and bottom neighbors (the
//! left/up comparisons were already made from the neighbor) and exits on the
//! first match, so the common case is far cheaper than a full grouping pass.

use crate::types::{Cell, Group};

#[derive(Debug, Clone)]
pub struct DeadlockDetector {
    rows: usize,
    columns: usize,
}

impl DeadlockDetector {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// True when at least one adjacent same-color pair exists.
    pub fn has_valid_move(&self, cells: &[Cell]) -> bool {
        self.find_move(cells).is_some()
    }

    /// First adjacent same-color pair in row-major order, as
    /// `(index, neighbor_index)` with the neighbor to the right or below.
    pub fn find_move(&self, cells: &[Cell]) -> Option<(usize, usize)> {
        find_adjacent_pair(self.rows, self.columns, |i| cells[i].color())
    }

    /// Number of detected groups with at least `min_size` cells.
    pub fn count_valid_groups(&self, groups: &[Group], min_size: u16) -> usize {
        groups.iter().filter(|g| g.size >= min_size).count()
    }
}

/// Row-major right/bottom neighbor scan over any color source
/// (`None` = empty).
pub(crate) fn find_adjacent_pair(
    rows: usize,
    columns: usize,
    color_at: impl Fn(usize) -> Option<u8>,
) -> Option<(usize, usize)> {
    for i in 0..rows * columns {
        let Some(color) = color_at(i) else {
            continue;
        };
        let row = i / columns;
        let col = i % columns;

        if col + 1 < columns && color_at(i + 1) == Some(color) {
            return Some((i, i + 1));
        }
        if row + 1 < rows && color_at(i + columns) == Some(color) {
            return Some((i, i + columns));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn detector_for(grid: &Grid) -> DeadlockDetector {
        DeadlockDetector::new(grid.rows(), grid.columns())
    }

    #[test]
    fn test_alternating_row_is_deadlocked() {
        let grid = Grid::from_colors(1, 3, &[Some(0), Some(1), Some(0)]).unwrap();
        assert!(!detector_for(&grid).has_valid_move(grid.cells()));
    }

    #[test]
    fn test_horizontal_pair_is_a_move() {
        let grid = Grid::from_colors(1, 3, &[Some(0), Some(0), Some(1)]).unwrap();
        let d = detector_for(&grid);
        assert!(d.has_valid_move(grid.cells()));
        assert_eq!(d.find_move(grid.cells()), Some((0, 1)));
    }

    #[test]
    fn test_vertical_pair_is_a_move() {
        let grid = Grid::from_colors(2, 2, &[Some(0), Some(1), Some(2), Some(1)]).unwrap();
        assert_eq!(detector_for(&grid).find_move(grid.cells()), Some((1, 3)));
    }

    #[test]
    fn test_pairs_do_not_wrap_rows() {
        // Index 1 (end of row 0) and index 2 (start of row 1) are not adjacent.
        let grid = Grid::from_colors(2, 2, &[Some(0), Some(1), Some(1), Some(0)]).unwrap();
        assert!(!detector_for(&grid).has_valid_move(grid.cells()));
    }

    #[test]
    fn test_empty_cells_never_match() {
        let grid = Grid::from_colors(2, 2, &[None, None, None, Some(3)]).unwrap();
        assert!(!detector_for(&grid).has_valid_move(grid.cells()));
        let grid = Grid::from_colors(2, 2, &[None; 4]).unwrap();
        assert!(!detector_for(&grid).has_valid_move(grid.cells()));
    }

    #[test]
    fn test_checkerboard_is_deadlocked() {
        let colors: Vec<Option<u8>> = (0..36).map(|i| Some((((i / 6) + (i % 6)) % 2) as u8)).collect();
        let grid = Grid::from_colors(6, 6, &colors).unwrap();
        assert!(!detector_for(&grid).has_valid_move(grid.cells()));
    }

    #[test]
    fn test_count_valid_groups() {
        let groups = [
            Group { id: 1, color: 0, size: 2, anchor: 0 },
            Group { id: 2, color: 1, size: 4, anchor: 5 },
        ];
        let d = DeadlockDetector::new(3, 3);
        assert_eq!(d.count_valid_groups(&groups, 2), 2);
        assert_eq!(d.count_valid_groups(&groups, 3), 1);
        assert_eq!(d.count_valid_groups(&groups, 5), 0);
    }
}
