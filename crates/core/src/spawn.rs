//! Spawn generation - refill the empty tops of columns
//!
//! After gravity every column's empty cells form one contiguous run at the
//! top. Each of those cells receives a uniformly random color in
//! `0..color_count`, filled top-down, with a record telling the renderer how
//! far above the board the new cell starts.

use arrayvec::ArrayVec;

use crate::grid::top_empty_run;
use crate::rng::SimpleRng;
use crate::types::{clamp_color_count, Cell, SpawnRecord, MAX_CELLS};

/// Fixed-capacity list of spawn records.
pub type SpawnList = ArrayVec<SpawnRecord, MAX_CELLS>;

#[derive(Debug, Clone)]
pub struct SpawnGenerator {
    rows: usize,
    columns: usize,
    color_count: u8,
    rng: SimpleRng,
}

impl SpawnGenerator {
    pub fn new(rows: usize, columns: usize, color_count: u8, seed: u32) -> Self {
        Self {
            rows,
            columns,
            color_count: clamp_color_count(color_count),
            rng: SimpleRng::new(seed),
        }
    }

    pub fn color_count(&self) -> u8 {
        self.color_count
    }

    /// Change the number of colors used by future spawns.
    pub fn set_color_count(&mut self, color_count: u8) {
        self.color_count = clamp_color_count(color_count);
    }

    pub fn reseed(&mut self, seed: u32) {
        self.rng.reseed(seed);
    }

    fn next_color(&mut self) -> u8 {
        self.rng.next_range(self.color_count as u32) as u8
    }

    /// Fill the empty run at the top of every column.
    ///
    /// Returns the number of cells spawned; `out` holds one record per cell.
    pub fn spawn_new_cells(&mut self, cells: &mut [Cell], out: &mut SpawnList) -> usize {
        debug_assert_eq!(cells.len(), self.rows * self.columns);
        out.clear();

        for col in 0..self.columns {
            let empty = top_empty_run(cells, self.rows, self.columns, col);

            for row in 0..empty {
                let target = row * self.columns + col;
                let color = self.next_color();
                cells[target] = Cell::new(color);
                out.push(SpawnRecord {
                    target,
                    color,
                    rows_above: empty - row,
                });
            }
        }

        out.len()
    }

    /// Fill every cell independently at random (initial board).
    pub fn fill_board(&mut self, cells: &mut [Cell]) {
        for cell in cells.iter_mut() {
            *cell = Cell::new(self.next_color());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_spawn_fills_every_top_run() {
        let mut grid = Grid::from_colors(
            3,
            2,
            &[None, None, None, Some(1), Some(0), Some(1)],
        )
        .unwrap();
        let mut spawner = SpawnGenerator::new(3, 2, 3, 42);
        let mut out = SpawnList::new();

        let before = grid.empty_count();
        assert_eq!(spawner.spawn_new_cells(grid.cells_mut(), &mut out), before);
        assert_eq!(grid.empty_count(), 0);
        assert!(grid.cells().iter().all(|c| c.color < 3));
    }

    #[test]
    fn test_rows_above_counts_down_to_one() {
        let mut grid = Grid::from_colors(4, 1, &[None, None, None, Some(2)]).unwrap();
        let mut spawner = SpawnGenerator::new(4, 1, 2, 7);
        let mut out = SpawnList::new();
        spawner.spawn_new_cells(grid.cells_mut(), &mut out);

        let offsets: Vec<(usize, usize)> = out.iter().map(|r| (r.target, r.rows_above)).collect();
        assert_eq!(offsets, vec![(0, 3), (1, 2), (2, 1)]);
        for r in &out {
            assert_eq!(grid.get(r.target).and_then(|c| c.color()), Some(r.color));
        }
        // Existing cell untouched.
        assert_eq!(grid.get(3).and_then(|c| c.color()), Some(2));
    }

    #[test]
    fn test_full_board_spawns_nothing() {
        let mut grid = Grid::from_colors(2, 2, &[Some(0), Some(1), Some(1), Some(0)]).unwrap();
        let mut spawner = SpawnGenerator::new(2, 2, 4, 1);
        let mut out = SpawnList::new();
        assert_eq!(spawner.spawn_new_cells(grid.cells_mut(), &mut out), 0);
    }

    #[test]
    fn test_fill_board_uses_configured_colors() {
        let mut grid = Grid::new(10, 10);
        let mut spawner = SpawnGenerator::new(10, 10, 3, 99);
        spawner.fill_board(grid.cells_mut());
        assert_eq!(grid.empty_count(), 0);
        assert!(grid.cells().iter().all(|c| c.color < 3 && c.group_id == 0));
        for color in 0..3 {
            assert!(grid.color_count(color) > 0);
        }
    }

    #[test]
    fn test_color_count_is_clamped() {
        let mut spawner = SpawnGenerator::new(2, 2, 0, 1);
        assert_eq!(spawner.color_count(), 2);
        spawner.set_color_count(12);
        assert_eq!(spawner.color_count(), 6);
    }

    #[test]
    fn test_same_seed_same_board() {
        let mut a = Grid::new(6, 6);
        let mut b = Grid::new(6, 6);
        SpawnGenerator::new(6, 6, 5, 1234).fill_board(a.cells_mut());
        SpawnGenerator::new(6, 6, 5, 1234).fill_board(b.cells_mut());
        assert_eq!(a, b);
    }
}
