use serde::{Deserialize, Serialize};

use crate::types::{EMPTY_COLOR, MAX_BOARD_DIM};

const DIM: usize = MAX_BOARD_DIM as usize;

/// Fixed-size copy of the board for renderers and observers.
///
/// Every array is sized for the largest board; positions outside
/// `rows x columns` hold `EMPTY_COLOR` / 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: u8,
    pub columns: u8,
    pub color_count: u8,
    pub min_group_size: u16,
    /// `[row][column]` color, `EMPTY_COLOR` when empty.
    pub colors: [[u8; DIM]; DIM],
    /// `[row][column]` display bucket as `DisplayBucket::as_u8`.
    pub buckets: [[u8; DIM]; DIM],
    pub group_ids: [[u16; DIM]; DIM],
    pub group_count: u16,
    pub largest_group: u16,
    pub empty_cells: u16,
    /// Bumped on every board mutation.
    pub generation: u32,
    pub seed: u32,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.rows = 0;
        self.columns = 0;
        self.color_count = 0;
        self.min_group_size = 0;
        self.colors = [[EMPTY_COLOR; DIM]; DIM];
        self.buckets = [[0; DIM]; DIM];
        self.group_ids = [[0; DIM]; DIM];
        self.group_count = 0;
        self.largest_group = 0;
        self.empty_cells = 0;
        self.generation = 0;
        self.seed = 0;
    }

    /// Color at `(row, column)`, `None` when empty or off the board.
    pub fn color_at(&self, row: usize, column: usize) -> Option<u8> {
        if row >= self.rows as usize || column >= self.columns as usize {
            return None;
        }
        let c = self.colors[row][column];
        (c != EMPTY_COLOR).then_some(c)
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            color_count: 0,
            min_group_size: 0,
            colors: [[EMPTY_COLOR; DIM]; DIM],
            buckets: [[0; DIM]; DIM],
            group_ids: [[0; DIM]; DIM],
            group_count: 0,
            largest_group: 0,
            empty_cells: 0,
            generation: 0,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_blank() {
        let s = BoardSnapshot::default();
        assert_eq!(s.color_at(0, 0), None);
        assert!(s.colors.iter().flatten().all(|&c| c == EMPTY_COLOR));
    }

    #[test]
    fn test_color_at_respects_dimensions() {
        let mut s = BoardSnapshot::default();
        s.rows = 2;
        s.columns = 2;
        s.colors[1][1] = 3;
        s.colors[2][2] = 4;
        assert_eq!(s.color_at(1, 1), Some(3));
        assert_eq!(s.color_at(2, 2), None);

        s.clear();
        assert_eq!(s, BoardSnapshot::default());
    }
}
