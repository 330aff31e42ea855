//! Shuffle resolution - rearrange colors until a move exists
//!
//! The shuffle never adds or removes colors: it redistributes the colors
//! already on the board across the cells already occupied. The pipeline is
//!
//! 1. tally colors and record occupied positions (row-major),
//! 2. build a sequence of same-color clusters (2-4 long), picking colors with
//!    a bias toward those with the most supply left,
//! 3. perform `len / 4` random swaps so the result still looks shuffled,
//! 4. verify the sequence mapped back onto the board has an adjacent pair,
//! 5. if not, force the most frequent color's second occurrence next to its
//!    first and verify again,
//! 6. write the colors back with fresh buckets and tags.
//!
//! Step 5 operates on sequence slots, not board cells. Two consecutive slots
//! are board neighbors only when they share a row, so the forced pair can
//! land across a row edge and leave the board without a move. The outcome
//! reports that case (`verified == false`) instead of hiding it.

use arrayvec::ArrayVec;

use crate::deadlock::find_adjacent_pair;
use crate::groups::IndexList;
use crate::rng::SimpleRng;
use crate::types::{Cell, EMPTY_COLOR, MAX_CELLS, MAX_COLORS};

/// Smallest cluster appended while building the sequence.
const CLUSTER_MIN: u32 = 2;

/// One past the largest cluster.
const CLUSTER_MAX_EXCLUSIVE: u32 = 5;

/// Result of one shuffle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleOutcome {
    /// Fewer than two occupied cells; the board was left untouched.
    Skipped,
    /// Colors were rewritten.
    Applied {
        /// The force-fix step ran.
        forced: bool,
        /// The written board holds at least one adjacent same-color pair.
        verified: bool,
    },
}

impl ShuffleOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, ShuffleOutcome::Applied { verified: true, .. })
    }
}

#[derive(Debug, Clone)]
pub struct ShuffleResolver {
    rows: usize,
    columns: usize,
    rng: SimpleRng,
    color_counts: [u16; MAX_COLORS as usize],
    sequence: ArrayVec<u8, MAX_CELLS>,
    positions: IndexList,
    scratch: [u8; MAX_CELLS],
}

impl ShuffleResolver {
    pub fn new(rows: usize, columns: usize, seed: u32) -> Self {
        debug_assert!(rows * columns <= MAX_CELLS);
        Self {
            rows,
            columns,
            rng: SimpleRng::new(seed),
            color_counts: [0; MAX_COLORS as usize],
            sequence: ArrayVec::new(),
            positions: ArrayVec::new(),
            scratch: [EMPTY_COLOR; MAX_CELLS],
        }
    }

    pub fn reseed(&mut self, seed: u32) {
        self.rng.reseed(seed);
    }

    /// Current random state, used to derive a fresh seed for a retry.
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Shuffle the occupied cells' colors in place.
    pub fn shuffle(&mut self, cells: &mut [Cell]) -> ShuffleOutcome {
        debug_assert_eq!(cells.len(), self.rows * self.columns);

        self.tally(cells);
        if self.positions.len() < 2 {
            return ShuffleOutcome::Skipped;
        }

        self.build_sequence();
        self.light_shuffle();

        let mut forced = false;
        let mut verified = self.sequence_has_pair();
        if !verified {
            forced = true;
            force_adjacent_pair(&mut self.sequence);
            verified = self.sequence_has_pair();
        }

        for (&pos, &color) in self.positions.iter().zip(self.sequence.iter()) {
            cells[pos] = Cell::new(color);
        }

        ShuffleOutcome::Applied { forced, verified }
    }

    fn tally(&mut self, cells: &[Cell]) {
        self.color_counts = [0; MAX_COLORS as usize];
        self.positions.clear();
        for (i, cell) in cells.iter().enumerate() {
            let Some(color) = cell.color() else {
                continue;
            };
            if let Some(count) = self.color_counts.get_mut(color as usize) {
                *count += 1;
                self.positions.push(i);
            }
        }
    }

    /// Pick a color with supply left, favoring larger remaining counts.
    fn pick_color(&mut self, remaining: &[u16; MAX_COLORS as usize]) -> Option<usize> {
        let mut picked = None;
        let mut best: u16 = 0;
        for (color, &count) in remaining.iter().enumerate() {
            if count == 0 {
                continue;
            }
            if self.rng.range(0, count as u32 + 1) >= best as u32 {
                best = count;
                picked = Some(color);
            }
        }
        picked
    }

    fn build_sequence(&mut self) {
        let total = self.positions.len();
        let mut remaining = self.color_counts;
        self.sequence.clear();

        while self.sequence.len() < total {
            let Some(color) = self.pick_color(&remaining) else {
                break;
            };
            let supply = remaining[color] as usize;
            let slots = total - self.sequence.len();

            let mut cluster = (self.rng.range(CLUSTER_MIN, CLUSTER_MAX_EXCLUSIVE) as usize)
                .min(supply.min(slots));
            if supply >= 2 && cluster < 2 {
                cluster = 2;
            }

            for _ in 0..cluster {
                self.sequence.push(color as u8);
            }
            remaining[color] -= cluster as u16;
        }
    }

    fn light_shuffle(&mut self) {
        let len = self.sequence.len();
        for _ in 0..len / 4 {
            let a = self.rng.index(len);
            let b = self.rng.index(len);
            self.sequence.swap(a, b);
        }
    }

    /// Lay the sequence over the occupied positions and scan for a pair.
    fn sequence_has_pair(&mut self) -> bool {
        let len = self.rows * self.columns;
        self.scratch[..len].fill(EMPTY_COLOR);
        for (&pos, &color) in self.positions.iter().zip(self.sequence.iter()) {
            self.scratch[pos] = color;
        }
        let scratch = &self.scratch;
        find_adjacent_pair(self.rows, self.columns, |i| {
            let c = scratch[i];
            (c != EMPTY_COLOR).then_some(c)
        })
        .is_some()
    }
}

/// Move the second occurrence of the most frequent color into the slot right
/// after its first occurrence.
///
/// Ties go to the lowest color. Returns the sequence slots now holding the
/// pair, or `None` when no color occurs twice or the first occurrence is the
/// final slot.
pub(crate) fn force_adjacent_pair(sequence: &mut [u8]) -> Option<(usize, usize)> {
    let mut counts = [0u16; MAX_COLORS as usize];
    for &color in sequence.iter() {
        if let Some(slot) = counts.get_mut(color as usize) {
            *slot += 1;
        }
    }

    let mut color = 0usize;
    for (c, &n) in counts.iter().enumerate() {
        if n > counts[color] {
            color = c;
        }
    }
    if counts[color] < 2 {
        return None;
    }

    let mut occurrences = sequence
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c as usize == color)
        .map(|(i, _)| i);
    let first = occurrences.next()?;
    let second = occurrences.next()?;

    if first + 1 >= sequence.len() {
        return None;
    }
    let target = first + 1;
    if target != second {
        sequence.swap(target, second);
    }
    Some((first, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadlock::DeadlockDetector;
    use crate::grid::Grid;

    fn histogram(cells: &[Cell]) -> [usize; MAX_COLORS as usize] {
        let mut h = [0; MAX_COLORS as usize];
        for c in cells.iter().filter_map(|c| c.color()) {
            h[c as usize] += 1;
        }
        h
    }

    fn checkerboard(rows: u8, columns: u8) -> Grid {
        let colors: Vec<Option<u8>> = (0..rows as usize * columns as usize)
            .map(|i| Some((((i / columns as usize) + (i % columns as usize)) % 2) as u8))
            .collect();
        Grid::from_colors(rows, columns, &colors).unwrap()
    }

    #[test]
    fn test_shuffle_preserves_color_multiset() {
        for seed in 1..200u32 {
            let mut grid = checkerboard(6, 7);
            let before = histogram(grid.cells());
            let mut resolver = ShuffleResolver::new(6, 7, seed);
            resolver.shuffle(grid.cells_mut());
            assert_eq!(histogram(grid.cells()), before, "seed {}", seed);
        }
    }

    #[test]
    fn test_reported_verification_matches_board() {
        let detector = DeadlockDetector::new(6, 6);
        for seed in 1..200u32 {
            let mut grid = checkerboard(6, 6);
            let mut resolver = ShuffleResolver::new(6, 6, seed);
            let outcome = resolver.shuffle(grid.cells_mut());
            let ShuffleOutcome::Applied { verified, .. } = outcome else {
                panic!("full board must be shuffled");
            };
            assert_eq!(verified, detector.has_valid_move(grid.cells()), "seed {}", seed);
        }
    }

    #[test]
    fn test_written_cells_are_untagged() {
        let mut grid = checkerboard(4, 4);
        for cell in grid.cells_mut() {
            cell.group_id = 7;
            cell.bucket = crate::types::DisplayBucket::C;
        }
        ShuffleResolver::new(4, 4, 3).shuffle(grid.cells_mut());
        assert!(grid
            .cells()
            .iter()
            .all(|c| c.group_id == 0 && c.bucket == crate::types::DisplayBucket::Default));
    }

    #[test]
    fn test_empty_cells_stay_empty() {
        let mut grid = Grid::from_colors(
            3,
            3,
            &[None, None, None, Some(0), None, Some(1), Some(1), Some(0), Some(0)],
        )
        .unwrap();
        ShuffleResolver::new(3, 3, 11).shuffle(grid.cells_mut());
        for i in 0..3 {
            assert!(grid.cells()[i].is_empty());
        }
        assert!(grid.cells()[4].is_empty());
        assert_eq!(histogram(grid.cells())[0], 3);
        assert_eq!(histogram(grid.cells())[1], 2);
    }

    #[test]
    fn test_fewer_than_two_cells_is_skipped() {
        let mut grid = Grid::from_colors(2, 2, &[None, None, None, Some(3)]).unwrap();
        let before = grid.clone();
        let outcome = ShuffleResolver::new(2, 2, 5).shuffle(grid.cells_mut());
        assert_eq!(outcome, ShuffleOutcome::Skipped);
        assert_eq!(grid, before);

        let mut empty = Grid::new(2, 2);
        assert_eq!(
            ShuffleResolver::new(2, 2, 5).shuffle(empty.cells_mut()),
            ShuffleOutcome::Skipped
        );
    }

    #[test]
    fn test_unresolvable_board_is_flagged() {
        // Two lone cells of different colors on a diagonal can never pair up.
        let mut grid = Grid::from_colors(2, 2, &[Some(0), None, None, Some(1)]).unwrap();
        let outcome = ShuffleResolver::new(2, 2, 9).shuffle(grid.cells_mut());
        assert_eq!(
            outcome,
            ShuffleOutcome::Applied {
                forced: true,
                verified: false
            }
        );
        assert_eq!(histogram(grid.cells())[0], 1);
        assert_eq!(histogram(grid.cells())[1], 1);
    }

    #[test]
    fn test_force_pairs_second_occurrence_after_first() {
        let mut seq = [2, 1, 0, 1, 3, 1];
        assert_eq!(force_adjacent_pair(&mut seq), Some((1, 2)));
        assert_eq!(seq, [2, 1, 1, 0, 3, 1]);
    }

    #[test]
    fn test_force_ties_go_to_lowest_color() {
        let mut seq = [1, 0, 1, 0];
        assert_eq!(force_adjacent_pair(&mut seq), Some((1, 2)));
        assert_eq!(seq, [1, 0, 0, 1]);
    }

    #[test]
    fn test_force_without_repeats_does_nothing() {
        let mut seq = [0, 1, 2];
        assert_eq!(force_adjacent_pair(&mut seq), None);
        assert_eq!(seq, [0, 1, 2]);
    }

    #[test]
    fn test_forced_pair_across_row_edge_is_not_a_board_pair() {
        // 2x2 board: sequence slots 1 and 2 are the end of row 0 and the start
        // of row 1. The forced pair lands there and the board stays deadlocked.
        let mut resolver = ShuffleResolver::new(2, 2, 1);
        resolver.positions.clear();
        resolver.positions.extend([0, 1, 2, 3]);
        resolver.sequence.clear();
        resolver.sequence.extend([1, 0, 0, 1]);

        assert!(!resolver.sequence_has_pair());
        assert_eq!(force_adjacent_pair(&mut resolver.sequence), Some((1, 2)));
        assert_eq!(resolver.sequence.as_slice(), &[1, 0, 0, 1]);
        assert!(!resolver.sequence_has_pair());
    }

    #[test]
    fn test_forced_pair_inside_a_row_is_a_board_pair() {
        let mut resolver = ShuffleResolver::new(2, 3, 1);
        resolver.positions.clear();
        resolver.positions.extend([0, 1, 2, 3, 4, 5]);
        resolver.sequence.clear();
        resolver.sequence.extend([0, 1, 2, 2, 0, 1]);

        assert!(!resolver.sequence_has_pair());
        assert_eq!(force_adjacent_pair(&mut resolver.sequence), Some((0, 1)));
        assert!(resolver.sequence_has_pair());
    }

    #[test]
    fn test_same_seed_same_shuffle() {
        let mut a = checkerboard(5, 5);
        let mut b = checkerboard(5, 5);
        ShuffleResolver::new(5, 5, 77).shuffle(a.cells_mut());
        ShuffleResolver::new(5, 5, 77).shuffle(b.cells_mut());
        assert_eq!(a, b);
    }
}
