//! Group detection - connected same-color regions
//!
//! Iterative flood fill over the 4-neighborhood with an explicit stack. All
//! scratch state (visited flags, work stack) lives in fixed-size buffers owned
//! by the detector and reused across passes, so detection never allocates.
//!
//! Group ids are assigned in row-major scan order and are dense (`1..=n`), so
//! `groups[id - 1]` is the group tagged `id`. They are only meaningful until
//! the board next changes.

use arrayvec::ArrayVec;

use crate::types::{Cell, Group, MAX_CELLS, MAX_GROUPS, MIN_GROUP_SIZE};

/// Fixed-capacity list of detected groups.
pub type GroupList = ArrayVec<Group, MAX_GROUPS>;

/// Fixed-capacity list of board indices.
pub type IndexList = ArrayVec<usize, MAX_CELLS>;

#[derive(Debug, Clone)]
pub struct GroupDetector {
    rows: usize,
    columns: usize,
    visited: [bool; MAX_CELLS],
    stack: IndexList,
}

impl GroupDetector {
    pub fn new(rows: usize, columns: usize) -> Self {
        debug_assert!(rows * columns <= MAX_CELLS);
        Self {
            rows,
            columns,
            visited: [false; MAX_CELLS],
            stack: ArrayVec::new(),
        }
    }

    fn len(&self) -> usize {
        self.rows * self.columns
    }

    /// Detect every group on the board.
    ///
    /// Tags each cell of a group with `size >= 2` with the group's id and
    /// records the group in `out`; singletons and empty cells end up with
    /// `group_id == 0`. Returns the number of groups found.
    pub fn detect_groups(&mut self, cells: &mut [Cell], out: &mut GroupList) -> usize {
        let len = self.len();
        debug_assert_eq!(cells.len(), len);

        out.clear();
        self.visited[..len].fill(false);

        for i in 0..len {
            if cells[i].is_empty() {
                // Empty cells never carry a tag.
                cells[i].group_id = 0;
                continue;
            }
            if self.visited[i] {
                continue;
            }

            let id = (out.len() + 1) as u16;
            let size = self.flood_fill(cells, i, id);

            if size >= MIN_GROUP_SIZE {
                out.push(Group {
                    id,
                    color: cells[i].color,
                    size,
                    anchor: i,
                });
            } else {
                // Singleton: the only member is `i`; release the id.
                cells[i].group_id = 0;
            }
        }

        out.len()
    }

    fn flood_fill(&mut self, cells: &mut [Cell], start: usize, id: u16) -> u16 {
        let target = cells[start].color;
        let columns = self.columns;
        let rows = self.rows;

        self.stack.clear();
        self.stack.push(start);
        self.visited[start] = true;

        let mut count: u16 = 0;
        while let Some(current) = self.stack.pop() {
            cells[current].group_id = id;
            count += 1;

            let row = current / columns;
            let col = current % columns;

            // Up, down, left, right.
            let mut neighbors = [usize::MAX; 4];
            if row > 0 {
                neighbors[0] = current - columns;
            }
            if row + 1 < rows {
                neighbors[1] = current + columns;
            }
            if col > 0 {
                neighbors[2] = current - 1;
            }
            if col + 1 < columns {
                neighbors[3] = current + 1;
            }

            for n in neighbors {
                if n != usize::MAX && !self.visited[n] && cells[n].color == target {
                    self.visited[n] = true;
                    self.stack.push(n);
                }
            }
        }

        count
    }

    /// Collect the indices tagged `group_id` into `out` (row-major order).
    /// Returns the member count; 0 for the untagged id.
    pub fn members_of(&self, cells: &[Cell], group_id: u16, out: &mut IndexList) -> usize {
        out.clear();
        if group_id == 0 {
            return 0;
        }
        for (i, cell) in cells.iter().enumerate() {
            if cell.group_id == group_id {
                out.push(i);
            }
        }
        out.len()
    }

    /// The detected group containing `index`, or `None` if the index is out of
    /// range, the cell is empty, or the cell is not part of a group.
    pub fn group_containing(&self, cells: &[Cell], groups: &[Group], index: usize) -> Option<Group> {
        let cell = cells.get(index)?;
        if cell.is_empty() || cell.group_id == 0 {
            return None;
        }
        lookup(groups, cell.group_id)
    }
}

/// Find a group by id in a detection result.
pub fn lookup(groups: &[Group], id: u16) -> Option<Group> {
    if id == 0 {
        return None;
    }
    // Dense ids: the fast path is a direct slot.
    match groups.get(id as usize - 1) {
        Some(g) if g.id == id => Some(*g),
        _ => groups.iter().find(|g| g.id == id).copied(),
    }
}
