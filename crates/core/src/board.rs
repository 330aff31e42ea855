//! Board engine - owns the grid and sequences the board components
//!
//! The engine holds the grid, every scratch and output buffer, and the
//! dirty flag for group state. Callers drive one turn as
//!
//! ```text
//! try_blast_at -> process_falls -> spawn_blocks -> check_deadlock -> perform_shuffle
//! ```
//!
//! and read the resulting deltas (`destroyed`, `falls`, `spawns`) and
//! [`Signals`] between calls. Group detection runs lazily: mutations only mark
//! the groups dirty, and the next groups-dependent read recomputes them once.

use crate::deadlock::DeadlockDetector;
use crate::fall::{FallList, FallResolver};
use crate::grid::Grid;
use crate::groups::{lookup, GroupDetector, GroupList, IndexList};
use crate::shuffle::{ShuffleOutcome, ShuffleResolver};
use crate::snapshot::BoardSnapshot;
use crate::spawn::{SpawnGenerator, SpawnList};
use crate::types::{
    clamp_color_count, BoardConfig, Cell, DisplayBucket, FallRecord, Group, SpawnRecord,
    MAX_COLORS, MIN_GROUP_SIZE,
};

/// Seed used when the configuration does not name one.
pub const DEFAULT_SEED: u32 = 12345;

/// Mixed into the seed so the shuffle stream differs from the spawn stream.
const SHUFFLE_SALT: u32 = 0x9E37_79B9;

/// Mixed into the shuffle state before the retry.
const RETRY_SALT: u32 = 0x5BD1_E995;

/// Full fills tried by `generate_board` before painting a group in.
const GENERATE_ATTEMPTS: usize = 64;

/// State-transition flags raised since the last [`BoardEngine::take_signals`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub groups_updated: bool,
    pub deadlock_detected: bool,
    pub shuffle_complete: bool,
    pub board_ready: bool,
    /// Both shuffle attempts left the board without a move.
    pub shuffle_unresolved: bool,
}

impl Signals {
    pub fn any(&self) -> bool {
        self.groups_updated
            || self.deadlock_detected
            || self.shuffle_complete
            || self.board_ready
            || self.shuffle_unresolved
    }
}

/// What `perform_shuffle` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleReport {
    /// Shuffle passes run (0 when skipped, at most 2).
    pub attempts: u8,
    /// Outcome of the last pass.
    pub outcome: ShuffleOutcome,
    /// The board has a legal move afterwards.
    pub resolved: bool,
}

#[derive(Debug, Clone)]
pub struct BoardEngine {
    config: BoardConfig,
    seed: u32,
    grid: Grid,
    detector: GroupDetector,
    fall: FallResolver,
    spawner: SpawnGenerator,
    deadlock: DeadlockDetector,
    shuffler: ShuffleResolver,
    groups: GroupList,
    destroyed: IndexList,
    falls: FallList,
    spawns: SpawnList,
    last_blast: Option<Group>,
    signals: Signals,
    dirty: bool,
    generation: u32,
}

impl BoardEngine {
    /// Create an engine with an empty board. Call [`generate_board`](Self::generate_board)
    /// before playing.
    pub fn new(config: BoardConfig) -> Self {
        let config = config.sanitized();
        let grid = Grid::new(config.rows, config.columns);
        Self::with_grid(config, grid)
    }

    /// Create an engine around an existing grid.
    ///
    /// The grid's dimensions win over the configured ones, so single-row
    /// boards built with [`Grid::from_colors`] can be driven directly.
    pub fn from_grid(config: BoardConfig, grid: Grid) -> Self {
        let mut config = config.sanitized();
        config.rows = grid.rows() as u8;
        config.columns = grid.columns() as u8;
        Self::with_grid(config, grid)
    }

    fn with_grid(config: BoardConfig, grid: Grid) -> Self {
        let rows = grid.rows();
        let columns = grid.columns();
        let seed = config.seed.unwrap_or(DEFAULT_SEED);

        Self {
            config,
            seed,
            grid,
            detector: GroupDetector::new(rows, columns),
            fall: FallResolver::new(rows, columns),
            spawner: SpawnGenerator::new(rows, columns, config.color_count, seed),
            deadlock: DeadlockDetector::new(rows, columns),
            shuffler: ShuffleResolver::new(rows, columns, seed ^ SHUFFLE_SALT),
            groups: GroupList::new(),
            destroyed: IndexList::new(),
            falls: FallList::new(),
            spawns: SpawnList::new(),
            last_blast: None,
            signals: Signals::default(),
            dirty: true,
            generation: 0,
        }
    }

    // ---- configuration ----

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Reseed both random sources.
    pub fn reseed(&mut self, seed: u32) {
        self.seed = seed;
        self.spawner.reseed(seed);
        self.shuffler.reseed(seed ^ SHUFFLE_SALT);
    }

    pub fn color_count(&self) -> u8 {
        self.spawner.color_count()
    }

    /// Change the number of colors future spawns draw from. Cells already on
    /// the board keep their colors.
    pub fn set_color_count(&mut self, color_count: u8) {
        let k = clamp_color_count(color_count);
        self.config.color_count = k;
        self.spawner.set_color_count(k);
    }

    pub fn min_group_size(&self) -> u16 {
        self.config.min_group_size
    }

    // ---- lifecycle ----

    /// Fill the board, make sure it has a move and raise `board_ready`.
    ///
    /// Refills until a move exists, shuffling only fills that repeat a color.
    /// If every attempt fails, the first `min_group_size` cells in row-major
    /// order are painted one color, which always forms a connected group.
    pub fn generate_board(&mut self) {
        self.clear_deltas();

        let mut ready = false;
        for _ in 0..GENERATE_ATTEMPTS {
            self.spawner.fill_board(self.grid.cells_mut());
            self.touch();
            if !self.check_deadlock() {
                ready = true;
                break;
            }
            if self.has_repeated_color() && self.perform_shuffle().resolved {
                ready = true;
                break;
            }
        }
        if !ready {
            self.paint_starter_group();
        }
        // Earlier failed attempts do not describe the board that was kept.
        self.signals.shuffle_unresolved = false;

        self.update_groups_if_dirty();
        self.signals.board_ready = true;
    }

    fn has_repeated_color(&self) -> bool {
        (0..MAX_COLORS).any(|c| self.grid.color_count(c) >= 2)
    }

    fn paint_starter_group(&mut self) {
        let min = self.config.min_group_size.max(MIN_GROUP_SIZE) as usize;
        let cells = self.grid.cells_mut();
        let len = min.min(cells.len());
        let color = cells[0].color().unwrap_or(0);
        for cell in &mut cells[..len] {
            *cell = Cell::new(color);
        }
        self.touch();
    }

    /// Empty the board and generate a new one.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.groups.clear();
        self.generate_board();
    }

    // ---- turn operations ----

    /// Blast the group containing `index`.
    ///
    /// Returns false without touching the board when the index is out of
    /// range, the cell is empty, or its group is smaller than the minimum.
    pub fn try_blast_at(&mut self, index: usize) -> bool {
        self.destroyed.clear();
        self.last_blast = None;
        self.update_groups_if_dirty();

        let Some(group) = self
            .detector
            .group_containing(self.grid.cells(), &self.groups, index)
        else {
            return false;
        };
        if group.size < self.config.min_group_size.max(MIN_GROUP_SIZE) {
            return false;
        }

        self.detector
            .members_of(self.grid.cells(), group.id, &mut self.destroyed);
        let cells = self.grid.cells_mut();
        for &i in self.destroyed.iter() {
            cells[i].clear();
        }

        self.last_blast = Some(group);
        self.touch();
        true
    }

    pub fn try_blast_at_cell(&mut self, row: usize, column: usize) -> bool {
        match self.grid.index(row, column) {
            Some(index) => self.try_blast_at(index),
            None => {
                self.destroyed.clear();
                self.last_blast = None;
                false
            }
        }
    }

    /// Apply gravity. Returns the number of cells that moved.
    pub fn process_falls(&mut self) -> usize {
        let moved = self
            .fall
            .resolve_falls(self.grid.cells_mut(), &mut self.falls);
        if moved > 0 {
            self.touch();
        }
        moved
    }

    /// Refill the column tops. Returns the number of cells spawned.
    pub fn spawn_blocks(&mut self) -> usize {
        let spawned = self
            .spawner
            .spawn_new_cells(self.grid.cells_mut(), &mut self.spawns);
        if spawned > 0 {
            self.touch();
        }
        spawned
    }

    /// True when the board has no legal move; raises `deadlock_detected`.
    pub fn check_deadlock(&mut self) -> bool {
        let deadlocked = !self.has_valid_move();
        if deadlocked {
            self.signals.deadlock_detected = true;
        }
        deadlocked
    }

    /// True when at least one blastable group exists.
    ///
    /// With the default minimum of 2 this is the adjacent-pair scan; larger
    /// minimums need the detected groups.
    pub fn has_valid_move(&mut self) -> bool {
        self.update_groups_if_dirty();
        if self.config.min_group_size > MIN_GROUP_SIZE {
            self.deadlock
                .count_valid_groups(&self.groups, self.config.min_group_size)
                > 0
        } else {
            self.deadlock.has_valid_move(self.grid.cells())
        }
    }

    /// Shuffle the board, retrying once with a fresh seed if no move results.
    pub fn perform_shuffle(&mut self) -> ShuffleReport {
        let mut outcome = self.shuffler.shuffle(self.grid.cells_mut());
        let mut attempts = 0;

        if outcome != ShuffleOutcome::Skipped {
            attempts = 1;
            self.touch();

            // An unverified shuffle left no adjacent pair, so no group either.
            if !outcome.is_verified() || !self.has_valid_move() {
                let retry_seed = self.shuffler.rng_state() ^ RETRY_SALT;
                self.shuffler.reseed(retry_seed);
                outcome = self.shuffler.shuffle(self.grid.cells_mut());
                attempts = 2;
                self.touch();
            }
        }

        let resolved = self.has_valid_move();
        if attempts > 0 && !resolved {
            self.signals.shuffle_unresolved = true;
        }
        self.signals.shuffle_complete = true;

        ShuffleReport {
            attempts,
            outcome,
            resolved,
        }
    }

    // ---- group state ----

    /// Run detection now and refresh every display bucket.
    pub fn force_recompute_groups(&mut self) {
        self.detector
            .detect_groups(self.grid.cells_mut(), &mut self.groups);

        let thresholds = self.config.thresholds;
        let groups = &self.groups;
        for cell in self.grid.cells_mut() {
            cell.bucket = match lookup(groups, cell.group_id) {
                Some(g) => thresholds.bucket_for(g.size),
                None => DisplayBucket::Default,
            };
        }

        self.dirty = false;
        self.signals.groups_updated = true;
    }

    /// Recompute groups if the board changed since the last pass. Returns
    /// whether a pass ran.
    pub fn update_groups_if_dirty(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.force_recompute_groups();
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The group containing `index`, after refreshing stale groups.
    pub fn group_at(&mut self, index: usize) -> Option<Group> {
        self.update_groups_if_dirty();
        self.detector
            .group_containing(self.grid.cells(), &self.groups, index)
    }

    /// A cell worth blasting, if any move exists.
    pub fn hint(&mut self) -> Option<usize> {
        self.update_groups_if_dirty();
        if self.config.min_group_size > MIN_GROUP_SIZE {
            let min = self.config.min_group_size;
            return self.groups.iter().find(|g| g.size >= min).map(|g| g.anchor);
        }
        self.deadlock.find_move(self.grid.cells()).map(|(a, _)| a)
    }

    // ---- accessors ----

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn columns(&self) -> usize {
        self.grid.columns()
    }

    pub fn board_size(&self) -> usize {
        self.grid.len()
    }

    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        self.grid.get(index).copied()
    }

    pub fn cell_at_rc(&self, row: usize, column: usize) -> Option<Cell> {
        self.grid.get_at(row, column).copied()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cells(&self) -> &[Cell] {
        self.grid.cells()
    }

    /// Groups from the last detection pass; stale while [`is_dirty`](Self::is_dirty).
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Bumped on every board mutation.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    // ---- deltas and signals ----

    /// Indices cleared by the last successful blast.
    pub fn destroyed(&self) -> &[usize] {
        &self.destroyed
    }

    /// Moves made by the last `process_falls`.
    pub fn falls(&self) -> &[FallRecord] {
        &self.falls
    }

    /// Cells created by the last `spawn_blocks`.
    pub fn spawns(&self) -> &[SpawnRecord] {
        &self.spawns
    }

    /// The group removed by the last successful blast.
    pub fn last_blast(&self) -> Option<Group> {
        self.last_blast
    }

    /// Take and clear the pending signals.
    pub fn take_signals(&mut self) -> Signals {
        std::mem::take(&mut self.signals)
    }

    // ---- snapshot ----

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.clear();
        out.rows = self.grid.rows() as u8;
        out.columns = self.grid.columns() as u8;
        out.color_count = self.spawner.color_count();
        out.min_group_size = self.config.min_group_size;
        self.grid.write_color_grid(&mut out.colors);

        for (i, cell) in self.grid.cells().iter().enumerate() {
            let (r, c) = self.grid.position(i);
            out.buckets[r][c] = cell.bucket.as_u8();
            out.group_ids[r][c] = cell.group_id;
        }

        out.group_count = self.groups.len() as u16;
        out.largest_group = self.groups.iter().map(|g| g.size).max().unwrap_or(0);
        out.empty_cells = self.grid.empty_count() as u16;
        out.generation = self.generation;
        out.seed = self.seed;
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.generation = self.generation.wrapping_add(1);
    }

    fn clear_deltas(&mut self) {
        self.destroyed.clear();
        self.falls.clear();
        self.spawns.clear();
        self.last_blast = None;
    }
}
