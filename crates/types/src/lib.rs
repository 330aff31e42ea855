//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond small helpers, making them
//! usable in any context (board simulation, play driver, terminal rendering).
//!
//! # Board Dimensions
//!
//! Boards are rectangular and addressed row-major:
//!
//! - **Rows / columns**: each in `2..=10`
//! - **Index**: `row * columns + column`, row 0 is the top row
//! - **Capacity**: at most [`MAX_CELLS`] cells, so every scratch buffer can be
//!   a fixed-size array
//!
//! # Colors
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MAX_COLORS` | 6 | Number of distinct block colors supported |
//! | `EMPTY_COLOR` | 255 | Sentinel stored in [`Cell::color`] for an empty cell |
//! | `MIN_GROUP_SIZE` | 2 | Smallest blastable group |
//!
//! # Display Buckets
//!
//! Each cell carries a [`DisplayBucket`] derived from the size of the group it
//! belongs to. Buckets are purely cosmetic and never feed back into matching,
//! falling or shuffling.
//!
//! | Group size | Bucket |
//! |------------|--------|
//! | `> c` | `C` |
//! | `> b` | `B` |
//! | `> a` | `A` |
//! | otherwise | `Default` |
//!
//! # Examples
//!
//! ```
//! use blast_puzzle_types::{BoardConfig, Cell, DisplayBucket, SizeThresholds, EMPTY_COLOR};
//!
//! let cell = Cell::new(3);
//! assert_eq!(cell.color(), Some(3));
//! assert!(Cell::EMPTY.is_empty());
//! assert_eq!(Cell::EMPTY.color, EMPTY_COLOR);
//!
//! let t = SizeThresholds::default();
//! assert_eq!(t.bucket_for(2), DisplayBucket::Default);
//! assert_eq!(t.bucket_for(9), DisplayBucket::C);
//!
//! let cfg = BoardConfig { rows: 40, color_count: 1, ..BoardConfig::default() }.sanitized();
//! assert_eq!(cfg.rows, 10);
//! assert_eq!(cfg.color_count, 2);
//! ```

use serde::{Deserialize, Serialize};

/// Number of distinct colors a board can hold.
pub const MAX_COLORS: u8 = 6;

/// Color value marking an empty cell.
pub const EMPTY_COLOR: u8 = 255;

/// Smallest row/column count accepted.
pub const MIN_BOARD_DIM: u8 = 2;

/// Largest row/column count accepted.
pub const MAX_BOARD_DIM: u8 = 10;

/// Largest possible board, in cells.
pub const MAX_CELLS: usize = (MAX_BOARD_DIM as usize) * (MAX_BOARD_DIM as usize);

/// Upper bound on simultaneously detected groups (every group has at least two cells).
pub const MAX_GROUPS: usize = MAX_CELLS / 2;

/// Minimum number of cells in a blastable group.
pub const MIN_GROUP_SIZE: u16 = 2;

/// Default board height.
pub const DEFAULT_ROWS: u8 = 8;

/// Default board width.
pub const DEFAULT_COLUMNS: u8 = 8;

/// Default number of colors in play.
pub const DEFAULT_COLOR_COUNT: u8 = 4;

/// Size-tier of the group a cell currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayBucket {
    #[default]
    Default,
    A,
    B,
    C,
}

impl DisplayBucket {
    /// Numeric tier (0 = default, 3 = largest).
    pub fn as_u8(self) -> u8 {
        match self {
            DisplayBucket::Default => 0,
            DisplayBucket::A => 1,
            DisplayBucket::B => 2,
            DisplayBucket::C => 3,
        }
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(DisplayBucket::Default),
            1 => Some(DisplayBucket::A),
            2 => Some(DisplayBucket::B),
            3 => Some(DisplayBucket::C),
            _ => None,
        }
    }
}

/// One board cell.
///
/// `group_id` is an ephemeral tag valid only until the next detection pass;
/// an empty cell always carries `group_id == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Color index in `0..MAX_COLORS`, or [`EMPTY_COLOR`].
    pub color: u8,
    pub bucket: DisplayBucket,
    /// Group tag from the last detection pass (0 = ungrouped).
    pub group_id: u16,
}

impl Cell {
    /// An empty cell.
    pub const EMPTY: Cell = Cell {
        color: EMPTY_COLOR,
        bucket: DisplayBucket::Default,
        group_id: 0,
    };

    /// Create an ungrouped cell of the given color.
    pub const fn new(color: u8) -> Self {
        Self {
            color,
            bucket: DisplayBucket::Default,
            group_id: 0,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.color == EMPTY_COLOR
    }

    /// Color of an occupied cell, `None` when empty.
    #[inline(always)]
    pub fn color(&self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.color)
        }
    }

    /// Reset to the empty state.
    pub fn clear(&mut self) {
        *self = Cell::EMPTY;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::EMPTY
    }
}

/// A detected maximal same-color region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub id: u16,
    pub color: u8,
    pub size: u16,
    /// Board index of the first cell reached by the row-major scan.
    pub anchor: usize,
}

/// One cell moved by gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FallRecord {
    pub from: usize,
    pub to: usize,
    /// Rows fallen (`to` row minus `from` row).
    pub distance: usize,
}

/// One cell created by the spawn generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub target: usize,
    pub color: u8,
    /// How many rows above the board the new cell conceptually starts (>= 1).
    pub rows_above: usize,
}

/// Ascending group-size thresholds for [`DisplayBucket`] selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeThresholds {
    pub a: u16,
    pub b: u16,
    pub c: u16,
}

impl SizeThresholds {
    /// Bucket for a group of `size` cells.
    pub fn bucket_for(&self, size: u16) -> DisplayBucket {
        if size > self.c {
            DisplayBucket::C
        } else if size > self.b {
            DisplayBucket::B
        } else if size > self.a {
            DisplayBucket::A
        } else {
            DisplayBucket::Default
        }
    }

    /// Force strictly ascending thresholds (`b > a`, `c > b`).
    pub fn ascending(self) -> Self {
        let a = self.a.max(MIN_GROUP_SIZE);
        let b = self.b.max(a.saturating_add(1));
        let c = self.c.max(b.saturating_add(1));
        Self { a, b, c }
    }
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self { a: 3, b: 5, c: 8 }
    }
}

/// Board configuration supplied by the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: u8,
    pub columns: u8,
    /// Number of colors spawned (`K`).
    pub color_count: u8,
    pub min_group_size: u16,
    pub thresholds: SizeThresholds,
    /// Seed for the random sources; `None` lets the caller pick one.
    pub seed: Option<u32>,
}

impl BoardConfig {
    /// Clamp every field into its supported range.
    ///
    /// Rows and columns land in `2..=10`, the color count in `2..=6`, the
    /// minimum group size is at least 2 and the thresholds become ascending.
    pub fn sanitized(self) -> Self {
        Self {
            rows: self.rows.clamp(MIN_BOARD_DIM, MAX_BOARD_DIM),
            columns: self.columns.clamp(MIN_BOARD_DIM, MAX_BOARD_DIM),
            color_count: clamp_color_count(self.color_count),
            min_group_size: self.min_group_size.max(MIN_GROUP_SIZE),
            thresholds: self.thresholds.ascending(),
            seed: self.seed,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            color_count: DEFAULT_COLOR_COUNT,
            min_group_size: MIN_GROUP_SIZE,
            thresholds: SizeThresholds::default(),
            seed: None,
        }
    }
}

/// Clamp a requested color count into `1..=MAX_COLORS`, then raise it to 2
/// so the board stays playable.
pub fn clamp_color_count(k: u8) -> u8 {
    k.clamp(1, MAX_COLORS).max(2)
}

/// Commands a front end can issue against a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Blast the group under the cursor
    Blast,
    /// Reveal one available move
    Hint,
    /// Shuffle the board on demand
    Shuffle,
    /// Generate a fresh board and reset counters
    Restart,
}

impl PlayerCommand {
    /// Parse a command from its camelCase name (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use blast_puzzle_types::PlayerCommand;
    ///
    /// assert_eq!(PlayerCommand::from_str("blast"), Some(PlayerCommand::Blast));
    /// assert_eq!(PlayerCommand::from_str("cursorLeft"), Some(PlayerCommand::CursorLeft));
    /// assert_eq!(PlayerCommand::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorup" => Some(PlayerCommand::CursorUp),
            "cursordown" => Some(PlayerCommand::CursorDown),
            "cursorleft" => Some(PlayerCommand::CursorLeft),
            "cursorright" => Some(PlayerCommand::CursorRight),
            "blast" => Some(PlayerCommand::Blast),
            "hint" => Some(PlayerCommand::Hint),
            "shuffle" => Some(PlayerCommand::Shuffle),
            "restart" => Some(PlayerCommand::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerCommand::CursorUp => "cursorUp",
            PlayerCommand::CursorDown => "cursorDown",
            PlayerCommand::CursorLeft => "cursorLeft",
            PlayerCommand::CursorRight => "cursorRight",
            PlayerCommand::Blast => "blast",
            PlayerCommand::Hint => "hint",
            PlayerCommand::Shuffle => "shuffle",
            PlayerCommand::Restart => "restart",
        }
    }
}
