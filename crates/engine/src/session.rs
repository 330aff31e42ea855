//! Play session - drives the board engine through whole turns
//!
//! A blast starts a cascade. Each call to [`PlaySession::advance`] runs one
//! stage and stops wherever a front end would wait for an animation:
//!
//! ```text
//! blast -> falls? -> spawns? -> settle groups -> deadlock? -> shuffle -> playing
//! ```
//!
//! Input other than cursor movement is refused with [`BlastError::Busy`]
//! until the cascade returns to [`Phase::Playing`].

use crate::core::{BoardEngine, BoardSnapshot, ShuffleReport};
use crate::scoring::calculate_blast_score;
use crate::types::{BoardConfig, PlayerCommand};

/// Upper bound on `advance` calls in one `run_cascade`.
const MAX_CASCADE_STEPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlastError {
    OutOfRange,
    EmptyCell,
    GroupTooSmall,
    Busy,
}

impl BlastError {
    pub fn code(self) -> &'static str {
        match self {
            BlastError::OutOfRange | BlastError::EmptyCell | BlastError::GroupTooSmall => {
                "invalid_blast"
            }
            BlastError::Busy => "busy",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            BlastError::OutOfRange => "cell is outside the board",
            BlastError::EmptyCell => "cell is empty",
            BlastError::GroupTooSmall => "group is smaller than the minimum",
            BlastError::Busy => "board is still settling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting input.
    Playing,
    /// Cascade in progress (falls, spawns, settling).
    Animating,
    /// A deadlock was found; the next `advance` shuffles.
    Shuffling,
}

/// One stage run by [`PlaySession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    /// Nothing to do; the session is playing.
    Idle,
    Fell(usize),
    Spawned(usize),
    /// Board settled with a move available.
    Settled,
    Deadlocked,
    Shuffled(ShuffleReport),
}

/// Latest event, for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Blasted { size: u16, points: u32 },
    Rejected(BlastError),
    Deadlocked,
    Shuffled,
    /// Shuffling could not produce a move.
    NoMoves,
    Hint,
    Restarted,
}

/// Result of a successful blast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlastOutcome {
    pub index: usize,
    pub size: u16,
    pub color: u8,
    pub points: u32,
}

/// Totals from one [`PlaySession::run_cascade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeSummary {
    pub fell: usize,
    pub spawned: usize,
    pub shuffles: u32,
    /// A shuffle ran and still left no move.
    pub unresolved: bool,
}

/// Session counters and cursor next to a board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub board: BoardSnapshot,
    pub score: u32,
    pub moves: u32,
    pub shuffles: u32,
    pub cursor: (u8, u8),
    pub hint: Option<(u8, u8)>,
    pub phase: Phase,
    pub status: Status,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            board: BoardSnapshot::default(),
            score: 0,
            moves: 0,
            shuffles: 0,
            cursor: (0, 0),
            hint: None,
            phase: Phase::Playing,
            status: Status::Ready,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaySession {
    engine: BoardEngine,
    phase: Phase,
    status: Status,
    score: u32,
    moves: u32,
    shuffles: u32,
    cursor: (usize, usize),
    hint: Option<usize>,
}

impl PlaySession {
    /// Create a session and generate its first board.
    pub fn new(config: BoardConfig) -> Self {
        let mut engine = BoardEngine::new(config);
        engine.generate_board();
        Self::with_engine(engine)
    }

    /// Wrap an engine whose board is already populated.
    pub fn with_engine(engine: BoardEngine) -> Self {
        Self {
            engine,
            phase: Phase::Playing,
            status: Status::Ready,
            score: 0,
            moves: 0,
            shuffles: 0,
            cursor: (0, 0),
            hint: None,
        }
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut BoardEngine {
        &mut self.engine
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn shuffles(&self) -> u32 {
        self.shuffles
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn hint_cell(&self) -> Option<usize> {
        self.hint
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Playing
    }

    /// Move the cursor, clamped to the board.
    pub fn move_cursor(&mut self, d_row: i32, d_column: i32) {
        let max_row = self.engine.rows() as i32 - 1;
        let max_col = self.engine.columns() as i32 - 1;
        let row = (self.cursor.0 as i32 + d_row).clamp(0, max_row);
        let col = (self.cursor.1 as i32 + d_column).clamp(0, max_col);
        self.cursor = (row as usize, col as usize);
    }

    pub fn set_cursor(&mut self, row: usize, column: usize) {
        self.cursor = (
            row.min(self.engine.rows() - 1),
            column.min(self.engine.columns() - 1),
        );
    }

    /// Blast the group containing `index` and start a cascade.
    pub fn blast_at(&mut self, index: usize) -> Result<BlastOutcome, BlastError> {
        let result = self.try_blast(index);
        if let Err(e) = result {
            self.status = Status::Rejected(e);
        }
        result
    }

    fn try_blast(&mut self, index: usize) -> Result<BlastOutcome, BlastError> {
        if self.is_busy() {
            return Err(BlastError::Busy);
        }
        let cell = self.engine.cell_at(index).ok_or(BlastError::OutOfRange)?;
        if cell.is_empty() {
            return Err(BlastError::EmptyCell);
        }
        let min = self.engine.min_group_size();
        match self.engine.group_at(index) {
            Some(g) if g.size >= min => {}
            _ => return Err(BlastError::GroupTooSmall),
        }
        if !self.engine.try_blast_at(index) {
            return Err(BlastError::GroupTooSmall);
        }
        let group = self.engine.last_blast().ok_or(BlastError::GroupTooSmall)?;

        let points = calculate_blast_score(group.size, &self.engine.config().thresholds).total;
        self.score = self.score.saturating_add(points);
        self.moves += 1;
        self.hint = None;
        self.phase = Phase::Animating;
        self.status = Status::Blasted {
            size: group.size,
            points,
        };

        Ok(BlastOutcome {
            index,
            size: group.size,
            color: group.color,
            points,
        })
    }

    pub fn blast_at_cursor(&mut self) -> Result<BlastOutcome, BlastError> {
        let (row, col) = self.cursor;
        let index = row * self.engine.columns() + col;
        self.blast_at(index)
    }

    /// Run the next cascade stage.
    pub fn advance(&mut self) -> CascadeStep {
        match self.phase {
            Phase::Playing => CascadeStep::Idle,
            Phase::Animating => {
                let fell = self.engine.process_falls();
                if fell > 0 {
                    return CascadeStep::Fell(fell);
                }
                let spawned = self.engine.spawn_blocks();
                if spawned > 0 {
                    return CascadeStep::Spawned(spawned);
                }

                self.engine.update_groups_if_dirty();
                if self.engine.check_deadlock() {
                    self.phase = Phase::Shuffling;
                    self.status = Status::Deadlocked;
                    return CascadeStep::Deadlocked;
                }
                self.phase = Phase::Playing;
                CascadeStep::Settled
            }
            Phase::Shuffling => {
                let report = self.shuffle_board();
                self.phase = Phase::Playing;
                CascadeStep::Shuffled(report)
            }
        }
    }

    /// Advance until the session is playing again.
    pub fn run_cascade(&mut self) -> CascadeSummary {
        let mut summary = CascadeSummary::default();
        for _ in 0..MAX_CASCADE_STEPS {
            match self.advance() {
                CascadeStep::Idle | CascadeStep::Settled => break,
                CascadeStep::Fell(n) => summary.fell += n,
                CascadeStep::Spawned(n) => summary.spawned += n,
                CascadeStep::Deadlocked => {}
                CascadeStep::Shuffled(report) => {
                    summary.shuffles += 1;
                    summary.unresolved |= !report.resolved;
                    break;
                }
            }
        }
        summary
    }

    /// Shuffle on request.
    pub fn shuffle_now(&mut self) -> Result<ShuffleReport, BlastError> {
        if self.is_busy() {
            self.status = Status::Rejected(BlastError::Busy);
            return Err(BlastError::Busy);
        }
        Ok(self.shuffle_board())
    }

    fn shuffle_board(&mut self) -> ShuffleReport {
        let report = self.engine.perform_shuffle();
        if report.attempts > 0 {
            self.shuffles += 1;
        }
        self.hint = None;
        self.status = if report.resolved {
            Status::Shuffled
        } else {
            Status::NoMoves
        };
        report
    }

    /// Point the cursor at a blastable cell.
    pub fn show_hint(&mut self) -> Option<usize> {
        if self.is_busy() {
            return None;
        }
        self.hint = self.engine.hint();
        match self.hint {
            Some(index) => {
                let columns = self.engine.columns();
                self.cursor = (index / columns, index % columns);
                self.status = Status::Hint;
            }
            None => self.status = Status::NoMoves,
        }
        self.hint
    }

    /// New board, counters back to zero.
    pub fn restart(&mut self) {
        self.engine.reset();
        self.phase = Phase::Playing;
        self.status = Status::Restarted;
        self.score = 0;
        self.moves = 0;
        self.shuffles = 0;
        self.hint = None;
    }

    /// Apply one front-end command. Only blasts and shuffles can be refused.
    pub fn apply(&mut self, command: PlayerCommand) -> Result<(), BlastError> {
        match command {
            PlayerCommand::CursorUp => self.move_cursor(-1, 0),
            PlayerCommand::CursorDown => self.move_cursor(1, 0),
            PlayerCommand::CursorLeft => self.move_cursor(0, -1),
            PlayerCommand::CursorRight => self.move_cursor(0, 1),
            PlayerCommand::Blast => {
                self.blast_at_cursor()?;
            }
            PlayerCommand::Hint => {
                self.show_hint();
            }
            PlayerCommand::Shuffle => {
                self.shuffle_now()?;
            }
            PlayerCommand::Restart => self.restart(),
        }
        Ok(())
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        self.engine.snapshot_into(&mut out.board);
        out.score = self.score;
        out.moves = self.moves;
        out.shuffles = self.shuffles;
        out.cursor = (self.cursor.0 as u8, self.cursor.1 as u8);
        let columns = self.engine.columns();
        out.hint = self
            .hint
            .map(|i| ((i / columns) as u8, (i % columns) as u8));
        out.phase = self.phase;
        out.status = self.status;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
