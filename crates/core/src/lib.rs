//! Board simulation core - pure, deterministic, and testable
//!
//! This crate holds every rule of the blast puzzle: the grid, group detection,
//! gravity, spawning, deadlock detection and the reshuffle. It has **zero
//! dependencies** on terminals, input devices or I/O, making it:
//!
//! - **Deterministic**: the same seed produces the same boards and shuffles
//! - **Testable**: each component runs on a bare cell slice
//! - **Portable**: usable from the terminal runner, headless bots and benches
//! - **Fast**: fixed-capacity buffers, no allocation after construction
//!
//! # Module Structure
//!
//! - [`grid`]: flat row-major cell store, up to 10x10
//! - [`groups`]: iterative flood fill, dense group ids
//! - [`fall`]: per-column gravity compaction
//! - [`spawn`]: random refill of column tops
//! - [`deadlock`]: early-exit adjacent-pair scan
//! - [`shuffle`]: multiset-preserving cluster shuffle with verification
//! - [`board`]: [`BoardEngine`], the orchestrator that owns all of the above
//! - [`rng`]: seedable linear congruential generator
//! - [`snapshot`]: fixed-size board copy for observers
//!
//! # Turn Flow
//!
//! A caller blasts, then drives gravity and spawning itself so it can animate
//! each step, then asks for a deadlock check:
//!
//! ```
//! use blast_puzzle_core::BoardEngine;
//! use blast_puzzle_types::BoardConfig;
//!
//! let mut engine = BoardEngine::new(BoardConfig { seed: Some(42), ..BoardConfig::default() });
//! engine.generate_board();
//! assert!(engine.take_signals().board_ready);
//!
//! let target = engine.hint().expect("a fresh board has a move");
//! assert!(engine.try_blast_at(target));
//! let removed = engine.destroyed().len();
//!
//! engine.process_falls();
//! assert_eq!(engine.spawn_blocks(), removed);
//!
//! if engine.check_deadlock() {
//!     engine.perform_shuffle();
//! }
//! ```

pub mod board;
pub mod deadlock;
pub mod fall;
pub mod grid;
pub mod groups;
pub mod rng;
pub mod shuffle;
pub mod snapshot;
pub mod spawn;

pub use blast_puzzle_types as types;

// Re-export commonly used types for convenience
pub use board::{BoardEngine, ShuffleReport, Signals, DEFAULT_SEED};
pub use deadlock::DeadlockDetector;
pub use fall::{FallList, FallResolver};
pub use grid::Grid;
pub use groups::{GroupDetector, GroupList, IndexList};
pub use rng::SimpleRng;
pub use shuffle::{ShuffleOutcome, ShuffleResolver};
pub use snapshot::BoardSnapshot;
pub use spawn::{SpawnGenerator, SpawnList};
