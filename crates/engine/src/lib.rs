//! Play driver built on the board core: turn cascade, scoring and a bot.
//!
//! The core only reports what a blast removed; everything a game layers on
//! top (score, move counters, input locking during a cascade) lives here.

pub use blast_puzzle_core as core;
pub use blast_puzzle_types as types;

pub mod autoplay;
pub mod scoring;
pub mod session;

pub use autoplay::{choose_blast, Autoplay, TurnReport};
pub use scoring::{calculate_blast_score, BlastScore};
pub use session::{
    BlastError, BlastOutcome, CascadeStep, CascadeSummary, Phase, PlaySession, SessionSnapshot,
    Status,
};
