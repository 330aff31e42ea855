//! Terminal input module (session-facing).
//!
//! Maps `crossterm` key events into [`crate::types::PlayerCommand`] values. The
//! mapping is stateless: a puzzle board has no held-key repeat, so each press
//! is one command.

pub mod map;

pub use blast_puzzle_types as types;

pub use map::{handle_key_event, should_quit};
