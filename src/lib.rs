//! Blast puzzle (workspace facade crate).
//!
//! Re-exports the workspace crates as `blast_puzzle::{core,engine,input,term,types}`
//! and holds the runner's configuration loading in [`cli`].

pub use blast_puzzle_core as core;
pub use blast_puzzle_engine as engine;
pub use blast_puzzle_input as input;
pub use blast_puzzle_term as term;
pub use blast_puzzle_types as types;

pub mod cli;
