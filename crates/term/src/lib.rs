//! Terminal front end for the blast puzzle.
//!
//! Rendering is split in two: [`GameView`] draws a session snapshot into a
//! [`FrameBuffer`] (pure, testable), and [`TerminalRenderer`] diffs frames and
//! writes the changes through crossterm. No widget toolkit is involved, which
//! keeps the per-frame path free of allocation and gives exact control over
//! cell aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blast_puzzle_core as core;
pub use blast_puzzle_engine as engine;
pub use blast_puzzle_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{bucket_glyph, color_rgb, AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
