//! Greedy bot: always blast the largest group.

use crate::core::BoardEngine;
use crate::session::{BlastOutcome, CascadeSummary, PlaySession};

/// One turn played by [`Autoplay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub turn: u32,
    pub blast: BlastOutcome,
    pub cascade: CascadeSummary,
    pub score: u32,
}

/// Pick the anchor of the largest blastable group; ties go to the lowest
/// anchor index.
pub fn choose_blast(engine: &mut BoardEngine) -> Option<usize> {
    engine.update_groups_if_dirty();
    let min = engine.min_group_size();
    engine
        .groups()
        .iter()
        .filter(|g| g.size >= min)
        .min_by_key(|g| (std::cmp::Reverse(g.size), g.anchor))
        .map(|g| g.anchor)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Autoplay {
    turns: u32,
}

impl Autoplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Blast once and run the cascade to completion. Returns `None` when the
    /// session is busy or no group can be blasted.
    pub fn play_turn(&mut self, session: &mut PlaySession) -> Option<TurnReport> {
        if session.is_busy() {
            return None;
        }
        let index = choose_blast(session.engine_mut())?;
        let blast = session.blast_at(index).ok()?;
        let cascade = session.run_cascade();
        self.turns += 1;

        Some(TurnReport {
            turn: self.turns,
            blast,
            cascade,
            score: session.score(),
        })
    }
}
