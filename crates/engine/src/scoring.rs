//! Scoring module - points for a blast
//!
//! Every removed cell is worth [`POINTS_PER_CELL`]. Groups above a display
//! threshold earn a per-cell bonus for the highest tier they reach only:
//!
//! | Group size | Bonus per cell |
//! |------------|----------------|
//! | `> c` | 5 |
//! | `> b` | 3 |
//! | `> a` | 2 |

use crate::types::SizeThresholds;

pub const POINTS_PER_CELL: u32 = 10;

/// Per-cell bonus for the `c`, `b` and `a` tiers.
pub const TIER_BONUS: [u32; 3] = [5, 3, 2];

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlastScore {
    pub base: u32,
    pub bonus: u32,
    pub total: u32,
}

/// Bonus points for a blast of `size` cells.
pub fn calculate_bonus(size: u16, thresholds: &SizeThresholds) -> u32 {
    let n = size as u32;
    if size > thresholds.c {
        n * TIER_BONUS[0]
    } else if size > thresholds.b {
        n * TIER_BONUS[1]
    } else if size > thresholds.a {
        n * TIER_BONUS[2]
    } else {
        0
    }
}

pub fn calculate_blast_score(size: u16, thresholds: &SizeThresholds) -> BlastScore {
    let base = size as u32 * POINTS_PER_CELL;
    let bonus = calculate_bonus(size, thresholds);
    BlastScore {
        base,
        bonus,
        total: base.saturating_add(bonus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_has_no_bonus() {
        let s = calculate_blast_score(2, &SizeThresholds::default());
        assert_eq!(s, BlastScore { base: 20, bonus: 0, total: 20 });
    }

    #[test]
    fn test_tiers_use_strictly_greater() {
        let t = SizeThresholds::default(); // 3 / 5 / 8
        assert_eq!(calculate_bonus(3, &t), 0);
        assert_eq!(calculate_bonus(4, &t), 8);
        assert_eq!(calculate_bonus(5, &t), 10);
        assert_eq!(calculate_bonus(6, &t), 18);
        assert_eq!(calculate_bonus(8, &t), 24);
        assert_eq!(calculate_bonus(9, &t), 45);
    }

    #[test]
    fn test_only_highest_tier_applies() {
        let s = calculate_blast_score(12, &SizeThresholds::default());
        assert_eq!(s.base, 120);
        assert_eq!(s.bonus, 60);
        assert_eq!(s.total, 180);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = SizeThresholds { a: 2, b: 3, c: 4 };
        assert_eq!(calculate_blast_score(3, &t).total, 30 + 6);
        assert_eq!(calculate_blast_score(5, &t).total, 50 + 25);
    }
}
