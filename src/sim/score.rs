//! Score and per-round accuracy bookkeeping

use serde::{Deserialize, Serialize};

use crate::consts::{BAD_PENALTY, GOOD_POINTS};

/// Snapshot of the scoreboard, as shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    /// Good scans this round
    pub good_count: u32,
    /// Bad scans this round
    pub bad_count: u32,
    pub bonus_scanned: u32,
    pub bonus_total: u32,
    /// 1 or 2, settled when the bonus phase ends
    pub multiplier: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreLedger {
    state: ScoreState,
    /// Score when the current round started
    previous_round_score: u64,
}

impl Default for ScoreLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self {
            state: ScoreState {
                multiplier: 1,
                ..Default::default()
            },
            previous_round_score: 0,
        }
    }

    pub fn state(&self) -> ScoreState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn previous_round_score(&self) -> u64 {
        self.previous_round_score
    }

    /// Snapshot the score and clear the per-round counters
    pub fn begin_round(&mut self) {
        self.previous_round_score = self.state.score;
        self.state.good_count = 0;
        self.state.bad_count = 0;
        self.state.bonus_scanned = 0;
        self.state.bonus_total = 0;
        self.state.multiplier = 1;
    }

    pub fn begin_bonus(&mut self, total: u32) {
        self.state.bonus_scanned = 0;
        self.state.bonus_total = total;
    }

    pub fn apply_good(&mut self) {
        self.state.score += GOOD_POINTS;
        self.state.good_count += 1;
    }

    pub fn apply_bad(&mut self) {
        self.state.score = self.state.score.saturating_sub(BAD_PENALTY);
        self.state.bad_count += 1;
    }

    pub fn apply_bonus(&mut self) {
        self.state.bonus_scanned += 1;
    }

    /// All bonus targets of the phase were scanned
    pub fn bonus_cleared(&self) -> bool {
        self.state.bonus_total > 0 && self.state.bonus_scanned >= self.state.bonus_total
    }

    /// Percent of good scans this round, rounded half away from zero; 0 with no scans
    pub fn current_accuracy(&self) -> u32 {
        let attempts = self.state.good_count + self.state.bad_count;
        if attempts == 0 {
            return 0;
        }
        (100.0 * self.state.good_count as f64 / attempts as f64).round() as u32
    }

    /// Settle the bonus multiplier and rescale this round's score delta.
    ///
    /// Returns the multiplier applied.
    pub fn settle_bonus(&mut self) -> u32 {
        let multiplier = if self.bonus_cleared() { 2 } else { 1 };
        let base = self.previous_round_score as i64;
        let delta = self.state.score as i64 - base;
        self.state.score = (base + delta * multiplier as i64).max(0) as u64;
        self.state.multiplier = multiplier;
        multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bad_scan_clamps_at_zero() {
        let mut ledger = ScoreLedger::new();
        ledger.apply_good();
        ledger.state.score = 5;
        ledger.apply_bad();
        assert_eq!(ledger.score(), 0);
        assert_eq!(ledger.state().bad_count, 1);
    }

    #[test]
    fn test_accuracy() {
        let mut ledger = ScoreLedger::new();
        assert_eq!(ledger.current_accuracy(), 0);

        for _ in 0..9 {
            ledger.apply_good();
        }
        ledger.apply_bad();
        assert_eq!(ledger.current_accuracy(), 90);

        let mut ledger = ScoreLedger::new();
        ledger.apply_good();
        ledger.apply_good();
        ledger.apply_bad();
        assert_eq!(ledger.current_accuracy(), 67);
    }

    #[test]
    fn test_full_bonus_doubles_round_delta() {
        let mut ledger = ScoreLedger::new();
        for _ in 0..3 {
            ledger.apply_good();
        }
        ledger.begin_round();
        assert_eq!(ledger.previous_round_score(), 30);

        for _ in 0..4 {
            ledger.apply_good();
        }
        ledger.begin_bonus(5);
        for _ in 0..5 {
            ledger.apply_bonus();
        }
        assert_eq!(ledger.settle_bonus(), 2);
        assert_eq!(ledger.score(), 30 + 80);
        assert_eq!(ledger.state().multiplier, 2);
    }

    #[test]
    fn test_partial_bonus_keeps_delta() {
        let mut ledger = ScoreLedger::new();
        ledger.begin_round();
        for _ in 0..4 {
            ledger.apply_good();
        }
        ledger.begin_bonus(5);
        for _ in 0..4 {
            ledger.apply_bonus();
        }
        assert_eq!(ledger.settle_bonus(), 1);
        assert_eq!(ledger.score(), 40);
    }

    #[test]
    fn test_negative_delta_is_doubled_and_clamped() {
        let mut ledger = ScoreLedger::new();
        for _ in 0..2 {
            ledger.apply_good();
        }
        ledger.begin_round();
        ledger.apply_bad();
        ledger.begin_bonus(1);
        ledger.apply_bonus();
        ledger.settle_bonus();
        assert_eq!(ledger.score(), 0);
    }

    #[test]
    fn test_begin_round_resets_counters() {
        let mut ledger = ScoreLedger::new();
        ledger.apply_good();
        ledger.apply_bad();
        ledger.begin_bonus(5);
        ledger.apply_bonus();
        ledger.begin_round();
        let state = ledger.state();
        assert_eq!((state.good_count, state.bad_count), (0, 0));
        assert_eq!((state.bonus_scanned, state.bonus_total), (0, 0));
        assert_eq!(state.multiplier, 1);
    }

    proptest! {
        #[test]
        fn prop_score_never_negative(ops in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut ledger = ScoreLedger::new();
            let mut expected: i64 = 0;
            for good in ops {
                if good {
                    ledger.apply_good();
                    expected += 10;
                } else {
                    ledger.apply_bad();
                    expected = (expected - 10).max(0);
                }
                prop_assert_eq!(ledger.score() as i64, expected);
            }
        }
    }
}
