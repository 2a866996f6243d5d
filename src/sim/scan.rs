//! Matching scanned codes against targets

use serde::{Deserialize, Serialize};

use super::score::ScoreLedger;
use super::state::{SessionPhase, Target, TargetId, TargetKind};

/// What a submitted code did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOutcome {
    /// Not playing, or paused
    Ignored,
    /// The reserved pause code; carries the new pause state
    PauseToggled(bool),
    Good(TargetId),
    Bad(TargetId),
    Bonus(TargetId),
    /// No active target carries the code
    NoMatch,
}

impl ScanOutcome {
    /// The target that was hit, if any
    pub fn target(&self) -> Option<TargetId> {
        match self {
            ScanOutcome::Good(id) | ScanOutcome::Bad(id) | ScanOutcome::Bonus(id) => Some(*id),
            _ => None,
        }
    }
}

/// Resolve a scan during active play.
///
/// Only targets of the current sub-phase are considered (bonus targets during
/// the bonus phase, regular ones during a round). Codes may repeat, so the
/// first unscanned match in insertion order wins and the search stops there.
/// The matched target is marked scanned; the caller schedules its removal.
pub fn resolve(
    phase: SessionPhase,
    code: &str,
    targets: &mut [Target],
    ledger: &mut ScoreLedger,
) -> ScanOutcome {
    if !phase.is_playing() {
        return ScanOutcome::Ignored;
    }
    let bonus_phase = phase == SessionPhase::BonusRound;

    let Some(target) = targets
        .iter_mut()
        .find(|t| t.is_active() && t.kind.is_bonus() == bonus_phase && t.code == code)
    else {
        log::debug!("Scan {code} matched no target");
        return ScanOutcome::NoMatch;
    };

    target.scanned = true;
    let id = target.id;
    match target.kind {
        TargetKind::BonusGood => {
            ledger.apply_bonus();
            ScanOutcome::Bonus(id)
        }
        TargetKind::Bad => {
            ledger.apply_bad();
            ScanOutcome::Bad(id)
        }
        TargetKind::Good => {
            ledger.apply_good();
            ScanOutcome::Good(id)
        }
    }
}
