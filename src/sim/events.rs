//! Events emitted for the rendering/UI layer
//!
//! The engine never touches presentation. It queues these and the host drains
//! them after each call.

use serde::{Deserialize, Serialize};

use super::score::ScoreState;
use super::state::{SessionPhase, Target, TargetId, TargetKind};

/// Why a target left the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Grace period after a scan elapsed
    Scanned,
    /// TTL ran out before anyone scanned it
    Expired,
    /// The round or bonus phase it belonged to ended
    PhaseEnded,
}

/// Feedback line shown on the round summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsRating {
    Fantastic,
    NotBad,
    CouldBeBetter,
    KeepPracticing,
}

impl StatsRating {
    pub fn from_accuracy(accuracy: u32) -> Self {
        match accuracy {
            90.. => StatsRating::Fantastic,
            70..=89 => StatsRating::NotBad,
            50..=69 => StatsRating::CouldBeBetter,
            _ => StatsRating::KeepPracticing,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            StatsRating::Fantastic => "Fantastic!",
            StatsRating::NotBad => "Not bad!",
            StatsRating::CouldBeBetter => "You can do better!",
            StatsRating::KeepPracticing => "Keep practicing!",
        }
    }
}

/// Summary of a finished round (after bonus settlement)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    pub round: u32,
    pub accuracy: u32,
    pub good: u32,
    pub bad: u32,
    pub bonus_scanned: u32,
    pub bonus_total: u32,
    pub multiplier: u32,
    pub rating: StatsRating,
}

/// Everything the presentation layer may react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PhaseChanged { phase: SessionPhase },
    TargetSpawned { target: Target },
    TargetScanned { id: TargetId, kind: TargetKind },
    TargetRemoved { id: TargetId, reason: RemovalReason },
    ScoreChanged { score: ScoreState },
    TimerTick { time_remaining: u32 },
    RoundAdvanced { round: u32, total_rounds: u32 },
    BonusStarted { total: u32, duration_secs: u32 },
    RoundStatsReady { stats: RoundStats },
    GameOver { final_score: u64 },
    PausedChanged { paused: bool },
    /// Diagnostic: a scanned code matched nothing
    ScanMissed { code: String },
}
