//! Scan Whack - A timed barcode-scanning arcade game
//!
//! Core modules:
//! - `sim`: Deterministic session engine (rounds, spawning, scanning, bonus physics)
//! - `highscores`: Top-10 leaderboard
//! - `settings`: Player-tunable session settings
//! - `persistence`: Storage backends shared by settings and high scores
//! - `platform`: Browser/native host glue

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreEntry, HighScores, LeaderboardError};
pub use persistence::{MemoryStorage, PersistenceError, Storage};
pub use settings::Settings;
pub use sim::{GameEvent, ScanOutcome, Session, SessionPhase};

/// Game configuration constants
pub mod consts {
    /// Timer tick period (the countdown is in whole seconds)
    pub const TIMER_TICK_MS: u64 = 1000;

    /// Default arena dimensions (host resizes on layout changes)
    pub const DEFAULT_ARENA_WIDTH: f32 = 1280.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 720.0;

    /// Regular target footprint, including the printed code and padding
    pub const TARGET_WIDTH: f32 = 260.0;
    pub const TARGET_HEIGHT: f32 = 200.0;
    /// Bonus targets are smaller so they can bounce around
    pub const BONUS_TARGET_WIDTH: f32 = 140.0;
    pub const BONUS_TARGET_HEIGHT: f32 = 140.0;

    /// Extra clearance kept around every target during placement
    pub const PLACEMENT_MARGIN: f32 = 20.0;
    /// Random placement attempts before a spawn is skipped
    pub const PLACEMENT_TRIALS: u32 = 50;

    /// Generated codes are 4-digit numbers in this range (inclusive)
    pub const CODE_MIN: u32 = 1000;
    pub const CODE_MAX: u32 = 9999;
    /// Reserved scan that toggles pause. Outside the generated range.
    pub const PAUSE_CODE: &str = "0000";

    /// Points per scan
    pub const GOOD_POINTS: u64 = 10;
    pub const BAD_PENALTY: u64 = 10;

    /// Grace period between a scan and the target's removal
    pub const REMOVAL_DELAY_MS: u64 = 500;

    /// Bonus target speed band (px per frame, per axis)
    pub const BONUS_SPEED_MIN: f32 = 1.5;
    pub const BONUS_SPEED_MAX: f32 = 3.5;
    /// Velocity jitter applied on bonus collisions (px per frame, per axis)
    pub const COLLISION_JITTER: f32 = 0.5;
}
