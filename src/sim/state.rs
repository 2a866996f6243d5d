//! Session data model
//!
//! Targets, per-round difficulty and the coarse session phase.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the player to start
    #[default]
    Menu,
    /// Regular timed round with spawning targets
    Round,
    /// Timed bonus phase with moving targets
    BonusRound,
    /// Between-round summary, waiting for advance
    RoundStats,
    /// Run ended
    GameOver,
}

impl SessionPhase {
    /// Phases in which scans, timers and pause apply
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionPhase::Round | SessionPhase::BonusRound)
    }
}

/// Stable handle for a target, unique within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Target types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Good,
    Bad,
    BonusGood,
}

impl TargetKind {
    pub fn is_bonus(&self) -> bool {
        *self == TargetKind::BonusGood
    }

    /// Fixed footprint per kind
    pub fn size(&self) -> Vec2 {
        match self {
            TargetKind::Good | TargetKind::Bad => Vec2::new(TARGET_WIDTH, TARGET_HEIGHT),
            TargetKind::BonusGood => Vec2::new(BONUS_TARGET_WIDTH, BONUS_TARGET_HEIGHT),
        }
    }
}

/// A scannable target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    /// Numeric code the player has to scan
    pub code: String,
    pub kind: TargetKind,
    /// Top-left corner in arena pixels
    pub position: Vec2,
    pub size: Vec2,
    /// Pixels per frame; zero for regular targets
    pub velocity: Vec2,
    /// Session clock (ms) at spawn
    pub spawned_at: u64,
    /// Session clock (ms) of automatic removal; bonus targets never expire
    pub expires_at: Option<u64>,
    /// Scanned and waiting out the removal grace period
    #[serde(default)]
    pub scanned: bool,
}

impl Target {
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Eligible for matching: not yet scanned
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.scanned
    }
}

/// Difficulty knobs derived from the round number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub round: u32,
    pub spawn_interval_ms: u64,
    pub max_density: usize,
    pub bad_probability: f64,
    pub target_ttl_ms: u64,
}

impl RoundConfig {
    pub fn for_round(round: u32) -> Self {
        let r = round as u64;
        Self {
            round,
            spawn_interval_ms: 2000u64.saturating_sub(r * 200).max(500),
            max_density: (5 + round as usize).min(8),
            // Integer percent keeps the probabilities exact
            bad_probability: (20 + r * 5).min(40) as f64 / 100.0,
            target_ttl_ms: 5000u64.saturating_sub(r * 300).max(2000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_one_config() {
        let config = RoundConfig::for_round(1);
        assert_eq!(config.spawn_interval_ms, 1800);
        assert_eq!(config.max_density, 6);
        assert_eq!(config.bad_probability, 0.25);
        assert_eq!(config.target_ttl_ms, 4700);
    }

    #[test]
    fn test_round_config_limits() {
        let config = RoundConfig::for_round(20);
        assert_eq!(config.spawn_interval_ms, 500);
        assert_eq!(config.max_density, 8);
        assert_eq!(config.bad_probability, 0.4);
        assert_eq!(config.target_ttl_ms, 2000);

        let mid = RoundConfig::for_round(4);
        assert_eq!(mid.spawn_interval_ms, 1200);
        assert_eq!(mid.max_density, 8);
        assert_eq!(mid.bad_probability, 0.4);
        assert_eq!(mid.target_ttl_ms, 3800);
    }

    #[test]
    fn test_only_round_phases_are_playing() {
        assert!(SessionPhase::Round.is_playing());
        assert!(SessionPhase::BonusRound.is_playing());
        assert!(!SessionPhase::Menu.is_playing());
        assert!(!SessionPhase::RoundStats.is_playing());
        assert!(!SessionPhase::GameOver.is_playing());
    }
}
