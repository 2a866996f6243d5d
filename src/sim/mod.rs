//! Deterministic session engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances when the host reports it
//! - Seeded RNG only
//! - Stable iteration order (targets in spawn order)
//! - No rendering or platform dependencies

pub mod events;
pub mod geometry;
pub mod physics;
pub mod scan;
pub mod schedule;
pub mod score;
pub mod session;
pub mod spawn;
pub mod state;
pub mod timer;

pub use events::{GameEvent, RemovalReason, RoundStats, StatsRating};
pub use geometry::{Arena, Rect};
pub use physics::{reflect_off_walls, step_bonus};
pub use scan::ScanOutcome;
pub use schedule::{Scheduler, TaskHandle};
pub use score::{ScoreLedger, ScoreState};
pub use session::{Run, Session};
pub use spawn::{SpawnScheduler, SpawnSkip};
pub use state::{RoundConfig, SessionPhase, Target, TargetId, TargetKind};
pub use timer::{Countdown, TimerStatus};
