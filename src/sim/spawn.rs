//! Target spawning
//!
//! Regular targets appear one per spawn tick, capped by the round's density.
//! Bonus targets appear all at once when the bonus phase begins. Both use the
//! same rejection-sampling placement so nothing is ever spawned on top of an
//! existing target.

use glam::Vec2;
use rand::Rng;
use thiserror::Error;

use super::geometry::{Arena, Rect};
use super::state::{RoundConfig, Target, TargetId, TargetKind};
use crate::consts::*;

/// Why a spawn tick produced nothing. Never fatal; the tick is just skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnSkip {
    #[error("arena already holds {0} targets")]
    AtDensity(usize),
    #[error("no free position found in {0} trials")]
    NoPlacement(u32),
}

/// Pick a top-left corner for a box of `size` whose margin-expanded bounds
/// stay clear of every margin-expanded rect in `occupied`.
///
/// Runs up to `trials` uniform draws over the arena and returns the first that
/// fits. Never falls back to an overlapping spot.
pub fn find_placement<R: Rng>(
    arena: &Arena,
    size: Vec2,
    margin: f32,
    trials: u32,
    occupied: &[Rect],
    rng: &mut R,
) -> Option<Vec2> {
    let max = arena.max_origin(size)?;

    for _ in 0..trials {
        let origin = Vec2::new(rng.random_range(0.0..=max.x), rng.random_range(0.0..=max.y));
        let candidate = Rect::from_origin_size(origin, size).expand(margin);
        if !occupied.iter().any(|r| candidate.intersects(&r.expand(margin))) {
            return Some(origin);
        }
    }
    None
}

/// Random 4-digit scan code
pub fn random_code<R: Rng>(rng: &mut R) -> String {
    rng.random_range(CODE_MIN..=CODE_MAX).to_string()
}

/// Random bonus velocity: each axis in the speed band with a random sign
pub fn random_bonus_velocity<R: Rng>(rng: &mut R) -> Vec2 {
    let mut axis = || {
        let speed = rng.random_range(BONUS_SPEED_MIN..=BONUS_SPEED_MAX);
        if rng.random_bool(0.5) { speed } else { -speed }
    };
    let x = axis();
    let y = axis();
    Vec2::new(x, y)
}

/// Spawn policy for one round
#[derive(Debug, Clone, Copy)]
pub struct SpawnScheduler {
    pub config: RoundConfig,
    pub margin: f32,
    pub trials: u32,
}

impl SpawnScheduler {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            config,
            margin: PLACEMENT_MARGIN,
            trials: PLACEMENT_TRIALS,
        }
    }

    /// One spawn tick. `id` is only consumed when a target is returned.
    pub fn spawn_regular<R: Rng>(
        &self,
        id: TargetId,
        targets: &[Target],
        arena: &Arena,
        now_ms: u64,
        rng: &mut R,
    ) -> Result<Target, SpawnSkip> {
        let regular = targets.iter().filter(|t| !t.kind.is_bonus()).count();
        if regular >= self.config.max_density {
            return Err(SpawnSkip::AtDensity(regular));
        }

        let occupied: Vec<Rect> = targets.iter().map(Target::bounds).collect();
        let size = TargetKind::Good.size();
        let position = find_placement(arena, size, self.margin, self.trials, &occupied, rng)
            .ok_or(SpawnSkip::NoPlacement(self.trials))?;

        let kind = if rng.random_bool(self.config.bad_probability) {
            TargetKind::Bad
        } else {
            TargetKind::Good
        };

        Ok(Target {
            id,
            code: random_code(rng),
            kind,
            position,
            size,
            velocity: Vec2::ZERO,
            spawned_at: now_ms,
            expires_at: Some(now_ms + self.config.target_ttl_ms),
            scanned: false,
        })
    }

    /// Place up to `count` moving bonus targets. Ids are drawn from
    /// `first_id` upward; fewer than `count` come back only if the arena is
    /// too crowded to place them all.
    pub fn spawn_bonus_burst<R: Rng>(
        &self,
        first_id: u32,
        count: u32,
        arena: &Arena,
        now_ms: u64,
        rng: &mut R,
    ) -> Vec<Target> {
        let size = TargetKind::BonusGood.size();
        let mut placed: Vec<Target> = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let occupied: Vec<Rect> = placed.iter().map(Target::bounds).collect();
            let Some(position) = find_placement(arena, size, self.margin, self.trials, &occupied, rng)
            else {
                log::warn!("Bonus burst placed {}/{} targets", placed.len(), count);
                break;
            };
            placed.push(Target {
                id: TargetId(first_id + placed.len() as u32),
                code: random_code(rng),
                kind: TargetKind::BonusGood,
                position,
                size,
                velocity: random_bonus_velocity(rng),
                spawned_at: now_ms,
                expires_at: None,
                scanned: false,
            });
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn regular(id: u32, position: Vec2) -> Target {
        Target {
            id: TargetId(id),
            code: "1234".into(),
            kind: TargetKind::Good,
            position,
            size: TargetKind::Good.size(),
            velocity: Vec2::ZERO,
            spawned_at: 0,
            expires_at: Some(1000),
            scanned: false,
        }
    }

    #[test]
    fn test_spawn_regular_sets_ttl_and_code() {
        let mut rng = Pcg32::seed_from_u64(7);
        let spawner = SpawnScheduler::new(RoundConfig::for_round(1));
        let target = spawner
            .spawn_regular(TargetId(1), &[], &Arena::default(), 300, &mut rng)
            .unwrap();
        assert_eq!(target.expires_at, Some(300 + 4700));
        assert_eq!(target.code.len(), 4);
        let code: u32 = target.code.parse().unwrap();
        assert!((CODE_MIN..=CODE_MAX).contains(&code));
        assert!(target.bounds().within(&Arena::default()));
        assert_eq!(target.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_density_cap() {
        let mut rng = Pcg32::seed_from_u64(7);
        let spawner = SpawnScheduler::new(RoundConfig::for_round(1));
        let targets: Vec<Target> = (0..6).map(|i| regular(i, Vec2::ZERO)).collect();
        let result = spawner.spawn_regular(TargetId(99), &targets, &Arena::default(), 0, &mut rng);
        assert_eq!(result, Err(SpawnSkip::AtDensity(6)));
    }

    #[test]
    fn test_full_arena_skips_spawn() {
        let mut rng = Pcg32::seed_from_u64(7);
        let spawner = SpawnScheduler::new(RoundConfig::for_round(1));
        // Arena exactly one target big, already occupied
        let arena = Arena::new(TARGET_WIDTH, TARGET_HEIGHT);
        let targets = vec![regular(1, Vec2::ZERO)];
        let result = spawner.spawn_regular(TargetId(2), &targets, &arena, 0, &mut rng);
        assert_eq!(result, Err(SpawnSkip::NoPlacement(PLACEMENT_TRIALS)));
    }

    #[test]
    fn test_arena_smaller_than_target() {
        let mut rng = Pcg32::seed_from_u64(1);
        let arena = Arena::new(100.0, 100.0);
        assert_eq!(find_placement(&arena, Vec2::new(200.0, 50.0), 0.0, 10, &[], &mut rng), None);
    }

    #[test]
    fn test_bad_probability_respected() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut config = RoundConfig::for_round(1);
        config.bad_probability = 1.0;
        let spawner = SpawnScheduler::new(config);
        let target = spawner
            .spawn_regular(TargetId(1), &[], &Arena::default(), 0, &mut rng)
            .unwrap();
        assert_eq!(target.kind, TargetKind::Bad);
    }

    #[test]
    fn test_bonus_burst() {
        let mut rng = Pcg32::seed_from_u64(3);
        let spawner = SpawnScheduler::new(RoundConfig::for_round(1));
        let burst = spawner.spawn_bonus_burst(10, 5, &Arena::default(), 0, &mut rng);
        assert_eq!(burst.len(), 5);
        for (i, target) in burst.iter().enumerate() {
            assert_eq!(target.id, TargetId(10 + i as u32));
            assert_eq!(target.kind, TargetKind::BonusGood);
            assert_eq!(target.expires_at, None);
            for v in [target.velocity.x.abs(), target.velocity.y.abs()] {
                assert!((BONUS_SPEED_MIN..=BONUS_SPEED_MAX).contains(&v));
            }
        }
        for (i, a) in burst.iter().enumerate() {
            for b in &burst[i + 1..] {
                assert!(!a.bounds().expand(PLACEMENT_MARGIN).intersects(&b.bounds().expand(PLACEMENT_MARGIN)));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_placements_never_overlap(
            seed in any::<u64>(),
            width in 300.0f32..2000.0,
            height in 250.0f32..1200.0,
            spawns in 1usize..30,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let arena = Arena::new(width, height);
            let mut config = RoundConfig::for_round(1);
            config.max_density = usize::MAX;
            let spawner = SpawnScheduler::new(config);
            let mut targets: Vec<Target> = Vec::new();

            for i in 0..spawns {
                if let Ok(t) = spawner.spawn_regular(TargetId(i as u32), &targets, &arena, 0, &mut rng) {
                    prop_assert!(t.bounds().within(&arena));
                    targets.push(t);
                }
            }

            for (i, a) in targets.iter().enumerate() {
                for b in &targets[i + 1..] {
                    prop_assert!(!a.bounds().expand(PLACEMENT_MARGIN).intersects(&b.bounds().expand(PLACEMENT_MARGIN)));
                }
            }
        }
    }
}
