//! Bonus-phase target motion
//!
//! One step per animation frame. Two overlapping targets swap velocities,
//! each nudged by a small random jitter. This is not an elastic collision.

use glam::Vec2;
use rand::Rng;

use super::geometry::Arena;
use super::state::Target;
use crate::consts::COLLISION_JITTER;

/// Invert the velocity on every axis where `origin + velocity` would leave the arena
#[inline]
pub fn reflect_off_walls(origin: Vec2, size: Vec2, velocity: Vec2, arena: &Arena) -> Vec2 {
    let next = origin + velocity;
    let mut vel = velocity;
    if next.x < 0.0 || next.x + size.x > arena.width {
        vel.x = -vel.x;
    }
    if next.y < 0.0 || next.y + size.y > arena.height {
        vel.y = -vel.y;
    }
    vel
}

fn jitter<R: Rng>(rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.random_range(-COLLISION_JITTER..=COLLISION_JITTER),
        rng.random_range(-COLLISION_JITTER..=COLLISION_JITTER),
    )
}

/// Advance all unscanned bonus targets by one frame.
///
/// Pairs are tested once each (at their current positions) in insertion
/// order, then every target bounces off the walls and moves. Returns the
/// number of colliding pairs this frame.
pub fn step_bonus<R: Rng>(targets: &mut [Target], arena: &Arena, rng: &mut R) -> u32 {
    let moving: Vec<usize> = targets
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind.is_bonus() && t.is_active())
        .map(|(i, _)| i)
        .collect();

    let mut collisions = 0;
    for (n, &i) in moving.iter().enumerate() {
        for &j in &moving[n + 1..] {
            if targets[i].bounds().intersects(&targets[j].bounds()) {
                let vi = targets[i].velocity;
                let vj = targets[j].velocity;
                targets[i].velocity = vj + jitter(rng);
                targets[j].velocity = vi + jitter(rng);
                collisions += 1;
            }
        }
    }

    for &i in &moving {
        let target = &mut targets[i];
        target.velocity = reflect_off_walls(target.position, target.size, target.velocity, arena);
        // Clamp only matters if the arena shrank under the target
        target.position = arena.clamp_origin(target.position + target.velocity, target.size);
    }

    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{TargetId, TargetKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bonus(id: u32, position: Vec2, velocity: Vec2) -> Target {
        Target {
            id: TargetId(id),
            code: format!("{}", 1000 + id),
            kind: TargetKind::BonusGood,
            position,
            size: Vec2::new(10.0, 10.0),
            velocity,
            spawned_at: 0,
            expires_at: None,
            scanned: false,
        }
    }

    #[test]
    fn test_free_motion() {
        let mut rng = Pcg32::seed_from_u64(1);
        let arena = Arena::new(100.0, 100.0);
        let mut targets = vec![bonus(1, Vec2::new(50.0, 50.0), Vec2::new(2.0, -3.0))];
        assert_eq!(step_bonus(&mut targets, &arena, &mut rng), 0);
        assert_eq!(targets[0].position, Vec2::new(52.0, 47.0));
        assert_eq!(targets[0].velocity, Vec2::new(2.0, -3.0));
    }

    #[test]
    fn test_wall_reflection() {
        let mut rng = Pcg32::seed_from_u64(1);
        let arena = Arena::new(100.0, 100.0);
        // Right edge at 89 + 10 = 99, next step would reach 102
        let mut targets = vec![bonus(1, Vec2::new(89.0, 1.0), Vec2::new(3.0, -2.0))];
        step_bonus(&mut targets, &arena, &mut rng);
        assert_eq!(targets[0].velocity, Vec2::new(-3.0, 2.0));
        assert_eq!(targets[0].position, Vec2::new(86.0, 3.0));
    }

    #[test]
    fn test_collision_swaps_with_jitter() {
        let mut rng = Pcg32::seed_from_u64(9);
        let arena = Arena::new(200.0, 200.0);
        let va = Vec2::new(2.0, 0.0);
        let vb = Vec2::new(-2.0, 1.0);
        let mut targets = vec![
            bonus(1, Vec2::new(50.0, 50.0), va),
            bonus(2, Vec2::new(55.0, 52.0), vb),
        ];
        assert_eq!(step_bonus(&mut targets, &arena, &mut rng), 1);
        let d0 = targets[0].velocity - vb;
        let d1 = targets[1].velocity - va;
        for d in [d0, d1] {
            assert!(d.x.abs() <= COLLISION_JITTER + 1e-5 && d.y.abs() <= COLLISION_JITTER + 1e-5);
        }
    }

    #[test]
    fn test_scanned_and_regular_targets_stay_put() {
        let mut rng = Pcg32::seed_from_u64(1);
        let arena = Arena::new(100.0, 100.0);
        let mut scanned = bonus(1, Vec2::new(10.0, 10.0), Vec2::new(1.0, 1.0));
        scanned.scanned = true;
        let mut regular = bonus(2, Vec2::new(50.0, 50.0), Vec2::new(1.0, 1.0));
        regular.kind = TargetKind::Good;
        let mut targets = vec![scanned, regular];
        step_bonus(&mut targets, &arena, &mut rng);
        assert_eq!(targets[0].position, Vec2::new(10.0, 10.0));
        assert_eq!(targets[1].position, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_targets_stay_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(5);
        let arena = Arena::new(120.0, 80.0);
        let mut targets = vec![
            bonus(1, Vec2::new(5.0, 5.0), Vec2::new(3.5, 2.0)),
            bonus(2, Vec2::new(60.0, 30.0), Vec2::new(-2.5, 3.0)),
            bonus(3, Vec2::new(100.0, 60.0), Vec2::new(1.5, -3.5)),
        ];
        for _ in 0..2000 {
            step_bonus(&mut targets, &arena, &mut rng);
            for t in &targets {
                assert!(t.bounds().within(&arena), "{:?} left the arena", t.position);
            }
        }
    }
}
