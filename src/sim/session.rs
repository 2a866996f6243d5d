//! Session state machine
//!
//! Menu -> Round(1) -> BonusRound -> RoundStats -> Round(2) -> ... -> GameOver.
//!
//! The host drives three periodic sources: `advance` with elapsed wall time
//! (timer and spawn ticks, expiry, delayed removals), `frame` once per
//! animation frame (bonus physics), and discrete player events. Each call
//! runs to completion and leaves its results in the event queue.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::events::{GameEvent, RemovalReason, RoundStats, StatsRating};
use super::geometry::Arena;
use super::physics::step_bonus;
use super::scan::{self, ScanOutcome};
use super::schedule::{Scheduler, TaskHandle};
use super::score::{ScoreLedger, ScoreState};
use super::spawn::SpawnScheduler;
use super::state::{RoundConfig, SessionPhase, Target, TargetId};
use super::timer::{Countdown, TimerStatus};
use crate::consts::*;
use crate::settings::Settings;

/// Work the scheduler can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskAction {
    TimerTick,
    SpawnTick,
    Expire(TargetId),
    Remove(TargetId),
}

/// State of one game, from start to game over.
///
/// Created on start, replaced on replay and dropped on reset, so nothing from
/// a previous game can leak into the next.
#[derive(Debug, Clone)]
pub struct Run {
    round: u32,
    /// Fixed for the whole game
    total_rounds: u32,
    /// Settings frozen at the start of the current round
    settings: Settings,
    config: RoundConfig,
    ledger: ScoreLedger,
    timer: Countdown,
    scheduler: Scheduler<TaskAction>,
    timer_task: Option<TaskHandle>,
    spawn_task: Option<TaskHandle>,
    /// Pending expiry or removal per target
    target_tasks: Vec<(TargetId, TaskHandle)>,
    /// Active targets in spawn order
    targets: Vec<Target>,
    /// Milliseconds of unpaused play
    clock_ms: u64,
    next_id: u32,
    last_stats: Option<RoundStats>,
}

impl Run {
    fn new(settings: Settings) -> Self {
        Self {
            round: 0,
            total_rounds: settings.total_rounds.max(1),
            settings,
            config: RoundConfig::for_round(1),
            ledger: ScoreLedger::new(),
            timer: Countdown::new(),
            scheduler: Scheduler::new(),
            timer_task: None,
            spawn_task: None,
            target_tasks: Vec::new(),
            targets: Vec::new(),
            clock_ms: 0,
            next_id: 1,
            last_stats: None,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn score(&self) -> ScoreState {
        self.ledger.state()
    }

    pub fn time_remaining(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn last_stats(&self) -> Option<RoundStats> {
        self.last_stats
    }

    /// Outstanding scheduled tasks (timers, spawns, expiries, removals)
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    fn track(&mut self, id: TargetId, handle: TaskHandle) {
        self.target_tasks.push((id, handle));
    }

    /// Cancel and forget any task tied to `id`
    fn untrack(&mut self, id: TargetId) {
        let scheduler = &mut self.scheduler;
        self.target_tasks.retain(|&(tid, handle)| {
            if tid == id {
                scheduler.cancel(handle);
                false
            } else {
                true
            }
        });
    }

    /// Cancel every periodic driver and delayed removal of the current phase
    /// and clear the arena.
    fn teardown_phase(&mut self, events: &mut Vec<GameEvent>) {
        for handle in [self.timer_task.take(), self.spawn_task.take()].into_iter().flatten() {
            self.scheduler.cancel(handle);
        }
        for (_, handle) in self.target_tasks.drain(..) {
            self.scheduler.cancel(handle);
        }
        debug_assert!(self.scheduler.is_empty(), "untracked task survived teardown");
        self.timer.stop();

        for target in self.targets.drain(..) {
            events.push(GameEvent::TargetRemoved {
                id: target.id,
                reason: RemovalReason::PhaseEnded,
            });
        }
    }

    fn remove_target(&mut self, id: TargetId) -> Option<Target> {
        let pos = self.targets.iter().position(|t| t.id == id)?;
        // `remove`, not `swap_remove`: scan matching depends on spawn order
        Some(self.targets.remove(pos))
    }

    fn stats(&self) -> RoundStats {
        let score = self.ledger.state();
        let accuracy = self.ledger.current_accuracy();
        RoundStats {
            round: self.round,
            accuracy,
            good: score.good_count,
            bad: score.bad_count,
            bonus_scanned: score.bonus_scanned,
            bonus_total: score.bonus_total,
            multiplier: score.multiplier,
            rating: StatsRating::from_accuracy(accuracy),
        }
    }
}

/// The session engine
pub struct Session {
    phase: SessionPhase,
    /// Only ever true while a round or bonus phase is playing
    paused: bool,
    /// Staged settings, applied at the next round start
    settings: Settings,
    arena: Arena,
    rng: Pcg32,
    run: Option<Run>,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(settings: Settings, arena: Arena, seed: u64) -> Self {
        Self {
            phase: SessionPhase::Menu,
            paused: false,
            settings,
            arena,
            rng: Pcg32::seed_from_u64(seed),
            run: None,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The current game, if one has been started
    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn score(&self) -> ScoreState {
        self.run.as_ref().map(Run::score).unwrap_or_default()
    }

    pub fn round(&self) -> u32 {
        self.run.as_ref().map_or(0, Run::round)
    }

    pub fn time_remaining(&self) -> u32 {
        match &self.run {
            Some(run) => run.time_remaining(),
            None => self.settings.round_length_secs,
        }
    }

    pub fn targets(&self) -> &[Target] {
        self.run.as_ref().map(Run::targets).unwrap_or(&[])
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Stage new settings. Round and bonus lengths and the bonus count apply
    /// from the next round start; the round count from the next game.
    pub fn set_settings(&mut self, settings: Settings) {
        log::debug!("Settings staged: {:?}", settings);
        self.settings = settings;
    }

    /// Host layout changed. Targets are pulled back inside a shrunken arena.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.arena = Arena::new(width, height);
        if let Some(run) = self.run.as_mut() {
            for target in &mut run.targets {
                target.position = self.arena.clamp_origin(target.position, target.size);
            }
        }
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged { phase });
        }
        if !phase.is_playing() {
            self.paused = false;
        }
    }

    // === Player events ===

    /// Menu -> Round(1) with a fresh game. Ignored anywhere else.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::Menu {
            log::debug!("Start ignored in {:?}", self.phase);
            return false;
        }
        self.run = Some(Run::new(self.settings.clone()));
        self.begin_round(1);
        true
    }

    /// RoundStats -> Round(n+1)
    pub fn advance_round(&mut self) -> bool {
        if self.phase != SessionPhase::RoundStats {
            return false;
        }
        let next = self.round() + 1;
        self.begin_round(next);
        true
    }

    /// GameOver -> Menu
    pub fn restart(&mut self) -> bool {
        if self.phase != SessionPhase::GameOver {
            return false;
        }
        self.reset();
        true
    }

    /// Back to the menu from anywhere, discarding the current game
    pub fn reset(&mut self) {
        if let Some(mut run) = self.run.take() {
            run.teardown_phase(&mut self.events);
        }
        self.set_phase(SessionPhase::Menu);
    }

    /// Flip the pause flag. Only meaningful while playing; returns the new state.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.phase.is_playing() {
            return false;
        }
        if self.run.is_none() {
            return false;
        }
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        self.events.push(GameEvent::PausedChanged {
            paused: self.paused,
        });
        self.paused
    }

    /// Handle a complete code from the input collaborator
    pub fn submit_scan(&mut self, code: &str) -> ScanOutcome {
        let code = code.trim();
        if !self.phase.is_playing() {
            return ScanOutcome::Ignored;
        }
        if code == PAUSE_CODE {
            return ScanOutcome::PauseToggled(self.toggle_pause());
        }
        if self.paused {
            return ScanOutcome::Ignored;
        }
        let Some(run) = self.run.as_mut() else {
            return ScanOutcome::Ignored;
        };

        let outcome = scan::resolve(self.phase, code, &mut run.targets, &mut run.ledger);
        let Some(id) = outcome.target() else {
            if outcome == ScanOutcome::NoMatch {
                self.events.push(GameEvent::ScanMissed {
                    code: code.to_string(),
                });
            }
            return outcome;
        };

        // Expiry no longer applies; the target leaves after the grace period
        run.untrack(id);
        let handle = run
            .scheduler
            .once(run.clock_ms, REMOVAL_DELAY_MS, TaskAction::Remove(id));
        run.track(id, handle);

        if let Some(target) = run.targets.iter().find(|t| t.id == id) {
            self.events.push(GameEvent::TargetScanned {
                id,
                kind: target.kind,
            });
        }
        self.events.push(GameEvent::ScoreChanged { score: run.score() });
        log::debug!("Scan {code}: {:?}, score {}", outcome, run.ledger.score());

        if matches!(outcome, ScanOutcome::Bonus(_)) && run.ledger.bonus_cleared() {
            self.finish_bonus();
        }
        outcome
    }

    // === Host drivers ===

    /// Report elapsed wall time. Fires every due timer, spawn, expiry and
    /// removal task in deadline order. The session clock does not move while
    /// paused or outside play.
    pub fn advance(&mut self, elapsed_ms: u64) {
        if !self.phase.is_playing() || self.paused {
            return;
        }
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let until = run.clock_ms.saturating_add(elapsed_ms);

        while let Some(run) = self.run.as_mut() {
            let Some(fired) = run.scheduler.pop_due(until) else {
                run.clock_ms = until;
                break;
            };
            run.clock_ms = run.clock_ms.max(fired.due_ms);
            self.run_task(fired.action);
            if !self.phase.is_playing() {
                break;
            }
        }
    }

    /// One animation frame. Moves bonus targets; a no-op otherwise.
    pub fn frame(&mut self) {
        if self.phase != SessionPhase::BonusRound || self.paused {
            return;
        }
        if let Some(run) = self.run.as_mut() {
            step_bonus(&mut run.targets, &self.arena, &mut self.rng);
        }
    }

    fn run_task(&mut self, action: TaskAction) {
        match action {
            TaskAction::TimerTick => self.on_timer_tick(),
            TaskAction::SpawnTick => self.on_spawn_tick(),
            TaskAction::Expire(id) => self.on_target_done(id, RemovalReason::Expired),
            TaskAction::Remove(id) => self.on_target_done(id, RemovalReason::Scanned),
        }
    }

    fn on_timer_tick(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        match run.timer.tick() {
            TimerStatus::Idle => {}
            TimerStatus::Ticked(time_remaining) => {
                self.events.push(GameEvent::TimerTick { time_remaining });
            }
            TimerStatus::Expired => {
                self.events.push(GameEvent::TimerTick { time_remaining: 0 });
                match self.phase {
                    SessionPhase::Round => self.enter_bonus(),
                    SessionPhase::BonusRound => self.finish_bonus(),
                    _ => {}
                }
            }
        }
    }

    fn on_spawn_tick(&mut self) {
        if self.phase != SessionPhase::Round {
            return;
        }
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let spawner = SpawnScheduler::new(run.config);
        let id = TargetId(run.next_id);
        match spawner.spawn_regular(id, &run.targets, &self.arena, run.clock_ms, &mut self.rng) {
            Ok(target) => {
                run.next_id += 1;
                let handle = run
                    .scheduler
                    .once(run.clock_ms, run.config.target_ttl_ms, TaskAction::Expire(id));
                run.track(id, handle);
                log::debug!("Spawned {:?} {} ({:?})", target.kind, target.code, id);
                run.targets.push(target.clone());
                self.events.push(GameEvent::TargetSpawned { target });
            }
            Err(skip) => log::debug!("Spawn skipped: {skip}"),
        }
    }

    fn on_target_done(&mut self, id: TargetId, reason: RemovalReason) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        run.target_tasks.retain(|&(tid, _)| tid != id);
        if run.remove_target(id).is_some() {
            self.events.push(GameEvent::TargetRemoved { id, reason });
        }
    }

    // === Transitions ===

    fn begin_round(&mut self, round: u32) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        run.teardown_phase(&mut self.events);
        run.settings = self.settings.clone();
        run.round = round;
        run.config = RoundConfig::for_round(round);
        run.ledger.begin_round();
        run.timer.start(run.settings.round_length_secs);
        run.timer_task = Some(run.scheduler.every(run.clock_ms, TIMER_TICK_MS, TaskAction::TimerTick));
        run.spawn_task = Some(run.scheduler.every(
            run.clock_ms,
            run.config.spawn_interval_ms,
            TaskAction::SpawnTick,
        ));

        let round_event = GameEvent::RoundAdvanced {
            round,
            total_rounds: run.total_rounds(),
        };
        let score = run.score();
        let time_remaining = run.time_remaining();
        log::info!("Round {}/{} ({:?})", round, run.total_rounds(), run.config);

        self.set_phase(SessionPhase::Round);
        self.events.push(round_event);
        self.events.push(GameEvent::ScoreChanged { score });
        self.events.push(GameEvent::TimerTick { time_remaining });
    }

    fn enter_bonus(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        run.teardown_phase(&mut self.events);

        let spawner = SpawnScheduler::new(run.config);
        let burst = spawner.spawn_bonus_burst(
            run.next_id,
            run.settings.bonus_total,
            &self.arena,
            run.clock_ms,
            &mut self.rng,
        );
        run.next_id += burst.len() as u32;
        run.ledger.begin_bonus(burst.len() as u32);
        run.timer.start(run.settings.bonus_length_secs);
        run.timer_task = Some(run.scheduler.every(run.clock_ms, TIMER_TICK_MS, TaskAction::TimerTick));
        run.targets.extend(burst.iter().cloned());

        let started = GameEvent::BonusStarted {
            total: burst.len() as u32,
            duration_secs: run.settings.bonus_length_secs,
        };
        let score = run.score();
        let time_remaining = run.time_remaining();

        self.set_phase(SessionPhase::BonusRound);
        self.events.push(started);
        self.events
            .extend(burst.into_iter().map(|target| GameEvent::TargetSpawned { target }));
        self.events.push(GameEvent::ScoreChanged { score });
        self.events.push(GameEvent::TimerTick { time_remaining });

        if score.bonus_total == 0 {
            log::warn!("No room for bonus targets, skipping bonus phase");
            self.finish_bonus();
        }
    }

    /// Settle the multiplier and move on to stats or game over
    fn finish_bonus(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        run.teardown_phase(&mut self.events);
        let multiplier = run.ledger.settle_bonus();
        let stats = run.stats();
        run.last_stats = Some(stats);
        let score = run.score();
        let last_round = run.round >= run.total_rounds();
        log::info!(
            "Round {} settled: x{}, score {}",
            run.round,
            multiplier,
            score.score
        );

        self.events.push(GameEvent::ScoreChanged { score });
        self.events.push(GameEvent::RoundStatsReady { stats });
        if last_round {
            self.set_phase(SessionPhase::GameOver);
            self.events.push(GameEvent::GameOver {
                final_score: score.score,
            });
        } else {
            self.set_phase(SessionPhase::RoundStats);
        }
    }
}
