//! Scan Whack entry point
//!
//! Native builds run a headless autoplay session with a simulated scanner and
//! record the result on the local leaderboard. The browser build is driven
//! from the page through `platform::web::WebSession`.
//!
//! Usage: `scan-whack [SEED] [PLAYER]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{SystemTime, UNIX_EPOCH};

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use scan_whack::persistence::FileStorage;
    use scan_whack::sim::{Arena, GameEvent, Session, SessionPhase, TargetKind};
    use scan_whack::{HighScores, LeaderboardError, Settings, platform};

    /// Simulated frame length (~60 fps)
    const FRAME_MS: u64 = 16;
    /// Chance per frame that the bot scans something
    const SCAN_CHANCE: f64 = 0.03;
    /// Chance a scan is careless and may hit a bad target
    const CARELESS_CHANCE: f64 = 0.2;

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Choose a code the way a player would: whatever is on screen for the
    /// current phase, avoiding bad targets unless careless.
    fn pick_code(session: &Session, bot: &mut Pcg32) -> Option<String> {
        let bonus = session.phase() == SessionPhase::BonusRound;
        let careless = bot.random_bool(CARELESS_CHANCE);
        let candidates: Vec<&str> = session
            .targets()
            .iter()
            .filter(|t| t.is_active() && t.kind.is_bonus() == bonus)
            .filter(|t| careless || t.kind != TargetKind::Bad)
            .map(|t| t.code.as_str())
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[bot.random_range(0..candidates.len())].to_string())
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::RoundAdvanced { round, total_rounds } => {
                log::info!("=== Round {round}/{total_rounds} ===");
            }
            GameEvent::BonusStarted {
                total,
                duration_secs,
            } => log::info!("Bonus round: {total} targets, {duration_secs}s"),
            GameEvent::RoundStatsReady { stats } => log::info!(
                "Round {}: {}% accuracy ({} good, {} bad), bonus {}/{} x{} - {}",
                stats.round,
                stats.accuracy,
                stats.good,
                stats.bad,
                stats.bonus_scanned,
                stats.bonus_total,
                stats.multiplier,
                stats.rating.message()
            ),
            GameEvent::TimerTick { time_remaining } if time_remaining % 30 == 0 => {
                log::info!("{time_remaining}s left");
            }
            GameEvent::GameOver { final_score } => log::info!("Game over! Final score: {final_score}"),
            other => log::debug!("{other:?}"),
        }
    }

    pub fn run() -> Result<(), LeaderboardError> {
        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(clock_seed);
        let player = args.next().unwrap_or_else(|| String::from("Bot"));

        let mut storage = FileStorage::new(platform::data_dir());
        let settings = Settings::load(&storage);
        // Write back so the file exists for hand editing
        settings.save(&mut storage)?;
        let board = HighScores::load(&storage);
        log::info!(
            "Scan Whack (native) starting with seed {seed}, data in {}",
            storage.dir().display()
        );
        if let Some(top) = board.top_score() {
            log::info!("Score to beat: {top}");
        }

        let mut session = Session::new(settings, Arena::default(), seed);
        let mut bot = Pcg32::seed_from_u64(seed.rotate_left(32));
        session.start();

        while session.phase() != SessionPhase::GameOver {
            session.advance(FRAME_MS);
            session.frame();
            if bot.random_bool(SCAN_CHANCE) {
                if let Some(code) = pick_code(&session, &mut bot) {
                    session.submit_scan(&code);
                }
            }
            for event in session.drain_events() {
                report(&event);
            }
            if session.phase() == SessionPhase::RoundStats {
                session.advance_round();
            }
        }

        let final_score = session.score().score;
        match HighScores::submit(&mut storage, &player, final_score, &platform::today())? {
            Some(rank) => log::info!("{player} placed #{rank} with {final_score}"),
            None => log::info!("{final_score} did not make the leaderboard"),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main, this is just to satisfy the compiler
}
