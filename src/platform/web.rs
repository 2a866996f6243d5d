//! Browser bindings
//!
//! The page owns rendering, input and the animation loop. It calls `advance`
//! with elapsed time from `requestAnimationFrame`, `frame` once per frame,
//! then drains the queued events as JSON.

use wasm_bindgen::prelude::*;

use crate::highscores::HighScores;
use crate::persistence::LocalStorage;
use crate::settings::Settings;
use crate::sim::{Arena, Session};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Scan Whack starting...");
}

fn open_storage() -> Result<LocalStorage, JsError> {
    Ok(LocalStorage::open()?)
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("JSON encoding failed: {e}");
        String::from("null")
    })
}

/// A session driven from JavaScript
#[wasm_bindgen]
pub struct WebSession {
    session: Session,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, width: f32, height: f32) -> WebSession {
        let settings = match LocalStorage::open() {
            Ok(storage) => Settings::load(&storage),
            Err(e) => {
                log::warn!("{e}, using default settings");
                Settings::default()
            }
        };
        log::info!("Session created with seed: {}", seed as u64);
        WebSession {
            session: Session::new(settings, Arena::new(width, height), seed as u64),
        }
    }

    pub fn start(&mut self) -> bool {
        self.session.start()
    }

    /// Submit a scanned code; returns the outcome as JSON
    pub fn scan(&mut self, code: &str) -> String {
        to_json(&self.session.submit_scan(code))
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.session.toggle_pause()
    }

    pub fn advance(&mut self, elapsed_ms: f64) {
        self.session.advance(elapsed_ms.max(0.0) as u64);
    }

    pub fn frame(&mut self) {
        self.session.frame();
    }

    pub fn advance_round(&mut self) -> bool {
        self.session.advance_round()
    }

    pub fn restart(&mut self) -> bool {
        self.session.restart()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
    }

    /// Events queued since the last drain, as a JSON array
    pub fn drain_events(&mut self) -> String {
        to_json(&self.session.drain_events())
    }

    /// Current targets as a JSON array (for redraws after resize)
    pub fn targets(&self) -> String {
        to_json(&self.session.targets())
    }

    pub fn score(&self) -> String {
        to_json(&self.session.score())
    }

    pub fn settings(&self) -> String {
        to_json(self.session.settings())
    }

    /// Persist new settings; they take effect at the next round start
    pub fn set_settings(&mut self, json: &str) -> Result<(), JsError> {
        let settings = serde_json::from_str::<Settings>(json)?.sanitized();
        let mut storage = open_storage()?;
        settings.save(&mut storage)?;
        self.session.set_settings(settings);
        Ok(())
    }

    /// Record the final score. Returns the rank achieved, or undefined.
    pub fn save_score(&self, name: &str) -> Result<Option<u32>, JsError> {
        let mut storage = open_storage()?;
        let score = self.session.score().score;
        let rank = HighScores::submit(&mut storage, name, score, &super::today())?;
        Ok(rank.map(|r| r as u32))
    }

    /// Leaderboard as a JSON array, best first
    pub fn high_scores(&self) -> Result<String, JsError> {
        let storage = open_storage()?;
        Ok(to_json(&HighScores::load(&storage)))
    }
}
