//! Session settings
//!
//! Persisted separately from high scores. A running session only picks up
//! changed settings at its next round start.

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistenceError, Storage};

/// Player-tunable session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Length of each regular round (seconds)
    pub round_length_secs: u32,
    /// Rounds per game
    pub total_rounds: u32,

    // === Bonus phase ===
    /// Length of each bonus phase (seconds)
    pub bonus_length_secs: u32,
    /// Moving targets per bonus phase
    pub bonus_total: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_length_secs: 120,
            total_rounds: 3,
            bonus_length_secs: 15,
            bonus_total: 5,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "scan_whack_settings";

    /// Clamp every field into its playable range
    pub fn sanitized(mut self) -> Self {
        self.round_length_secs = self.round_length_secs.clamp(10, 600);
        self.total_rounds = self.total_rounds.clamp(1, 20);
        self.bonus_length_secs = self.bonus_length_secs.clamp(5, 120);
        self.bonus_total = self.bonus_total.clamp(1, 10);
        self
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Stored settings are corrupt ({e}), using defaults"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Settings storage unavailable ({e}), using defaults"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(self)?;
        storage.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
