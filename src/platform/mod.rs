//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Display dates for leaderboard entries
//! - Where persisted data lives
//! - The JS-facing session wrapper (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Today's date as shown on the leaderboard (e.g. `3/14/2026`)
#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> String {
    chrono::Local::now().format("%-m/%-d/%Y").to_string()
}

/// Today's date in the browser's locale
#[cfg(target_arch = "wasm32")]
pub fn today() -> String {
    js_sys::Date::new_0()
        .to_locale_date_string("default", &wasm_bindgen::JsValue::UNDEFINED)
        .into()
}

/// Directory for settings and high scores. `SCAN_WHACK_DATA` overrides the default.
#[cfg(not(target_arch = "wasm32"))]
pub fn data_dir() -> std::path::PathBuf {
    std::env::var_os("SCAN_WHACK_DATA")
        .map(Into::into)
        .unwrap_or_else(|| std::path::PathBuf::from(".scan_whack"))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_today_is_month_day_year() {
        let date = today();
        let parts: Vec<&str> = date.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
        assert_eq!(parts[2].len(), 4);
    }
}
