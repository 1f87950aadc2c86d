//! Browser bridge
//!
//! Exposes the simulation to a JavaScript renderer. The renderer calls
//! `frame` once per animation frame, pushes input through the setters and
//! reads state back as JSON.

use wasm_bindgen::prelude::*;

use crate::driver::GameDriver;
use crate::highscores::{HighScores, RunRecord};
use crate::settings::Settings;
use crate::sim::{BossArchetype, GameEvent};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Bridge Battle starting...");
}

/// Game handle owned by the JS side
#[wasm_bindgen]
pub struct WebGame {
    driver: GameDriver,
    settings: Settings,
    high_scores: HighScores,
    recorded: bool,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a run. `tuning_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str) -> Result<WebGame, JsValue> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let seed = js_sys::Date::now() as u64;
        Ok(WebGame {
            driver: GameDriver::new(seed, tuning),
            settings: Settings::load(),
            high_scores: HighScores::load(),
            recorded: false,
        })
    }

    /// Advance by one animation frame (seconds)
    pub fn frame(&mut self, dt: f32) {
        self.driver.advance(dt);
        if self.driver.is_finished() && !self.recorded {
            self.recorded = true;
            self.record_run();
        }
    }

    pub fn set_steering(&mut self, x: f32) {
        if x.is_finite() {
            self.driver.set_steering(x);
        }
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.driver.input.idle_mode = idle;
    }

    pub fn toggle_pause(&mut self) {
        self.driver.toggle_pause();
    }

    pub fn set_member_count(&mut self, n: u32) {
        self.driver.state.set_member_count(n as usize);
    }

    pub fn damage_boss(&mut self, amount: f32) -> bool {
        self.driver.state.damage_boss(amount)
    }

    /// Spawn a boss by name ("Tank", "Speed", "Mage")
    pub fn spawn_boss(&mut self, archetype: &str) -> bool {
        let archetype = match archetype.to_lowercase().as_str() {
            "tank" => BossArchetype::Tank,
            "speed" => BossArchetype::Speed,
            "mage" => BossArchetype::Mage,
            _ => return false,
        };
        self.driver.state.spawn_boss(archetype)
    }

    /// Current state for rendering
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.driver.state.snapshot()).unwrap_or_default()
    }

    /// Events since the last call
    pub fn drain_events_json(&mut self) -> String {
        let events: Vec<GameEvent> = self.driver.drain_events();
        serde_json::to_string(&events).unwrap_or_default()
    }

    pub fn settings_json(&self) -> String {
        serde_json::to_string(&self.settings).unwrap_or_default()
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.settings.audio_enabled = enabled;
        self.settings.save();
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.settings.set_master_volume(volume);
        self.settings.save();
    }

    pub fn sfx_volume(&self) -> f32 {
        self.settings.effective_sfx_volume()
    }

    pub fn music_volume(&self) -> f32 {
        self.settings.effective_music_volume()
    }

    /// Whether the renderer should shake the camera on hits
    pub fn screen_shake(&self) -> bool {
        self.settings.effective_screen_shake()
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.settings.reduced_motion = reduced;
        self.settings.save();
    }

    pub fn high_scores_json(&self) -> String {
        serde_json::to_string(&self.high_scores).unwrap_or_default()
    }
}

impl WebGame {
    fn record_run(&mut self) {
        let run = RunRecord::from_state(&self.driver.state, js_sys::Date::now());
        let score = run.score;
        if let Some(rank) = self.high_scores.record(run) {
            log::info!("New high score #{}: {}", rank, score);
            self.high_scores.save();
        }
    }
}
