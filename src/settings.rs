//! Player settings and preferences
//!
//! Persisted separately from the leaderboard in LocalStorage. Constructed once
//! at startup and handed to whoever needs it.

use serde::{Deserialize, Serialize};

use crate::storage;

const STORAGE_KEY: &str = "bridge_battle_settings";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master audio switch
    pub audio_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Visual Effects ===
    /// Screen shake on hits and boss phase changes
    pub screen_shake: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shake, flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,
            screen_shake: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Set master volume, clamped to 0.0 - 1.0
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Final gain for sound effects (0 when audio is off)
    pub fn effective_sfx_volume(&self) -> f32 {
        if !self.audio_enabled {
            return 0.0;
        }
        self.master_volume * self.sfx_volume
    }

    /// Final gain for music (0 when audio is off)
    pub fn effective_music_volume(&self) -> f32 {
        if !self.audio_enabled {
            return 0.0;
        }
        self.master_volume * self.music_volume
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    pub fn load() -> Self {
        storage::load_json(STORAGE_KEY).unwrap_or_default()
    }

    pub fn save(&self) {
        storage::save_json(STORAGE_KEY, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_switch_mutes_everything() {
        let mut settings = Settings::default();
        assert!((settings.effective_sfx_volume() - 0.8).abs() < 1e-6);
        settings.audio_enabled = false;
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut settings = Settings::default();
        settings.set_master_volume(3.0);
        assert_eq!(settings.master_volume, 1.0);
        settings.set_master_volume(-1.0);
        assert_eq!(settings.master_volume, 0.0);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_older_payload_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "audio_enabled": false }"#).unwrap();
        assert!(!settings.audio_enabled);
        assert_eq!(settings.music_volume, 0.7);
    }

    #[test]
    fn test_music_follows_master_volume() {
        let mut settings = Settings::default();
        settings.set_master_volume(0.5);
        assert!((settings.effective_music_volume() - 0.35).abs() < 1e-6);
    }
}
