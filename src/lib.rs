//! Bridge Battle - squad runner simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, boss encounter, course, combat)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `highscores`: Local leaderboard
//! - `storage`: LocalStorage JSON persistence
//! - `driver`: Fixed timestep frame driver
//! - `web`: Browser bridge for a JS renderer (wasm32 only)

pub mod driver;
pub mod highscores;
pub mod settings;
pub mod sim;
mod storage;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use driver::GameDriver;
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the driver will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Boss phase transition lockout (seconds)
    pub const PHASE_TRANSITION_SECS: f32 = 0.5;
    /// Delay between death and removal of the boss (seconds)
    pub const BOSS_DEATH_SECS: f32 = 2.0;
    /// Hit flash duration after the boss takes damage (seconds)
    pub const BOSS_HIT_FLASH_SECS: f32 = 0.1;

    /// Escalation applied on every phase change
    pub const PHASE_ATTACK_COOLDOWN_MULT: f32 = 0.85;
    pub const PHASE_SPECIAL_COOLDOWN_MULT: f32 = 0.9;
    pub const PHASE_MOVEMENT_SPEED_MULT: f32 = 1.2;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(10.0, PI / 2.0);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 10.0).abs() < 1e-5);
    }
}
