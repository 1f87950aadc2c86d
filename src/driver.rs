//! Frame driver
//!
//! Turns variable frame deltas into fixed simulation ticks and keeps the
//! per-frame input that the host writes into.

use crate::consts::*;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Game instance holding the simulation and its timing
#[derive(Debug, Clone)]
pub struct GameDriver {
    pub state: GameState,
    pub input: TickInput,
    accumulator: f32,
    last_phase: GamePhase,
}

impl GameDriver {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state: GameState::new(seed, tuning),
            input: TickInput::default(),
            accumulator: 0.0,
            last_phase: GamePhase::Advancing,
        }
    }

    /// Run as many fixed ticks as `frame_dt` covers; returns the count
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pause = false;
        }
        if substeps == MAX_SUBSTEPS {
            // Fell more than MAX_SUBSTEPS behind: drop the backlog
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        let phase = self.state.phase;
        if phase != self.last_phase {
            log::info!("Phase: {:?} -> {:?}", self.last_phase, phase);
            self.last_phase = phase;
        }
        substeps
    }

    pub fn set_steering(&mut self, x: f32) {
        self.input.steer_x = Some(x);
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state.phase, GamePhase::Victory | GamePhase::GameOver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substeps_follow_frame_time() {
        let mut driver = GameDriver::new(1, Tuning::default());
        // Half a tick accumulates without stepping
        assert_eq!(driver.advance(SIM_DT * 0.5), 0);
        assert_eq!(driver.advance(SIM_DT * 0.6), 1);
        assert_eq!(driver.advance(SIM_DT * 3.0), 3);
        assert_eq!(driver.state.time_ticks, 4);
    }

    #[test]
    fn test_long_frames_are_capped() {
        let mut driver = GameDriver::new(1, Tuning::default());
        assert_eq!(driver.advance(5.0), MAX_SUBSTEPS);
        assert!(driver.advance(0.0) <= 1);
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut driver = GameDriver::new(1, Tuning::default());
        driver.toggle_pause();
        driver.advance(SIM_DT * 4.0);
        assert_eq!(driver.state.phase, GamePhase::Paused);
        assert!(!driver.input.pause);
        driver.toggle_pause();
        driver.advance(SIM_DT * 1.5);
        assert_eq!(driver.state.phase, GamePhase::Advancing);
    }
}
