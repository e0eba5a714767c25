//! Session state record

use serde::{Deserialize, Serialize};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Still running (or never started)
    Undecided,
    /// Every configured wave was cleared
    Victory,
    /// The player died
    Defeat,
}

impl Default for Outcome {
    fn default() -> Self {
        Self::Undecided
    }
}

impl Outcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Undecided)
    }
}

/// Score, progress and run flags for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub is_playing: bool,
    pub is_paused: bool,
    /// Seconds of unpaused play
    pub elapsed: f32,
    /// Current wave, 0 before the first wave
    pub wave: u32,
    pub kills: u32,
    pub score: u64,
    pub outcome: Outcome,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Begin a fresh session
    pub fn start(&mut self) {
        self.reset();
        self.is_playing = true;
        log::info!("Session started");
    }

    /// Returns false if not playing or already paused
    pub fn pause(&mut self) -> bool {
        if !self.is_playing || self.is_paused {
            return false;
        }
        self.is_paused = true;
        true
    }

    /// Returns false if not paused
    pub fn resume(&mut self) -> bool {
        if !self.is_paused {
            return false;
        }
        self.is_paused = false;
        true
    }

    /// End the session. The first decided outcome sticks.
    pub fn end(&mut self, outcome: Outcome) {
        if !self.outcome.is_decided() {
            self.outcome = outcome;
        }
        if self.is_playing {
            log::info!(
                "Session over: {:?} (wave {}, {} kills, score {})",
                self.outcome,
                self.wave,
                self.kills,
                self.score
            );
        }
        self.is_playing = false;
        self.is_paused = false;
    }

    /// Playing and not paused
    #[inline]
    pub fn is_running(&self) -> bool {
        self.is_playing && !self.is_paused
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_decided()
    }

    /// Advance the play clock while running
    pub fn advance(&mut self, dt: f32) {
        if self.is_running() {
            self.elapsed += dt.max(0.0);
        }
    }

    pub fn record_kill(&mut self, score_value: u32) {
        self.kills += 1;
        self.score += u64::from(score_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut state = GameState::new();
        assert!(!state.is_running());
        assert!(!state.pause());

        state.start();
        assert!(state.is_running());
        state.advance(1.5);
        assert!(state.pause());
        assert!(!state.pause());
        state.advance(10.0);
        assert_eq!(state.elapsed, 1.5);

        assert!(state.resume());
        assert!(!state.resume());

        state.record_kill(100);
        state.record_kill(150);
        assert_eq!(state.kills, 2);
        assert_eq!(state.score, 250);

        state.end(Outcome::Defeat);
        state.end(Outcome::Victory);
        assert_eq!(state.outcome, Outcome::Defeat);
        assert!(!state.is_playing);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = GameState::new();
        state.start();
        state.wave = 4;
        state.record_kill(100);
        state.end(Outcome::Victory);

        state.reset();
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn test_serializes() {
        let mut state = GameState::new();
        state.start();
        state.record_kill(100);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
