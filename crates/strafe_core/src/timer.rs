//! Polled timers
//!
//! Every cooldown in the simulation (reload, equip, attack cooldown,
//! reaction delay, idle wait, projectile lifetime, wave grace) is a
//! [`Countdown`]; every "time since" measurement is a [`Stopwatch`].
//! Both are advanced explicitly once per tick and never fire callbacks.

use serde::{Deserialize, Serialize};

/// A timer counting down from `duration` to zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
}

impl Countdown {
    /// Create a countdown that is already finished; call [`start`](Self::start) to arm it
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            remaining: 0.0,
        }
    }

    /// Create a countdown that is running from full duration
    pub fn started(duration: f32) -> Self {
        let mut timer = Self::new(duration);
        timer.start();
        timer
    }

    /// (Re)arm the timer from full duration
    pub fn start(&mut self) {
        self.remaining = self.duration;
    }

    /// Change the duration and re-arm
    pub fn start_with(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
        self.start();
    }

    /// Stop immediately, leaving the timer finished
    pub fn finish(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance by `dt` seconds.
    ///
    /// Returns true only on the tick the timer crosses zero. Overshoot is
    /// discarded: the timer rests at exactly zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining -= dt.max(0.0);
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Seconds since the last start (equals duration once finished)
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.duration - self.remaining
    }

    /// Progress in `[0, 1]`; a zero-length countdown reports 1
    pub fn fraction(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed() / self.duration).clamp(0.0, 1.0)
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// A timer counting up from zero
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    elapsed: f32,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stopwatch that reads as if started long ago
    pub fn expired() -> Self {
        Self { elapsed: f32::MAX }
    }

    pub fn tick(&mut self, dt: f32) {
        // Saturates at f32::MAX instead of overflowing to infinity
        self.elapsed = (self.elapsed + dt.max(0.0)).min(f32::MAX);
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_countdown_fires_once() {
        let mut timer = Countdown::started(1.0);
        assert!(timer.is_running());
        assert!(!timer.tick(0.6));
        assert!(timer.tick(0.6));
        assert!(timer.is_finished());
        assert_relative_eq!(timer.remaining(), 0.0);
        assert!(!timer.tick(0.6));
    }

    #[test]
    fn test_new_countdown_is_finished() {
        let timer = Countdown::new(2.0);
        assert!(timer.is_finished());
        assert_relative_eq!(timer.duration(), 2.0);
    }

    #[test]
    fn test_countdown_fraction() {
        let mut timer = Countdown::started(2.0);
        timer.tick(0.5);
        assert_relative_eq!(timer.fraction(), 0.25);
        assert_relative_eq!(Countdown::new(0.0).fraction(), 1.0);
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut timer = Countdown::started(1.0);
        timer.tick(-5.0);
        assert_relative_eq!(timer.remaining(), 1.0);

        let mut watch = Stopwatch::new();
        watch.tick(-1.0);
        assert_relative_eq!(watch.elapsed(), 0.0);
    }

    #[test]
    fn test_expired_stopwatch_saturates() {
        let mut watch = Stopwatch::expired();
        watch.tick(1.0);
        assert!(watch.elapsed().is_finite());
        watch.reset();
        assert_relative_eq!(watch.elapsed(), 0.0);
    }
}
