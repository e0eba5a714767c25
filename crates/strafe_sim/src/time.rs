//! Frame timing
//!
//! A [`Clock`] reports monotonically increasing seconds; [`FrameTimer`]
//! turns consecutive readings into a clamped simulation delta and a
//! smoothed frame rate.

use std::collections::VecDeque;
use std::time::Instant;

/// Frames kept for the smoothed FPS figure
pub const FPS_HISTORY: usize = 60;

/// Default upper bound on a single tick's delta
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Source of elapsed time
pub trait Clock {
    /// Seconds since an arbitrary fixed origin. Never decreases.
    fn now(&self) -> f64;
}

/// Wall clock
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock advanced by hand, for scripted runs and tests
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward. Negative steps are ignored.
    pub fn advance(&mut self, seconds: f64) {
        if seconds > 0.0 {
            self.now += seconds;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }
}

/// Converts clock readings into clamped per-tick deltas
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last: Option<f64>,
    max_delta: f32,
    history: VecDeque<f32>,
    frame_count: u64,
}

impl FrameTimer {
    pub fn new(max_delta: f32) -> Self {
        Self {
            last: None,
            max_delta: max_delta.max(0.0),
            history: VecDeque::with_capacity(FPS_HISTORY),
            frame_count: 0,
        }
    }

    #[inline]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Read the clock and return this frame's delta.
    ///
    /// The first reading only establishes the origin and yields 0.
    pub fn tick(&mut self, clock: &dyn Clock) -> f32 {
        let now = clock.now();
        let raw = match self.last {
            Some(last) => (now - last) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        self.step(raw)
    }

    /// Record a raw frame time and return it clamped to `[0, max_delta]`
    pub fn step(&mut self, raw: f32) -> f32 {
        let raw = if raw.is_finite() { raw.max(0.0) } else { 0.0 };
        self.frame_count += 1;
        if raw > 0.0 {
            if self.history.len() == FPS_HISTORY {
                self.history.pop_front();
            }
            self.history.push_back(raw);
        }
        raw.min(self.max_delta)
    }

    /// Mean frame rate over the last [`FPS_HISTORY`] frames
    pub fn fps(&self) -> f32 {
        let total: f32 = self.history.iter().sum();
        if total <= 0.0 {
            0.0
        } else {
            self.history.len() as f32 / total
        }
    }

    pub fn average_frame_time(&self) -> f32 {
        if self.history.is_empty() {
            0.0
        } else {
            self.history.iter().sum::<f32>() / self.history.len() as f32
        }
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.max_delta);
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = ManualClock::new();
        clock.advance(5.0);
        let mut timer = FrameTimer::default();
        assert_eq!(timer.tick(&clock), 0.0);

        clock.advance(0.016);
        assert_relative_eq!(timer.tick(&clock), 0.016, epsilon = 1e-6);
    }

    #[test]
    fn test_delta_clamped() {
        let mut clock = ManualClock::new();
        let mut timer = FrameTimer::new(0.1);
        timer.tick(&clock);

        // A long stall does not produce a huge step
        clock.advance(2.5);
        assert_eq!(timer.tick(&clock), 0.1);

        // Time never runs backwards
        assert_eq!(timer.step(-1.0), 0.0);
        assert_eq!(timer.step(f32::NAN), 0.0);
    }

    #[test]
    fn test_fps_over_rolling_window() {
        let mut timer = FrameTimer::default();
        for _ in 0..100 {
            timer.step(0.02);
        }
        assert_relative_eq!(timer.fps(), 50.0, epsilon = 1e-2);
        assert_relative_eq!(timer.average_frame_time(), 0.02, epsilon = 1e-6);

        // Only the last 60 frames count
        for _ in 0..FPS_HISTORY {
            timer.step(0.01);
        }
        assert_relative_eq!(timer.fps(), 100.0, epsilon = 1e-1);
        assert_eq!(timer.frame_count(), 160);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
