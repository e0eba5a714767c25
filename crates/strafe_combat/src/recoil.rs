//! Recoil patterns and accumulated recoil
//!
//! Offsets are in degrees: `x` is horizontal kick (positive to the right),
//! `y` is vertical kick (positive up).

use serde::{Deserialize, Serialize};
use strafe_math::Vec2;

/// Fixed per-shot kick sequence. Reads past the end clamp to the last entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoilPattern {
    offsets: Vec<Vec2>,
}

impl RecoilPattern {
    pub fn new(offsets: Vec<Vec2>) -> Self {
        Self { offsets }
    }

    /// Alternating sideways kick that climbs with every shot
    pub fn zigzag(len: usize) -> Self {
        let offsets = (0..len)
            .map(|i| {
                let side = if i % 2 == 0 { 1.0 } else { -1.0 };
                Vec2::new(side * 0.1 * i as f32, 0.5 + 0.1 * i as f32)
            })
            .collect();
        Self { offsets }
    }

    /// Kick for the shot at `index`
    pub fn get(&self, index: usize) -> Vec2 {
        match self.offsets.len() {
            0 => Vec2::ZERO,
            len => self.offsets[index.min(len - 1)],
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl Default for RecoilPattern {
    fn default() -> Self {
        Self::zigzag(10)
    }
}

/// Recoil accumulated by a weapon
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecoilState {
    offset: Vec2,
    shot_index: usize,
}

impl RecoilState {
    /// Add the kick for the next shot, scaled per axis
    pub fn kick(&mut self, pattern: &RecoilPattern, vertical: f32, horizontal: f32) {
        let entry = pattern.get(self.shot_index);
        self.offset.x += entry.x * horizontal;
        self.offset.y += entry.y * vertical;
        self.shot_index = self.shot_index.saturating_add(1);
    }

    /// Decay toward zero at `rate` degrees per second.
    /// The shot index resets once fully recovered.
    pub fn recover(&mut self, rate: f32, dt: f32) {
        self.offset = self.offset.shrink_towards_zero((rate * dt).max(0.0));
        if self.offset == Vec2::ZERO {
            self.shot_index = 0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Length of the offset in degrees
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.offset.length()
    }

    #[inline]
    pub fn shot_index(&self) -> usize {
        self.shot_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zigzag_pattern() {
        let pattern = RecoilPattern::zigzag(10);
        assert_eq!(pattern.len(), 10);
        assert_eq!(pattern.get(0), Vec2::new(0.0, 0.5));
        assert_relative_eq!(pattern.get(1).x, -0.1);
        assert_relative_eq!(pattern.get(3).y, 0.8);
        // Clamps at the end
        assert_eq!(pattern.get(50), pattern.get(9));
        assert_eq!(RecoilPattern::new(Vec::new()).get(3), Vec2::ZERO);
    }

    #[test]
    fn test_kick_accumulates() {
        let pattern = RecoilPattern::default();
        let mut recoil = RecoilState::default();
        recoil.kick(&pattern, 0.5, 0.2);
        recoil.kick(&pattern, 0.5, 0.2);
        assert_eq!(recoil.shot_index(), 2);
        assert_relative_eq!(recoil.offset().y, 0.5 * 0.5 + 0.6 * 0.5);
        assert_relative_eq!(recoil.offset().x, -0.1 * 0.2);
    }

    #[test]
    fn test_recovery_resets_index() {
        let pattern = RecoilPattern::default();
        let mut recoil = RecoilState::default();
        for _ in 0..4 {
            recoil.kick(&pattern, 1.0, 1.0);
        }
        let before = recoil.magnitude();
        recoil.recover(5.0, 0.1);
        assert!(recoil.magnitude() < before);
        assert_eq!(recoil.shot_index(), 4);

        recoil.recover(5.0, 10.0);
        assert_eq!(recoil.offset(), Vec2::ZERO);
        assert_eq!(recoil.shot_index(), 0);
    }
}
