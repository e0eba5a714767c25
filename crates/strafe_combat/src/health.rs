//! Health pool

use serde::{Deserialize, Serialize};

/// What a single `apply_damage` call did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    /// Health actually removed
    pub dealt: f32,
    /// This call took health from positive to zero
    pub killed: bool,
}

/// Clamped health pool. `current` stays within `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Create a full health pool
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Apply damage.
    ///
    /// Negative amounts are ignored. Once at zero, further damage does nothing,
    /// so `killed` is reported exactly once.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() || !(amount > 0.0) {
            return DamageOutcome::default();
        }

        let dealt = amount.min(self.current);
        self.current -= dealt;
        if self.current < 1e-6 {
            self.current = 0.0;
        }

        DamageOutcome {
            dealt,
            killed: self.current <= 0.0,
        }
    }

    /// Heal by `amount`; the dead cannot be healed.
    /// Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() || !(amount > 0.0) {
            return 0.0;
        }

        let old = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - old
    }

    /// Set health directly (clamped to `0..=max`)
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    /// Restore to full
    pub fn restore(&mut self) {
        self.current = self.max;
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Health as a fraction (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_and_death() {
        let mut health = Health::new(50.0);

        let outcome = health.apply_damage(30.0);
        assert_eq!(outcome.dealt, 30.0);
        assert!(!outcome.killed);
        assert_eq!(health.current(), 20.0);

        let outcome = health.apply_damage(100.0);
        assert_eq!(outcome.dealt, 20.0);
        assert!(outcome.killed);
        assert_eq!(health.current(), 0.0);
        assert!(!health.is_alive());

        // Dead stays dead, and the kill is not reported twice
        let outcome = health.apply_damage(10.0);
        assert_eq!(outcome, DamageOutcome::default());
    }

    #[test]
    fn test_healing() {
        let mut health = Health::new(100.0);
        health.set(50.0);

        assert_eq!(health.heal(30.0), 30.0);
        assert_eq!(health.current(), 80.0);

        // Can't overheal
        assert_eq!(health.heal(50.0), 20.0);
        assert!(health.is_full());
    }

    #[test]
    fn test_health_stays_clamped() {
        let mut health = Health::new(100.0);
        let script = [35.0, -20.0, 80.0, 10.0, f32::NAN, 5.0, 200.0];
        for (i, amount) in script.iter().enumerate() {
            if i % 2 == 0 {
                health.apply_damage(*amount);
            } else {
                health.heal(*amount);
            }
            assert!(health.current() >= 0.0 && health.current() <= health.max());
            assert_eq!(health.is_alive(), health.current() > 0.0);
        }
        health.set(-5.0);
        assert_eq!(health.current(), 0.0);
        health.set(500.0);
        assert_eq!(health.current(), 100.0);
    }

    #[test]
    fn test_dead_cannot_heal() {
        let mut health = Health::new(10.0);
        health.apply_damage(10.0);
        assert_eq!(health.heal(5.0), 0.0);
        health.restore();
        assert!(health.is_alive());
    }
}
