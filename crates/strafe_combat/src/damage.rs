//! Damage information and falloff curves

use serde::{Deserialize, Serialize};
use strafe_core::EntityId;
use strafe_math::{inverse_lerp, lerp, Vec3};

/// How the damage was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// Hit-scan rounds and direct projectile hits
    Bullet,
    /// Area damage from a detonation
    Explosion,
    /// Close range enemy attacks
    Melee,
}

impl Default for DamageKind {
    fn default() -> Self {
        Self::Bullet
    }
}

/// Information about a damage instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    /// Final damage amount, multipliers already applied
    pub amount: f32,
    /// Delivery kind
    pub kind: DamageKind,
    /// Entity that caused the damage (`EntityId::INVALID` for world damage)
    pub source: EntityId,
    /// World position where damage was applied
    pub hit_point: Option<Vec3>,
    /// Direction the damage travelled
    pub direction: Option<Vec3>,
    /// Whether the head volume was hit
    pub headshot: bool,
}

impl DamageInfo {
    /// Create new damage info
    pub fn new(amount: f32, kind: DamageKind) -> Self {
        Self {
            amount,
            kind,
            source: EntityId::INVALID,
            hit_point: None,
            direction: None,
            headshot: false,
        }
    }

    /// Set the source entity
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = source;
        self
    }

    /// Set the hit point
    pub fn with_hit_point(mut self, point: Vec3) -> Self {
        self.hit_point = Some(point);
        self
    }

    /// Set the travel direction
    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Mark as headshot
    pub fn with_headshot(mut self, headshot: bool) -> Self {
        self.headshot = headshot;
        self
    }
}

impl Default for DamageInfo {
    fn default() -> Self {
        Self::new(0.0, DamageKind::Bullet)
    }
}

/// Linear damage falloff over distance.
///
/// Full damage up to `start`, linear down to `floor` at `end`, `floor` beyond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageFalloff {
    pub start: f32,
    pub end: f32,
    /// Multiplier at and beyond `end`
    pub floor: f32,
}

impl DamageFalloff {
    /// No falloff at any distance
    pub const NONE: Self = Self {
        start: f32::MAX,
        end: f32::MAX,
        floor: 1.0,
    };

    pub fn new(start: f32, end: f32, floor: f32) -> Self {
        Self { start, end, floor }
    }

    /// Damage multiplier at `distance`
    pub fn multiplier(&self, distance: f32) -> f32 {
        if distance <= self.start {
            return 1.0;
        }
        let t = inverse_lerp(self.start, self.end, distance);
        lerp(1.0, self.floor, t)
    }
}

impl Default for DamageFalloff {
    fn default() -> Self {
        Self::new(50.0, 100.0, 0.5)
    }
}

/// Linear radial falloff: 1 at the centre, 0 at `radius` and beyond
pub fn radial_falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / radius).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_damage_info() {
        let damage = DamageInfo::new(50.0, DamageKind::Explosion)
            .with_source(EntityId::from_raw(123))
            .with_headshot(true);

        assert_eq!(damage.amount, 50.0);
        assert_eq!(damage.kind, DamageKind::Explosion);
        assert_eq!(damage.source.raw(), 123);
        assert!(damage.headshot);
    }

    #[test]
    fn test_falloff_curve_endpoints() {
        let falloff = DamageFalloff::new(50.0, 100.0, 0.5);
        assert_relative_eq!(falloff.multiplier(0.0), 1.0);
        assert_relative_eq!(falloff.multiplier(50.0), 1.0);
        assert_relative_eq!(falloff.multiplier(75.0), 0.75);
        assert_relative_eq!(falloff.multiplier(100.0), 0.5);
        assert_relative_eq!(falloff.multiplier(500.0), 0.5);
    }

    #[test]
    fn test_falloff_is_monotonic() {
        let falloff = DamageFalloff::default();
        let mut last = f32::MAX;
        for i in 0..200 {
            let m = falloff.multiplier(i as f32);
            assert!(m <= last);
            last = m;
        }
        assert_relative_eq!(DamageFalloff::NONE.multiplier(1.0e6), 1.0);
    }

    #[test]
    fn test_radial_falloff() {
        assert_relative_eq!(radial_falloff(0.0, 4.0), 1.0);
        assert_relative_eq!(radial_falloff(1.0, 4.0), 0.75);
        assert_relative_eq!(radial_falloff(6.0, 4.0), 0.0);
        assert_relative_eq!(radial_falloff(1.0, 0.0), 0.0);
    }
}
