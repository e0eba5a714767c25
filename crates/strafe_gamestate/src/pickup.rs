//! Loot dropped by enemies

use serde::{Deserialize, Serialize};
use strafe_core::{Countdown, EntityHeader, EntityId, EntityKind, IdGenerator, RandomSource};
use strafe_math::{Transform, Vec3};

/// What a pickup grants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Reserve rounds for the held weapon
    Ammo(u32),
    Health(f32),
}

/// Drop and pickup tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Chance an enemy death drops anything
    pub drop_chance: f32,
    /// Chance a drop is health rather than ammo
    pub health_chance: f32,
    pub ammo_amount: u32,
    pub health_amount: f32,
    /// Seconds before an uncollected pickup despawns
    pub lifetime: f32,
    pub collect_radius: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            drop_chance: 0.3,
            health_chance: 0.5,
            ammo_amount: 30,
            health_amount: 25.0,
            lifetime: 15.0,
            collect_radius: 1.5,
        }
    }
}

/// A pickup lying in the world
#[derive(Debug, Clone)]
pub struct Pickup {
    header: EntityHeader,
    kind: PickupKind,
    lifetime: Countdown,
}

impl Pickup {
    #[inline]
    pub fn id(&self) -> EntityId {
        self.header.id()
    }

    #[inline]
    pub fn kind(&self) -> PickupKind {
        self.kind
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.header.transform.position
    }

    #[inline]
    pub fn header(&self) -> &EntityHeader {
        &self.header
    }

    pub fn remaining_lifetime(&self) -> f32 {
        self.lifetime.remaining()
    }
}

/// A pickup the collector walked over this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collected {
    pub id: EntityId,
    pub kind: PickupKind,
}

/// Owns every pickup in the world
#[derive(Debug, Clone, Default)]
pub struct PickupField {
    config: PickupConfig,
    pickups: Vec<Pickup>,
}

impl PickupField {
    pub fn new(config: PickupConfig) -> Self {
        Self {
            config,
            pickups: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &PickupConfig {
        &self.config
    }

    pub fn spawn(&mut self, ids: &IdGenerator, kind: PickupKind, position: Vec3) -> EntityId {
        let id = ids.next();
        self.pickups.push(Pickup {
            header: EntityHeader::new(id, EntityKind::Pickup, Transform::from_position(position)),
            kind,
            lifetime: Countdown::started(self.config.lifetime),
        });
        log::debug!("Dropped {:?} at {:?}", kind, position);
        id
    }

    /// Loot roll for an enemy death at `position`
    pub fn roll_drop(
        &mut self,
        ids: &IdGenerator,
        position: Vec3,
        rng: &mut dyn RandomSource,
    ) -> Option<EntityId> {
        if !rng.chance(self.config.drop_chance) {
            return None;
        }
        let kind = if rng.chance(self.config.health_chance) {
            PickupKind::Health(self.config.health_amount)
        } else {
            PickupKind::Ammo(self.config.ammo_amount)
        };
        Some(self.spawn(ids, kind, position))
    }

    /// Age pickups and collect those within reach of `collector`.
    ///
    /// Collected and expired pickups are marked and removed by [`sweep`](Self::sweep).
    pub fn update(&mut self, dt: f32, collector: Option<Vec3>) -> Vec<Collected> {
        let radius_squared = self.config.collect_radius * self.config.collect_radius;
        let mut collected = Vec::new();

        for pickup in self.pickups.iter_mut().filter(|p| !p.header.is_pending_destruction()) {
            let in_reach = collector
                .is_some_and(|c| pickup.position().distance_squared(c) <= radius_squared);
            if in_reach {
                collected.push(Collected {
                    id: pickup.id(),
                    kind: pickup.kind,
                });
                pickup.header.mark_for_destruction();
            } else if pickup.lifetime.tick(dt) {
                pickup.header.mark_for_destruction();
            }
        }
        collected
    }

    /// Remove collected and expired pickups
    pub fn sweep(&mut self) -> usize {
        let before = self.pickups.len();
        self.pickups.retain(|p| !p.header.is_pending_destruction());
        before - self.pickups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn clear(&mut self) {
        self.pickups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strafe_core::SequenceRandom;

    #[test]
    fn test_roll_drop() {
        let ids = IdGenerator::new();
        let mut field = PickupField::new(PickupConfig::default());

        // 0.9 fails the 0.3 drop chance
        let mut rng = SequenceRandom::new(vec![0.9]);
        assert!(field.roll_drop(&ids, Vec3::ZERO, &mut rng).is_none());

        // Drop, then 0.8 fails the health roll: ammo
        let mut rng = SequenceRandom::new(vec![0.1, 0.8]);
        assert!(field.roll_drop(&ids, Vec3::ZERO, &mut rng).is_some());
        assert_eq!(field.iter().next().map(Pickup::kind), Some(PickupKind::Ammo(30)));
    }

    #[test]
    fn test_collect_within_radius() {
        let ids = IdGenerator::new();
        let mut field = PickupField::new(PickupConfig::default());
        let near = field.spawn(&ids, PickupKind::Health(25.0), Vec3::new(1.0, 0.0, 0.0));
        field.spawn(&ids, PickupKind::Ammo(30), Vec3::new(10.0, 0.0, 0.0));

        let collected = field.update(0.1, Some(Vec3::ZERO));
        assert_eq!(
            collected,
            vec![Collected {
                id: near,
                kind: PickupKind::Health(25.0)
            }]
        );
        // Not collected twice before the sweep
        assert!(field.update(0.1, Some(Vec3::ZERO)).is_empty());
        assert_eq!(field.sweep(), 1);
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_pickups_expire() {
        let ids = IdGenerator::new();
        let config = PickupConfig {
            lifetime: 1.0,
            ..PickupConfig::default()
        };
        let mut field = PickupField::new(config);
        field.spawn(&ids, PickupKind::Ammo(10), Vec3::ZERO);

        field.update(0.5, None);
        assert_eq!(field.sweep(), 0);
        field.update(0.5, None);
        assert_eq!(field.sweep(), 1);
        assert!(field.is_empty());
    }
}
