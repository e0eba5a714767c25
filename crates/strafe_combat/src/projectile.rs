//! Projectiles
//!
//! The [`ProjectileSystem`] exclusively owns every live projectile. Each
//! update advances them, sweeps the travelled segment against targets and
//! level geometry, and reports damage, impacts and detonations. Finished
//! projectiles are only flagged; [`ProjectileSystem::sweep`] removes them.

use crate::damage::{DamageInfo, DamageKind};
use crate::resolution::{explode, CombatEvent, DamageEvent, HitTarget};
use serde::{Deserialize, Serialize};
use strafe_core::{Countdown, EntityHeader, EntityId, EntityKind, IdGenerator};
use strafe_math::{segment_sphere, Ray, Sphere, Transform, Vec3};
use strafe_physics::SpatialQuery;

/// Projectile archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    Bullet,
    Rocket,
    Grenade,
    Plasma,
}

/// Projectile configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileData {
    pub kind: ProjectileKind,
    /// Damage on direct hit
    pub damage: f32,
    /// Launch speed, m/s
    pub speed: f32,
    /// Seconds before expiry
    pub lifetime: f32,
    /// Downward acceleration, m/s^2
    pub gravity: f32,
    /// Collision radius
    pub radius: f32,
    /// Area damage radius; 0 = not explosive
    pub explosion_radius: f32,
    /// Area damage at the centre
    pub explosion_damage: f32,
    /// Fraction of damage kept after passing through a target
    pub penetration_power: f32,
    /// Targets that can be passed through
    pub max_penetrations: u32,
}

impl Default for ProjectileData {
    fn default() -> Self {
        Self {
            kind: ProjectileKind::Bullet,
            damage: 25.0,
            speed: 100.0,
            lifetime: 5.0,
            gravity: 0.0,
            radius: 0.05,
            explosion_radius: 0.0,
            explosion_damage: 0.0,
            penetration_power: 0.0,
            max_penetrations: 0,
        }
    }
}

impl ProjectileData {
    pub fn bullet() -> Self {
        Self::default()
    }

    pub fn rocket() -> Self {
        Self {
            kind: ProjectileKind::Rocket,
            damage: 50.0,
            speed: 40.0,
            lifetime: 5.0,
            radius: 0.15,
            explosion_radius: 5.0,
            explosion_damage: 100.0,
            ..Default::default()
        }
    }

    pub fn grenade() -> Self {
        Self {
            kind: ProjectileKind::Grenade,
            damage: 10.0,
            speed: 15.0,
            lifetime: 2.5,
            gravity: 9.81,
            radius: 0.1,
            explosion_radius: 6.0,
            explosion_damage: 120.0,
            ..Default::default()
        }
    }

    pub fn plasma() -> Self {
        Self {
            kind: ProjectileKind::Plasma,
            damage: 30.0,
            speed: 60.0,
            lifetime: 3.0,
            radius: 0.2,
            penetration_power: 0.5,
            max_penetrations: 2,
            ..Default::default()
        }
    }

    /// Set penetration (builder pattern)
    pub fn with_penetration(mut self, power: f32, max_penetrations: u32) -> Self {
        self.penetration_power = power;
        self.max_penetrations = max_penetrations;
        self
    }

    #[inline]
    pub fn is_explosive(&self) -> bool {
        self.explosion_radius > 0.0
    }
}

/// A live projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    header: EntityHeader,
    owner: EntityId,
    data: ProjectileData,
    previous_position: Vec3,
    velocity: Vec3,
    lifetime: Countdown,
    penetrations_left: u32,
    damage: f32,
    hits: Vec<EntityId>,
}

impl Projectile {
    pub fn new(id: EntityId, owner: EntityId, data: ProjectileData, origin: Vec3, direction: Vec3) -> Self {
        let velocity = direction.normalize_or_zero() * data.speed;
        let mut transform = Transform::from_position(origin);
        if let Some(yaw) = Transform::yaw_towards(velocity) {
            transform.yaw = yaw;
        }
        Self {
            header: EntityHeader::new(id, EntityKind::Projectile, transform),
            owner,
            previous_position: origin,
            velocity,
            lifetime: Countdown::started(data.lifetime),
            penetrations_left: data.max_penetrations,
            damage: data.damage,
            hits: Vec::new(),
            data,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.header.id()
    }

    #[inline]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    #[inline]
    pub fn data(&self) -> &ProjectileData {
        &self.data
    }

    #[inline]
    pub fn header(&self) -> &EntityHeader {
        &self.header
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.header.transform.position
    }

    #[inline]
    pub fn previous_position(&self) -> Vec3 {
        self.previous_position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Damage the next hit will deal
    #[inline]
    pub fn damage(&self) -> f32 {
        self.damage
    }

    #[inline]
    pub fn penetrations_left(&self) -> u32 {
        self.penetrations_left
    }

    #[inline]
    pub fn remaining_lifetime(&self) -> f32 {
        self.lifetime.remaining()
    }

    /// Targets already damaged, in hit order
    pub fn hits(&self) -> &[EntityId] {
        &self.hits
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.header.is_pending_destruction()
    }

    fn detonate(&mut self, at: Vec3, targets: &[HitTarget], events: &mut Vec<CombatEvent>) {
        if self.data.is_explosive() {
            events.push(CombatEvent::Explosion {
                center: at,
                radius: self.data.explosion_radius,
                source: self.owner,
            });
            events.extend(
                explode(at, self.data.explosion_radius, self.data.explosion_damage, self.owner, targets)
                    .into_iter()
                    .map(CombatEvent::Damage),
            );
        }
        self.header.mark_for_destruction();
    }

    /// Advance one tick and collide
    fn update(
        &mut self,
        dt: f32,
        targets: &[HitTarget],
        world: &dyn SpatialQuery,
        events: &mut Vec<CombatEvent>,
    ) {
        if !self.is_alive() {
            return;
        }

        let start = self.position();
        self.velocity.y -= self.data.gravity * dt;
        let end = start + self.velocity * dt;
        self.previous_position = start;
        self.header.transform.position = end;
        if let Some(yaw) = Transform::yaw_towards(self.velocity) {
            self.header.transform.yaw = yaw;
        }

        let travel = start.distance(end);
        let level_hit = if travel > 1e-6 {
            world.raycast(&Ray::from_points(start, end), travel)
        } else {
            None
        };
        let reach = level_hit.map_or(travel, |hit| hit.distance);

        // Swept contacts along this tick's segment, nearest first, ties by id
        let mut contacts: Vec<(f32, &HitTarget)> = targets
            .iter()
            .filter(|t| t.id != self.owner && !self.hits.contains(&t.id))
            .filter_map(|t| {
                let swept = Sphere::new(t.body.center, t.body.radius + self.data.radius);
                segment_sphere(start, end, &swept)
                    .filter(|d| *d <= reach)
                    .map(|d| (d, t))
            })
            .collect();
        contacts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));

        let direction = self.velocity.normalize_or_zero();
        for (distance, target) in contacts {
            let point = if travel > 1e-6 {
                start + direction * distance
            } else {
                start
            };
            let info = DamageInfo::new(self.damage, DamageKind::Bullet)
                .with_source(self.owner)
                .with_hit_point(point)
                .with_direction(direction);
            events.push(CombatEvent::Damage(DamageEvent {
                target: target.id,
                info,
            }));
            self.hits.push(target.id);
            log::trace!("Projectile {} hit {} for {:.1}", self.id(), target.id, self.damage);

            if self.data.is_explosive() {
                self.header.transform.position = point;
                self.detonate(point, targets, events);
                return;
            }

            // Each hit consumes one penetration; the projectile stops once none are left
            if self.data.penetration_power > 0.0 && self.penetrations_left > 0 {
                self.penetrations_left -= 1;
                if self.penetrations_left > 0 {
                    self.damage *= self.data.penetration_power;
                    continue;
                }
            }
            self.header.transform.position = point;
            self.header.mark_for_destruction();
            return;
        }

        if let Some(hit) = level_hit {
            self.header.transform.position = hit.point;
            events.push(CombatEvent::Impact {
                point: hit.point,
                normal: hit.normal,
            });
            self.detonate(hit.point, targets, events);
            return;
        }

        if self.lifetime.tick(dt) {
            self.detonate(end, targets, events);
        }
    }
}

/// Owner of all live projectiles
#[derive(Debug, Default)]
pub struct ProjectileSystem {
    projectiles: Vec<Projectile>,
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch a projectile. Returns its id.
    pub fn spawn(
        &mut self,
        ids: &IdGenerator,
        owner: EntityId,
        data: ProjectileData,
        origin: Vec3,
        direction: Vec3,
    ) -> EntityId {
        let id = ids.next();
        log::trace!("Spawned {:?} projectile {} for {}", data.kind, id, owner);
        self.projectiles
            .push(Projectile::new(id, owner, data, origin, direction));
        id
    }

    /// Advance all projectiles in ascending id order
    pub fn update(&mut self, dt: f32, targets: &[HitTarget], world: &dyn SpatialQuery) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        for projectile in &mut self.projectiles {
            projectile.update(dt, targets, world, &mut events);
        }
        events
    }

    /// Remove finished projectiles. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(Projectile::is_alive);
        before - self.projectiles.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles
            .binary_search_by_key(&id, Projectile::id)
            .ok()
            .map(|index| &self.projectiles[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Live (not yet finished) projectiles
    pub fn active_count(&self) -> usize {
        self.projectiles.iter().filter(|p| p.is_alive()).count()
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strafe_math::AABB;
    use strafe_physics::{LevelGeometry, OpenField};

    const PLAYER: EntityId = EntityId::from_raw(1);

    fn target(id: u32, z: f32) -> HitTarget {
        HitTarget::new(
            EntityId::from_raw(id),
            EntityKind::Enemy,
            Sphere::new(Vec3::new(0.0, 1.0, z), 0.5),
        )
    }

    fn damage_events(events: &[CombatEvent]) -> Vec<&DamageEvent> {
        events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::Damage(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_penetration_stops_after_budget() {
        let ids = IdGenerator::new();
        ids.next();
        let mut system = ProjectileSystem::new();
        let data = ProjectileData::bullet().with_penetration(0.5, 2);
        let id = system.spawn(&ids, PLAYER, data, Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);

        let targets = [target(10, -5.0), target(11, -10.0), target(12, -15.0)];
        let mut all = Vec::new();
        for _ in 0..20 {
            all.extend(system.update(0.05, &targets, &OpenField::default()));
        }

        let hits = damage_events(&all);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].target, EntityId::from_raw(10));
        assert_relative_eq!(hits[0].info.amount, 25.0);
        assert_eq!(hits[1].target, EntityId::from_raw(11));
        assert_relative_eq!(hits[1].info.amount, 12.5);

        assert!(!system.get(id).unwrap().is_alive());
        assert_eq!(system.sweep(), 1);
        assert!(system.is_empty());
    }

    #[test]
    fn test_no_penetration_stops_at_first_target() {
        let ids = IdGenerator::new();
        let mut system = ProjectileSystem::new();
        system.spawn(&ids, PLAYER, ProjectileData::bullet(), Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);

        // Both targets inside the first tick's segment: nearest wins
        let targets = [target(12, -8.0), target(11, -4.0)];
        let events = system.update(0.1, &targets, &OpenField::default());
        let hits = damage_events(&events);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, EntityId::from_raw(11));
    }

    #[test]
    fn test_owner_is_not_hit() {
        let ids = IdGenerator::new();
        let mut system = ProjectileSystem::new();
        let owner = target(1, 0.0);
        system.spawn(&ids, owner.id, ProjectileData::bullet(), Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);
        let events = system.update(0.01, &[owner], &OpenField::default());
        assert!(damage_events(&events).is_empty());
    }

    #[test]
    fn test_level_impact_destroys() {
        let ids = IdGenerator::new();
        let mut system = ProjectileSystem::new();
        let level = LevelGeometry::arena(50.0)
            .with_collider(AABB::new(Vec3::new(-2.0, 0.0, -6.0), Vec3::new(2.0, 3.0, -5.0)));
        let id = system.spawn(&ids, PLAYER, ProjectileData::bullet(), Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);

        // Target behind the wall is shielded
        let events = system.update(0.1, &[target(9, -8.0)], &level);
        assert!(damage_events(&events).is_empty());
        assert!(events.iter().any(|e| matches!(e, CombatEvent::Impact { .. })));
        let projectile = system.get(id).unwrap();
        assert!(!projectile.is_alive());
        assert_relative_eq!(projectile.position().z, -5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_lifetime_expiry() {
        let ids = IdGenerator::new();
        let mut system = ProjectileSystem::new();
        let data = ProjectileData {
            lifetime: 0.25,
            ..ProjectileData::bullet()
        };
        system.spawn(&ids, PLAYER, data, Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        for _ in 0..2 {
            system.update(0.1, &[], &OpenField::default());
        }
        assert_eq!(system.active_count(), 1);
        system.update(0.1, &[], &OpenField::default());
        assert_eq!(system.active_count(), 0);
    }

    #[test]
    fn test_gravity_bends_trajectory() {
        let ids = IdGenerator::new();
        let mut system = ProjectileSystem::new();
        let id = system.spawn(&ids, PLAYER, ProjectileData::grenade(), Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Z);
        system.update(0.1, &[], &OpenField::default());
        let grenade = system.get(id).unwrap();
        assert!(grenade.velocity().y < 0.0);
        assert!(grenade.position().y < 5.0);
    }

    #[test]
    fn test_rocket_explodes_on_direct_hit() {
        let ids = IdGenerator::new();
        let mut system = ProjectileSystem::new();
        system.spawn(&ids, PLAYER, ProjectileData::rocket(), Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);

        let targets = [target(5, -3.0), target(6, -5.0), target(7, -30.0)];
        let events = system.update(0.1, &targets, &OpenField::default());

        assert!(events.iter().any(|e| matches!(e, CombatEvent::Explosion { .. })));
        let hits = damage_events(&events);
        // Direct hit on 5, splash on 5 and 6, nothing reaches 7
        assert_eq!(hits.iter().filter(|h| h.target == EntityId::from_raw(5)).count(), 2);
        assert!(hits.iter().any(|h| h.target == EntityId::from_raw(6)));
        assert!(hits.iter().all(|h| h.target != EntityId::from_raw(7)));
        assert_eq!(system.active_count(), 0);
    }
}
