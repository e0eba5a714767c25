//! Enemy roster: ownership, lookup and per-tick update of every enemy

use crate::enemy::{Enemy, EnemyContext, EnemyEvent, EnemyStats, TargetInfo};
use strafe_combat::{DamageInfo, HitTarget};
use strafe_core::{EntityId, IdGenerator, RandomSource};
use strafe_math::Vec3;
use strafe_physics::SpatialQuery;

/// All enemies in the simulation, kept in ascending id order
#[derive(Debug, Clone, Default)]
pub struct EnemyRoster {
    enemies: Vec<Enemy>,
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an enemy and return its id
    pub fn spawn(
        &mut self,
        ids: &IdGenerator,
        stats: EnemyStats,
        position: Vec3,
        target: Option<EntityId>,
    ) -> EntityId {
        self.spawn_with_patrol(ids, stats, position, target, Vec::new())
    }

    /// Spawn an enemy that walks an authored patrol route
    pub fn spawn_with_patrol(
        &mut self,
        ids: &IdGenerator,
        stats: EnemyStats,
        position: Vec3,
        target: Option<EntityId>,
        route: Vec<Vec3>,
    ) -> EntityId {
        let id = ids.next();
        log::debug!("Spawning {} {} at {:?}", stats.name, id, position);
        let mut enemy = Enemy::new(id, stats, position).with_patrol_route(route);
        enemy.set_target(target);
        self.insert(enemy);
        id
    }

    /// Add an already-built enemy
    pub fn insert(&mut self, enemy: Enemy) {
        match self.enemies.binary_search_by_key(&enemy.id(), Enemy::id) {
            Ok(index) => self.enemies[index] = enemy,
            Err(index) => self.enemies.insert(index, enemy),
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies
            .binary_search_by_key(&id, Enemy::id)
            .ok()
            .map(|index| &self.enemies[index])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        match self.enemies.binary_search_by_key(&id, Enemy::id) {
            Ok(index) => Some(&mut self.enemies[index]),
            Err(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    /// Update every enemy in id order.
    ///
    /// Each enemy's tracked target is looked up in `targets`; one that is
    /// missing is reported to the enemy as gone.
    pub fn update_all(
        &mut self,
        dt: f32,
        targets: &[TargetInfo],
        world: &dyn SpatialQuery,
        rng: &mut dyn RandomSource,
    ) -> Vec<EnemyEvent> {
        let mut events = Vec::new();
        for enemy in &mut self.enemies {
            let target = enemy
                .target()
                .and_then(|id| targets.iter().find(|t| t.id == id))
                .copied();
            let mut ctx = EnemyContext {
                dt,
                target,
                world,
                rng: &mut *rng,
            };
            enemy.update(&mut ctx, &mut events);
        }
        events
    }

    /// Route damage to one enemy. Unknown ids are ignored.
    pub fn apply_damage(&mut self, id: EntityId, info: &DamageInfo) -> Option<EnemyEvent> {
        self.get_mut(id).and_then(|enemy| enemy.take_damage(info))
    }

    /// Remove dead enemies, returning how many were removed
    pub fn sweep(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|e| !e.is_dead());
        before - self.enemies.len()
    }

    pub fn alive_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Living enemies within `radius` of `point`
    pub fn in_radius(&self, point: Vec3, radius: f32) -> impl Iterator<Item = &Enemy> {
        let radius_squared = radius * radius;
        self.enemies
            .iter()
            .filter(move |e| e.is_alive() && e.position().distance_squared(point) <= radius_squared)
    }

    /// Closest living enemy to `point`; ties go to the lowest id
    pub fn closest(&self, point: Vec3) -> Option<&Enemy> {
        let mut best: Option<(&Enemy, f32)> = None;
        for enemy in self.enemies.iter().filter(|e| e.is_alive()) {
            let distance = enemy.position().distance_squared(point);
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((enemy, distance)),
            }
        }
        best.map(|(enemy, _)| enemy)
    }

    /// Hit volumes of every living enemy, in id order
    pub fn hit_targets(&self) -> Vec<HitTarget> {
        self.enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(Enemy::hit_target)
            .collect()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }
}
