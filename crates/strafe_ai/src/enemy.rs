//! Enemy behaviour
//!
//! Each enemy runs a seven-state machine every tick:
//!
//! ```text
//!   Idle ──timer──▶ Patrol ──arrived──▶ Idle
//!     │               │
//!     └──── sees ─────┴──▶ Alert ──reaction──▶ Chase ◀──▶ Attack ──low hp──▶ Retreat
//!                            │                   │                             │
//!                            └──── search timeout / target gone ───▶ Patrol ◀──┘
//!
//!   any ──health 0──▶ Dead (terminal)
//! ```
//!
//! Detection from Idle/Patrol needs range, the view cone and line of sight.
//! Once engaged only range and line of sight matter, so a target that
//! circles behind an enemy stays tracked.

use crate::perception::{self, Observer, SightReport};
use crate::state_machine::{State, StateMachine};
use crate::steering;
use serde::{Deserialize, Serialize};
use strafe_combat::{DamageInfo, Health, HitTarget};
use strafe_core::{Countdown, EntityHeader, EntityId, EntityKind, RandomSource, Stopwatch};
use strafe_math::{Sphere, Transform, Vec3};
use strafe_physics::{slide_move, SpatialQuery};

/// Enemy archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt,
    Soldier,
    Heavy,
    Sniper,
    Boss,
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grunt => "grunt",
            Self::Soldier => "soldier",
            Self::Heavy => "heavy",
            Self::Sniper => "sniper",
            Self::Boss => "boss",
        }
    }
}

impl Default for EnemyKind {
    fn default() -> Self {
        Self::Grunt
    }
}

/// Behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    Idle,
    Patrol,
    Alert,
    Chase,
    Attack,
    Retreat,
    Dead,
}

impl State for EnemyState {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Dead)
    }
}

impl EnemyState {
    /// Engaged states track a specific target
    pub fn is_engaged(&self) -> bool {
        matches!(self, Self::Alert | Self::Chase | Self::Attack | Self::Retreat)
    }
}

/// Enemy statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    pub name: String,
    pub kind: EnemyKind,
    pub max_health: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Turn rate, rad/s
    pub rotation_speed: f32,
    pub attack_range: f32,
    /// Preferred distance while attacking
    pub optimal_range: f32,
    pub detection_range: f32,
    /// Full view cone, degrees
    pub field_of_view: f32,
    pub attack_damage: f32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Chance an attack lands (0.0 - 1.0)
    pub accuracy: f32,
    pub score_value: u32,

    /// Seconds spent idle before patrolling
    pub idle_time: f32,
    /// Seconds between spotting a target and chasing it
    pub reaction_time: f32,
    /// Seconds without sight before giving up
    pub search_time: f32,
    /// Wander radius around home when no patrol route is set
    pub patrol_radius: f32,
    /// Retreat below this health fraction while attacking; None disables retreat
    pub retreat_health_fraction: Option<f32>,
    pub retreat_time: f32,

    pub eye_height: f32,
    pub body_radius: f32,
    /// Head volume radius; None disables headshots
    pub head_radius: Option<f32>,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            name: "Grunt".into(),
            kind: EnemyKind::Grunt,
            max_health: 50.0,
            walk_speed: 3.0,
            run_speed: 6.0,
            rotation_speed: 3.0,
            attack_range: 20.0,
            optimal_range: 10.0,
            detection_range: 30.0,
            field_of_view: 120.0,
            attack_damage: 10.0,
            attack_cooldown: 1.0,
            accuracy: 0.7,
            score_value: 100,
            idle_time: 2.0,
            reaction_time: 0.5,
            search_time: 5.0,
            patrol_radius: 10.0,
            retreat_health_fraction: None,
            retreat_time: 3.0,
            eye_height: 1.6,
            body_radius: 0.5,
            head_radius: Some(0.25),
        }
    }
}

impl EnemyStats {
    pub fn grunt() -> Self {
        Self::default()
    }

    pub fn soldier() -> Self {
        Self {
            name: "Soldier".into(),
            kind: EnemyKind::Soldier,
            max_health: 80.0,
            attack_damage: 12.0,
            attack_cooldown: 0.8,
            accuracy: 0.75,
            score_value: 150,
            reaction_time: 0.35,
            retreat_health_fraction: Some(0.25),
            ..Self::default()
        }
    }

    pub fn heavy() -> Self {
        Self {
            name: "Heavy".into(),
            kind: EnemyKind::Heavy,
            max_health: 200.0,
            walk_speed: 2.0,
            run_speed: 3.5,
            rotation_speed: 2.0,
            attack_range: 15.0,
            optimal_range: 8.0,
            attack_damage: 20.0,
            attack_cooldown: 1.5,
            accuracy: 0.6,
            score_value: 300,
            reaction_time: 0.8,
            body_radius: 0.8,
            eye_height: 1.9,
            ..Self::default()
        }
    }

    pub fn sniper() -> Self {
        Self {
            name: "Sniper".into(),
            kind: EnemyKind::Sniper,
            max_health: 40.0,
            run_speed: 5.0,
            attack_range: 45.0,
            optimal_range: 35.0,
            detection_range: 50.0,
            field_of_view: 90.0,
            attack_damage: 35.0,
            attack_cooldown: 3.0,
            accuracy: 0.85,
            score_value: 250,
            retreat_health_fraction: Some(0.5),
            ..Self::default()
        }
    }

    pub fn boss() -> Self {
        Self {
            name: "Boss".into(),
            kind: EnemyKind::Boss,
            max_health: 1000.0,
            walk_speed: 2.5,
            run_speed: 5.0,
            rotation_speed: 1.5,
            attack_range: 25.0,
            optimal_range: 12.0,
            detection_range: 50.0,
            field_of_view: 360.0,
            attack_damage: 30.0,
            attack_cooldown: 0.8,
            accuracy: 0.8,
            score_value: 2000,
            reaction_time: 0.2,
            search_time: 15.0,
            eye_height: 2.8,
            body_radius: 1.0,
            head_radius: Some(0.45),
            ..Self::default()
        }
    }

    /// Preset for an archetype
    pub fn preset(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Grunt => Self::grunt(),
            EnemyKind::Soldier => Self::soldier(),
            EnemyKind::Heavy => Self::heavy(),
            EnemyKind::Sniper => Self::sniper(),
            EnemyKind::Boss => Self::boss(),
        }
    }

    /// Enable retreat below `fraction` of max health (builder pattern)
    pub fn with_retreat(mut self, fraction: f32) -> Self {
        self.retreat_health_fraction = Some(fraction);
        self
    }

    /// Set detection range (builder pattern)
    pub fn with_detection_range(mut self, range: f32) -> Self {
        self.detection_range = range;
        self
    }
}

/// A candidate target as seen by the AI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub id: EntityId,
    /// Feet position
    pub position: Vec3,
    pub eye: Vec3,
    pub alive: bool,
}

/// Things an enemy did this tick
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyEvent {
    StateChanged {
        enemy: EntityId,
        from: EnemyState,
        to: EnemyState,
    },
    /// An attack was attempted; `landed` is the accuracy roll
    Attacked {
        enemy: EntityId,
        target: EntityId,
        damage: f32,
        landed: bool,
        origin: Vec3,
    },
    /// Emitted exactly once per enemy
    Died {
        enemy: EntityId,
        kind: EnemyKind,
        position: Vec3,
        score_value: u32,
        killer: EntityId,
    },
}

/// Per-tick inputs for [`Enemy::update`]
pub struct EnemyContext<'a> {
    pub dt: f32,
    /// The enemy's tracked target, already resolved; None if it no longer exists
    pub target: Option<TargetInfo>,
    pub world: &'a dyn SpatialQuery,
    pub rng: &'a mut dyn RandomSource,
}

/// A live enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    header: EntityHeader,
    stats: EnemyStats,
    health: Health,
    fsm: StateMachine<EnemyState>,
    home: Vec3,
    patrol_route: Vec<Vec3>,
    patrol_index: usize,
    patrol_goal: Option<Vec3>,
    target: Option<EntityId>,
    last_known_position: Option<Vec3>,
    provoked: bool,
    idle_timer: Countdown,
    reaction_timer: Countdown,
    attack_timer: Countdown,
    retreat_timer: Countdown,
    unseen: Stopwatch,
    killer: EntityId,
}

impl Enemy {
    /// Create an idle enemy at `position`
    pub fn new(id: EntityId, stats: EnemyStats, position: Vec3) -> Self {
        Self {
            header: EntityHeader::new(id, EntityKind::Enemy, Transform::from_position(position)),
            health: Health::new(stats.max_health),
            fsm: StateMachine::new(EnemyState::Idle),
            home: position,
            patrol_route: Vec::new(),
            patrol_index: 0,
            patrol_goal: None,
            target: None,
            last_known_position: None,
            provoked: false,
            idle_timer: Countdown::started(stats.idle_time),
            reaction_timer: Countdown::new(stats.reaction_time),
            attack_timer: Countdown::new(stats.attack_cooldown),
            retreat_timer: Countdown::new(stats.retreat_time),
            unseen: Stopwatch::new(),
            killer: EntityId::INVALID,
            stats,
        }
    }

    /// Set the tracked target (builder pattern)
    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set an authored patrol route (builder pattern)
    pub fn with_patrol_route(mut self, route: Vec<Vec3>) -> Self {
        self.patrol_route = route;
        self
    }

    /// Set facing (builder pattern)
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.header.transform.yaw = yaw;
        self
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.header.id()
    }

    #[inline]
    pub fn header(&self) -> &EntityHeader {
        &self.header
    }

    #[inline]
    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    #[inline]
    pub fn state(&self) -> EnemyState {
        self.fsm.current()
    }

    #[inline]
    pub fn previous_state(&self) -> Option<EnemyState> {
        self.fsm.previous()
    }

    #[inline]
    pub fn time_in_state(&self) -> f32 {
        self.fsm.time_in_state()
    }

    #[inline]
    pub fn health(&self) -> &Health {
        &self.health
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.fsm.is_in(EnemyState::Dead)
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.header.transform.position
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.header.transform.yaw
    }

    pub fn eye_position(&self) -> Vec3 {
        self.position() + Vec3::new(0.0, self.stats.eye_height, 0.0)
    }

    #[inline]
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    #[inline]
    pub fn last_known_position(&self) -> Option<Vec3> {
        self.last_known_position
    }

    #[inline]
    pub fn patrol_goal(&self) -> Option<Vec3> {
        self.patrol_goal
    }

    /// Body and head volumes for combat resolution
    pub fn hit_target(&self) -> HitTarget {
        let center = self.position() + Vec3::new(0.0, self.stats.eye_height * 0.5, 0.0);
        let body = Sphere::new(center, self.stats.body_radius.max(self.stats.eye_height * 0.5));
        let target = HitTarget::new(self.id(), EntityKind::Enemy, body);
        match self.stats.head_radius {
            Some(radius) => target.with_head(Sphere::new(self.eye_position(), radius)),
            None => target,
        }
    }

    /// Apply damage. Returns the death event on the killing blow.
    ///
    /// Damage to a dead enemy changes nothing. Damage while Idle or Patrol
    /// turns the enemy toward the attacker.
    pub fn take_damage(&mut self, info: &DamageInfo) -> Option<EnemyEvent> {
        if self.is_dead() {
            return None;
        }

        let outcome = self.health.apply_damage(info.amount);
        if outcome.killed || !self.health.is_alive() {
            self.killer = info.source;
            return self.die();
        }

        if matches!(self.state(), EnemyState::Idle | EnemyState::Patrol) && info.source.is_valid() {
            self.target = Some(info.source);
            self.provoked = true;
            self.enter(EnemyState::Alert);
        }
        None
    }

    fn die(&mut self) -> Option<EnemyEvent> {
        if !self.fsm.transition(EnemyState::Dead) {
            return None;
        }
        self.header.active = false;
        log::debug!("{} {} died", self.stats.name, self.id());
        Some(EnemyEvent::Died {
            enemy: self.id(),
            kind: self.stats.kind,
            position: self.position(),
            score_value: self.stats.score_value,
            killer: self.killer,
        })
    }

    /// Enter a state, arming that state's timers. Returns false if nothing changed.
    fn enter(&mut self, to: EnemyState) -> bool {
        let from = self.state();
        if !self.fsm.transition(to) {
            return false;
        }
        match to {
            EnemyState::Idle => self.idle_timer.start_with(self.stats.idle_time),
            EnemyState::Alert => {
                self.reaction_timer.start_with(self.stats.reaction_time);
                self.unseen.reset();
            }
            EnemyState::Chase => self.unseen.reset(),
            EnemyState::Retreat => self.retreat_timer.start_with(self.stats.retreat_time),
            EnemyState::Patrol => {
                self.last_known_position = None;
                self.provoked = false;
            }
            EnemyState::Attack | EnemyState::Dead => {}
        }
        log::debug!("{} {}: {:?} -> {:?}", self.stats.name, self.id(), from, to);
        true
    }

    fn change(&mut self, to: EnemyState, events: &mut Vec<EnemyEvent>) {
        let from = self.state();
        if self.enter(to) {
            events.push(EnemyEvent::StateChanged {
                enemy: self.id(),
                from,
                to,
            });
        }
    }

    fn observer(&self, range: f32) -> Observer {
        Observer {
            position: self.position(),
            eye: self.eye_position(),
            facing: self.header.transform.forward_flat(),
            range,
            field_of_view: self.stats.field_of_view,
        }
    }

    fn sight(&self, target: &TargetInfo, world: &dyn SpatialQuery) -> SightReport {
        // Fresh detection uses the detection range; an engaged enemy also tracks out to its attack range
        let range = if self.state().is_engaged() {
            self.stats.detection_range.max(self.stats.attack_range)
        } else {
            self.stats.detection_range
        };
        perception::look(&self.observer(range), target.position, target.eye, world)
    }

    /// Attempt an attack on `target`.
    ///
    /// Gated by the attack cooldown. A successful attempt restarts the cooldown
    /// and rolls accuracy; a failed roll is a miss with no effect.
    pub fn try_attack(&mut self, target: &TargetInfo, rng: &mut dyn RandomSource) -> Option<EnemyEvent> {
        if !self.is_alive() || !self.attack_timer.is_finished() {
            return None;
        }
        self.attack_timer.start_with(self.stats.attack_cooldown);
        let landed = rng.next_f32() < self.stats.accuracy;
        log::trace!(
            "{} {} attacks {} ({})",
            self.stats.name,
            self.id(),
            target.id,
            if landed { "hit" } else { "miss" }
        );
        Some(EnemyEvent::Attacked {
            enemy: self.id(),
            target: target.id,
            damage: self.stats.attack_damage,
            landed,
            origin: self.eye_position(),
        })
    }

    fn face(&mut self, point: Vec3, dt: f32) {
        let direction = point - self.position();
        steering::rotate_towards(&mut self.header.transform.yaw, direction, self.stats.rotation_speed, dt);
    }

    /// Move toward `goal`, sliding along geometry. Returns (arrived, moved).
    fn walk_to(&mut self, goal: Vec3, speed: f32, ctx: &EnemyContext) -> (bool, bool) {
        let from = self.position();
        let mut next = from;
        let arrived = steering::move_to(&mut next, goal, speed, ctx.dt);
        let resolved = slide_move(ctx.world, from, next, self.stats.body_radius);
        self.header.transform.position = resolved;
        let moved = resolved.distance_xz(from) > 1e-5;
        (arrived && resolved.distance_xz(next) < 1e-5, moved)
    }

    fn pick_patrol_goal(&mut self, rng: &mut dyn RandomSource) -> Vec3 {
        if self.patrol_route.is_empty() {
            steering::random_point_in_radius(self.home, self.stats.patrol_radius, rng)
        } else {
            let goal = self.patrol_route[self.patrol_index % self.patrol_route.len()];
            self.patrol_index = (self.patrol_index + 1) % self.patrol_route.len();
            goal
        }
    }

    fn start_patrol(&mut self, ctx: &mut EnemyContext, events: &mut Vec<EnemyEvent>) {
        self.patrol_goal = Some(self.pick_patrol_goal(ctx.rng));
        self.change(EnemyState::Patrol, events);
    }

    /// Advance one tick
    pub fn update(&mut self, ctx: &mut EnemyContext, events: &mut Vec<EnemyEvent>) {
        if self.is_dead() {
            return;
        }
        if !self.health.is_alive() {
            events.extend(self.die());
            return;
        }

        let dt = ctx.dt;
        self.fsm.tick(dt);
        self.attack_timer.tick(dt);

        let target = ctx.target.filter(|t| t.alive);
        let sight = target.map(|t| (t, self.sight(&t, ctx.world)));

        match self.state() {
            EnemyState::Idle | EnemyState::Patrol => self.update_calm(sight, ctx, events),
            EnemyState::Alert => self.update_alert(sight, ctx, events),
            EnemyState::Chase => self.update_chase(sight, ctx, events),
            EnemyState::Attack => self.update_attack(sight, ctx, events),
            EnemyState::Retreat => self.update_retreat(sight, ctx, events),
            EnemyState::Dead => {}
        }

        let position = self.position();
        self.header.transform.position.y = ctx.world.floor_height(position);
    }

    fn update_calm(
        &mut self,
        sight: Option<(TargetInfo, SightReport)>,
        ctx: &mut EnemyContext,
        events: &mut Vec<EnemyEvent>,
    ) {
        if let Some((target, report)) = sight {
            if report.detects() {
                self.last_known_position = Some(target.position);
                self.change(EnemyState::Alert, events);
                return;
            }
        }

        if self.state() == EnemyState::Idle {
            if self.idle_timer.tick(ctx.dt) || self.idle_timer.is_finished() {
                self.start_patrol(ctx, events);
            }
            return;
        }

        let Some(goal) = self.patrol_goal else {
            self.change(EnemyState::Idle, events);
            return;
        };
        let (arrived, moved) = self.walk_to(goal, self.stats.walk_speed, ctx);
        self.face(goal, ctx.dt);
        if arrived || !moved {
            self.patrol_goal = None;
            self.change(EnemyState::Idle, events);
        }
    }

    fn update_alert(
        &mut self,
        sight: Option<(TargetInfo, SightReport)>,
        ctx: &mut EnemyContext,
        events: &mut Vec<EnemyEvent>,
    ) {
        let Some((target, report)) = sight else {
            self.start_patrol(ctx, events);
            return;
        };

        if report.tracks() || self.provoked {
            self.last_known_position = Some(target.position);
            self.provoked = false;
        }
        if report.tracks() {
            self.unseen.reset();
        } else {
            self.unseen.tick(ctx.dt);
        }
        if let Some(point) = self.last_known_position {
            self.face(point, ctx.dt);
        }

        if self.unseen.elapsed() > self.stats.search_time {
            self.start_patrol(ctx, events);
        } else if self.reaction_timer.tick(ctx.dt) || self.reaction_timer.is_finished() {
            self.change(EnemyState::Chase, events);
        }
    }

    fn update_chase(
        &mut self,
        sight: Option<(TargetInfo, SightReport)>,
        ctx: &mut EnemyContext,
        events: &mut Vec<EnemyEvent>,
    ) {
        let Some((target, report)) = sight else {
            self.start_patrol(ctx, events);
            return;
        };

        if report.tracks() {
            self.unseen.reset();
            self.last_known_position = Some(target.position);
            if report.distance <= self.stats.attack_range {
                self.change(EnemyState::Attack, events);
                return;
            }
            self.walk_to(target.position, self.stats.run_speed, ctx);
            self.face(target.position, ctx.dt);
            return;
        }

        self.unseen.tick(ctx.dt);
        if self.unseen.elapsed() > self.stats.search_time {
            self.start_patrol(ctx, events);
            return;
        }
        if let Some(point) = self.last_known_position {
            self.walk_to(point, self.stats.run_speed, ctx);
            self.face(point, ctx.dt);
        }
    }

    fn update_attack(
        &mut self,
        sight: Option<(TargetInfo, SightReport)>,
        ctx: &mut EnemyContext,
        events: &mut Vec<EnemyEvent>,
    ) {
        let Some((target, report)) = sight else {
            self.start_patrol(ctx, events);
            return;
        };

        if !report.tracks() || report.distance > self.stats.attack_range {
            self.change(EnemyState::Chase, events);
            return;
        }

        if let Some(fraction) = self.stats.retreat_health_fraction {
            if self.health.fraction() < fraction {
                self.change(EnemyState::Retreat, events);
                return;
            }
        }

        self.last_known_position = Some(target.position);
        self.face(target.position, ctx.dt);
        if report.distance > self.stats.optimal_range {
            self.walk_to(target.position, self.stats.walk_speed, ctx);
        }
        events.extend(self.try_attack(&target, ctx.rng));
    }

    fn update_retreat(
        &mut self,
        sight: Option<(TargetInfo, SightReport)>,
        ctx: &mut EnemyContext,
        events: &mut Vec<EnemyEvent>,
    ) {
        let Some((target, report)) = sight else {
            self.start_patrol(ctx, events);
            return;
        };

        let from = self.position();
        let mut next = from;
        steering::move_away(&mut next, target.position, self.stats.run_speed, ctx.dt);
        self.header.transform.position = slide_move(ctx.world, from, next, self.stats.body_radius);
        self.face(next + (next - from), ctx.dt);

        if self.retreat_timer.tick(ctx.dt) || self.retreat_timer.is_finished() {
            if report.tracks() {
                self.change(EnemyState::Chase, events);
            } else {
                self.start_patrol(ctx, events);
            }
        }
    }
}
