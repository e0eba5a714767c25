//! Simulation context
//!
//! [`Simulation`] owns every entity collection plus the player, weapon,
//! level, id generator and random source, and advances them in a fixed
//! stage order once per tick:
//!
//! 1. Player movement and look
//! 2. Weapon (aim, reload, fire)
//! 3. Enemy behaviour
//! 4. Combat resolution and cleanup (projectiles, pickups, roster sweep)
//! 5. Wave director
//! 6. Win / lose check

use serde::Serialize;
use strafe_ai::{Enemy, EnemyEvent, EnemyKind, EnemyRoster, EnemyState, EnemyStats, TargetInfo};
use strafe_combat::{
    resolve_hitscan, CombatEvent, DamageEvent, Delivery, ProjectileSystem, Trigger, Weapon, WeaponPhase,
};
use strafe_core::{EntityId, EntityKind, IdGenerator, SeededRandom};
use strafe_gamestate::{GameState, Outcome, PickupField, PickupKind, WaveDirector, WaveEvent};
use strafe_math::{Transform, Vec3};
use strafe_physics::{LevelGeometry, SpatialQuery};
use strafe_player::{Action, InputSource, MovementReport, Player};

use crate::config::SimConfig;
use crate::notify::{Notification, Notifier, SoundCue};
use crate::render::{RenderItem, RenderSink};

/// What happened during one [`Simulation::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Delta actually simulated after clamping
    pub dt: f32,
    /// Whether the session was running
    pub simulated: bool,
    pub shots: u32,
    pub kills: u32,
    pub damage_taken: f32,
}

/// Player view in a [`Snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub id: EntityId,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
}

/// Weapon view in a [`Snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponSnapshot {
    pub name: String,
    pub current_ammo: u32,
    pub reserve_ammo: u32,
    pub phase: WeaponPhase,
}

/// Enemy view in a [`Snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemySnapshot {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub state: EnemyState,
    pub position: Vec3,
    pub health: f32,
}

/// Serializable summary of the whole session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub state: GameState,
    pub player: PlayerSnapshot,
    pub weapon: WeaponSnapshot,
    pub enemies: Vec<EnemySnapshot>,
    pub projectiles: usize,
    pub pickups: usize,
}

/// The explicitly constructed simulation context
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    ids: IdGenerator,
    rng: SeededRandom,
    player: Player,
    weapon: Weapon,
    roster: EnemyRoster,
    projectiles: ProjectileSystem,
    pickups: PickupField,
    director: WaveDirector,
    state: GameState,
    ticks: u64,
}

impl Simulation {
    /// Build a session from `config`. It stays idle until [`start`](Self::start).
    pub fn new(config: SimConfig) -> Self {
        let ids = IdGenerator::new();
        let player = Player::new(ids.next(), config.player.clone(), config.player_spawn);

        Self {
            rng: SeededRandom::new(config.seed),
            weapon: Weapon::new(config.weapon.clone()),
            roster: EnemyRoster::new(),
            projectiles: ProjectileSystem::new(),
            pickups: PickupField::new(config.pickups.clone()),
            director: WaveDirector::new(config.waves.clone()),
            state: GameState::new(),
            ticks: 0,
            player,
            ids,
            config,
        }
    }

    pub fn start(&mut self) {
        self.state.start();
        log::debug!(
            "Simulation seed {}, weapon {}",
            self.config.seed,
            self.weapon.stats().name
        );
    }

    /// Throw away the current session and start a fresh one with the same config
    pub fn restart(&mut self) {
        *self = Self::new(self.config.clone());
        self.start();
    }

    pub fn pause(&mut self) -> bool {
        self.state.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.state.resume()
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    #[inline]
    pub fn enemies(&self) -> &EnemyRoster {
        &self.roster
    }

    #[inline]
    pub fn projectiles(&self) -> &ProjectileSystem {
        &self.projectiles
    }

    #[inline]
    pub fn pickups(&self) -> &PickupField {
        &self.pickups
    }

    #[inline]
    pub fn director(&self) -> &WaveDirector {
        &self.director
    }

    #[inline]
    pub fn level(&self) -> &LevelGeometry {
        &self.config.level
    }

    /// Ticks simulated while running
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Player camera for the renderer
    pub fn camera(&self) -> Transform {
        self.player.camera()
    }

    /// Spawn an enemy of a configured archetype, facing the player
    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec3) -> EntityId {
        let stats = self.config.enemies.get(kind).clone();
        self.spawn_enemy_with(stats, position)
    }

    /// Spawn an enemy from explicit stats, facing the player
    pub fn spawn_enemy_with(&mut self, stats: EnemyStats, position: Vec3) -> EntityId {
        let mut position = position;
        position.y = self.config.level.floor_height(position);

        let yaw = Transform::yaw_towards(self.player.position() - position).unwrap_or(0.0);
        let id = self.ids.next();
        self.roster.insert(
            Enemy::new(id, stats, position)
                .with_target(self.player.id())
                .with_yaw(yaw),
        );
        id
    }

    /// Advance the session by `dt` seconds.
    ///
    /// `dt` is clamped to `[0, max_delta]`. Nothing moves unless the
    /// session is running.
    pub fn tick(&mut self, dt: f32, input: &dyn InputSource, notifier: &dyn Notifier) -> TickReport {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_delta)
        } else {
            0.0
        };
        let mut report = TickReport {
            dt,
            ..Default::default()
        };
        if !self.state.is_running() {
            return report;
        }
        report.simulated = true;
        self.ticks += 1;
        self.state.advance(dt);

        let movement = self.player.update(
            dt,
            input,
            &self.config.level,
            self.weapon.movement_multiplier(),
        );
        self.update_weapon(dt, input, movement, notifier, &mut report);
        self.update_enemies(dt, notifier, &mut report);
        self.update_combat(dt, notifier, &mut report);
        let victory = self.update_waves(dt, notifier);
        self.check_outcome(victory, notifier);

        report
    }

    fn update_weapon(
        &mut self,
        dt: f32,
        input: &dyn InputSource,
        movement: MovementReport,
        notifier: &dyn Notifier,
        report: &mut TickReport,
    ) {
        self.weapon.set_aiming(input.held(Action::Aim));
        if input.pressed(Action::Reload) && self.weapon.start_reload() {
            notifier.notify(Notification::Sound {
                cue: SoundCue::Reload,
                position: self.player.position(),
            });
        }
        self.weapon.tick(dt);

        if !self.player.is_alive() {
            return;
        }

        // Aim and spread are taken before this shot's recoil kicks in
        let aim = self.weapon.aim(&self.player.camera());
        let spread = self.weapon.current_spread(movement.moving, movement.airborne);
        let was_reloading = self.weapon.is_reloading();

        let trigger = Trigger {
            pressed: input.pressed(Action::Fire),
            held: input.held(Action::Fire),
        };
        if !self.weapon.pull_trigger(trigger) {
            return;
        }
        report.shots += 1;

        let eye = self.player.eye_position();
        notifier.notify(Notification::Sound {
            cue: SoundCue::WeaponFire,
            position: eye,
        });
        if !was_reloading && self.weapon.is_reloading() {
            notifier.notify(Notification::Sound {
                cue: SoundCue::Reload,
                position: eye,
            });
        }

        let shooter = self.player.id();
        match self.weapon.stats().delivery.clone() {
            Delivery::Hitscan => {
                for _ in 0..self.weapon.stats().pellets.max(1) {
                    // Enemies killed by an earlier pellet no longer block
                    let targets = self.roster.hit_targets();
                    let direction = Weapon::apply_spread(aim, spread, &mut self.rng);
                    let shot = self.weapon.stats().hitscan_shot(shooter, eye, direction);
                    let outcome = resolve_hitscan(&shot, &targets, &self.config.level);
                    for event in outcome.into_events() {
                        self.apply_combat_event(event, notifier, report);
                    }
                }
            }
            Delivery::Projectile(data) => {
                let direction = Weapon::apply_spread(aim, spread, &mut self.rng);
                self.projectiles
                    .spawn(&self.ids, shooter, data, eye, direction);
            }
        }
    }

    fn update_enemies(&mut self, dt: f32, notifier: &dyn Notifier, report: &mut TickReport) {
        let target = TargetInfo {
            id: self.player.id(),
            position: self.player.position(),
            eye: self.player.eye_position(),
            alive: self.player.is_alive(),
        };
        let events = self
            .roster
            .update_all(dt, &[target], &self.config.level, &mut self.rng);
        for event in events {
            self.handle_enemy_event(event, notifier, report);
        }
    }

    fn update_combat(&mut self, dt: f32, notifier: &dyn Notifier, report: &mut TickReport) {
        let mut targets = Vec::with_capacity(self.roster.len() + 1);
        if self.player.is_alive() {
            targets.push(self.player.hit_target());
        }
        targets.extend(self.roster.hit_targets());

        for event in self.projectiles.update(dt, &targets, &self.config.level) {
            self.apply_combat_event(event, notifier, report);
        }

        let collector = Some(self.player.position()).filter(|_| self.player.is_alive());
        for collected in self.pickups.update(dt, collector) {
            match collected.kind {
                PickupKind::Ammo(rounds) => self.weapon.add_ammo(rounds),
                PickupKind::Health(amount) => {
                    self.player.heal(amount);
                }
            }
            notifier.notify(Notification::PickupCollected(collected.kind));
            notifier.notify(Notification::Sound {
                cue: SoundCue::Pickup,
                position: self.player.position(),
            });
        }

        self.projectiles.sweep();
        self.pickups.sweep();
        self.roster.sweep();
    }

    /// Returns true when the director declares victory
    fn update_waves(&mut self, dt: f32, notifier: &dyn Notifier) -> bool {
        let mut victory = false;
        let events = self
            .director
            .update(dt, self.roster.alive_count(), self.player.position());

        for event in events {
            match event {
                WaveEvent::Started { wave, spawns } => {
                    self.state.wave = wave;
                    for order in &spawns {
                        self.spawn_enemy(order.kind, order.position);
                    }
                    notifier.notify(Notification::WaveStarted {
                        wave,
                        enemies: spawns.len(),
                    });
                }
                WaveEvent::Cleared { wave } => {
                    notifier.notify(Notification::WaveCleared { wave });
                }
                WaveEvent::Victory { .. } => victory = true,
            }
        }
        victory
    }

    fn check_outcome(&mut self, victory: bool, notifier: &dyn Notifier) {
        let outcome = if !self.player.is_alive() {
            Outcome::Defeat
        } else if victory {
            Outcome::Victory
        } else {
            return;
        };
        self.state.end(outcome);
        notifier.notify(Notification::GameOver(self.state.outcome));
    }

    fn apply_combat_event(&mut self, event: CombatEvent, notifier: &dyn Notifier, report: &mut TickReport) {
        match event {
            CombatEvent::Damage(DamageEvent { target, info }) => {
                if target == self.player.id() {
                    self.damage_player(info.amount, notifier, report);
                    return;
                }
                let live = self.roster.get(target).is_some_and(|e| !e.is_dead());
                let died = self.roster.apply_damage(target, &info);
                if live && info.source == self.player.id() {
                    notifier.notify(Notification::HitMarker {
                        target,
                        headshot: info.headshot,
                        killed: died.is_some(),
                    });
                }
                if let Some(event) = died {
                    self.handle_enemy_event(event, notifier, report);
                }
            }
            CombatEvent::Impact { point, .. } => {
                notifier.notify(Notification::Sound {
                    cue: SoundCue::Impact,
                    position: point,
                });
            }
            CombatEvent::Explosion { center, .. } => {
                notifier.notify(Notification::Sound {
                    cue: SoundCue::Explosion,
                    position: center,
                });
            }
        }
    }

    fn handle_enemy_event(&mut self, event: EnemyEvent, notifier: &dyn Notifier, report: &mut TickReport) {
        match event {
            EnemyEvent::Attacked {
                target,
                damage,
                landed,
                origin,
                ..
            } => {
                notifier.notify(Notification::Sound {
                    cue: SoundCue::EnemyAttack,
                    position: origin,
                });
                if landed && target == self.player.id() {
                    self.damage_player(damage, notifier, report);
                }
            }
            EnemyEvent::Died {
                enemy,
                position,
                score_value,
                ..
            } => {
                self.state.record_kill(score_value);
                report.kills += 1;
                notifier.notify(Notification::EnemyKilled {
                    enemy,
                    score: score_value,
                });
                notifier.notify(Notification::Sound {
                    cue: SoundCue::EnemyDeath,
                    position,
                });
                self.pickups.roll_drop(&self.ids, position, &mut self.rng);
            }
            EnemyEvent::StateChanged { .. } => {}
        }
    }

    fn damage_player(&mut self, amount: f32, notifier: &dyn Notifier, report: &mut TickReport) {
        let outcome = self.player.take_damage(amount);
        if outcome.dealt > 0.0 {
            report.damage_taken += outcome.dealt;
            notifier.notify(Notification::PlayerDamaged {
                amount: outcome.dealt,
                health: self.player.health().current(),
            });
        }
    }

    /// Submit every visible entity, ascending id within each collection
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let visuals = &self.config.visuals;

        for enemy in self.roster.iter().filter(|e| e.is_alive()) {
            sink.submit(RenderItem {
                entity: enemy.id(),
                kind: EntityKind::Enemy,
                transform: enemy.header().transform,
                visual: visuals.enemy(enemy.stats().kind),
            });
        }
        for projectile in self.projectiles.iter().filter(|p| p.is_alive()) {
            sink.submit(RenderItem {
                entity: projectile.id(),
                kind: EntityKind::Projectile,
                transform: projectile.header().transform,
                visual: visuals.projectile,
            });
        }
        for pickup in self.pickups.iter() {
            sink.submit(RenderItem {
                entity: pickup.id(),
                kind: EntityKind::Pickup,
                transform: pickup.header().transform,
                visual: visuals.pickup(pickup.kind()),
            });
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let health = self.player.health();
        Snapshot {
            tick: self.ticks,
            state: self.state.clone(),
            player: PlayerSnapshot {
                id: self.player.id(),
                position: self.player.position(),
                yaw: self.player.yaw(),
                pitch: self.player.pitch(),
                health: health.current(),
                max_health: health.max(),
                alive: self.player.is_alive(),
            },
            weapon: WeaponSnapshot {
                name: self.weapon.stats().name.clone(),
                current_ammo: self.weapon.current_ammo(),
                reserve_ammo: self.weapon.reserve_ammo(),
                phase: self.weapon.phase(),
            },
            enemies: self
                .roster
                .iter()
                .map(|e| EnemySnapshot {
                    id: e.id(),
                    kind: e.stats().kind,
                    state: e.state(),
                    position: e.position(),
                    health: e.health().current(),
                })
                .collect(),
            projectiles: self.projectiles.len(),
            pickups: self.pickups.len(),
        }
    }
}
