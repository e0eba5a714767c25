//! Weapon fire control
//!
//! A [`Weapon`] gates fire requests by phase, ammo and fire cadence, runs
//! the reload and equip timers, and accumulates recoil. It never resolves
//! hits itself: a successful shot is reported to the caller, which aims
//! with [`Weapon::aim`] and [`Weapon::apply_spread`] and hands the ray to
//! [`resolve_hitscan`](crate::resolution::resolve_hitscan) or spawns a
//! projectile.
//!
//! Requests that cannot be honoured (firing while reloading, reloading a
//! full magazine) are silently dropped.

use crate::damage::DamageFalloff;
use crate::projectile::ProjectileData;
use crate::recoil::{RecoilPattern, RecoilState};
use crate::resolution::HitscanShot;
use serde::{Deserialize, Serialize};
use strafe_core::{Countdown, EntityId, RandomSource, Stopwatch};
use strafe_math::{consts::TAU, radians, Transform, Vec2, Vec3};

/// Weapon archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    Rifle,
    Shotgun,
    Sniper,
    Smg,
    RocketLauncher,
}

impl WeaponKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pistol => "pistol",
            Self::Rifle => "rifle",
            Self::Shotgun => "shotgun",
            Self::Sniper => "sniper",
            Self::Smg => "smg",
            Self::RocketLauncher => "rocket_launcher",
        }
    }
}

impl Default for WeaponKind {
    fn default() -> Self {
        Self::Rifle
    }
}

/// Trigger behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireMode {
    /// One shot per press
    Single,
    /// `burst_count` shots per press, then `burst_cooldown`
    Burst,
    /// Fires every eligible tick while held
    Automatic,
}

impl Default for FireMode {
    fn default() -> Self {
        Self::Automatic
    }
}

/// What a shot puts into the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Delivery {
    /// Instant ray, `pellets` rays per shot
    Hitscan,
    /// Spawn a projectile; damage comes from the projectile data
    Projectile(ProjectileData),
}

impl Default for Delivery {
    fn default() -> Self {
        Self::Hitscan
    }
}

/// Mutually exclusive weapon phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponPhase {
    Idle,
    Firing,
    Reloading,
    Equipping,
}

/// Fire input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Trigger {
    /// Went down this tick
    pub pressed: bool,
    /// Is down this tick
    pub held: bool,
}

impl Trigger {
    pub const RELEASED: Self = Self {
        pressed: false,
        held: false,
    };

    /// Fresh press (also held)
    pub fn pressed() -> Self {
        Self {
            pressed: true,
            held: true,
        }
    }

    /// Held from an earlier tick
    pub fn held() -> Self {
        Self {
            pressed: false,
            held: true,
        }
    }
}

/// Weapon statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    pub name: String,
    pub kind: WeaponKind,
    pub fire_mode: FireMode,
    pub delivery: Delivery,

    /// Damage per hit-scan ray
    pub damage: f32,
    pub headshot_multiplier: f32,
    /// Maximum hit-scan distance
    pub range: f32,
    pub falloff_start: f32,
    pub falloff_end: f32,
    /// Damage multiplier at and beyond `falloff_end`
    pub falloff_floor: f32,

    /// Shots per second
    pub fire_rate: f32,
    pub burst_count: u32,
    /// Forced pause after a burst, seconds
    pub burst_cooldown: f32,
    /// Rays per hit-scan shot
    pub pellets: u32,

    pub magazine_size: u32,
    /// Reserve ammo the weapon starts with
    pub reserve_ammo: u32,
    pub reload_time: f32,
    pub equip_time: f32,

    /// Spread cone half-angles, radians
    pub base_spread: f32,
    pub moving_spread: f32,
    pub jumping_spread: f32,
    pub ads_spread_multiplier: f32,
    /// Extra spread (radians) per degree of accumulated recoil
    pub recoil_spread_factor: f32,

    /// Recoil pattern scale, per axis
    pub recoil_vertical: f32,
    pub recoil_horizontal: f32,
    /// Recoil recovery, degrees per second
    pub recoil_recovery: f32,
    pub recoil_pattern: RecoilPattern,

    /// Player speed multiplier while carried
    pub movement_multiplier: f32,
    /// Additional speed multiplier while aiming down sights
    pub ads_movement_multiplier: f32,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            name: "Rifle".into(),
            kind: WeaponKind::Rifle,
            fire_mode: FireMode::Automatic,
            delivery: Delivery::Hitscan,
            damage: 25.0,
            headshot_multiplier: 2.0,
            range: 100.0,
            falloff_start: 50.0,
            falloff_end: 100.0,
            falloff_floor: 0.5,
            fire_rate: 10.0,
            burst_count: 3,
            burst_cooldown: 0.3,
            pellets: 1,
            magazine_size: 30,
            reserve_ammo: 90,
            reload_time: 2.0,
            equip_time: 0.5,
            base_spread: 0.01,
            moving_spread: 0.05,
            jumping_spread: 0.1,
            ads_spread_multiplier: 0.5,
            recoil_spread_factor: 0.002,
            recoil_vertical: 0.5,
            recoil_horizontal: 0.2,
            recoil_recovery: 5.0,
            recoil_pattern: RecoilPattern::default(),
            movement_multiplier: 1.0,
            ads_movement_multiplier: 0.6,
        }
    }
}

impl WeaponStats {
    /// Semi-automatic sidearm
    pub fn pistol() -> Self {
        Self {
            name: "Pistol".into(),
            kind: WeaponKind::Pistol,
            fire_mode: FireMode::Single,
            damage: 35.0,
            range: 60.0,
            falloff_start: 20.0,
            falloff_end: 60.0,
            fire_rate: 5.0,
            magazine_size: 12,
            reserve_ammo: 48,
            reload_time: 1.5,
            equip_time: 0.3,
            base_spread: 0.008,
            recoil_vertical: 0.8,
            recoil_horizontal: 0.1,
            movement_multiplier: 1.05,
            ..Default::default()
        }
    }

    /// Automatic rifle
    pub fn rifle() -> Self {
        Self {
            magazine_size: 30,
            reserve_ammo: 120,
            ..Default::default()
        }
    }

    /// Pump shotgun, eight pellets per shot
    pub fn shotgun() -> Self {
        Self {
            name: "Shotgun".into(),
            kind: WeaponKind::Shotgun,
            fire_mode: FireMode::Single,
            damage: 10.0,
            range: 30.0,
            falloff_start: 8.0,
            falloff_end: 25.0,
            falloff_floor: 0.2,
            fire_rate: 1.25,
            pellets: 8,
            magazine_size: 8,
            reserve_ammo: 32,
            reload_time: 2.5,
            equip_time: 0.6,
            base_spread: 0.08,
            moving_spread: 0.03,
            recoil_vertical: 3.0,
            recoil_horizontal: 0.5,
            movement_multiplier: 0.95,
            ..Default::default()
        }
    }

    /// Bolt-action rifle, accurate only when still
    pub fn sniper() -> Self {
        Self {
            name: "Sniper".into(),
            kind: WeaponKind::Sniper,
            fire_mode: FireMode::Single,
            damage: 100.0,
            headshot_multiplier: 3.0,
            range: 300.0,
            falloff_start: 200.0,
            falloff_end: 300.0,
            falloff_floor: 0.8,
            fire_rate: 0.8,
            magazine_size: 5,
            reserve_ammo: 20,
            reload_time: 3.0,
            equip_time: 0.8,
            base_spread: 0.001,
            moving_spread: 0.1,
            jumping_spread: 0.2,
            ads_spread_multiplier: 0.1,
            recoil_vertical: 4.0,
            recoil_horizontal: 0.3,
            recoil_recovery: 8.0,
            movement_multiplier: 0.85,
            ads_movement_multiplier: 0.4,
            ..Default::default()
        }
    }

    /// High cadence, low damage
    pub fn smg() -> Self {
        Self {
            name: "SMG".into(),
            kind: WeaponKind::Smg,
            damage: 15.0,
            range: 60.0,
            falloff_start: 15.0,
            falloff_end: 45.0,
            fire_rate: 15.0,
            magazine_size: 25,
            reserve_ammo: 100,
            reload_time: 1.8,
            equip_time: 0.35,
            base_spread: 0.03,
            recoil_vertical: 0.3,
            recoil_horizontal: 0.3,
            movement_multiplier: 1.1,
            ..Default::default()
        }
    }

    /// Single-shot rocket launcher
    pub fn rocket_launcher() -> Self {
        Self {
            name: "Rocket Launcher".into(),
            kind: WeaponKind::RocketLauncher,
            fire_mode: FireMode::Single,
            delivery: Delivery::Projectile(ProjectileData::rocket()),
            fire_rate: 0.8,
            magazine_size: 1,
            reserve_ammo: 6,
            reload_time: 2.5,
            equip_time: 0.9,
            base_spread: 0.0,
            moving_spread: 0.02,
            jumping_spread: 0.05,
            recoil_vertical: 2.0,
            recoil_horizontal: 0.0,
            movement_multiplier: 0.8,
            ..Default::default()
        }
    }

    /// Preset for a weapon kind
    pub fn preset(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Pistol => Self::pistol(),
            WeaponKind::Rifle => Self::rifle(),
            WeaponKind::Shotgun => Self::shotgun(),
            WeaponKind::Sniper => Self::sniper(),
            WeaponKind::Smg => Self::smg(),
            WeaponKind::RocketLauncher => Self::rocket_launcher(),
        }
    }

    /// Set fire mode (builder pattern)
    pub fn with_fire_mode(mut self, mode: FireMode) -> Self {
        self.fire_mode = mode;
        self
    }

    /// Set magazine and reserve (builder pattern)
    pub fn with_ammo(mut self, magazine_size: u32, reserve_ammo: u32) -> Self {
        self.magazine_size = magazine_size;
        self.reserve_ammo = reserve_ammo;
        self
    }

    /// Set fire rate (builder pattern)
    pub fn with_fire_rate(mut self, rate: f32) -> Self {
        self.fire_rate = rate;
        self
    }

    /// Set reload time (builder pattern)
    pub fn with_reload_time(mut self, seconds: f32) -> Self {
        self.reload_time = seconds;
        self
    }

    /// Seconds between shots
    pub fn fire_interval(&self) -> f32 {
        if self.fire_rate > 0.0 {
            1.0 / self.fire_rate
        } else {
            f32::MAX
        }
    }

    pub fn falloff(&self) -> DamageFalloff {
        DamageFalloff::new(self.falloff_start, self.falloff_end, self.falloff_floor)
    }

    /// Describe one hit-scan ray fired by `shooter`
    pub fn hitscan_shot(&self, shooter: EntityId, origin: Vec3, direction: Vec3) -> HitscanShot {
        HitscanShot {
            shooter,
            origin,
            direction,
            range: self.range,
            damage: self.damage,
            headshot_multiplier: self.headshot_multiplier,
            falloff: self.falloff(),
        }
    }
}

/// Cadence slack so accumulated frame times hit the fire interval exactly
const CADENCE_EPSILON: f32 = 1e-5;

/// Live weapon: stats plus runtime state
#[derive(Debug, Clone)]
pub struct Weapon {
    stats: WeaponStats,
    phase: WeaponPhase,
    aiming: bool,
    current_ammo: u32,
    reserve_ammo: u32,
    since_last_shot: Stopwatch,
    reload_timer: Countdown,
    equip_timer: Countdown,
    burst_cooldown: Countdown,
    burst_remaining: u32,
    recoil: RecoilState,
    shots_fired: u64,
}

impl Weapon {
    /// Create a ready-to-fire weapon with a full magazine
    pub fn new(stats: WeaponStats) -> Self {
        Self {
            phase: WeaponPhase::Idle,
            aiming: false,
            current_ammo: stats.magazine_size,
            reserve_ammo: stats.reserve_ammo,
            since_last_shot: Stopwatch::expired(),
            reload_timer: Countdown::new(stats.reload_time),
            equip_timer: Countdown::new(stats.equip_time),
            burst_cooldown: Countdown::new(stats.burst_cooldown),
            burst_remaining: 0,
            recoil: RecoilState::default(),
            shots_fired: 0,
            stats,
        }
    }

    /// Advance timers by `dt`: cadence, reload, equip, burst cooldown and recoil recovery
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.since_last_shot.tick(dt);
        self.burst_cooldown.tick(dt);

        if self.reload_timer.tick(dt) && self.phase == WeaponPhase::Reloading {
            self.finish_reload();
        }

        if self.equip_timer.tick(dt) && self.phase == WeaponPhase::Equipping {
            self.phase = WeaponPhase::Idle;
            log::debug!("{} ready", self.stats.name);
        }

        let interval = self.stats.fire_interval();
        let since = self.since_last_shot.elapsed() + CADENCE_EPSILON;
        if since >= interval && self.burst_remaining == 0 && self.phase == WeaponPhase::Firing {
            self.phase = WeaponPhase::Idle;
        }

        // Sustained fire keeps the recoil; recovery starts once a shot has been skipped
        if since >= interval * 2.0 && self.burst_remaining == 0 {
            self.recoil.recover(self.stats.recoil_recovery, dt);
        }
    }

    /// Feed this tick's trigger state. Returns true if a shot was fired.
    pub fn pull_trigger(&mut self, trigger: Trigger) -> bool {
        match self.stats.fire_mode {
            FireMode::Automatic => trigger.held && self.fire(),
            FireMode::Single => trigger.pressed && self.fire(),
            FireMode::Burst => {
                if trigger.pressed && self.burst_remaining == 0 && self.burst_cooldown.is_finished() {
                    self.burst_remaining = self.stats.burst_count.max(1);
                }
                if self.burst_remaining == 0 {
                    return false;
                }
                if self.fire() {
                    // An auto-reload on the last round already cleared the burst
                    self.burst_remaining = self.burst_remaining.saturating_sub(1);
                    if self.burst_remaining == 0 {
                        self.burst_cooldown.start_with(self.stats.burst_cooldown);
                    }
                    true
                } else {
                    if self.current_ammo == 0 || self.is_reloading() || self.is_equipping() {
                        // Burst interrupted by an empty magazine or reload
                        self.burst_remaining = 0;
                        self.burst_cooldown.start_with(self.stats.burst_cooldown);
                    }
                    false
                }
            }
        }
    }

    /// Whether a shot would be accepted now
    pub fn can_fire(&self) -> bool {
        !matches!(self.phase, WeaponPhase::Reloading | WeaponPhase::Equipping)
            && self.current_ammo > 0
            && self.since_last_shot.elapsed() + CADENCE_EPSILON >= self.stats.fire_interval()
    }

    /// Fire one shot regardless of trigger mode.
    ///
    /// Consumes a round, restarts the cadence timer and kicks recoil.
    /// Emptying the magazine starts a reload when reserve ammo remains.
    pub fn fire(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }

        self.current_ammo -= 1;
        self.since_last_shot.reset();
        self.phase = WeaponPhase::Firing;
        self.recoil.kick(
            &self.stats.recoil_pattern,
            self.stats.recoil_vertical,
            self.stats.recoil_horizontal,
        );
        self.shots_fired += 1;
        log::trace!(
            "{} fired, {}/{} left",
            self.stats.name,
            self.current_ammo,
            self.reserve_ammo
        );

        if self.current_ammo == 0 {
            self.start_reload();
        }
        true
    }

    /// Whether a reload request would be accepted now
    pub fn can_reload(&self) -> bool {
        !matches!(self.phase, WeaponPhase::Reloading | WeaponPhase::Equipping)
            && self.current_ammo < self.stats.magazine_size
            && self.reserve_ammo > 0
    }

    /// Start reloading. Returns false (and does nothing) when not needed or impossible.
    pub fn start_reload(&mut self) -> bool {
        if !self.can_reload() {
            return false;
        }

        self.phase = WeaponPhase::Reloading;
        self.burst_remaining = 0;
        self.reload_timer.start_with(self.stats.reload_time);
        log::debug!("{} reloading ({}s)", self.stats.name, self.stats.reload_time);

        if self.reload_timer.is_finished() {
            self.finish_reload();
        }
        true
    }

    fn finish_reload(&mut self) {
        let transfer = (self.stats.magazine_size - self.current_ammo).min(self.reserve_ammo);
        self.current_ammo += transfer;
        self.reserve_ammo -= transfer;
        self.phase = WeaponPhase::Idle;
        log::debug!(
            "{} reloaded {} rounds, {}/{}",
            self.stats.name,
            transfer,
            self.current_ammo,
            self.reserve_ammo
        );
    }

    /// Draw the weapon. Cancels any reload in progress.
    pub fn equip(&mut self) {
        self.reload_timer.finish();
        self.burst_remaining = 0;
        self.aiming = false;
        self.recoil.reset();
        self.equip_timer.start_with(self.stats.equip_time);
        self.phase = if self.equip_timer.is_finished() {
            WeaponPhase::Idle
        } else {
            WeaponPhase::Equipping
        };
    }

    /// Aim down sights. Ignored while equipping.
    pub fn set_aiming(&mut self, aiming: bool) {
        if self.phase == WeaponPhase::Equipping {
            return;
        }
        self.aiming = aiming;
    }

    /// Spread cone half-angle in radians for the current movement state
    pub fn current_spread(&self, moving: bool, jumping: bool) -> f32 {
        let mut spread = self.stats.base_spread;
        if moving {
            spread += self.stats.moving_spread;
        }
        if jumping {
            spread += self.stats.jumping_spread;
        }
        spread += self.recoil.magnitude() * self.stats.recoil_spread_factor;
        if self.aiming {
            spread *= self.stats.ads_spread_multiplier;
        }
        spread.max(0.0)
    }

    /// Perturb `direction` to a random direction inside a cone of half-angle `spread`
    pub fn apply_spread(direction: Vec3, spread: f32, rng: &mut dyn RandomSource) -> Vec3 {
        let forward = direction.normalize_or_zero();
        if spread <= 0.0 || forward == Vec3::ZERO {
            return forward;
        }

        // sqrt keeps the distribution uniform over the cone's cap
        let angle = spread * rng.next_f32().sqrt();
        let around = TAU * rng.next_f32();

        let u = forward.any_orthogonal().normalize_or_zero();
        let v = forward.cross(u);
        let (sin_a, cos_a) = angle.sin_cos();
        let (sin_r, cos_r) = around.sin_cos();
        (forward * cos_a + (u * cos_r + v * sin_r) * sin_a).normalize_or_zero()
    }

    /// View direction from `view` with accumulated recoil applied
    pub fn aim(&self, view: &Transform) -> Vec3 {
        let offset = self.recoil.offset();
        let mut aimed = *view;
        aimed.pitch += radians(offset.y);
        aimed.yaw -= radians(offset.x);
        aimed.forward()
    }

    /// Add rounds to the reserve. An empty magazine starts reloading at once.
    pub fn add_ammo(&mut self, amount: u32) {
        self.reserve_ammo = self.reserve_ammo.saturating_add(amount);
        if self.current_ammo == 0 {
            self.start_reload();
        }
    }

    /// Player speed multiplier contributed by this weapon
    pub fn movement_multiplier(&self) -> f32 {
        if self.aiming {
            self.stats.movement_multiplier * self.stats.ads_movement_multiplier
        } else {
            self.stats.movement_multiplier
        }
    }

    #[inline]
    pub fn stats(&self) -> &WeaponStats {
        &self.stats
    }

    #[inline]
    pub fn phase(&self) -> WeaponPhase {
        self.phase
    }

    #[inline]
    pub fn is_reloading(&self) -> bool {
        self.phase == WeaponPhase::Reloading
    }

    #[inline]
    pub fn is_equipping(&self) -> bool {
        self.phase == WeaponPhase::Equipping
    }

    #[inline]
    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    #[inline]
    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    #[inline]
    pub fn reserve_ammo(&self) -> u32 {
        self.reserve_ammo
    }

    pub fn total_ammo(&self) -> u64 {
        u64::from(self.current_ammo) + u64::from(self.reserve_ammo)
    }

    /// Reload progress (0.0 - 1.0); 0 when not reloading
    pub fn reload_progress(&self) -> f32 {
        if self.is_reloading() {
            self.reload_timer.fraction()
        } else {
            0.0
        }
    }

    /// Accumulated recoil in degrees
    pub fn recoil_offset(&self) -> Vec2 {
        self.recoil.offset()
    }

    pub fn shots_fired(&self) -> u64 {
        self.shots_fired
    }

    /// Ammo display string
    pub fn ammo_display(&self) -> String {
        format!("{}/{}", self.current_ammo, self.reserve_ammo)
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new(WeaponStats::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strafe_core::{SeededRandom, SequenceRandom};

    fn rifle_30_90() -> Weapon {
        Weapon::new(WeaponStats::default().with_ammo(30, 90))
    }

    #[test]
    fn test_weapon_creation() {
        let weapon = Weapon::new(WeaponStats::pistol());
        assert_eq!(weapon.current_ammo(), 12);
        assert_eq!(weapon.reserve_ammo(), 48);
        assert_eq!(weapon.phase(), WeaponPhase::Idle);
        assert!(weapon.can_fire());
    }

    #[test]
    fn test_fire_rate_gate() {
        let mut weapon = rifle_30_90();
        assert!(weapon.fire());
        assert_eq!(weapon.current_ammo(), 29);
        assert!(!weapon.can_fire()); // Cadence

        weapon.tick(0.05);
        assert!(!weapon.fire());
        weapon.tick(0.05);
        assert!(weapon.fire());
        assert_eq!(weapon.current_ammo(), 28);
    }

    #[test]
    fn test_empty_magazine_auto_reload() {
        let mut weapon = rifle_30_90();
        let mut fired = 0;
        for _ in 0..30 {
            weapon.tick(0.1);
            if weapon.pull_trigger(Trigger::held()) {
                fired += 1;
            }
        }
        assert_eq!(fired, 30);
        assert_eq!(weapon.current_ammo(), 0);
        assert!(weapon.is_reloading());

        // Further shots are dropped
        weapon.tick(0.1);
        assert!(!weapon.fire());
        assert_eq!(weapon.current_ammo(), 0);

        weapon.tick(2.0);
        assert_eq!(weapon.current_ammo(), 30);
        assert_eq!(weapon.reserve_ammo(), 60);
        assert_eq!(weapon.phase(), WeaponPhase::Idle);
    }

    #[test]
    fn test_reload_conserves_ammo() {
        let mut weapon = Weapon::new(WeaponStats::default().with_ammo(10, 4));
        for _ in 0..7 {
            weapon.tick(1.0);
            weapon.fire();
        }
        assert_eq!(weapon.current_ammo(), 3);
        let total = weapon.total_ammo();

        assert!(weapon.start_reload());
        weapon.tick(weapon.stats().reload_time);
        assert_eq!(weapon.total_ammo(), total);
        assert_eq!(weapon.current_ammo(), 7);
        assert_eq!(weapon.reserve_ammo(), 0);
    }

    #[test]
    fn test_reload_rejections() {
        let mut weapon = rifle_30_90();
        // Full magazine
        assert!(!weapon.start_reload());

        weapon.fire();
        assert!(weapon.start_reload());
        // Already reloading
        assert!(!weapon.start_reload());
        assert!(!weapon.fire());

        let mut dry = Weapon::new(WeaponStats::default().with_ammo(5, 0));
        dry.fire();
        assert!(!dry.start_reload());
        assert_eq!(dry.phase(), WeaponPhase::Firing);
    }

    #[test]
    fn test_single_needs_fresh_press() {
        let mut weapon = Weapon::new(WeaponStats::pistol());
        assert!(weapon.pull_trigger(Trigger::pressed()));
        weapon.tick(1.0);
        assert!(!weapon.pull_trigger(Trigger::held()));
        assert!(weapon.pull_trigger(Trigger::pressed()));
        assert_eq!(weapon.shots_fired(), 2);
    }

    #[test]
    fn test_burst_fires_exact_count() {
        let mut weapon = rifle_30_90().tap_stats(|s| s.fire_mode = FireMode::Burst);
        let mut fired = 0;

        assert!(weapon.pull_trigger(Trigger::pressed()));
        fired += 1;
        for _ in 0..20 {
            weapon.tick(0.1);
            if weapon.pull_trigger(Trigger::RELEASED) {
                fired += 1;
            }
        }
        assert_eq!(fired, 3);

        // Held without a new press does not start another burst
        for _ in 0..10 {
            weapon.tick(0.1);
            assert!(!weapon.pull_trigger(Trigger::held()));
        }
        assert!(weapon.pull_trigger(Trigger::pressed()));
    }

    #[test]
    fn test_burst_cooldown_blocks_new_burst() {
        let mut weapon = rifle_30_90().tap_stats(|s| {
            s.fire_mode = FireMode::Burst;
            s.burst_cooldown = 1.0;
        });
        assert!(weapon.pull_trigger(Trigger::pressed()));
        weapon.tick(0.1);
        assert!(weapon.pull_trigger(Trigger::RELEASED));
        weapon.tick(0.1);
        assert!(weapon.pull_trigger(Trigger::RELEASED));

        weapon.tick(0.2);
        assert!(!weapon.pull_trigger(Trigger::pressed()));
        weapon.tick(1.0);
        assert!(weapon.pull_trigger(Trigger::pressed()));
    }

    #[test]
    fn test_burst_cut_short_by_empty_magazine() {
        let mut weapon = Weapon::new(
            WeaponStats::default()
                .with_ammo(2, 10)
                .with_fire_mode(FireMode::Burst),
        );
        assert_eq!(weapon.stats().burst_count, 3);

        assert!(weapon.pull_trigger(Trigger::pressed()));
        weapon.tick(0.2);
        assert!(weapon.pull_trigger(Trigger::RELEASED));
        assert_eq!(weapon.current_ammo(), 0);
        assert!(weapon.is_reloading());

        // The third round of the burst is never fired
        weapon.tick(0.2);
        assert!(!weapon.pull_trigger(Trigger::RELEASED));

        // After the reload nothing fires until the trigger is pressed again
        weapon.tick(weapon.stats().reload_time);
        assert_eq!(weapon.current_ammo(), 2);
        assert_eq!(weapon.reserve_ammo(), 8);
        for _ in 0..10 {
            weapon.tick(0.1);
            assert!(!weapon.pull_trigger(Trigger::RELEASED));
            assert!(!weapon.pull_trigger(Trigger::held()));
        }
        assert_eq!(weapon.shots_fired(), 2);
        assert!(weapon.pull_trigger(Trigger::pressed()));
    }

    #[test]
    fn test_equip_cancels_reload() {
        let mut weapon = rifle_30_90();
        weapon.fire();
        assert!(weapon.start_reload());
        weapon.equip();
        assert!(weapon.is_equipping());
        assert!(!weapon.fire());
        assert!(!weapon.start_reload());

        weapon.tick(weapon.stats().equip_time);
        assert_eq!(weapon.phase(), WeaponPhase::Idle);
        // Cancelled reload transferred nothing
        assert_eq!(weapon.current_ammo(), 29);
        assert_eq!(weapon.reserve_ammo(), 90);
    }

    #[test]
    fn test_spread_widens_and_recovers() {
        let mut weapon = rifle_30_90();
        let base = weapon.current_spread(false, false);
        assert_relative_eq!(base, 0.01);
        assert!(weapon.current_spread(true, false) > base);
        assert!(weapon.current_spread(true, true) > weapon.current_spread(true, false));

        for _ in 0..5 {
            weapon.tick(0.1);
            weapon.fire();
        }
        let bloomed = weapon.current_spread(false, false);
        assert!(bloomed > base);

        for _ in 0..50 {
            weapon.tick(0.1);
        }
        assert_relative_eq!(weapon.current_spread(false, false), base);
        assert_eq!(weapon.recoil_offset(), Vec2::ZERO);

        weapon.set_aiming(true);
        assert_relative_eq!(weapon.current_spread(false, false), base * 0.5);
    }

    #[test]
    fn test_apply_spread_stays_in_cone() {
        let mut rng = SeededRandom::new(9);
        let forward = Vec3::NEG_Z;
        for _ in 0..200 {
            let dir = Weapon::apply_spread(forward, 0.05, &mut rng);
            assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-4);
            assert!(dir.dot(forward).clamp(-1.0, 1.0).acos() <= 0.05 + 1e-4);
        }
        assert_eq!(Weapon::apply_spread(forward, 0.0, &mut rng), forward);
    }

    #[test]
    fn test_apply_spread_is_scripted() {
        let mut rng = SequenceRandom::new(vec![0.0, 0.5]);
        let dir = Weapon::apply_spread(Vec3::NEG_Z, 0.1, &mut rng);
        assert_relative_eq!(dir.z, -1.0, epsilon = 1e-6);
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_aim_includes_recoil() {
        let mut weapon = rifle_30_90();
        let view = Transform::IDENTITY;
        assert_relative_eq!(weapon.aim(&view).y, 0.0);
        weapon.fire();
        assert!(weapon.aim(&view).y > 0.0);
    }

    #[test]
    fn test_add_ammo_restarts_dry_weapon() {
        let mut weapon = Weapon::new(WeaponStats::default().with_ammo(2, 0));
        weapon.fire();
        weapon.tick(1.0);
        weapon.fire();
        assert_eq!(weapon.current_ammo(), 0);
        assert!(!weapon.is_reloading());

        weapon.add_ammo(10);
        assert!(weapon.is_reloading());
        weapon.tick(weapon.stats().reload_time);
        assert_eq!(weapon.current_ammo(), 2);
        assert_eq!(weapon.reserve_ammo(), 8);
    }

    #[test]
    fn test_presets_are_sane() {
        for kind in [
            WeaponKind::Pistol,
            WeaponKind::Rifle,
            WeaponKind::Shotgun,
            WeaponKind::Sniper,
            WeaponKind::Smg,
            WeaponKind::RocketLauncher,
        ] {
            let stats = WeaponStats::preset(kind);
            assert_eq!(stats.kind, kind);
            assert!(stats.fire_rate > 0.0);
            assert!(stats.magazine_size > 0);
            assert!(stats.falloff_end >= stats.falloff_start);
        }
        assert_eq!(WeaponStats::shotgun().pellets, 8);
        assert!(matches!(WeaponStats::rocket_launcher().delivery, Delivery::Projectile(_)));
    }

    #[test]
    fn test_stats_load_with_defaults() {
        let stats: WeaponStats = serde_json::from_str(
            r#"{ "name": "Marksman", "fire_mode": "Single", "magazine_size": 10 }"#,
        )
        .unwrap();
        assert_eq!(stats.name, "Marksman");
        assert_eq!(stats.fire_mode, FireMode::Single);
        assert_eq!(stats.magazine_size, 10);
        assert_eq!(stats.fire_rate, WeaponStats::default().fire_rate);

        let rocket = WeaponStats::rocket_launcher();
        let json = serde_json::to_string(&rocket).unwrap();
        let back: WeaponStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rocket);
    }

    impl Weapon {
        fn tap_stats(mut self, f: impl FnOnce(&mut WeaponStats)) -> Self {
            f(&mut self.stats);
            self
        }
    }
}
