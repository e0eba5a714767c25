//! Strafe Combat - Health, Damage, Weapons and Hit Resolution
//!
//! This crate turns fire intents into world effects.
//!
//! # Features
//!
//! - Health with clamped damage/heal and a single death edge
//! - Distance falloff and radial explosion falloff
//! - Weapon fire control (single, burst, automatic), reload and equip timers
//! - Recoil patterns with recovery, and spread cones driven by an injected random source
//! - Hit-scan resolution with optional head volumes
//! - Projectiles with gravity, swept collision, penetration and explosions
//!
//! Resolution never touches the entities it hits. It returns
//! [`DamageEvent`]s and the owning collection applies them.
//!
//! # Example
//!
//! ```ignore
//! use strafe_combat::prelude::*;
//!
//! let mut rifle = Weapon::new(WeaponStats::rifle());
//! rifle.tick(dt);
//! if rifle.pull_trigger(Trigger::held()) {
//!     let direction = Weapon::apply_spread(rifle.aim(&camera), rifle.current_spread(moving, false), &mut rng);
//!     let outcome = resolve_hitscan(&rifle.stats().hitscan_shot(player_id, eye, direction), &targets, &level);
//! }
//! ```

pub mod damage;
pub mod health;
pub mod projectile;
pub mod recoil;
pub mod resolution;
pub mod weapon;

pub mod prelude {
    pub use crate::damage::{radial_falloff, DamageFalloff, DamageInfo, DamageKind};
    pub use crate::health::{DamageOutcome, Health};
    pub use crate::projectile::{Projectile, ProjectileData, ProjectileKind, ProjectileSystem};
    pub use crate::recoil::{RecoilPattern, RecoilState};
    pub use crate::resolution::{
        explode, resolve_hitscan, CombatEvent, DamageEvent, HitTarget, HitscanOutcome, HitscanShot,
    };
    pub use crate::weapon::{Delivery, FireMode, Trigger, Weapon, WeaponKind, WeaponPhase, WeaponStats};
}

pub use prelude::*;
