//! # Strafe AI
//!
//! Enemy behaviour for the Strafe simulation core.
//!
//! - [`StateMachine`]: current/previous state bookkeeping with terminal states
//! - [`perception`]: range, view cone and line-of-sight checks
//! - [`steering`]: ground-plane movement and rate-limited turning
//! - [`Enemy`]: the per-enemy behaviour state machine
//! - [`EnemyRoster`]: owns all enemies and updates them in id order
//!
//! ## Example
//!
//! ```ignore
//! use strafe_ai::prelude::*;
//!
//! let mut roster = EnemyRoster::new();
//! roster.spawn(&ids, EnemyStats::soldier(), Vec3::new(0.0, 0.0, -20.0), Some(player_id));
//!
//! let events = roster.update_all(dt, &[player_target], &level, &mut rng);
//! ```

pub mod enemy;
pub mod perception;
pub mod roster;
pub mod state_machine;
pub mod steering;

pub mod prelude {
    pub use crate::enemy::{
        Enemy, EnemyContext, EnemyEvent, EnemyKind, EnemyState, EnemyStats, TargetInfo,
    };
    pub use crate::perception::{in_field_of_view, look, Observer, SightReport};
    pub use crate::roster::EnemyRoster;
    pub use crate::state_machine::{State, StateMachine};
    pub use crate::steering::{move_away, move_to, random_point_in_radius, rotate_towards};
}

pub use prelude::*;
