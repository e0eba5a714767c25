//! Strafe GameState - Session Flow
//!
//! This crate tracks how a session is going and decides what happens next.
//!
//! # Features
//!
//! - Session record (playing/paused, wave, kills, score, outcome)
//! - Wave director with escalating enemy counts and archetype mix
//! - Spawn point selection that keeps enemies away from the player
//! - Loot drops (ammo and health pickups)
//!
//! # Example
//!
//! ```ignore
//! use strafe_gamestate::prelude::*;
//!
//! let mut state = GameState::new();
//! state.start();
//!
//! let mut director = WaveDirector::new(WaveConfig::default().with_max_waves(10));
//! for event in director.update(dt, roster.alive_count(), player.position()) {
//!     // spawn enemies, show banners, declare victory
//! }
//! ```

pub mod pickup;
pub mod state;
pub mod wave;

pub mod prelude {
    pub use crate::pickup::{Collected, Pickup, PickupConfig, PickupField, PickupKind};
    pub use crate::state::{GameState, Outcome};
    pub use crate::wave::{SpawnOrder, WaveConfig, WaveDirector, WaveEvent, WavePhase};
}

pub use prelude::*;
