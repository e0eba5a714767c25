//! # strafe_core - Simulation Core Primitives
//!
//! Foundational pieces shared by every gameplay crate:
//! - **Ids**: monotonically assigned, never reused entity ids
//! - **Entities**: kind tags and the common entity header
//! - **Timers**: one countdown/stopwatch abstraction for reloads,
//!   cooldowns, reaction delays and lifetimes
//! - **Randomness**: an injectable random source so a fixed seed
//!   replays a session bit-for-bit

pub mod entity;
pub mod id;
pub mod random;
pub mod timer;

pub use entity::*;
pub use id::*;
pub use random::*;
pub use timer::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::entity::{EntityHeader, EntityKind};
    pub use crate::id::{EntityId, IdGenerator};
    pub use crate::random::{RandomSource, SeededRandom, SequenceRandom};
    pub use crate::timer::{Countdown, Stopwatch};
}
