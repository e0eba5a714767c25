//! # Strafe Player
//!
//! Input snapshot and the first-person controller.
//!
//! The controller reads an [`InputSource`] and a
//! [`SpatialQuery`](strafe_physics::SpatialQuery) each tick; it never talks to
//! a window or device directly.

pub mod controller;
pub mod input;

pub mod prelude {
    pub use crate::controller::{MovementReport, Player, PlayerStats};
    pub use crate::input::{Action, InputSource, InputState};
}

pub use prelude::*;
