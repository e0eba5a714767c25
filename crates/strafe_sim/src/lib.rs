//! Strafe Sim - Headless FPS Simulation
//!
//! Ties the gameplay crates together into one explicitly constructed
//! [`Simulation`] that is advanced a tick at a time.
//!
//! # Features
//!
//! - Fixed stage order per tick with clamped delta time
//! - Frame timing behind a [`Clock`] trait, with a smoothed FPS figure
//! - Fire-and-forget [`Notifier`] for audio and HUD, plus a thread-safe queue
//! - [`RenderSink`] submission of entity transforms and visual handles
//! - TOML configuration with validation
//! - A scripted [`Autopilot`] for demo runs and soak tests
//!
//! # Example
//!
//! ```ignore
//! use strafe_sim::prelude::*;
//!
//! let mut sim = Simulation::new(SimConfig::load("strafe.toml")?);
//! sim.start();
//!
//! let queue = NotificationQueue::new();
//! while !sim.state().is_over() {
//!     let dt = timer.tick(&clock);
//!     sim.tick(dt, &input, &queue);
//!     for note in queue.drain() {
//!         hud.show(note);
//!     }
//! }
//! ```

pub mod autopilot;
pub mod config;
pub mod notify;
pub mod render;
pub mod time;
pub mod world;

pub mod prelude {
    pub use crate::autopilot::Autopilot;
    pub use crate::config::{ConfigError, ConfigResult, EnemyPresets, SimConfig};
    pub use crate::notify::{Notification, NotificationQueue, Notifier, NullNotifier, SoundCue};
    pub use crate::render::{RenderItem, RenderSink, VisualHandle, VisualSet};
    pub use crate::time::{Clock, FrameTimer, ManualClock, SystemClock, DEFAULT_MAX_DELTA, FPS_HISTORY};
    pub use crate::world::{EnemySnapshot, PlayerSnapshot, Simulation, Snapshot, TickReport, WeaponSnapshot};
}

pub use prelude::*;
