//! Fire-and-forget notifications for audio and HUD
//!
//! The simulation never waits on these; a HUD or audio thread drains a
//! [`NotificationQueue`] at its own pace.

use parking_lot::Mutex;
use serde::Serialize;
use strafe_core::EntityId;
use strafe_gamestate::{Outcome, PickupKind};
use strafe_math::Vec3;

/// Sounds the simulation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoundCue {
    WeaponFire,
    Reload,
    Impact,
    Explosion,
    EnemyAttack,
    EnemyDeath,
    Pickup,
}

/// Something the player should see or hear
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Notification {
    Sound { cue: SoundCue, position: Vec3 },
    HitMarker { target: EntityId, headshot: bool, killed: bool },
    PlayerDamaged { amount: f32, health: f32 },
    EnemyKilled { enemy: EntityId, score: u32 },
    PickupCollected(PickupKind),
    WaveStarted { wave: u32, enemies: usize },
    WaveCleared { wave: u32 },
    GameOver(Outcome),
}

/// Receiver of notifications
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Thread-safe buffer of pending notifications
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        self.pending.lock().push(notification);
    }
}
