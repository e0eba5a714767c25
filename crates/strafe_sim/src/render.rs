//! Render submission
//!
//! The simulation hands the renderer a transform and an opaque visual handle
//! per entity; what a handle looks like is the renderer's business.

use serde::{Deserialize, Serialize};
use strafe_ai::EnemyKind;
use strafe_core::{EntityId, EntityKind};
use strafe_gamestate::PickupKind;
use strafe_math::Transform;

/// Opaque mesh/material reference owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// One drawable entity this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub entity: EntityId,
    pub kind: EntityKind,
    pub transform: Transform,
    pub visual: VisualHandle,
}

/// Receiver of render submissions
pub trait RenderSink {
    fn submit(&mut self, item: RenderItem);
}

impl RenderSink for Vec<RenderItem> {
    fn submit(&mut self, item: RenderItem) {
        self.push(item);
    }
}

/// Visual handle per thing the simulation draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSet {
    pub grunt: VisualHandle,
    pub soldier: VisualHandle,
    pub heavy: VisualHandle,
    pub sniper: VisualHandle,
    pub boss: VisualHandle,
    pub projectile: VisualHandle,
    pub ammo_pickup: VisualHandle,
    pub health_pickup: VisualHandle,
}

impl Default for VisualSet {
    fn default() -> Self {
        Self {
            grunt: VisualHandle(1),
            soldier: VisualHandle(2),
            heavy: VisualHandle(3),
            sniper: VisualHandle(4),
            boss: VisualHandle(5),
            projectile: VisualHandle(10),
            ammo_pickup: VisualHandle(20),
            health_pickup: VisualHandle(21),
        }
    }
}

impl VisualSet {
    pub fn enemy(&self, kind: EnemyKind) -> VisualHandle {
        match kind {
            EnemyKind::Grunt => self.grunt,
            EnemyKind::Soldier => self.soldier,
            EnemyKind::Heavy => self.heavy,
            EnemyKind::Sniper => self.sniper,
            EnemyKind::Boss => self.boss,
        }
    }

    pub fn pickup(&self, kind: PickupKind) -> VisualHandle {
        match kind {
            PickupKind::Ammo(_) => self.ammo_pickup,
            PickupKind::Health(_) => self.health_pickup,
        }
    }
}
