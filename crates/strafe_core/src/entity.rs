//! Entity kind tags and the shared entity header

use crate::id::EntityId;
use serde::{Deserialize, Serialize};
use strafe_math::Transform;

/// Closed set of simulated entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Weapon,
    Projectile,
    Pickup,
    Prop,
    Trigger,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
            Self::Weapon => "weapon",
            Self::Projectile => "projectile",
            Self::Pickup => "pickup",
            Self::Prop => "prop",
            Self::Trigger => "trigger",
        }
    }
}

/// Identity, transform and lifecycle flags common to every entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityHeader {
    id: EntityId,
    kind: EntityKind,
    /// World transform
    pub transform: Transform,
    /// Inactive entities are skipped by updates and queries
    pub active: bool,
    pending_destruction: bool,
}

impl EntityHeader {
    /// Create a header for a freshly spawned entity
    pub fn new(id: EntityId, kind: EntityKind, transform: Transform) -> Self {
        Self {
            id,
            kind,
            transform,
            active: true,
            pending_destruction: false,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Flag for removal at the owner's next sweep
    pub fn mark_for_destruction(&mut self) {
        self.pending_destruction = true;
        self.active = false;
    }

    #[inline]
    pub fn is_pending_destruction(&self) -> bool {
        self.pending_destruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_for_destruction_deactivates() {
        let mut header = EntityHeader::new(EntityId::from_raw(3), EntityKind::Enemy, Transform::IDENTITY);
        assert!(header.active);
        header.mark_for_destruction();
        assert!(header.is_pending_destruction());
        assert!(!header.active);
        assert_eq!(header.id(), EntityId::from_raw(3));
        assert_eq!(header.kind().name(), "enemy");
    }
}
