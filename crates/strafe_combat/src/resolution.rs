//! Hit resolution
//!
//! Hit-scan rays and explosions are resolved against a read-only slice of
//! [`HitTarget`]s and the level's [`SpatialQuery`]. The result is a list of
//! damage events; applying them is the caller's job.
//!
//! When several targets are hit at the same distance the lowest entity id
//! wins, so outcomes never depend on the order targets were listed in.

use crate::damage::{radial_falloff, DamageFalloff, DamageInfo, DamageKind};
use strafe_core::{EntityId, EntityKind};
use strafe_math::{ray_sphere, Ray, Sphere, Vec3};
use strafe_physics::{RaycastHit, SpatialQuery};

/// A damageable volume exposed to combat resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTarget {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Body volume
    pub body: Sphere,
    /// Optional head volume; hits here apply the headshot multiplier
    pub head: Option<Sphere>,
}

impl HitTarget {
    pub fn new(id: EntityId, kind: EntityKind, body: Sphere) -> Self {
        Self {
            id,
            kind,
            body,
            head: None,
        }
    }

    /// Add a head volume (builder pattern)
    pub fn with_head(mut self, head: Sphere) -> Self {
        self.head = Some(head);
        self
    }
}

/// Damage addressed to one entity
#[derive(Debug, Clone, PartialEq)]
pub struct DamageEvent {
    pub target: EntityId,
    pub info: DamageInfo,
}

/// Everything combat resolution reports back to the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// Damage to apply
    Damage(DamageEvent),
    /// A round or projectile struck level geometry
    Impact { point: Vec3, normal: Vec3 },
    /// An explosive detonated
    Explosion {
        center: Vec3,
        radius: f32,
        source: EntityId,
    },
}

/// One hit-scan ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitscanShot {
    /// Excluded from the hit test
    pub shooter: EntityId,
    pub origin: Vec3,
    pub direction: Vec3,
    pub range: f32,
    pub damage: f32,
    pub headshot_multiplier: f32,
    pub falloff: DamageFalloff,
}

/// Result of a hit-scan ray
#[derive(Debug, Clone, PartialEq)]
pub enum HitscanOutcome {
    /// A target was hit before any geometry
    Target { event: DamageEvent, distance: f32 },
    /// Level geometry stopped the ray
    Level(RaycastHit),
    /// Nothing within range
    Miss,
}

impl HitscanOutcome {
    /// The damage event, if a target was hit
    pub fn damage(&self) -> Option<&DamageEvent> {
        match self {
            Self::Target { event, .. } => Some(event),
            _ => None,
        }
    }

    /// Convert into the events the simulation consumes
    pub fn into_events(self) -> Vec<CombatEvent> {
        match self {
            Self::Target { event, .. } => vec![CombatEvent::Damage(event)],
            Self::Level(hit) => vec![CombatEvent::Impact {
                point: hit.point,
                normal: hit.normal,
            }],
            Self::Miss => Vec::new(),
        }
    }
}

/// Nearest target hit along a ray: (distance, target, headshot)
pub(crate) fn nearest_target<'a>(
    ray: &Ray,
    max_distance: f32,
    targets: &'a [HitTarget],
    exclude: impl Fn(&HitTarget) -> bool,
) -> Option<(f32, &'a HitTarget, bool)> {
    let mut best: Option<(f32, &HitTarget, bool)> = None;

    for target in targets.iter().filter(|t| !exclude(t)) {
        let body = ray_sphere(ray, &target.body);
        let head = target.head.and_then(|h| ray_sphere(ray, &h));

        let (distance, headshot) = match (body, head) {
            (Some(b), Some(h)) if h <= b => (h, true),
            (Some(b), _) => (b, false),
            (None, Some(h)) => (h, true),
            (None, None) => continue,
        };
        if distance > max_distance {
            continue;
        }

        let better = match best {
            None => true,
            Some((d, current, _)) => distance < d || (distance == d && target.id < current.id),
        };
        if better {
            best = Some((distance, target, headshot));
        }
    }

    best
}

/// Resolve a hit-scan ray against targets and level geometry
pub fn resolve_hitscan(
    shot: &HitscanShot,
    targets: &[HitTarget],
    world: &dyn SpatialQuery,
) -> HitscanOutcome {
    let ray = Ray::new(shot.origin, shot.direction);
    if !ray.is_valid() || shot.range <= 0.0 {
        return HitscanOutcome::Miss;
    }

    let level_hit = world.raycast(&ray, shot.range);
    let reach = level_hit.map_or(shot.range, |hit| hit.distance);

    if let Some((distance, target, headshot)) =
        nearest_target(&ray, reach, targets, |t| t.id == shot.shooter)
    {
        let mut amount = shot.damage * shot.falloff.multiplier(distance);
        if headshot {
            amount *= shot.headshot_multiplier;
        }
        let info = DamageInfo::new(amount, DamageKind::Bullet)
            .with_source(shot.shooter)
            .with_hit_point(ray.at(distance))
            .with_direction(ray.direction)
            .with_headshot(headshot);
        log::trace!("Hit-scan hit {} at {:.1}m for {:.1}", target.id, distance, amount);
        return HitscanOutcome::Target {
            event: DamageEvent {
                target: target.id,
                info,
            },
            distance,
        };
    }

    match level_hit {
        Some(hit) => HitscanOutcome::Level(hit),
        None => HitscanOutcome::Miss,
    }
}

/// Area damage: every target whose body centre lies within `radius` takes
/// `damage x (1 - d / radius)`. Events are ordered by ascending target id.
pub fn explode(
    center: Vec3,
    radius: f32,
    damage: f32,
    source: EntityId,
    targets: &[HitTarget],
) -> Vec<DamageEvent> {
    let mut events: Vec<DamageEvent> = targets
        .iter()
        .filter_map(|target| {
            let distance = center.distance(target.body.center);
            let scale = radial_falloff(distance, radius);
            if scale <= 0.0 {
                return None;
            }
            let info = DamageInfo::new(damage * scale, DamageKind::Explosion)
                .with_source(source)
                .with_hit_point(target.body.center)
                .with_direction((target.body.center - center).normalize_or_zero());
            Some(DamageEvent {
                target: target.id,
                info,
            })
        })
        .collect();

    events.sort_by_key(|e| e.target);
    events
}
