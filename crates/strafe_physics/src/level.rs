//! Static level geometry
//!
//! A level is a walkable box (`bounds`) with a flat base floor and a list
//! of static axis-aligned colliders. Collider tops are walkable surfaces,
//! so crates and platforms can be stood on and dropped off.

use crate::query::{raycast_floor, RaycastHit, SpatialQuery};
use serde::{Deserialize, Serialize};
use strafe_math::{ray_aabb_with_normal, Ray, Vec3, AABB};

fn default_step_height() -> f32 {
    0.3
}

fn default_body_height() -> f32 {
    1.8
}

/// Bounded arena of static boxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelGeometry {
    /// Playable volume; positions outside are blocked
    pub bounds: AABB,
    /// Height of the base floor
    #[serde(default)]
    pub floor_height: f32,
    /// Static occluders
    #[serde(default)]
    pub colliders: Vec<AABB>,
    /// Ledges up to this height above the feet do not block movement
    #[serde(default = "default_step_height")]
    pub step_height: f32,
    /// Height of the body column tested by `is_blocked`
    #[serde(default = "default_body_height")]
    pub body_height: f32,
}

impl LevelGeometry {
    /// Create an empty level with the given bounds
    pub fn new(bounds: AABB) -> Self {
        Self {
            floor_height: bounds.min.y,
            bounds,
            colliders: Vec::new(),
            step_height: default_step_height(),
            body_height: default_body_height(),
        }
    }

    /// Square arena centred on the origin, `half_size` metres in each direction
    pub fn arena(half_size: f32) -> Self {
        Self::new(AABB::new(
            Vec3::new(-half_size, 0.0, -half_size),
            Vec3::new(half_size, 50.0, half_size),
        ))
    }

    /// Add a collider (builder pattern)
    pub fn with_collider(mut self, collider: AABB) -> Self {
        self.add_collider(collider);
        self
    }

    /// Add a collider. Inverted boxes are ignored.
    pub fn add_collider(&mut self, collider: AABB) {
        if collider.is_valid() {
            self.colliders.push(collider);
        } else {
            log::warn!("Ignoring inverted collider {:?}", collider);
        }
    }

    /// Remove all colliders
    pub fn clear_colliders(&mut self) {
        self.colliders.clear();
    }

    /// Number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Highest walkable surface under `point` that is not above the step height
    pub fn floor_height_at(&self, point: Vec3) -> f32 {
        let reach = point.y + self.step_height;
        self.colliders
            .iter()
            .filter(|c| c.contains_xz(point) && c.max.y <= reach)
            .fold(self.floor_height, |acc, c| acc.max(c.max.y))
    }
}

impl Default for LevelGeometry {
    fn default() -> Self {
        Self::arena(50.0)
    }
}

impl SpatialQuery for LevelGeometry {
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
        let mut best = raycast_floor(ray, self.floor_height, max_distance);

        for collider in &self.colliders {
            if let Some((t, normal)) = ray_aabb_with_normal(ray, collider) {
                let closer = best.map_or(true, |b| t < b.distance);
                if t <= max_distance && closer {
                    best = Some(RaycastHit {
                        point: ray.at(t),
                        normal,
                        distance: t,
                    });
                }
            }
        }

        best
    }

    fn contains_point(&self, point: Vec3) -> bool {
        self.bounds.contains_point(point)
    }

    fn floor_height(&self, point: Vec3) -> f32 {
        self.floor_height_at(point)
    }

    fn has_colliders(&self) -> bool {
        !self.colliders.is_empty()
    }

    fn is_blocked(&self, point: Vec3, radius: f32) -> bool {
        let inner = self.bounds.expand(-radius);
        if !inner.contains_xz(point) {
            return true;
        }
        let body = AABB::new(
            Vec3::new(point.x - radius, point.y + self.step_height, point.z - radius),
            Vec3::new(point.x + radius, point.y + self.body_height, point.z + radius),
        );
        self.colliders.iter().any(|c| c.intersects(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn level_with_wall() -> LevelGeometry {
        LevelGeometry::arena(20.0)
            .with_collider(AABB::new(Vec3::new(-2.0, 0.0, -6.0), Vec3::new(2.0, 3.0, -5.0)))
    }

    #[test]
    fn test_wall_blocks_line_of_sight() {
        let level = level_with_wall();
        let eye = Vec3::new(0.0, 1.6, 0.0);
        assert!(!level.line_of_sight(eye, Vec3::new(0.0, 1.6, -10.0)));
        assert!(level.line_of_sight(eye, Vec3::new(5.0, 1.6, -10.0)));
        // Target in front of the wall is visible
        assert!(level.line_of_sight(eye, Vec3::new(0.0, 1.6, -4.0)));
    }

    #[test]
    fn test_empty_level_never_occludes() {
        let level = LevelGeometry::arena(10.0);
        assert!(!level.has_colliders());
        assert!(level.line_of_sight(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -5.0, 3.0)));
    }

    #[test]
    fn test_raycast_picks_nearest() {
        let level = level_with_wall()
            .with_collider(AABB::new(Vec3::new(-1.0, 0.0, -3.0), Vec3::new(1.0, 3.0, -2.0)));
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);
        let hit = level.raycast(&ray, 100.0).unwrap();
        assert_relative_eq!(hit.distance, 2.0, epsilon = 1e-4);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_floor_height_on_crate() {
        let level = LevelGeometry::arena(10.0)
            .with_collider(AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 2.0)));
        assert_relative_eq!(level.floor_height_at(Vec3::new(1.0, 1.0, 1.0)), 1.0);
        assert_relative_eq!(level.floor_height_at(Vec3::new(5.0, 1.0, 5.0)), 0.0);
        // Standing below the crate top (beyond step height) does not lift you onto it
        assert_relative_eq!(level.floor_height_at(Vec3::new(1.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn test_is_blocked() {
        let level = level_with_wall();
        assert!(level.is_blocked(Vec3::new(0.0, 0.0, -5.5), 0.4));
        assert!(!level.is_blocked(Vec3::new(0.0, 0.0, 0.0), 0.4));
        // Outside the arena
        assert!(level.is_blocked(Vec3::new(25.0, 0.0, 0.0), 0.4));
        // On top of the wall nothing blocks
        assert!(!level.is_blocked(Vec3::new(0.0, 3.0, -5.5), 0.4));
    }

    #[test]
    fn test_inverted_collider_ignored() {
        let mut level = LevelGeometry::arena(10.0);
        level.add_collider(AABB::new(Vec3::ONE, Vec3::ZERO));
        assert_eq!(level.collider_count(), 0);
    }

    #[test]
    fn test_level_round_trips_through_serde() {
        let level = level_with_wall();
        let json = serde_json::to_string(&level).unwrap();
        let back: LevelGeometry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, level);
    }
}
