//! Spatial queries (raycasting, floor height, blocked space)

use strafe_math::{Ray, Vec3};

/// Result of a raycast query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

/// Read-only view of level geometry.
///
/// Positions passed to [`floor_height`](Self::floor_height) and
/// [`is_blocked`](Self::is_blocked) are feet positions.
pub trait SpatialQuery {
    /// Nearest hit against static geometry within `max_distance`
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit>;

    /// Is the point inside the playable bounds
    fn contains_point(&self, point: Vec3) -> bool;

    /// Height of the walkable surface under `point`
    fn floor_height(&self, point: Vec3) -> f32;

    /// Whether any occluding geometry exists at all (the floor does not count)
    fn has_colliders(&self) -> bool;

    /// Would a body of `radius` standing at `point` overlap geometry or leave the bounds
    fn is_blocked(&self, point: Vec3, radius: f32) -> bool;

    /// Unobstructed straight line between two points.
    ///
    /// A level without colliders never occludes.
    fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        if !self.has_colliders() {
            return true;
        }
        let distance = from.distance(to);
        if distance < 1e-6 {
            return true;
        }
        let ray = Ray::from_points(from, to);
        match self.raycast(&ray, distance) {
            Some(hit) => hit.distance >= distance,
            None => true,
        }
    }
}

impl<T: SpatialQuery + ?Sized> SpatialQuery for &T {
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
        (**self).raycast(ray, max_distance)
    }

    fn contains_point(&self, point: Vec3) -> bool {
        (**self).contains_point(point)
    }

    fn floor_height(&self, point: Vec3) -> f32 {
        (**self).floor_height(point)
    }

    fn has_colliders(&self) -> bool {
        (**self).has_colliders()
    }

    fn is_blocked(&self, point: Vec3, radius: f32) -> bool {
        (**self).is_blocked(point, radius)
    }

    fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        (**self).line_of_sight(from, to)
    }
}

/// Move a body of `radius` from `from` toward `to`, rejecting blocked axes.
///
/// The full move is tried first, then X only, then Z only. Vertical
/// motion is carried through unchanged.
pub fn slide_move(world: &dyn SpatialQuery, from: Vec3, to: Vec3, radius: f32) -> Vec3 {
    if !world.is_blocked(to, radius) {
        return to;
    }

    let mut result = from;
    result.y = to.y;

    let along_x = Vec3::new(to.x, to.y, from.z);
    if !world.is_blocked(along_x, radius) {
        result.x = to.x;
    }
    let along_z = Vec3::new(result.x, to.y, to.z);
    if !world.is_blocked(along_z, radius) {
        result.z = to.z;
    }
    result
}

/// Intersect a ray with the horizontal plane `y = height`, hit from above only
pub(crate) fn raycast_floor(ray: &Ray, height: f32, max_distance: f32) -> Option<RaycastHit> {
    if ray.direction.y >= -1e-6 || ray.origin.y < height {
        return None;
    }
    let t = (height - ray.origin.y) / ray.direction.y;
    if t < 0.0 || t > max_distance {
        return None;
    }
    Some(RaycastHit {
        point: ray.at(t),
        normal: Vec3::Y,
        distance: t,
    })
}

/// Endless flat floor with no obstacles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenField {
    pub floor_height: f32,
}

impl OpenField {
    pub fn new(floor_height: f32) -> Self {
        Self { floor_height }
    }
}

impl Default for OpenField {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl SpatialQuery for OpenField {
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
        raycast_floor(ray, self.floor_height, max_distance)
    }

    fn contains_point(&self, _point: Vec3) -> bool {
        true
    }

    fn floor_height(&self, _point: Vec3) -> f32 {
        self.floor_height
    }

    fn has_colliders(&self) -> bool {
        false
    }

    fn is_blocked(&self, _point: Vec3, _radius: f32) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_open_field_always_visible() {
        let field = OpenField::default();
        assert!(field.line_of_sight(Vec3::new(0.0, 1.0, 0.0), Vec3::new(100.0, 1.0, 0.0)));
        // Even a target below the floor is visible without colliders
        assert!(field.line_of_sight(Vec3::new(0.0, 1.0, 0.0), Vec3::new(5.0, -3.0, 0.0)));
    }

    #[test]
    fn test_slide_move_rejects_blocked_axis() {
        let level = crate::LevelGeometry::arena(10.0);
        let from = Vec3::new(9.0, 0.0, 0.0);
        let to = Vec3::new(11.0, 0.0, 1.0);
        let moved = slide_move(&level, from, to, 0.5);
        assert_relative_eq!(moved.x, 9.0);
        assert_relative_eq!(moved.z, 1.0);

        let free = slide_move(&OpenField::default(), from, to, 0.5);
        assert_eq!(free, to);
    }

    #[test]
    fn test_floor_raycast() {
        let field = OpenField::new(0.0);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, 1.0));
        let hit = field.raycast(&ray, 100.0).unwrap();
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(hit.point.z, 2.0, epsilon = 1e-5);
        assert_eq!(hit.normal, Vec3::Y);

        // Upward rays and short rays miss
        let up = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        assert!(field.raycast(&up, 100.0).is_none());
        assert!(field.raycast(&ray, 1.0).is_none());
    }
}
