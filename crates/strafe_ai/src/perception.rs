//! Sight checks: range, field-of-view cone and line of sight

use strafe_math::{radians, Vec3};
use strafe_physics::SpatialQuery;

/// What an observer can tell about one target this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SightReport {
    /// Distance between observer and target positions
    pub distance: f32,
    pub in_range: bool,
    pub in_field_of_view: bool,
    /// Eye-to-eye ray is not blocked by level geometry
    pub line_of_sight: bool,
}

impl SightReport {
    /// Fresh detection: in range, inside the view cone and unobstructed
    #[inline]
    pub fn detects(&self) -> bool {
        self.in_range && self.in_field_of_view && self.line_of_sight
    }

    /// Continued tracking of an engaged target: the view cone no longer applies
    #[inline]
    pub fn tracks(&self) -> bool {
        self.in_range && self.line_of_sight
    }
}

/// Parameters of a single observer's sight check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub position: Vec3,
    pub eye: Vec3,
    /// Facing on the ground plane
    pub facing: Vec3,
    pub range: f32,
    /// Full cone angle, degrees
    pub field_of_view: f32,
}

/// Is `to_target` inside a horizontal cone of `fov_degrees` around `facing`?
///
/// 360 degrees or more sees everything; a target directly above or below
/// the observer counts as visible.
pub fn in_field_of_view(facing: Vec3, to_target: Vec3, fov_degrees: f32) -> bool {
    if fov_degrees >= 360.0 {
        return true;
    }
    let facing = facing.flatten().normalize_or_zero();
    let to_target = to_target.flatten().normalize_or_zero();
    if facing == Vec3::ZERO || to_target == Vec3::ZERO {
        return true;
    }
    let half = radians(fov_degrees.max(0.0) * 0.5);
    facing.dot(to_target) >= half.cos() - 1e-6
}

/// Run the range, cone and line-of-sight checks for one target
pub fn look(
    observer: &Observer,
    target_position: Vec3,
    target_eye: Vec3,
    world: &dyn SpatialQuery,
) -> SightReport {
    let distance = observer.position.distance(target_position);
    let in_range = distance <= observer.range;
    let in_field_of_view = in_field_of_view(
        observer.facing,
        target_position - observer.position,
        observer.field_of_view,
    );
    // The ray is only worth casting when something could be seen
    let line_of_sight = in_range && world.line_of_sight(observer.eye, target_eye);

    SightReport {
        distance,
        in_range,
        in_field_of_view,
        line_of_sight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strafe_math::AABB;
    use strafe_physics::{LevelGeometry, OpenField};

    fn observer() -> Observer {
        Observer {
            position: Vec3::ZERO,
            eye: Vec3::new(0.0, 1.6, 0.0),
            facing: Vec3::NEG_Z,
            range: 30.0,
            field_of_view: 120.0,
        }
    }

    #[test]
    fn test_field_of_view_cone() {
        assert!(in_field_of_view(Vec3::NEG_Z, Vec3::new(0.0, 0.0, -5.0), 120.0));
        // 59 degrees off axis is inside a 120 degree cone, 61 is not
        let inside = Vec3::new(-(59f32.to_radians().sin()), 0.0, -(59f32.to_radians().cos()));
        let outside = Vec3::new(-(61f32.to_radians().sin()), 0.0, -(61f32.to_radians().cos()));
        assert!(in_field_of_view(Vec3::NEG_Z, inside, 120.0));
        assert!(!in_field_of_view(Vec3::NEG_Z, outside, 120.0));
        assert!(!in_field_of_view(Vec3::NEG_Z, Vec3::Z, 120.0));
        assert!(in_field_of_view(Vec3::NEG_Z, Vec3::Z, 360.0));
    }

    #[test]
    fn test_look_detects_in_range() {
        let report = look(
            &observer(),
            Vec3::new(0.0, 0.0, -25.0),
            Vec3::new(0.0, 1.8, -25.0),
            &OpenField::default(),
        );
        assert!(report.detects());
        assert!((report.distance - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_behind_is_tracked_but_not_detected() {
        let report = look(
            &observer(),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(0.0, 1.8, 10.0),
            &OpenField::default(),
        );
        assert!(!report.detects());
        assert!(report.tracks());
    }

    #[test]
    fn test_wall_blocks_detection() {
        let level = LevelGeometry::arena(40.0)
            .with_collider(AABB::new(Vec3::new(-3.0, 0.0, -12.0), Vec3::new(3.0, 4.0, -11.0)));
        let report = look(
            &observer(),
            Vec3::new(0.0, 0.0, -20.0),
            Vec3::new(0.0, 1.8, -20.0),
            &level,
        );
        assert!(report.in_range && report.in_field_of_view);
        assert!(!report.line_of_sight);
        assert!(!report.detects());
    }

    #[test]
    fn test_out_of_range() {
        let report = look(
            &observer(),
            Vec3::new(0.0, 0.0, -31.0),
            Vec3::new(0.0, 1.8, -31.0),
            &OpenField::default(),
        );
        assert!(!report.in_range);
        assert!(!report.tracks());
    }
}
