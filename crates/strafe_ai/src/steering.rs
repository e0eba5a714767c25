//! Ground-plane movement and turning helpers
//!
//! Movement and facing are decoupled: an enemy can strafe while keeping
//! its gun on the player.

use strafe_core::RandomSource;
use strafe_math::{consts::TAU, move_towards_angle, Transform, Vec3};

/// Step `position` toward `target` on the ground plane at `speed`.
///
/// Never overshoots. Returns true once the target is reached.
pub fn move_to(position: &mut Vec3, target: Vec3, speed: f32, dt: f32) -> bool {
    let to_target = (target - *position).flatten();
    let distance = to_target.length();
    let step = (speed * dt).max(0.0);

    if distance <= step || distance < 1e-4 {
        position.x = target.x;
        position.z = target.z;
        return true;
    }

    *position += to_target * (step / distance);
    false
}

/// Step `position` directly away from `threat` on the ground plane
pub fn move_away(position: &mut Vec3, threat: Vec3, speed: f32, dt: f32) {
    let mut away = (*position - threat).flatten().normalize_or_zero();
    if away == Vec3::ZERO {
        away = Vec3::Z;
    }
    *position += away * (speed * dt).max(0.0);
}

/// Turn `yaw` toward `direction` at `rate` rad/s.
///
/// Returns true when facing the direction (or it has no horizontal component).
pub fn rotate_towards(yaw: &mut f32, direction: Vec3, rate: f32, dt: f32) -> bool {
    match Transform::yaw_towards(direction) {
        Some(desired) => {
            *yaw = move_towards_angle(*yaw, desired, (rate * dt).max(0.0));
            (*yaw - desired).abs() < 1e-4
        }
        None => true,
    }
}

/// Uniform random point on the ground-plane disk around `center`
pub fn random_point_in_radius(center: Vec3, radius: f32, rng: &mut dyn RandomSource) -> Vec3 {
    let angle = TAU * rng.next_f32();
    let distance = radius.max(0.0) * rng.next_f32().sqrt();
    Vec3::new(
        center.x + angle.cos() * distance,
        center.y,
        center.z + angle.sin() * distance,
    )
}
