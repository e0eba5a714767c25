//! # strafe_math - Geometry Primitives
//!
//! Small, allocation-free math used by every simulation crate:
//! vectors, yaw/pitch transforms, rays, bounding volumes and the
//! intersection tests that hit-scan, projectiles and line-of-sight build on.

pub mod bounds;
pub mod intersect;
pub mod ray;
pub mod transform;
pub mod vector;

pub use bounds::*;
pub use intersect::*;
pub use ray::*;
pub use transform::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const FRAC_PI_2: f32 = PI / 2.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of [`lerp`], clamped to `[0, 1]`.
///
/// A degenerate range (`a == b`) maps everything at or past `b` to 1.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    let span = b - a;
    if span.abs() < consts::EPSILON {
        return if value >= b { 1.0 } else { 0.0 };
    }
    ((value - a) / span).clamp(0.0, 1.0)
}

/// Wrap an angle in radians into `(-PI, PI]`
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % consts::TAU;
    if a <= -consts::PI {
        a += consts::TAU;
    } else if a > consts::PI {
        a -= consts::TAU;
    }
    a
}

/// Move `current` toward `target` by at most `max_delta`, taking the short way round.
pub fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = wrap_angle(target - current);
    if diff.abs() <= max_delta {
        wrap_angle(target)
    } else {
        wrap_angle(current + max_delta * diff.signum())
    }
}

/// Move a scalar toward `target` by at most `max_delta`
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + max_delta * (target - current).signum()
    }
}

pub mod prelude {
    pub use crate::bounds::{Sphere, AABB};
    pub use crate::intersect::{
        ray_aabb, ray_aabb_with_normal, ray_sphere, ray_sphere_with_normal, segment_sphere,
    };
    pub use crate::ray::Ray;
    pub use crate::transform::Transform;
    pub use crate::vector::{Vec2, Vec3};
    pub use crate::{degrees, inverse_lerp, lerp, move_towards, move_towards_angle, radians, wrap_angle};
}
