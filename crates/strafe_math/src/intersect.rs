//! Intersection tests for raycasting and collision detection
//!
//! Provides ray intersection tests against:
//! - AABB (Axis-Aligned Bounding Box)
//! - Sphere
//!
//! plus a swept segment-vs-sphere test used by projectiles.

use crate::bounds::{Sphere, AABB};
use crate::ray::Ray;
use crate::vector::Vec3;

/// Ray-AABB intersection using the slab method
///
/// Returns the distance along the ray to the intersection point,
/// or None if the ray doesn't intersect the AABB. A ray starting
/// inside the box reports the exit distance.
pub fn ray_aabb(ray: &Ray, aabb: &AABB) -> Option<f32> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for (origin, dir, lo, hi) in [
        (ray.origin.x, ray.direction.x, aabb.min.x, aabb.max.x),
        (ray.origin.y, ray.direction.y, aabb.min.y, aabb.max.y),
        (ray.origin.z, ray.direction.z, aabb.min.z, aabb.max.z),
    ] {
        if dir.abs() < 1e-8 {
            // Parallel to this slab: miss unless the origin is between the planes
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;
        tmin = tmin.max(t1.min(t2));
        tmax = tmax.min(t1.max(t2));
    }

    // If tmax < 0, ray is intersecting AABB but behind origin
    // If tmin > tmax, ray doesn't intersect
    if tmax < 0.0 || tmin > tmax {
        None
    } else {
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// Ray-AABB intersection with normal
///
/// Returns (distance, normal) or None if no intersection.
pub fn ray_aabb_with_normal(ray: &Ray, aabb: &AABB) -> Option<(f32, Vec3)> {
    let t = ray_aabb(ray, aabb)?;
    let point = ray.at(t);

    // Determine which face was hit
    let epsilon = 0.0001;
    let normal = if (point.x - aabb.min.x).abs() < epsilon {
        Vec3::NEG_X
    } else if (point.x - aabb.max.x).abs() < epsilon {
        Vec3::X
    } else if (point.y - aabb.min.y).abs() < epsilon {
        Vec3::NEG_Y
    } else if (point.y - aabb.max.y).abs() < epsilon {
        Vec3::Y
    } else if (point.z - aabb.min.z).abs() < epsilon {
        Vec3::NEG_Z
    } else {
        Vec3::Z
    };

    Some((t, normal))
}

/// Ray-Sphere intersection
///
/// Returns the distance along the ray to the nearest intersection point,
/// or None if the ray doesn't intersect the sphere. A ray starting inside
/// the sphere reports the exit distance.
pub fn ray_sphere(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let oc = ray.origin - sphere.center;
    let a = ray.direction.dot(ray.direction);
    if a < 1e-12 {
        return None;
    }
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None
    }
}

/// Ray-Sphere intersection with normal
pub fn ray_sphere_with_normal(ray: &Ray, sphere: &Sphere) -> Option<(f32, Vec3)> {
    let t = ray_sphere(ray, sphere)?;
    let normal = (ray.at(t) - sphere.center).normalize_or_zero();
    Some((t, normal))
}

/// Swept point test: does the segment `start -> end` pass within the sphere?
///
/// Returns the distance from `start` to the first contact, or None.
/// A segment that starts inside the sphere contacts at distance 0.
pub fn segment_sphere(start: Vec3, end: Vec3, sphere: &Sphere) -> Option<f32> {
    if sphere.contains_point(start) {
        return Some(0.0);
    }
    let length = start.distance(end);
    if length < 1e-8 {
        return None;
    }
    let ray = Ray::from_points(start, end);
    ray_sphere(&ray, sphere).filter(|t| *t <= length)
}
