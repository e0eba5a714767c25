//! Spatial transform for simulated entities
//!
//! Orientation is stored as yaw/pitch in radians rather than a quaternion:
//! every actor in the simulation is upright, so roll never occurs.
//! Yaw 0 faces -Z; positive yaw turns counter-clockwise seen from above.

use crate::vector::Vec3;

/// Position, orientation and scale
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub position: Vec3,
    /// Heading around +Y, radians
    pub yaw: f32,
    /// Elevation, radians (positive looks up)
    pub pitch: f32,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        yaw: 0.0,
        pitch: 0.0,
        scale: Vec3::ONE,
    };

    /// Create from position only
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Set yaw (builder pattern)
    #[inline]
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Set scale (builder pattern)
    #[inline]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// View direction including pitch
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// Heading on the ground plane (pitch ignored), unit length
    pub fn forward_flat(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(-sy, 0.0, -cy)
    }

    /// Right vector on the ground plane, unit length
    pub fn right(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    /// Yaw that faces along `direction` (vertical component ignored)
    ///
    /// Returns None for a vertical or zero direction.
    pub fn yaw_towards(direction: Vec3) -> Option<f32> {
        let flat = direction.flatten();
        if flat.length_squared() < 1e-10 {
            return None;
        }
        Some((-flat.x).atan2(-flat.z))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAC_PI_2;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_faces_negative_z() {
        let t = Transform::IDENTITY;
        assert_relative_eq!(t.forward().z, -1.0);
        assert_relative_eq!(t.right().x, 1.0);
    }

    #[test]
    fn test_right_is_forward_cross_up() {
        let t = Transform::IDENTITY.with_yaw(0.7);
        let expected = t.forward_flat().cross(Vec3::Y);
        assert!((t.right() - expected).length() < 1e-5);
    }

    #[test]
    fn test_yaw_towards_round_trips() {
        let yaw = Transform::yaw_towards(Vec3::X).unwrap();
        assert_relative_eq!(yaw, -FRAC_PI_2, epsilon = 1e-5);
        let t = Transform::IDENTITY.with_yaw(yaw);
        assert!((t.forward_flat() - Vec3::X).length() < 1e-5);
        assert!(Transform::yaw_towards(Vec3::Y).is_none());
    }

    #[test]
    fn test_pitch_raises_forward() {
        let mut t = Transform::IDENTITY;
        t.pitch = 0.5;
        assert!(t.forward().y > 0.0);
        assert_relative_eq!(t.forward().length(), 1.0, epsilon = 1e-5);
    }
}
