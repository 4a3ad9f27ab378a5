//! Camera transform (position + display rotation).

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Camera rotation in degrees.
///
/// Applied in yaw, pitch, roll order (Y, then X, then Z), the usual order
/// for a first-person camera that looks down -Z at zero rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation about the camera's X axis; positive tilts up.
    pub pitch: f32,
    /// Rotation about the world Y axis; positive turns left.
    pub yaw: f32,
    /// Rotation about the view axis.
    pub roll: f32,
}

impl Rotation {
    /// Zero rotation (looking down -Z).
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    /// Creates a new rotation from degrees.
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Converts to a quaternion.
    #[must_use]
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }

    /// Adds another rotation component-wise.
    #[must_use]
    pub fn offset_by(self, other: Rotation) -> Self {
        Self {
            pitch: self.pitch + other.pitch,
            yaw: self.yaw + other.yaw,
            roll: self.roll + other.roll,
        }
    }
}

/// Camera position and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTransform {
    /// Position in scene coordinates.
    pub position: Vec3,
    /// Rotation in degrees.
    pub rotation: Rotation,
}

impl CameraTransform {
    /// Creates a new transform.
    pub fn new(position: Vec3, rotation: Rotation) -> Self {
        Self { position, rotation }
    }

    /// Returns the view direction.
    #[must_use]
    pub fn look_dir(&self) -> Vec3 {
        self.rotation.to_quat() * Vec3::NEG_Z
    }

    /// Returns the camera's up direction.
    #[must_use]
    pub fn up_dir(&self) -> Vec3 {
        self.rotation.to_quat() * Vec3::Y
    }

    /// Returns the horizontal forward direction derived from yaw alone.
    #[must_use]
    pub fn flat_forward(&self) -> Vec3 {
        let yaw = self.rotation.yaw.to_radians();
        Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
    }

    /// Returns the horizontal right direction derived from yaw alone.
    #[must_use]
    pub fn flat_right(&self) -> Vec3 {
        let yaw = self.rotation.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Rotation::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_zero_rotation_looks_down_neg_z() {
        let t = CameraTransform::default();
        assert!(approx(t.look_dir(), Vec3::NEG_Z));
        assert!(approx(t.up_dir(), Vec3::Y));
        assert!(approx(t.flat_forward(), Vec3::NEG_Z));
        assert!(approx(t.flat_right(), Vec3::X));
    }

    #[test]
    fn test_flat_forward_matches_look_dir_at_zero_pitch() {
        let t = CameraTransform::new(Vec3::ZERO, Rotation::new(0.0, 37.0, 0.0));
        assert!(approx(t.flat_forward(), t.look_dir()));
    }

    #[test]
    fn test_flat_forward_ignores_pitch() {
        let t = CameraTransform::new(Vec3::ZERO, Rotation::new(60.0, 90.0, 0.0));
        assert!(t.flat_forward().y.abs() < 1e-6);
        assert!(approx(t.flat_forward(), Vec3::NEG_X));
    }

    #[test]
    fn test_right_is_perpendicular() {
        let t = CameraTransform::new(Vec3::ZERO, Rotation::new(0.0, 123.0, 0.0));
        assert!(t.flat_forward().dot(t.flat_right()).abs() < 1e-6);
        assert!(approx(t.flat_forward().cross(t.flat_right()), Vec3::NEG_Y));
    }
}
