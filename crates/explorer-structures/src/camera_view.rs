//! Camera parameters (intrinsics and extrinsics) derived from snapshots.
//!
//! These are what downstream frame generation receives: a physically
//! described camera rather than the explorer's display rotation.

use explorer_core::{lens, CameraTransform};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

/// Lens description of a captured view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Full-frame focal length.
    pub focal_length_mm: f32,
    pub fov_vertical_degrees: f32,
    /// Output width / height.
    pub aspect_ratio: f32,
}

impl CameraIntrinsics {
    /// Intrinsics of a lens preset; unknown ids get the fallback lens.
    pub fn from_lens(lens_id: &str, aspect_ratio: f32) -> Self {
        let preset = lens::preset(lens_id);
        Self {
            focal_length_mm: preset.focal_length_mm,
            fov_vertical_degrees: preset.fov_vertical_deg,
            aspect_ratio,
        }
    }

    /// Horizontal FOV at this aspect ratio.
    pub fn fov_horizontal_degrees(&self) -> f32 {
        let half_v = self.fov_vertical_degrees.to_radians() * 0.5;
        (2.0 * (half_v.tan() * self.aspect_ratio).atan()).to_degrees()
    }

    /// Focal length in pixels for an output image `image_height` pixels tall.
    #[allow(clippy::cast_precision_loss)]
    pub fn focal_length_pixels(&self, image_height: u32) -> f32 {
        let half_v = self.fov_vertical_degrees.to_radians() * 0.5;
        image_height as f32 * 0.5 / half_v.tan()
    }

    /// Right-handed perspective projection.
    pub fn projection_matrix(&self, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_vertical_degrees.to_radians(),
            self.aspect_ratio,
            near,
            far,
        )
    }
}

/// Where the camera is and where it points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraExtrinsics {
    pub position: Vec3,
    /// Unit view direction.
    pub look_dir: Vec3,
    /// Unit up direction, orthogonal to `look_dir`.
    pub up_dir: Vec3,
}

impl CameraExtrinsics {
    pub fn from_transform(transform: &CameraTransform) -> Self {
        Self {
            position: transform.position,
            look_dir: transform.look_dir().normalize(),
            up_dir: transform.up_dir().normalize(),
        }
    }

    pub fn right_dir(&self) -> Vec3 {
        self.look_dir.cross(self.up_dir).normalize()
    }

    /// World-to-camera transform; the camera looks down -Z in eye space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.look_dir, self.up_dir)
    }
}

/// Intrinsics and extrinsics of one viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraParameters {
    pub intrinsics: CameraIntrinsics,
    pub extrinsics: CameraExtrinsics,
}

impl CameraParameters {
    /// Parameters for a transform seen through a lens.
    pub fn new(transform: &CameraTransform, lens_id: &str, aspect_ratio: f32) -> Self {
        Self {
            intrinsics: CameraIntrinsics::from_lens(lens_id, aspect_ratio),
            extrinsics: CameraExtrinsics::from_transform(transform),
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot, aspect_ratio: f32) -> Self {
        Self::new(&snapshot.transform(), &snapshot.lens_id, aspect_ratio)
    }

    pub fn position(&self) -> Vec3 {
        self.extrinsics.position
    }

    pub fn look_dir(&self) -> Vec3 {
        self.extrinsics.look_dir
    }

    pub fn fov_vertical_degrees(&self) -> f32 {
        self.intrinsics.fov_vertical_degrees
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.extrinsics.view_matrix()
    }

    pub fn projection_matrix(&self, near: f32, far: f32) -> Mat4 {
        self.intrinsics.projection_matrix(near, far)
    }
}
