//! Camera handed to the viewer each frame.

use explorer_core::lens;
use explorer_core::{CameraTransform, PhotoAlignment, SceneBounds};
use glam::{Mat4, Quat, Vec3};

/// GPU uniform block for the viewer's camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub inv_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            inv_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0, 0.0, 0.0],
            _padding: 0.0,
        }
    }
}

/// The camera as the viewer should render it.
///
/// Built from the navigation state (the target the user asked for) plus the
/// photo-alignment offset. The explorer writes one of these per frame; it
/// never reads camera state back out of it.
#[derive(Debug, Clone)]
pub struct ViewerCamera {
    /// Target transform from navigation.
    pub transform: CameraTransform,
    /// Active lens id.
    pub lens_id: &'static str,
    /// Orientation in the renderer's frame, alignment offset included.
    pub orientation: Quat,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl ViewerCamera {
    /// Creates a viewer camera for a transform and lens.
    #[must_use]
    pub fn new(
        transform: CameraTransform,
        lens_id: &str,
        alignment: PhotoAlignment,
        aspect_ratio: f32,
    ) -> Self {
        let preset = lens::preset(lens_id);
        let orientation = alignment.rotation().to_quat() * transform.rotation.to_quat();
        Self {
            transform,
            lens_id: preset.id,
            orientation,
            fov: preset.fov_vertical_deg.to_radians(),
            aspect_ratio: sanitize_aspect(aspect_ratio),
            near: 0.01,
            far: 1000.0,
        }
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = sanitize_aspect(aspect_ratio);
    }

    /// Fits the clip planes to a scene box.
    pub fn fit_clip_planes(&mut self, bounds: &SceneBounds) {
        let size = bounds.diagonal().max(0.1);
        self.near = (size * 0.001).max(0.001);
        self.far = size * 100.0;
    }

    /// Returns the camera position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Returns the view direction in the renderer's frame.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Returns the up direction in the renderer's frame.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position(), self.forward(), self.up())
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns vertical FOV in degrees.
    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Packs the matrices into a uniform block.
    #[must_use]
    pub fn uniforms(&self) -> CameraUniforms {
        let view = self.view_matrix();
        let proj = self.projection_matrix();
        CameraUniforms {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            view_proj: (proj * view).to_cols_array_2d(),
            inv_proj: proj.inverse().to_cols_array_2d(),
            camera_pos: self.position().to_array(),
            _padding: 0.0,
        }
    }
}

fn sanitize_aspect(aspect_ratio: f32) -> f32 {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        aspect_ratio
    } else {
        16.0 / 9.0
    }
}
