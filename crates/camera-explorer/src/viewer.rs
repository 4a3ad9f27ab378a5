//! Seam to the external splat viewer.
//!
//! The viewer owns the renderer's camera object. The explorer writes its
//! target camera once per frame through [`ViewerSurface::apply_camera`] and
//! reads back what was actually rendered; it never mutates the viewer's camera
//! any other way.

use explorer_core::{CameraTransform, SceneBounds};
use explorer_render::{RgbaFrame, ViewerCamera};
use explorer_structures::PointCloudAsset;

/// The off-the-shelf renderer displaying the reconstruction.
pub trait ViewerSurface {
    /// Loads an asset for display.
    ///
    /// Returns the asset's extent when the viewer can measure it.
    fn load_point_cloud(&mut self, asset: &PointCloudAsset) -> Option<SceneBounds>;

    /// Drops the displayed asset.
    fn unload(&mut self);

    /// Applies the camera for the next frame.
    fn apply_camera(&mut self, camera: &ViewerCamera);

    /// Returns the transform the viewer last rendered with.
    fn camera_transform(&self) -> CameraTransform;

    /// Renders the current view into a frame buffer.
    fn render_to_buffer(&mut self) -> Option<RgbaFrame>;

    /// Aspect ratio of the viewport.
    fn aspect_ratio(&self) -> f32 {
        16.0 / 9.0
    }
}

/// Viewer without a display.
///
/// Reflects the applied camera exactly and renders a flat frame. Useful for
/// batch capture and for tests.
#[derive(Debug, Clone)]
pub struct HeadlessViewer {
    pub width: u32,
    pub height: u32,
    pub clear_color: [u8; 4],
    loaded: Option<PointCloudAsset>,
    camera: Option<ViewerCamera>,
    frames_rendered: u64,
}

impl HeadlessViewer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear_color: [24, 24, 28, 255],
            loaded: None,
            camera: None,
            frames_rendered: 0,
        }
    }

    /// Returns the loaded asset.
    pub fn loaded(&self) -> Option<&PointCloudAsset> {
        self.loaded.as_ref()
    }

    /// Returns the camera applied last.
    pub fn camera(&self) -> Option<&ViewerCamera> {
        self.camera.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Default for HeadlessViewer {
    fn default() -> Self {
        Self::new(320, 180)
    }
}

impl ViewerSurface for HeadlessViewer {
    fn load_point_cloud(&mut self, asset: &PointCloudAsset) -> Option<SceneBounds> {
        self.loaded = Some(asset.clone());
        asset.extent
    }

    fn unload(&mut self) {
        self.loaded = None;
    }

    fn apply_camera(&mut self, camera: &ViewerCamera) {
        self.camera = Some(camera.clone());
    }

    fn camera_transform(&self) -> CameraTransform {
        self.camera
            .as_ref()
            .map(|c| c.transform)
            .unwrap_or_default()
    }

    fn render_to_buffer(&mut self) -> Option<RgbaFrame> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        self.frames_rendered += 1;
        Some(RgbaFrame::solid(self.width, self.height, self.clear_color))
    }

    #[allow(clippy::cast_precision_loss)]
    fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            16.0 / 9.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}
