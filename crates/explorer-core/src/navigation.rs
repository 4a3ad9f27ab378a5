//! Bounded first-person camera navigation.
//!
//! [`CameraNavigation`] is the single source of truth for where the virtual
//! camera is and how it may move. Once scene bounds are recorded, every
//! position update is clamped into them. All operations are plain state
//! mutations; there are no error conditions.

use glam::Vec3;

use crate::bounds::SceneBounds;
use crate::lens;
use crate::options::ExplorerOptions;
use crate::transform::{CameraTransform, Rotation};

/// Pitch limit in degrees (pi / 2.5 radians). Keeps the camera from flipping
/// past vertical; not configurable.
pub const PITCH_LIMIT_DEGREES: f32 = 72.0;

/// Horizontal movement direction relative to the camera's yaw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Dolly in.
    Forward,
    /// Dolly out.
    Back,
    /// Truck left.
    Left,
    /// Truck right.
    Right,
}

impl MoveDirection {
    /// All directions, in a fixed order.
    pub const ALL: [MoveDirection; 4] = [
        MoveDirection::Forward,
        MoveDirection::Back,
        MoveDirection::Left,
        MoveDirection::Right,
    ];
}

/// Live camera state for the explorer view.
#[derive(Debug, Clone)]
pub struct CameraNavigation {
    transform: CameraTransform,
    lens_id: &'static str,
    bounds: Option<SceneBounds>,
    show_grid: bool,
    show_hud: bool,

    default_transform: CameraTransform,
    default_lens: &'static str,
}

impl CameraNavigation {
    /// Creates navigation state at the configured default transform.
    pub fn new(options: &ExplorerOptions) -> Self {
        let default_transform = CameraTransform::new(options.default_position, Rotation::ZERO);
        let default_lens = lens::preset(&options.default_lens).id;
        Self {
            transform: default_transform,
            lens_id: default_lens,
            bounds: None,
            show_grid: false,
            show_hud: true,
            default_transform,
            default_lens,
        }
    }

    /// Returns the current camera transform.
    pub fn transform(&self) -> CameraTransform {
        self.transform
    }

    /// Returns the current position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Returns the current rotation in degrees.
    pub fn rotation(&self) -> Rotation {
        self.transform.rotation
    }

    /// Returns the active lens id.
    pub fn lens_id(&self) -> &'static str {
        self.lens_id
    }

    /// Returns the recorded scene bounds, if any.
    pub fn bounds(&self) -> Option<SceneBounds> {
        self.bounds
    }

    /// Returns whether the composition grid is shown.
    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    /// Returns whether the HUD is shown.
    pub fn show_hud(&self) -> bool {
        self.show_hud
    }

    /// Selects the active lens. Unknown ids resolve to the fallback lens.
    pub fn set_lens(&mut self, lens_id: &str) {
        self.lens_id = lens::preset(lens_id).id;
        log::debug!("lens set to {}", self.lens_id);
    }

    /// Adds to yaw and pitch. Pitch is clamped to [`PITCH_LIMIT_DEGREES`].
    pub fn apply_look(&mut self, delta_yaw_deg: f32, delta_pitch_deg: f32) {
        let rotation = &mut self.transform.rotation;
        if delta_yaw_deg.is_finite() {
            rotation.yaw = (rotation.yaw + delta_yaw_deg).rem_euclid(360.0);
        }
        if delta_pitch_deg.is_finite() {
            rotation.pitch = (rotation.pitch + delta_pitch_deg)
                .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        }
    }

    /// Moves along the horizontal plane relative to the current yaw.
    ///
    /// Pitch is ignored so the camera never drifts into the floor or ceiling.
    /// X/Z are clamped into the scene bounds when set; Y is untouched.
    pub fn apply_move(&mut self, direction: MoveDirection, speed: f32) {
        if !speed.is_finite() {
            return;
        }
        let step = match direction {
            MoveDirection::Forward => self.transform.flat_forward(),
            MoveDirection::Back => -self.transform.flat_forward(),
            MoveDirection::Left => -self.transform.flat_right(),
            MoveDirection::Right => self.transform.flat_right(),
        } * speed;

        let mut position = self.transform.position + step;
        if let Some(bounds) = &self.bounds {
            position = bounds.clamp_horizontal(position);
        }
        self.transform.position = position;
    }

    /// Raises or lowers the camera, clamped into the vertical bounds when set.
    pub fn apply_height_delta(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        let mut y = self.transform.position.y + delta_y;
        if let Some(bounds) = &self.bounds {
            y = bounds.clamp_height(y);
        }
        self.transform.position.y = y;
    }

    /// Restores the default transform and lens.
    pub fn reset_to_origin(&mut self) {
        self.transform = self.default_transform;
        self.lens_id = self.default_lens;
        log::debug!("camera reset to origin");
    }

    /// Records the scene bounds and pulls the camera inside them.
    ///
    /// Corners are reordered if inverted; non-finite bounds are ignored.
    pub fn record_scene_bounds(&mut self, bounds: SceneBounds) {
        if !(bounds.min.is_finite() && bounds.max.is_finite()) {
            log::warn!("ignoring non-finite scene bounds");
            return;
        }
        let bounds = SceneBounds::new(bounds.min, bounds.max);
        self.transform.position = bounds.clamp(self.transform.position);
        log::debug!(
            "scene bounds recorded: min {:?} max {:?}",
            bounds.min,
            bounds.max
        );
        self.bounds = Some(bounds);
    }

    /// Discards the scene bounds; movement becomes unclamped.
    pub fn clear_scene_bounds(&mut self) {
        self.bounds = None;
    }

    /// Toggles the composition grid overlay.
    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    /// Toggles the HUD overlay.
    pub fn toggle_hud(&mut self) {
        self.show_hud = !self.show_hud;
    }

    /// Overwrites the transform, e.g. when restoring a snapshot.
    ///
    /// The same clamping rules as interactive movement apply.
    pub fn set_transform(&mut self, mut transform: CameraTransform) {
        if !transform.position.is_finite() {
            return;
        }
        transform.rotation.pitch = transform
            .rotation
            .pitch
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        if let Some(bounds) = &self.bounds {
            transform.position = bounds.clamp(transform.position);
        }
        self.transform = transform;
    }
}

impl Default for CameraNavigation {
    fn default() -> Self {
        Self::new(&ExplorerOptions::default())
    }
}
