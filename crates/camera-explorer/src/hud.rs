//! Heads-up readout of the camera state.

use std::fmt;

use explorer_core::{lens, CameraTransform, LensPreset};
use serde::Serialize;

use crate::session::ReconstructionStatus;

/// Values shown in the HUD overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudReadout {
    /// Transform the viewer last rendered.
    pub transform: CameraTransform,
    pub lens: &'static LensPreset,
    pub status: ReconstructionStatus,
    pub snapshot_count: usize,
    /// Display number of the selected snapshot.
    pub selected: Option<usize>,
    pub show_grid: bool,
}

impl HudReadout {
    pub fn new(
        transform: CameraTransform,
        lens_id: &str,
        status: ReconstructionStatus,
        snapshot_count: usize,
        selected: Option<usize>,
        show_grid: bool,
    ) -> Self {
        Self {
            transform,
            lens: lens::preset(lens_id),
            status,
            snapshot_count,
            selected,
            show_grid,
        }
    }
}

impl fmt::Display for HudReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.transform.position;
        let r = self.transform.rotation;
        writeln!(f, "pos  {:>7.2} {:>7.2} {:>7.2}", p.x, p.y, p.z)?;
        writeln!(f, "rot  pitch {:>6.1}  yaw {:>6.1}", r.pitch, r.yaw)?;
        writeln!(
            f,
            "lens {} {}  {:.1}° x {:.1}°",
            self.lens.id,
            self.lens.display_name,
            self.lens.fov_horizontal_deg,
            self.lens.fov_vertical_deg
        )?;
        match self.selected {
            Some(n) => write!(f, "{}  shots {} (#{n})", self.status, self.snapshot_count),
            None => write!(f, "{}  shots {}", self.status, self.snapshot_count),
        }
    }
}
