//! camera-explorer: a first-person camera for reconstructed 3D scenes.
//!
//! A source photo is sent to an external reconstruction service, which
//! returns a point-cloud (gaussian splat) asset. The explorer lets the user
//! walk through that scene with a real-world lens, and capture snapshots whose
//! camera parameters drive downstream frame generation.
//!
//! # Quick Start
//!
//! ```no_run
//! use camera_explorer::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut explorer = CameraExplorer::new(ExplorerOptions::default())?;
//!     let mut service = ManualReconstruction::new();
//!     let mut viewer = HeadlessViewer::default();
//!
//!     explorer.submit(SourceImageRef::new("shot-01.jpg"), &mut service);
//!     if let Some((_, reply)) = service.take_oldest() {
//!         reply.complete(PointCloudAsset::new("shot-01.splat"));
//!     }
//!
//!     explorer.frame(1.0 / 60.0, &mut viewer);
//!     explorer.perform(ExplorerAction::SelectLens("35mm"), &mut viewer);
//!     explorer.capture(&mut viewer);
//!     Ok(())
//! }
//! ```
//!
//! # Collaborators
//!
//! - [`ReconstructionService`] turns a photo into a [`PointCloudAsset`]
//! - [`ViewerSurface`] renders the asset with the explorer's camera
//! - [`ProjectPersistence`] stores snapshots and project metadata

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
// Pointer coordinates arrive as f64 from the window system
#![allow(clippy::cast_possible_truncation)]

mod explorer;
pub mod generation;
pub mod hud;
pub mod input;
pub mod persistence;
pub mod reconstruction;
pub mod session;
pub mod viewer;

pub use explorer::CameraExplorer;
pub use generation::FrameGenerationRequest;
pub use hud::HudReadout;
pub use input::{ExplorerAction, InputState};
pub use persistence::{JsonFileProject, MemoryProject, ProjectMetadata, ProjectPersistence};
pub use reconstruction::{
    ManualReconstruction, ReconstructionOutcome, ReconstructionReply, ReconstructionService,
};
pub use session::{ReconstructionSession, ReconstructionStatus, SourceImageRef, SubmissionToken};
pub use viewer::{HeadlessViewer, ViewerSurface};

// Re-export core types
pub use explorer_core::{
    lens, CameraNavigation, CameraTransform, ExplorerError, ExplorerOptions, LensPreset,
    MoveDirection, PhotoAlignment, Result, Rotation, SceneBounds, Mat4, Vec3,
    PITCH_LIMIT_DEGREES,
};

// Re-export render types
pub use explorer_render::{RgbaFrame, Thumbnail, ViewerCamera};

// Re-export structures
pub use explorer_structures::{
    CameraParameters, PointCloudAsset, Snapshot, SnapshotId, SnapshotStore,
};

/// Initializes logging from `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
