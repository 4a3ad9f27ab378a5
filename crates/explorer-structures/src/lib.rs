//! Data structures for camera-explorer.
//!
//! - [`PointCloudAsset`]: reference to a reconstructed scene and its extent
//! - [`Snapshot`] and [`SnapshotStore`]: captured camera states
//! - [`CameraParameters`]: intrinsics/extrinsics handed to frame generation

#![allow(clippy::must_use_candidate)]

pub mod camera_view;
pub mod point_cloud;
pub mod snapshot;

pub use camera_view::{CameraExtrinsics, CameraIntrinsics, CameraParameters};
pub use point_cloud::PointCloudAsset;
pub use snapshot::{Snapshot, SnapshotId, SnapshotStore};
