//! Request handed to the downstream frame generator.
//!
//! The selected snapshot's viewpoint and lens, plus its thumbnail as a
//! composition guide, are everything the generator needs to re-render the
//! scene from that camera.

use explorer_core::Result;
use explorer_render::Thumbnail;
use explorer_structures::{CameraParameters, Snapshot, SnapshotId};
use serde::{Deserialize, Serialize};

use crate::session::SourceImageRef;

/// A frame generation request for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameGenerationRequest {
    pub project_id: Option<String>,
    pub source_image: Option<SourceImageRef>,
    pub snapshot_id: SnapshotId,
    /// 1-based position of the snapshot in the tray.
    pub display_number: usize,
    pub lens_id: String,
    pub camera: CameraParameters,
    pub guide: Thumbnail,
}

impl FrameGenerationRequest {
    pub fn new(
        snapshot: &Snapshot,
        display_number: usize,
        aspect_ratio: f32,
        project_id: Option<String>,
        source_image: Option<SourceImageRef>,
    ) -> Self {
        Self {
            project_id,
            source_image,
            snapshot_id: snapshot.id,
            display_number,
            lens_id: snapshot.lens_id.clone(),
            camera: CameraParameters::from_snapshot(snapshot, aspect_ratio),
            guide: snapshot.thumbnail.clone(),
        }
    }

    /// Serializes the request for the generator.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::{CameraTransform, Rotation, Vec3};
    use explorer_structures::SnapshotStore;

    #[test]
    fn test_request_carries_snapshot_camera() {
        let mut store = SnapshotStore::new();
        let transform = CameraTransform::new(Vec3::new(0.5, 1.0, 2.0), Rotation::new(0.0, 90.0, 0.0));
        let snapshot = store
            .capture(Thumbnail::placeholder(), transform, "85mm")
            .clone();

        let request = FrameGenerationRequest::new(
            &snapshot,
            1,
            1.5,
            Some("demo".into()),
            Some(SourceImageRef::new("shot.jpg")),
        );
        assert_eq!(request.lens_id, "85mm");
        assert_eq!(request.camera.position(), Vec3::new(0.5, 1.0, 2.0));
        assert!((request.camera.fov_vertical_degrees() - 16.07).abs() < 1e-4);
        // yaw 90 turns the camera from -Z to -X
        assert!((request.camera.look_dir() - Vec3::NEG_X).length() < 1e-5);

        let json = request.to_json().unwrap();
        assert!(json.contains("\"lens_id\":\"85mm\""));
        assert_eq!(FrameGenerationRequest::from_json(&json).unwrap(), request);
    }
}
