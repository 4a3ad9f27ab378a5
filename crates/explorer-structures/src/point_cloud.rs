//! Reconstructed point-cloud assets.
//!
//! The splat data itself never passes through the explorer; an asset is an
//! opaque reference (URL or storage key) plus whatever is known about its
//! spatial extent.

use explorer_core::SceneBounds;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Reference to a point-cloud / Gaussian-splat reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloudAsset {
    /// Opaque reference understood by the viewer (URL, storage key, ...).
    pub asset_ref: String,
    /// Axis-aligned extent, when the reconstruction service reported one.
    pub extent: Option<SceneBounds>,
    /// Number of splats/points, when known.
    pub point_count: Option<usize>,
}

impl PointCloudAsset {
    /// Creates an asset with unknown extent.
    pub fn new(asset_ref: impl Into<String>) -> Self {
        Self {
            asset_ref: asset_ref.into(),
            extent: None,
            point_count: None,
        }
    }

    /// Sets the extent from two corners.
    #[must_use]
    pub fn with_extent(mut self, min: Vec3, max: Vec3) -> Self {
        self.extent = Some(SceneBounds::new(min, max));
        self
    }

    /// Sets extent and count from sample points.
    #[must_use]
    pub fn with_points(mut self, points: &[Vec3]) -> Self {
        self.extent = SceneBounds::enclosing(points.iter().copied());
        self.point_count = Some(points.len());
        self
    }

    /// Checks that the asset can be handed to the viewer.
    ///
    /// Returns a human-readable reason when it cannot.
    pub fn validate(&self) -> Result<(), String> {
        if self.asset_ref.trim().is_empty() {
            return Err("reconstruction returned an empty asset reference".to_string());
        }
        if self.point_count == Some(0) {
            return Err("reconstruction returned an empty point cloud".to_string());
        }
        if let Some(extent) = &self.extent {
            if !(extent.min.is_finite() && extent.max.is_finite()) {
                return Err("reconstruction extent is not finite".to_string());
            }
        }
        Ok(())
    }

    /// Navigable bounds derived from the extent with inward padding.
    pub fn scene_bounds(&self, padding: f32) -> Option<SceneBounds> {
        self.extent
            .map(|extent| SceneBounds::from_extent(extent.min, extent.max, padding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_points() {
        let asset = PointCloudAsset::new("scene.splat").with_points(&[
            Vec3::new(-2.0, 0.0, -2.0),
            Vec3::new(2.0, 3.0, 2.0),
        ]);
        assert_eq!(asset.point_count, Some(2));
        let bounds = asset.scene_bounds(0.25).unwrap();
        assert!((bounds.min - Vec3::new(-1.0, 0.75, -1.0)).length() < 1e-5);
        assert!((bounds.max - Vec3::new(1.0, 2.25, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_unknown_extent_has_no_bounds() {
        assert!(PointCloudAsset::new("scene.ply").scene_bounds(0.1).is_none());
    }

    #[test]
    fn test_validate() {
        assert!(PointCloudAsset::new("scene.ply").validate().is_ok());
        assert!(PointCloudAsset::new("  ").validate().is_err());
        assert!(PointCloudAsset::new("scene.ply")
            .with_points(&[])
            .validate()
            .is_err());
        assert!(PointCloudAsset::new("scene.ply")
            .with_extent(Vec3::ZERO, Vec3::splat(f32::INFINITY))
            .validate()
            .is_err());
    }
}
