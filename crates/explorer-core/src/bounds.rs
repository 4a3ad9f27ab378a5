//! Navigable scene extent.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box the camera is kept inside once a scene is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl SceneBounds {
    /// Creates bounds from two corners, ordering them componentwise.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates bounds from a scene extent, trimmed inward on every side.
    ///
    /// `padding` is the fraction of each axis' length removed from both of
    /// its ends. Axes that would invert collapse to their center.
    pub fn from_extent(min: Vec3, max: Vec3, padding: f32) -> Self {
        let raw = Self::new(min, max);
        let inset = raw.size() * padding.clamp(0.0, 0.5);
        let center = raw.center();
        Self {
            min: (raw.min + inset).min(center),
            max: (raw.max - inset).max(center),
        }
    }

    /// Computes the extent of a set of points.
    ///
    /// Returns `None` for an empty set or when no point is finite.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut has_extent = false;

        for p in points.into_iter().filter(|p| p.is_finite()) {
            min = min.min(p);
            max = max.max(p);
            has_extent = true;
        }

        has_extent.then_some(Self { min, max })
    }

    /// Returns the size along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the length of the box diagonal.
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// Clamps a point into the box on all axes.
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    /// Clamps only the horizontal (X/Z) components.
    pub fn clamp_horizontal(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y,
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Clamps a height into the vertical range.
    pub fn clamp_height(&self, y: f32) -> f32 {
        y.clamp(self.min.y, self.max.y)
    }

    /// Returns whether the point lies inside (inclusive).
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}
