//! Captured camera snapshots.
//!
//! A snapshot freezes the camera transform and lens at the moment of capture
//! together with a rendered thumbnail. Snapshots are immutable; the store
//! only appends, deletes, and moves a selection pointer.

use chrono::{DateTime, Utc};
use explorer_core::{CameraTransform, Rotation};
use explorer_render::Thumbnail;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique snapshot identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    /// Allocates a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A captured camera state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub thumbnail: Thumbnail,
    pub position: Vec3,
    pub rotation: Rotation,
    pub lens_id: String,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    /// Returns the captured transform.
    pub fn transform(&self) -> CameraTransform {
        CameraTransform::new(self.position, self.rotation)
    }
}

/// Ordered snapshot collection with a single selection.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: Vec<Snapshot>,
    selected: Option<SnapshotId>,
}

impl SnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new snapshot and selects it.
    pub fn capture(
        &mut self,
        thumbnail: Thumbnail,
        transform: CameraTransform,
        lens_id: &str,
    ) -> &Snapshot {
        let snapshot = Snapshot {
            id: SnapshotId::new(),
            thumbnail,
            position: transform.position,
            rotation: transform.rotation,
            lens_id: lens_id.to_string(),
            created_at: Utc::now(),
        };
        log::debug!(
            "captured snapshot #{} ({}) with lens {lens_id}",
            self.snapshots.len() + 1,
            snapshot.id
        );
        self.selected = Some(snapshot.id);
        self.snapshots.push(snapshot);
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// Moves the selection. Unknown ids are ignored.
    pub fn select(&mut self, id: SnapshotId) {
        if self.contains(id) {
            self.selected = Some(id);
        }
    }

    /// Clears the selection without deleting anything.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Removes a snapshot, returning it. Unknown ids are ignored.
    pub fn delete(&mut self, id: SnapshotId) -> Option<Snapshot> {
        let index = self.snapshots.iter().position(|s| s.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.snapshots.remove(index))
    }

    /// Removes every snapshot and the selection.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.selected = None;
    }

    /// Replaces the contents with previously stored snapshots.
    ///
    /// Snapshots are ordered by capture time; nothing is selected.
    pub fn restore(&mut self, mut snapshots: Vec<Snapshot>) {
        snapshots.sort_by_key(|s| s.created_at);
        self.snapshots = snapshots;
        self.selected = None;
    }

    /// Returns the selected snapshot.
    pub fn selected(&self) -> Option<&Snapshot> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Returns the selected snapshot id.
    pub fn selected_id(&self) -> Option<SnapshotId> {
        self.selected
    }

    /// Looks up a snapshot.
    pub fn get(&self, id: SnapshotId) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.id == id)
    }

    /// Returns whether the id is present.
    pub fn contains(&self, id: SnapshotId) -> bool {
        self.get(id).is_some()
    }

    /// One-based display number ("#1", "#2", ...) of a snapshot.
    pub fn display_number(&self, id: SnapshotId) -> Option<usize> {
        self.snapshots.iter().position(|s| s.id == id).map(|i| i + 1)
    }

    /// Iterates in capture order.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// Returns the snapshots in capture order.
    pub fn as_slice(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Returns the number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if no snapshot is stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
