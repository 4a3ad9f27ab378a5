//! Seam to the project persistence layer.
//!
//! Snapshots belong to a project and, within it, to the source image they
//! were captured on. The explorer's [`SnapshotStore`](explorer_structures::SnapshotStore)
//! is only a cache of the current source image's records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use explorer_core::{ExplorerError, Result};
use explorer_structures::{Snapshot, SnapshotId};
use serde::{Deserialize, Serialize};

use crate::session::SourceImageRef;

/// Project metadata the explorer reads and updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub id: String,
    pub name: String,
    /// Source image last explored.
    pub source_image: Option<SourceImageRef>,
    /// Snapshot chosen for frame generation.
    pub selected_snapshot: Option<SnapshotId>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectMetadata {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source_image: None,
            selected_snapshot: None,
            updated_at: Utc::now(),
        }
    }
}

/// Stores snapshots and project metadata keyed by project id.
pub trait ProjectPersistence {
    /// Loads project metadata.
    fn load_metadata(&self, project_id: &str) -> Result<ProjectMetadata>;

    /// Creates or replaces project metadata.
    fn save_metadata(&mut self, metadata: &ProjectMetadata) -> Result<()>;

    /// Loads the snapshots captured on a source image.
    fn load_snapshots(&self, project_id: &str, source: &SourceImageRef) -> Result<Vec<Snapshot>>;

    /// Stores a newly captured snapshot.
    fn save_snapshot(
        &mut self,
        project_id: &str,
        source: &SourceImageRef,
        snapshot: &Snapshot,
    ) -> Result<()>;

    /// Deletes a snapshot. Unknown ids are not an error.
    fn delete_snapshot(&mut self, project_id: &str, id: SnapshotId) -> Result<()>;
}

/// Everything stored for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub metadata: ProjectMetadata,
    /// Snapshots by source image, in capture order.
    pub snapshots: BTreeMap<String, Vec<Snapshot>>,
}

impl ProjectRecord {
    fn new(metadata: ProjectMetadata) -> Self {
        Self {
            metadata,
            snapshots: BTreeMap::new(),
        }
    }

    fn remove_snapshot(&mut self, id: SnapshotId) {
        for list in self.snapshots.values_mut() {
            list.retain(|s| s.id != id);
        }
        if self.metadata.selected_snapshot == Some(id) {
            self.metadata.selected_snapshot = None;
        }
    }
}

/// In-memory persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryProject {
    projects: BTreeMap<String, ProjectRecord>,
}

impl MemoryProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding one empty project.
    pub fn with_project(metadata: ProjectMetadata) -> Self {
        let mut store = Self::new();
        store
            .projects
            .insert(metadata.id.clone(), ProjectRecord::new(metadata));
        store
    }

    fn record(&self, project_id: &str) -> Result<&ProjectRecord> {
        self.projects
            .get(project_id)
            .ok_or_else(|| ExplorerError::ProjectNotFound(project_id.to_string()))
    }

    fn record_mut(&mut self, project_id: &str) -> Result<&mut ProjectRecord> {
        self.projects
            .get_mut(project_id)
            .ok_or_else(|| ExplorerError::ProjectNotFound(project_id.to_string()))
    }
}

impl ProjectPersistence for MemoryProject {
    fn load_metadata(&self, project_id: &str) -> Result<ProjectMetadata> {
        Ok(self.record(project_id)?.metadata.clone())
    }

    fn save_metadata(&mut self, metadata: &ProjectMetadata) -> Result<()> {
        self.projects
            .entry(metadata.id.clone())
            .and_modify(|r| r.metadata = metadata.clone())
            .or_insert_with(|| ProjectRecord::new(metadata.clone()));
        Ok(())
    }

    fn load_snapshots(&self, project_id: &str, source: &SourceImageRef) -> Result<Vec<Snapshot>> {
        Ok(self
            .record(project_id)?
            .snapshots
            .get(source.as_str())
            .cloned()
            .unwrap_or_default())
    }

    fn save_snapshot(
        &mut self,
        project_id: &str,
        source: &SourceImageRef,
        snapshot: &Snapshot,
    ) -> Result<()> {
        self.record_mut(project_id)?
            .snapshots
            .entry(source.as_str().to_string())
            .or_default()
            .push(snapshot.clone());
        Ok(())
    }

    fn delete_snapshot(&mut self, project_id: &str, id: SnapshotId) -> Result<()> {
        self.record_mut(project_id)?.remove_snapshot(id);
        Ok(())
    }
}

/// Persistence backed by one JSON file per project.
#[derive(Debug, Clone)]
pub struct JsonFileProject {
    dir: PathBuf,
}

impl JsonFileProject {
    /// Stores projects under `dir`, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        std::fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    fn path(&self, project_id: &str) -> Result<PathBuf> {
        let valid = !project_id.is_empty()
            && project_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ExplorerError::Persistence(format!(
                "invalid project id '{project_id}'"
            )));
        }
        Ok(self.dir.join(format!("{project_id}.json")))
    }

    fn read(&self, project_id: &str) -> Result<ProjectRecord> {
        let path = self.path(project_id)?;
        if !path.exists() {
            return Err(ExplorerError::ProjectNotFound(project_id.to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write(&self, record: &ProjectRecord) -> Result<()> {
        let path = self.path(&record.metadata.id)?;
        let text = serde_json::to_string_pretty(record)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

impl ProjectPersistence for JsonFileProject {
    fn load_metadata(&self, project_id: &str) -> Result<ProjectMetadata> {
        Ok(self.read(project_id)?.metadata)
    }

    fn save_metadata(&mut self, metadata: &ProjectMetadata) -> Result<()> {
        let record = match self.read(&metadata.id) {
            Ok(mut record) => {
                record.metadata = metadata.clone();
                record
            }
            Err(ExplorerError::ProjectNotFound(_)) => ProjectRecord::new(metadata.clone()),
            Err(e) => return Err(e),
        };
        self.write(&record)
    }

    fn load_snapshots(&self, project_id: &str, source: &SourceImageRef) -> Result<Vec<Snapshot>> {
        Ok(self
            .read(project_id)?
            .snapshots
            .remove(source.as_str())
            .unwrap_or_default())
    }

    fn save_snapshot(
        &mut self,
        project_id: &str,
        source: &SourceImageRef,
        snapshot: &Snapshot,
    ) -> Result<()> {
        let mut record = self.read(project_id)?;
        record
            .snapshots
            .entry(source.as_str().to_string())
            .or_default()
            .push(snapshot.clone());
        self.write(&record)
    }

    fn delete_snapshot(&mut self, project_id: &str, id: SnapshotId) -> Result<()> {
        let mut record = self.read(project_id)?;
        record.remove_snapshot(id);
        self.write(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::{CameraTransform, Vec3};
    use explorer_render::Thumbnail;
    use explorer_structures::SnapshotStore;

    fn snapshot(x: f32) -> Snapshot {
        let mut store = SnapshotStore::new();
        store
            .capture(
                Thumbnail::placeholder(),
                CameraTransform::new(Vec3::new(x, 0.0, 0.0), Default::default()),
                "50mm",
            )
            .clone()
    }

    fn exercise(persistence: &mut dyn ProjectPersistence) {
        let source = SourceImageRef::new("shot-01.jpg");
        let other = SourceImageRef::new("shot-02.jpg");
        let a = snapshot(1.0);
        let b = snapshot(2.0);

        persistence.save_snapshot("demo", &source, &a).unwrap();
        persistence.save_snapshot("demo", &source, &b).unwrap();
        assert_eq!(persistence.load_snapshots("demo", &source).unwrap().len(), 2);
        assert!(persistence.load_snapshots("demo", &other).unwrap().is_empty());

        let mut metadata = persistence.load_metadata("demo").unwrap();
        metadata.selected_snapshot = Some(a.id);
        persistence.save_metadata(&metadata).unwrap();

        persistence.delete_snapshot("demo", a.id).unwrap();
        persistence.delete_snapshot("demo", a.id).unwrap();
        let remaining = persistence.load_snapshots("demo", &source).unwrap();
        assert_eq!(remaining, vec![b]);
        assert!(persistence
            .load_metadata("demo")
            .unwrap()
            .selected_snapshot
            .is_none());

        assert!(matches!(
            persistence.load_metadata("missing"),
            Err(ExplorerError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn test_memory_project() {
        let mut store = MemoryProject::with_project(ProjectMetadata::new("demo", "Demo"));
        exercise(&mut store);
    }

    #[test]
    fn test_json_file_project() {
        let dir = std::env::temp_dir().join(format!("camera-explorer-projects-{}", std::process::id()));
        let mut store = JsonFileProject::open(&dir).unwrap();
        store
            .save_metadata(&ProjectMetadata::new("demo", "Demo"))
            .unwrap();
        exercise(&mut store);
        assert!(store.load_metadata("../etc").is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
