//! The explorer view: one reconstruction session, its camera and its snapshots.

use explorer_core::{
    CameraNavigation, CameraTransform, ExplorerError, ExplorerOptions, Result, SceneBounds,
};
use explorer_render::{encode_thumbnail, Thumbnail, ViewerCamera};
use explorer_structures::{PointCloudAsset, Snapshot, SnapshotId, SnapshotStore};
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

use crate::generation::FrameGenerationRequest;
use crate::hud::HudReadout;
use crate::input::{self, ExplorerAction, InputState};
use crate::persistence::{ProjectMetadata, ProjectPersistence};
use crate::reconstruction::{ReconstructionOutcome, ReconstructionService, ReplyQueue};
use crate::session::{ReconstructionSession, SourceImageRef, SubmissionToken};
use crate::viewer::ViewerSurface;

/// Longest frame delta fed to the movement tick.
const MAX_FRAME_SECONDS: f32 = 0.25;

struct ProjectLink {
    id: String,
    persistence: Box<dyn ProjectPersistence>,
}

/// Explorer state for one mounted view.
///
/// Owns the navigation state, the reconstruction session and the snapshot
/// cache. The viewer and the reconstruction service are passed in per call,
/// so the explorer never holds the renderer's camera.
pub struct CameraExplorer {
    options: ExplorerOptions,
    navigation: CameraNavigation,
    session: ReconstructionSession,
    snapshots: SnapshotStore,
    replies: ReplyQueue,
    input: InputState,
    tick_accumulator: f32,
    rendered: Option<CameraTransform>,
    /// Whether the viewer holds an asset loaded by this explorer.
    viewer_loaded: bool,
    project: Option<ProjectLink>,
}

impl CameraExplorer {
    /// Creates an explorer with validated options.
    pub fn new(options: ExplorerOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            navigation: CameraNavigation::new(&options),
            options,
            session: ReconstructionSession::new(),
            snapshots: SnapshotStore::new(),
            replies: ReplyQueue::new(),
            input: InputState::new(),
            tick_accumulator: 0.0,
            rendered: None,
            viewer_loaded: false,
            project: None,
        })
    }

    /// Attaches project persistence; snapshots are stored under `project_id`.
    #[must_use]
    pub fn with_project(
        mut self,
        project_id: impl Into<String>,
        persistence: Box<dyn ProjectPersistence>,
    ) -> Self {
        self.project = Some(ProjectLink {
            id: project_id.into(),
            persistence,
        });
        self
    }

    pub fn options(&self) -> &ExplorerOptions {
        &self.options
    }

    pub fn navigation(&self) -> &CameraNavigation {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut CameraNavigation {
        &mut self.navigation
    }

    pub fn session(&self) -> &ReconstructionSession {
        &self.session
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Transform the viewer reported after the last sync.
    pub fn rendered_transform(&self) -> Option<CameraTransform> {
        self.rendered
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project.as_ref().map(|p| p.id.as_str())
    }

    // ========================================================================
    // Reconstruction
    // ========================================================================

    /// Submits a source image for reconstruction.
    ///
    /// Supersedes any in-flight request and clears the bounds and snapshots
    /// derived from the previous scene. The previous asset is unloaded from
    /// the viewer on the next frame or capture.
    pub fn submit(
        &mut self,
        source: SourceImageRef,
        service: &mut dyn ReconstructionService,
    ) -> SubmissionToken {
        let token = self.session.submit(source.clone());
        self.navigation.clear_scene_bounds();
        self.snapshots.clear();

        let recorded = source.clone();
        self.update_metadata(move |m| m.source_image = Some(recorded));

        service.request(&source, self.replies.reply_for(token));
        token
    }

    /// Applies every reconstruction reply received since the last call.
    ///
    /// Returns how many replies changed the session.
    pub fn poll_reconstruction(&mut self, viewer: &mut dyn ViewerSurface) -> usize {
        let mut applied = 0;
        for (token, outcome) in self.replies.drain() {
            if self.apply_outcome(token, outcome, viewer) {
                applied += 1;
            }
        }
        applied
    }

    /// Applies one reconstruction outcome. Stale tokens are ignored.
    pub fn apply_outcome(
        &mut self,
        token: SubmissionToken,
        outcome: ReconstructionOutcome,
        viewer: &mut dyn ViewerSurface,
    ) -> bool {
        match outcome {
            Ok(asset) => self.complete(token, asset, viewer),
            Err(message) => self.session.fail(token, message),
        }
    }

    /// Completes the current submission with a finished asset.
    ///
    /// Loads the asset into the viewer, derives the navigable bounds and
    /// reloads the snapshots stored for the same source image.
    pub fn complete(
        &mut self,
        token: SubmissionToken,
        asset: PointCloudAsset,
        viewer: &mut dyn ViewerSurface,
    ) -> bool {
        if !self.session.is_current(token) {
            return self.session.complete(token, asset);
        }
        if let Err(reason) = asset.validate() {
            return self.session.fail(token, reason);
        }

        let reported = viewer.load_point_cloud(&asset);
        self.viewer_loaded = true;
        let padding = self.options.bounds_padding;
        let bounds = asset
            .scene_bounds(padding)
            .or_else(|| reported.map(|e| SceneBounds::from_extent(e.min, e.max, padding)));
        self.session.complete(token, asset);

        match bounds {
            Some(bounds) => self.navigation.record_scene_bounds(bounds),
            None => log::warn!("reconstruction has no measurable extent; movement is unbounded"),
        }
        self.reload_snapshots();
        true
    }

    /// Returns the view to idle, e.g. when navigating away.
    pub fn reset(&mut self, viewer: &mut dyn ViewerSurface) {
        self.session.reset();
        self.navigation.clear_scene_bounds();
        self.snapshots.clear();
        self.input.release_all();
        self.tick_accumulator = 0.0;
        self.rendered = None;
        self.viewer_loaded = false;
        viewer.unload();
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Advances one rendered frame.
    ///
    /// Drains reconstruction replies, runs the fixed movement tick for held
    /// keys and pushes the camera to the viewer.
    pub fn frame(&mut self, dt_seconds: f32, viewer: &mut dyn ViewerSurface) {
        self.poll_reconstruction(viewer);
        self.unload_stale_asset(viewer);

        if dt_seconds.is_finite() && dt_seconds > 0.0 {
            self.tick_accumulator += dt_seconds.min(MAX_FRAME_SECONDS);
        }
        let tick = self.options.tick_seconds();
        while self.tick_accumulator >= tick {
            self.tick_accumulator -= tick;
            self.movement_tick();
        }

        self.sync_frame(viewer);
    }

    /// Applies one tick of movement for every held direction.
    pub fn movement_tick(&mut self) {
        let speed = self.move_speed();
        for direction in self.input.held_directions() {
            self.navigation.apply_move(direction, speed);
        }
    }

    /// Drops the displayed asset once the session no longer has one.
    fn unload_stale_asset(&mut self, viewer: &mut dyn ViewerSurface) {
        if self.viewer_loaded && self.session.asset().is_none() {
            log::debug!("unloading superseded asset");
            viewer.unload();
            self.viewer_loaded = false;
        }
    }

    /// Pushes the target camera to the viewer and reads back what it rendered.
    pub fn sync_frame(&mut self, viewer: &mut dyn ViewerSurface) {
        let camera = self.viewer_camera(viewer.aspect_ratio());
        viewer.apply_camera(&camera);
        self.rendered = Some(viewer.camera_transform());
    }

    /// Camera the viewer should render with.
    pub fn viewer_camera(&self, aspect_ratio: f32) -> ViewerCamera {
        let mut camera = ViewerCamera::new(
            self.navigation.transform(),
            self.navigation.lens_id(),
            self.options.photo_alignment,
            aspect_ratio,
        );
        if let Some(bounds) = self.navigation.bounds() {
            camera.fit_clip_planes(&bounds);
        }
        camera
    }

    /// Movement per tick, scaled by the scene size when configured.
    pub fn move_speed(&self) -> f32 {
        self.options.move_speed * self.scene_scale()
    }

    /// Height change per scroll line, scaled like [`Self::move_speed`].
    pub fn height_step(&self) -> f32 {
        self.options.height_step * self.scene_scale()
    }

    fn scene_scale(&self) -> f32 {
        match self.navigation.bounds() {
            Some(bounds) if self.options.scale_speed_with_scene => bounds.diagonal(),
            _ => 1.0,
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Handles a key event from the host window.
    ///
    /// Movement keys are tracked until released; other keys act on the
    /// first press only, so OS key repeats (`repeat`) are ignored.
    /// Returns the action performed, if any.
    pub fn handle_key(
        &mut self,
        key: KeyCode,
        pressed: bool,
        repeat: bool,
        viewer: &mut dyn ViewerSurface,
    ) -> Option<ExplorerAction> {
        if self.input.set_key(key, pressed) || !pressed || repeat {
            return None;
        }
        let action = input::action_for_key(key)?;
        self.perform(action, viewer);
        Some(action)
    }

    /// Performs a discrete action.
    pub fn perform(&mut self, action: ExplorerAction, viewer: &mut dyn ViewerSurface) {
        match action {
            ExplorerAction::SelectLens(lens_id) => self.navigation.set_lens(lens_id),
            ExplorerAction::ToggleGrid => self.navigation.toggle_grid(),
            ExplorerAction::ToggleHud => self.navigation.toggle_hud(),
            ExplorerAction::ResetCamera => self.navigation.reset_to_origin(),
            ExplorerAction::CaptureSnapshot => {
                self.capture(viewer);
            }
        }
    }

    /// Starts or ends a look drag.
    pub fn handle_pointer_button(&mut self, pressed: bool) {
        self.input.set_dragging(pressed);
    }

    /// Turns the camera while dragging. Dragging right turns right, dragging
    /// up looks up.
    pub fn handle_pointer_move(&mut self, x: f64, y: f64) {
        if let Some((dx, dy)) = self.input.pointer_moved(x, y) {
            let sensitivity = self.options.look_sensitivity;
            self.navigation.apply_look(-dx * sensitivity, -dy * sensitivity);
        }
    }

    /// Raises or lowers the camera.
    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = input::scroll_lines(delta);
        self.navigation.apply_height_delta(lines * self.height_step());
    }

    /// Forgets held keys, e.g. when the host window loses focus.
    pub fn focus_lost(&mut self) {
        self.input.release_all();
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Captures the current view as a snapshot and selects it.
    ///
    /// Always succeeds: if the viewer cannot render, the snapshot gets a
    /// placeholder thumbnail.
    pub fn capture(&mut self, viewer: &mut dyn ViewerSurface) -> SnapshotId {
        self.unload_stale_asset(viewer);
        let thumbnail = match viewer.render_to_buffer() {
            Some(frame) => encode_thumbnail(frame, self.options.thumbnail_max_edge)
                .unwrap_or_else(|e| {
                    log::warn!("thumbnail encoding failed: {e}");
                    Thumbnail::placeholder()
                }),
            None => {
                log::warn!("viewer could not render a thumbnail");
                Thumbnail::placeholder()
            }
        };

        let snapshot = self
            .snapshots
            .capture(
                thumbnail,
                self.navigation.transform(),
                self.navigation.lens_id(),
            )
            .clone();
        let id = snapshot.id;

        let saved = match self.session.source_image().cloned() {
            Some(source) => self.persist("save snapshot", |p, project| {
                p.save_snapshot(project, &source, &snapshot)
            }),
            None => false,
        };
        if saved {
            self.update_metadata(move |m| m.selected_snapshot = Some(id));
        }
        id
    }

    /// Selects a snapshot. Unknown ids are ignored.
    pub fn select_snapshot(&mut self, id: SnapshotId) {
        if !self.snapshots.contains(id) {
            return;
        }
        self.snapshots.select(id);
        self.update_metadata(move |m| m.selected_snapshot = Some(id));
    }

    /// Deletes a snapshot from the tray and from persistence.
    pub fn delete_snapshot(&mut self, id: SnapshotId) -> Option<Snapshot> {
        let removed = self.snapshots.delete(id)?;
        self.persist("delete snapshot", |p, project| p.delete_snapshot(project, id));
        Some(removed)
    }

    /// Moves the camera back to a snapshot's viewpoint and lens.
    pub fn restore_snapshot(&mut self, id: SnapshotId) -> bool {
        let Some(snapshot) = self.snapshots.get(id) else {
            return false;
        };
        let transform = snapshot.transform();
        let lens_id = snapshot.lens_id.clone();
        self.navigation.set_transform(transform);
        self.navigation.set_lens(&lens_id);
        self.select_snapshot(id);
        true
    }

    /// Builds the frame generation request for the selected snapshot.
    pub fn generation_request(&self, aspect_ratio: f32) -> Option<FrameGenerationRequest> {
        let snapshot = self.snapshots.selected()?;
        let display_number = self.snapshots.display_number(snapshot.id)?;
        Some(FrameGenerationRequest::new(
            snapshot,
            display_number,
            aspect_ratio,
            self.project_id().map(str::to_string),
            self.session.source_image().cloned(),
        ))
    }

    /// HUD values, or `None` while the HUD is hidden.
    pub fn hud(&self) -> Option<HudReadout> {
        if !self.navigation.show_hud() {
            return None;
        }
        let selected = self
            .snapshots
            .selected_id()
            .and_then(|id| self.snapshots.display_number(id));
        Some(HudReadout::new(
            self.rendered.unwrap_or_else(|| self.navigation.transform()),
            self.navigation.lens_id(),
            self.session.status(),
            self.snapshots.len(),
            selected,
            self.navigation.show_grid(),
        ))
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Runs a persistence call; returns whether it was made and succeeded.
    fn persist<F>(&mut self, what: &str, f: F) -> bool
    where
        F: FnOnce(&mut dyn ProjectPersistence, &str) -> Result<()>,
    {
        let Some(link) = self.project.as_mut() else {
            return false;
        };
        match f(link.persistence.as_mut(), &link.id) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("failed to {what} for project {}: {e}", link.id);
                false
            }
        }
    }

    fn update_metadata<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ProjectMetadata),
    {
        self.persist("update metadata", |p, project| {
            let mut metadata = match p.load_metadata(project) {
                Ok(metadata) => metadata,
                Err(ExplorerError::ProjectNotFound(_)) => ProjectMetadata::new(project, project),
                Err(e) => return Err(e),
            };
            f(&mut metadata);
            metadata.updated_at = chrono::Utc::now();
            p.save_metadata(&metadata)
        });
    }

    fn reload_snapshots(&mut self) {
        let Some(source) = self.session.source_image().cloned() else {
            return;
        };
        let Some(link) = self.project.as_ref() else {
            return;
        };
        let stored = match link.persistence.load_snapshots(&link.id, &source) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("failed to load snapshots for {source}: {e}");
                return;
            }
        };
        let selected = link
            .persistence
            .load_metadata(&link.id)
            .ok()
            .and_then(|m| m.selected_snapshot);

        log::debug!("reloaded {} snapshots for {source}", stored.len());
        self.snapshots.restore(stored);
        if let Some(id) = selected {
            self.snapshots.select(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryProject;
    use crate::reconstruction::ManualReconstruction;
    use crate::viewer::HeadlessViewer;
    use explorer_core::Vec3;

    fn explorer() -> CameraExplorer {
        CameraExplorer::new(ExplorerOptions::default()).unwrap()
    }

    fn scene() -> PointCloudAsset {
        PointCloudAsset::new("scene.splat")
            .with_extent(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 3.0, 5.0))
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = ExplorerOptions {
            move_speed: f32::NAN,
            ..ExplorerOptions::default()
        };
        assert!(CameraExplorer::new(options).is_err());
    }

    #[test]
    fn test_complete_records_padded_bounds() {
        let mut explorer = explorer();
        let mut service = ManualReconstruction::new();
        let mut viewer = HeadlessViewer::default();
        let token = explorer.submit("shot.jpg".into(), &mut service);

        assert!(explorer.complete(token, scene(), &mut viewer));
        let bounds = explorer.navigation().bounds().unwrap();
        assert!((bounds.min.x + 4.0).abs() < 1e-5);
        assert!((bounds.max.y - 2.6).abs() < 1e-5);
        assert!(viewer.loaded().is_some());
    }

    #[test]
    fn test_invalid_asset_fails_session() {
        let mut explorer = explorer();
        let mut service = ManualReconstruction::new();
        let mut viewer = HeadlessViewer::default();
        let token = explorer.submit("shot.jpg".into(), &mut service);

        assert!(explorer.complete(token, PointCloudAsset::new("  "), &mut viewer));
        assert_eq!(
            explorer.session().status(),
            crate::session::ReconstructionStatus::Error
        );
        assert!(viewer.loaded().is_none());
    }

    #[test]
    fn test_held_key_moves_on_tick() {
        let mut explorer = explorer();
        let mut viewer = HeadlessViewer::default();
        explorer.handle_key(KeyCode::KeyW, true, false, &mut viewer);

        // four ticks at 60 Hz
        explorer.frame(4.0 / 60.0 + 1e-4, &mut viewer);
        let z = explorer.navigation().position().z;
        assert!((z - (0.1 - 4.0 * 0.05)).abs() < 1e-4);

        explorer.handle_key(KeyCode::KeyW, false, false, &mut viewer);
        explorer.frame(0.1, &mut viewer);
        assert!((explorer.navigation().position().z - z).abs() < 1e-6);
        assert_eq!(explorer.rendered_transform(), Some(explorer.navigation().transform()));
    }

    #[test]
    fn test_drag_and_scroll() {
        let mut explorer = explorer();
        explorer.handle_pointer_button(true);
        explorer.handle_pointer_move(100.0, 100.0);
        explorer.handle_pointer_move(110.0, 90.0);
        let rotation = explorer.navigation().rotation();
        assert!((rotation.yaw - 358.0).abs() < 1e-4);
        assert!((rotation.pitch - 2.0).abs() < 1e-4);

        explorer.handle_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        assert!((explorer.navigation().position().y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_speed_scales_with_scene() {
        let options = ExplorerOptions {
            scale_speed_with_scene: true,
            ..ExplorerOptions::default()
        };
        let mut explorer = CameraExplorer::new(options).unwrap();
        let mut service = ManualReconstruction::new();
        let mut viewer = HeadlessViewer::default();
        assert!((explorer.move_speed() - 0.05).abs() < 1e-6);

        let token = explorer.submit("shot.jpg".into(), &mut service);
        explorer.complete(token, scene(), &mut viewer);
        let diagonal = explorer.navigation().bounds().unwrap().diagonal();
        assert!((explorer.move_speed() - 0.05 * diagonal).abs() < 1e-5);
    }

    #[test]
    fn test_capture_without_render_uses_placeholder() {
        let mut explorer = explorer();
        let mut viewer = HeadlessViewer::new(0, 0);
        let id = explorer.capture(&mut viewer);
        let snapshot = explorer.snapshots().get(id).unwrap();
        assert!(snapshot.thumbnail.is_placeholder());
        assert_eq!(explorer.snapshots().selected_id(), Some(id));
    }

    #[test]
    fn test_restore_snapshot() {
        let mut explorer = explorer();
        let mut viewer = HeadlessViewer::default();
        explorer.navigation_mut().apply_look(45.0, 10.0);
        explorer.navigation_mut().set_lens("24mm");
        let id = explorer.capture(&mut viewer);

        explorer.perform(ExplorerAction::ResetCamera, &mut viewer);
        assert_eq!(explorer.navigation().lens_id(), "50mm");

        assert!(explorer.restore_snapshot(id));
        assert_eq!(explorer.navigation().lens_id(), "24mm");
        assert!((explorer.navigation().rotation().yaw - 45.0).abs() < 1e-5);
        assert!(!explorer.restore_snapshot(SnapshotId::new()));
    }

    fn with_demo_project(explorer: CameraExplorer) -> CameraExplorer {
        let metadata = ProjectMetadata::new("demo", "Demo");
        explorer.with_project("demo", Box::new(MemoryProject::with_project(metadata)))
    }

    fn stored_selection(explorer: &CameraExplorer) -> Option<SnapshotId> {
        let link = explorer.project.as_ref().unwrap();
        link.persistence.load_metadata(&link.id).unwrap().selected_snapshot
    }

    #[test]
    fn test_restore_snapshot_stores_selection() {
        let mut explorer = with_demo_project(explorer());
        let mut service = ManualReconstruction::new();
        let mut viewer = HeadlessViewer::default();
        let token = explorer.submit("shot.jpg".into(), &mut service);
        explorer.complete(token, scene(), &mut viewer);

        let a = explorer.capture(&mut viewer);
        explorer.navigation_mut().apply_look(30.0, 0.0);
        let b = explorer.capture(&mut viewer);
        assert_eq!(stored_selection(&explorer), Some(b));

        assert!(explorer.restore_snapshot(a));
        assert_eq!(explorer.snapshots().selected_id(), Some(a));
        assert_eq!(stored_selection(&explorer), Some(a));
    }

    #[test]
    fn test_unsaved_capture_leaves_stored_selection() {
        let mut explorer = with_demo_project(explorer());
        let mut viewer = HeadlessViewer::default();

        // no source image yet, so the snapshot stays in the tray only
        let id = explorer.capture(&mut viewer);
        assert_eq!(explorer.snapshots().selected_id(), Some(id));
        assert_eq!(stored_selection(&explorer), None);
    }

    #[test]
    fn test_key_repeat_ignored_for_discrete_actions() {
        let mut explorer = explorer();
        let mut viewer = HeadlessViewer::default();

        assert_eq!(explorer.handle_key(KeyCode::Space, true, true, &mut viewer), None);
        assert!(explorer.snapshots().is_empty());
        assert_eq!(explorer.handle_key(KeyCode::KeyG, true, true, &mut viewer), None);
        assert!(!explorer.navigation().show_grid());

        // held movement keys keep moving through repeats
        explorer.handle_key(KeyCode::KeyW, true, false, &mut viewer);
        explorer.handle_key(KeyCode::KeyW, true, true, &mut viewer);
        explorer.frame(1.0 / 60.0 + 1e-4, &mut viewer);
        assert!(explorer.navigation().position().z < 0.1);
    }

    #[test]
    fn test_hud_hidden_after_toggle() {
        let mut explorer = explorer();
        let mut viewer = HeadlessViewer::default();
        assert!(explorer.hud().is_some());
        assert_eq!(
            explorer.handle_key(KeyCode::KeyH, true, false, &mut viewer),
            Some(ExplorerAction::ToggleHud)
        );
        assert!(explorer.hud().is_none());
        assert_eq!(explorer.handle_key(KeyCode::KeyH, false, false, &mut viewer), None);
    }
}
