// crates/framecut-editor/src/session.rs
//
// EditorSession: the single owner of the editing model.
//
// Frame of one input event:
//   1. route the event to the controller that owns it (or that holds the
//      pointer capture); controllers read `state` and push EditorCommands
//   2. apply every pending command in order via `process_command`
//   3. if no gesture is active, flush the net change to the store
//
// Undo snapshots: discrete calls (`dispatch`, drops, add-track) snapshot
// automatically when the command actually changed the track list. Gestures
// emit one PushUndoSnapshot on entry, which parks a baseline that becomes an
// undo step at release only if the gesture changed something.

use log::{debug, info, warn};
use uuid::Uuid;
use framecut_core::commands::EditorCommand;
use framecut_core::composition::{compile_with_canvas, duration_in_frames, render_input, Composition, RenderInput};
use framecut_core::error::EditError;
use framecut_core::helpers::geometry::OverlayBox;
use framecut_core::state::{Asset, ProjectState, Track, TrackKind};
use crate::config::EditorConfig;
pub use crate::config::{MAX_ZOOM, MIN_ZOOM};
use crate::history::History;
use crate::interaction::capture::PointerCapture;
use crate::interaction::clip_drag::{ClipDragController, ClipHandle, DragPreview};
use crate::interaction::playhead::{Ruler, RulerMarker, ScrubController};
use crate::interaction::track_drop::TrackDropController;
use crate::interaction::transform::{TransformController, TransformHandle};
use crate::interaction::{PointerPos, TimelineMetrics};
use crate::store::{AssetUpload, ProjectStore};
use crate::sync::{StoreSync, SyncReport};

/// Where a batch of commands came from. Gesture batches never auto-snapshot.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Origin {
    Discrete,
    Gesture,
}

pub struct EditorSession<S: ProjectStore> {
    state:      ProjectState,
    config:     EditorConfig,
    store:      S,
    sync:       StoreSync,
    history:    History,
    capture:    PointerCapture,
    clip_drag:  ClipDragController,
    track_drop: TrackDropController,
    transform:  TransformController,
    scrub:      ScrubController,
    /// Commands emitted by controllers during the current event.
    pending:    Vec<EditorCommand>,
}

impl<S: ProjectStore> EditorSession<S> {
    /// Empty session. Nothing is fetched; see `open`.
    pub fn new(project_id: Uuid, config: EditorConfig, store: S) -> Self {
        let config    = config.sanitized();
        let mut state = ProjectState::new(project_id);
        state.pixels_per_second = config.pixels_per_second;
        let capture = PointerCapture::new();
        Self {
            state,
            sync:       StoreSync::new(Vec::new()),
            history:    History::new(config.history_depth),
            clip_drag:  ClipDragController::new(capture.clone()),
            track_drop: TrackDropController::new(),
            transform:  TransformController::new(capture.clone(), config.canvas()),
            scrub:      ScrubController::new(capture.clone()),
            capture,
            config,
            store,
            pending:    Vec::new(),
        }
    }

    /// Session populated from the store's tracks and assets.
    pub fn open(project_id: Uuid, config: EditorConfig, store: S) -> Self {
        let mut session = Self::new(project_id, config, store);
        session.load_project();
        session
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn state(&self) -> &ProjectState { &self.state }
    pub fn config(&self) -> &EditorConfig { &self.config }
    pub fn store(&self) -> &S { &self.store }
    pub fn store_mut(&mut self) -> &mut S { &mut self.store }

    pub fn can_undo(&self) -> bool { self.history.undo_len() > 0 }
    pub fn can_redo(&self) -> bool { self.history.redo_len() > 0 }

    /// True while any pointer gesture holds the capture.
    pub fn gesture_active(&self) -> bool {
        self.capture.any_held()
    }

    /// True when the model has changes the store has not been sent.
    pub fn is_dirty(&self) -> bool {
        self.sync.is_dirty(&self.state.tracks)
    }

    pub fn drag_preview(&self) -> Option<&DragPreview> {
        self.clip_drag.preview()
    }

    pub fn hovered_track(&self) -> Option<Uuid> {
        self.track_drop.hovered()
    }

    pub fn transform_overlay(&self, container_width: f64) -> Option<OverlayBox> {
        self.transform.overlay(&self.state, container_width)
    }

    pub fn ruler(&self) -> Ruler {
        Ruler {
            header_width:      self.config.track_header_width,
            pixels_per_second: self.state.pixels_per_second,
            fps:               self.config.fps,
        }
    }

    /// Ruler ticks covering the composition, never less than its 10 s floor.
    pub fn ruler_markers(&self) -> Vec<RulerMarker> {
        self.ruler().markers(self.timeline_end())
    }

    /// End of the composition in seconds, including its 10 s floor.
    pub fn timeline_end(&self) -> f64 {
        duration_in_frames(&self.state.tracks, self.config.fps) as f64 / self.config.fps
    }

    fn metrics(&self) -> TimelineMetrics {
        TimelineMetrics {
            pixels_per_second: self.state.pixels_per_second,
            track_height:      self.config.track_height,
        }
    }

    // ── Composition ──────────────────────────────────────────────────────────

    pub fn composition(&self) -> Composition {
        compile_with_canvas(&self.state.tracks, self.config.fps, self.config.canvas())
    }

    pub fn render_input(&self) -> RenderInput<'_> {
        render_input(&self.state.tracks, self.config.fps, self.config.canvas())
    }

    // ── Store-backed loading ─────────────────────────────────────────────────

    /// Replace tracks with the store's copy. A fetch failure leaves an empty
    /// timeline. History is reset.
    pub fn load_project(&mut self) -> usize {
        self.cancel_gestures();
        let fetched = match self.store.fetch_tracks(self.state.project_id) {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!("[load] fetching tracks failed: {e}");
                Vec::new()
            }
        };
        self.sync.reset(fetched.clone());
        self.state.tracks = fetched;
        self.state.normalize_order();
        self.state.select_clip(None);
        self.history = History::new(self.config.history_depth);
        self.load_assets();
        self.flush();
        info!("[load] project {} with {} tracks", self.state.project_id, self.state.tracks.len());
        self.state.tracks.len()
    }

    /// Refresh the asset library. A failure yields an empty library.
    pub fn load_assets(&mut self) -> &[Asset] {
        self.state.assets = match self.store.fetch_assets(self.state.project_id) {
            Ok(assets) => assets,
            Err(e) => {
                warn!("[assets] fetch failed: {e}");
                Vec::new()
            }
        };
        &self.state.assets
    }

    /// Upload and add to the library. None on failure.
    pub fn upload_asset(&mut self, upload: &AssetUpload) -> Option<Asset> {
        match self.store.upload_asset(upload, self.state.project_id) {
            Ok(asset) => {
                self.state.add_asset(asset.clone());
                Some(asset)
            }
            Err(e) => {
                warn!("[assets] upload of {} failed: {e}", upload.file_name);
                None
            }
        }
    }

    /// Remove from the library and the store. Clips keep their copy.
    pub fn remove_asset(&mut self, id: Uuid) -> bool {
        if let Err(e) = self.store.delete_asset(id) {
            warn!("[assets] delete of {id} failed: {e}");
        }
        self.state.remove_asset(id).is_some()
    }

    // ── Discrete commands ────────────────────────────────────────────────────

    pub fn dispatch(&mut self, cmd: EditorCommand) {
        self.run(vec![cmd], Origin::Discrete);
    }

    pub fn add_track(&mut self, kind: TrackKind) -> Option<Uuid> {
        let before = self.state.tracks.len();
        self.track_drop.add_track(kind, &mut self.pending);
        self.run_pending(Origin::Discrete);
        self.state.tracks.get(before).map(|t| t.id)
    }

    /// Advance playback by `dt` seconds. Stops at the end of the composition.
    pub fn tick(&mut self, dt: f64) {
        if !self.state.is_playing {
            return;
        }
        let total = self.timeline_end();
        self.state.current_time += dt.max(0.0);
        if self.state.current_time >= total {
            self.state.current_time = total;
            self.state.is_playing   = false;
        }
    }

    /// Send the net change since the last flush. No-op during a gesture.
    pub fn flush(&mut self) -> SyncReport {
        if self.gesture_active() {
            return SyncReport::default();
        }
        self.sync.flush(&self.state.tracks, &mut self.store)
    }

    // ── Pointer routing ──────────────────────────────────────────────────────

    /// Pointer down on a timeline clip (body or edge).
    pub fn clip_pointer_down(&mut self, clip_id: Uuid, handle: ClipHandle, pos: PointerPos) -> bool {
        let started = self.clip_drag.pointer_down(clip_id, handle, pos, &self.state, &mut self.pending);
        self.run_pending(Origin::Gesture);
        started
    }

    /// Pointer down on the preview overlay of the selected clip.
    pub fn preview_pointer_down(&mut self, handle: TransformHandle, pos: PointerPos, container_width: f64) -> bool {
        let started = self.transform.pointer_down(handle, pos, container_width, &self.state, &mut self.pending);
        self.run_pending(Origin::Gesture);
        started
    }

    /// Pointer down on the ruler: seek, then scrub while held.
    pub fn ruler_pointer_down(&mut self, x: f64) {
        let ruler = self.ruler();
        self.scrub.pointer_down(x, &ruler, &mut self.pending);
        self.run_pending(Origin::Gesture);
    }

    /// Global pointer move, delivered to whichever gestures hold the capture.
    pub fn pointer_move(&mut self, pos: PointerPos) {
        let metrics = self.metrics();
        let ruler   = self.ruler();
        self.clip_drag.pointer_move(pos, metrics, &self.state, &mut self.pending);
        self.transform.pointer_move(pos, &self.state, &mut self.pending);
        self.scrub.pointer_move(pos.x, &ruler, &mut self.pending);
        self.run_pending(Origin::Gesture);
    }

    /// Global pointer release: ends every active gesture.
    pub fn pointer_up(&mut self) {
        let was_active = self.gesture_active();
        self.clip_drag.pointer_up(&self.state, &mut self.pending);
        self.transform.pointer_up();
        self.scrub.pointer_up();
        self.run_pending(Origin::Gesture);
        if was_active {
            if self.history.end_gesture(&self.state.tracks) {
                debug!("[history] gesture recorded as one undo step");
            }
            self.flush();
        }
    }

    pub fn track_drag_enter(&mut self, track_id: Uuid) {
        self.track_drop.drag_enter(track_id);
    }

    pub fn track_drag_leave(&mut self, track_id: Uuid) {
        self.track_drop.drag_leave(track_id);
    }

    /// Library item dropped on a track lane. `pixel_x` is relative to the
    /// lane's content area.
    pub fn drop_on_track(&mut self, track_id: Uuid, payload: &str, pixel_x: f64) -> bool {
        let pps     = self.state.pixels_per_second;
        let dropped = self.track_drop.drop_payload(track_id, payload, pixel_x, pps, &mut self.pending);
        self.run_pending(Origin::Discrete);
        dropped
    }

    fn cancel_gestures(&mut self) {
        self.clip_drag.cancel();
        self.transform.cancel();
        self.scrub.pointer_up();
    }

    // ── Command application ──────────────────────────────────────────────────

    fn run_pending(&mut self, origin: Origin) {
        let cmds = std::mem::take(&mut self.pending);
        self.run(cmds, origin);
    }

    fn run(&mut self, cmds: Vec<EditorCommand>, origin: Origin) {
        if cmds.is_empty() {
            return;
        }
        for cmd in cmds {
            let snapshot = (origin == Origin::Discrete && cmd.edits_timeline())
                .then(|| self.state.tracks.clone());
            match self.process_command(cmd) {
                Ok(()) => {
                    if let Some(before) = snapshot {
                        if before != self.state.tracks {
                            self.history.push(before);
                        }
                    }
                }
                Err(e) => debug!("[edit] rejected: {e}"),
            }
        }
        self.flush();
    }

    fn process_command(&mut self, cmd: EditorCommand) -> Result<(), EditError> {
        match cmd {
            // ── Playback ─────────────────────────────────────────────────────
            EditorCommand::SetPlayhead(t) => {
                self.state.current_time = t.max(0.0);
            }
            EditorCommand::Play => {
                let total = self.timeline_end();
                if self.state.current_time >= total - 0.1 {
                    self.state.current_time = 0.0;
                }
                self.state.is_playing = true;
            }
            EditorCommand::Pause => {
                self.state.is_playing = false;
            }
            EditorCommand::Stop => {
                self.state.is_playing   = false;
                self.state.current_time = 0.0;
            }

            // ── Assets ───────────────────────────────────────────────────────
            EditorCommand::AddAsset(asset) => {
                self.state.add_asset(asset);
            }
            EditorCommand::RemoveAsset(id) => {
                self.remove_asset(id);
            }

            // ── Tracks ───────────────────────────────────────────────────────
            EditorCommand::AddTrack(kind) => {
                let id = self.state.add_track(kind);
                debug!("[edit] added {} track {id}", kind.label());
            }
            EditorCommand::DeleteTrack(id) => {
                let track = self.state.delete_track(id)?;
                debug!("[edit] deleted track {id} with {} clips", track.clips.len());
            }
            EditorCommand::SetTrackMuted { id, muted } => {
                self.state.set_track_muted(id, muted)?;
            }
            EditorCommand::SetTrackLocked { id, locked } => {
                self.state.set_track_locked(id, locked)?;
            }
            EditorCommand::RenameTrack { id, name } => {
                self.state.rename_track(id, name)?;
            }

            // ── Clips ────────────────────────────────────────────────────────
            EditorCommand::DropAsset { asset, track_id, at_time } => {
                let fallback = self.config.default_clip_duration;
                self.state.add_clip_from_asset(track_id, &asset, at_time, fallback)?;
            }
            EditorCommand::InsertClip { track_id, clip } => {
                self.state.insert_clip(track_id, clip)?;
            }
            EditorCommand::DeleteClip(id) => {
                self.state.delete_clip(id)?;
            }
            EditorCommand::SelectClip(id) => {
                self.state.select_clip(id);
            }
            EditorCommand::MoveClip { id, new_start } => {
                self.state.move_clip(id, new_start)?;
            }
            EditorCommand::MoveClipToTrack { id, track_id, new_start } => {
                self.state.move_clip_to_track(id, track_id, new_start)?;
            }
            EditorCommand::TrimClipStart { id, new_start, new_duration, new_offset } => {
                self.state.trim_clip_start(id, new_start, new_duration, new_offset)?;
            }
            EditorCommand::TrimClipEnd { id, new_duration } => {
                self.state.trim_clip_end(id, new_duration)?;
            }
            EditorCommand::SetClipProperties { id, properties } => {
                self.state.set_clip_properties(id, properties)?;
            }

            // ── History ──────────────────────────────────────────────────────
            EditorCommand::PushUndoSnapshot => {
                let snapshot = self.state.tracks.clone();
                if self.gesture_active() {
                    self.history.begin_gesture(snapshot);
                } else {
                    self.history.push(snapshot);
                }
            }
            EditorCommand::Undo => {
                if self.gesture_active() {
                    return Ok(());
                }
                let current = self.state.tracks.clone();
                if let Some(prev) = self.history.undo(current) {
                    self.restore(prev);
                }
            }
            EditorCommand::Redo => {
                if self.gesture_active() {
                    return Ok(());
                }
                let current = self.state.tracks.clone();
                if let Some(next) = self.history.redo(current) {
                    self.restore(next);
                }
            }

            // ── View ─────────────────────────────────────────────────────────
            EditorCommand::SetZoom(pps) => {
                if pps.is_finite() {
                    self.state.pixels_per_second = pps.clamp(MIN_ZOOM, MAX_ZOOM);
                }
            }
        }
        Ok(())
    }

    fn restore(&mut self, tracks: Vec<Track>) {
        self.state.tracks = tracks;
        let selected = self.state.selected_clip_id;
        self.state.select_clip(selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreCall};
    use framecut_core::state::Clip;

    fn session() -> EditorSession<MemoryStore> {
        EditorSession::new(Uuid::nil(), EditorConfig::default(), MemoryStore::new())
    }

    #[test]
    fn discrete_edit_snapshots_and_flushes() {
        let mut s = session();
        let t = s.add_track(TrackKind::Video).unwrap();
        assert!(s.can_undo());
        assert_eq!(s.store().calls, vec![StoreCall::CreateTrack(t)]);
        assert!(!s.is_dirty());
    }

    #[test]
    fn rejected_command_leaves_no_undo_step() {
        let mut s = session();
        s.dispatch(EditorCommand::DeleteTrack(Uuid::new_v4()));
        assert!(!s.can_undo());
        assert!(s.store().calls.is_empty());
    }

    #[test]
    fn undo_redo_are_synced() {
        let mut s = session();
        let t = s.add_track(TrackKind::Text).unwrap();
        s.dispatch(EditorCommand::InsertClip { track_id: t, clip: Clip::text(t, "hi", 0.0, 2.0) });
        assert_eq!(s.store().clip_count(), 1);

        s.dispatch(EditorCommand::Undo);
        assert!(s.state().tracks[0].clips.is_empty());
        assert_eq!(s.store().clip_count(), 0);

        s.dispatch(EditorCommand::Redo);
        assert_eq!(s.state().tracks[0].clips.len(), 1);
        assert_eq!(s.store().clip_count(), 1);
    }

    #[test]
    fn play_from_the_end_restarts() {
        let mut s = session();
        let t = s.add_track(TrackKind::Text).unwrap();
        s.dispatch(EditorCommand::InsertClip { track_id: t, clip: Clip::text(t, "hi", 0.0, 12.0) });
        s.dispatch(EditorCommand::SetPlayhead(12.0));
        s.dispatch(EditorCommand::Play);
        assert_eq!(s.state().current_time, 0.0);
        assert!(s.state().is_playing);

        s.tick(20.0);
        assert_eq!(s.state().current_time, 12.0);
        assert!(!s.state().is_playing);
    }

    #[test]
    fn playback_runs_to_the_ten_second_floor() {
        let mut s = session();
        let t = s.add_track(TrackKind::Text).unwrap();
        s.dispatch(EditorCommand::InsertClip { track_id: t, clip: Clip::text(t, "hi", 0.0, 2.0) });
        s.dispatch(EditorCommand::Play);

        s.tick(3.0);
        assert_eq!(s.state().current_time, 3.0);
        assert!(s.state().is_playing);

        s.tick(30.0);
        assert_eq!(s.state().current_time, 10.0);
        assert!(!s.state().is_playing);
        assert_eq!(s.timeline_end(), 10.0);
    }

    #[test]
    fn click_after_undo_keeps_redo() {
        let mut s = session();
        let t = s.add_track(TrackKind::Text).unwrap();
        let clip = Clip::text(t, "hi", 0.0, 2.0);
        let id   = clip.id;
        s.dispatch(EditorCommand::InsertClip { track_id: t, clip });
        s.dispatch(EditorCommand::MoveClip { id, new_start: 4.0 });
        s.dispatch(EditorCommand::Undo);
        assert!(s.can_redo());

        assert!(s.clip_pointer_down(id, ClipHandle::Body, PointerPos::new(0.0, 0.0)));
        s.pointer_up();
        assert!(s.can_redo());
        assert_eq!(s.state().selected_clip_id, Some(id));

        s.dispatch(EditorCommand::Redo);
        assert_eq!(s.state().clip(id).unwrap().start_time, 4.0);
    }

    #[test]
    fn drag_after_undo_replaces_redo() {
        let mut s = session();
        let t = s.add_track(TrackKind::Text).unwrap();
        let clip = Clip::text(t, "hi", 0.0, 2.0);
        let id   = clip.id;
        s.dispatch(EditorCommand::InsertClip { track_id: t, clip });
        s.dispatch(EditorCommand::MoveClip { id, new_start: 4.0 });
        s.dispatch(EditorCommand::Undo);

        s.clip_pointer_down(id, ClipHandle::Body, PointerPos::new(0.0, 0.0));
        s.pointer_move(PointerPos::new(30.0, 0.0));
        s.pointer_up();
        assert_eq!(s.state().clip(id).unwrap().start_time, 1.0);
        assert!(!s.can_redo());

        s.dispatch(EditorCommand::Undo);
        assert_eq!(s.state().clip(id).unwrap().start_time, 0.0);
    }

    #[test]
    fn zero_zoom_config_is_clamped() {
        let config = EditorConfig { pixels_per_second: 0.0, ..EditorConfig::default() };
        let mut s  = EditorSession::new(Uuid::nil(), config, MemoryStore::new());
        assert_eq!(s.state().pixels_per_second, MIN_ZOOM);
        assert_eq!(s.config().pixels_per_second, MIN_ZOOM);

        let t = s.add_track(TrackKind::Text).unwrap();
        let clip = Clip::text(t, "hi", 0.0, 2.0);
        let id   = clip.id;
        s.dispatch(EditorCommand::InsertClip { track_id: t, clip });
        s.clip_pointer_down(id, ClipHandle::Body, PointerPos::new(0.0, 0.0));
        s.pointer_move(PointerPos::new(10.0, 0.0));
        s.pointer_up();
        assert_eq!(s.state().clip(id).unwrap().start_time, 10.0);
        assert!(s.state().violations().is_empty());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut s = session();
        s.dispatch(EditorCommand::SetZoom(0.0));
        assert_eq!(s.state().pixels_per_second, MIN_ZOOM);
        s.dispatch(EditorCommand::SetZoom(f64::NAN));
        assert_eq!(s.state().pixels_per_second, MIN_ZOOM);
    }

    #[test]
    fn ruler_covers_at_least_ten_seconds() {
        let s = session();
        let markers = s.ruler_markers();
        assert_eq!(markers.len(), 11);
        assert_eq!(markers[0].x, 160.0);
    }
}
