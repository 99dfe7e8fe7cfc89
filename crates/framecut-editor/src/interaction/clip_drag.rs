// crates/framecut-editor/src/interaction/clip_drag.rs
//
// Move / left-trim / right-trim gestures on a timeline clip.
//
//   Idle ─(body down)──→ Dragging      ─(up)──→ Idle
//   Idle ─(left edge)──→ ResizingLeft  ─(up)──→ Idle
//   Idle ─(right edge)─→ ResizingRight ─(up)──→ Idle
//
// Baseline (pointer origin, start, duration, offset, track index) is frozen
// at pointer-down. Each move recomputes the candidate from the baseline and
// the total pointer delta, snaps it to the grid and commits it immediately
// when it does not overlap a sibling. An invalid candidate emits nothing, so
// the clip stays at its last valid position.
//
// Vertical drag only previews a track change. The cross-track relocation is
// resolved once, on release, against the target track.

use log::debug;
use uuid::Uuid;
use framecut_core::commands::EditorCommand;
use framecut_core::helpers::grid::{overlaps, snap, MIN_DURATION};
use framecut_core::state::ProjectState;
use super::capture::{CaptureGuard, GestureKind, PointerCapture};
use super::{PointerPos, TimelineMetrics};

/// Which part of the clip the pointer went down on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipHandle {
    Body,
    LeftEdge,
    RightEdge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Dragging,
    ResizingLeft,
    ResizingRight,
}

impl From<ClipHandle> for DragMode {
    fn from(h: ClipHandle) -> Self {
        match h {
            ClipHandle::Body      => DragMode::Dragging,
            ClipHandle::LeftEdge  => DragMode::ResizingLeft,
            ClipHandle::RightEdge => DragMode::ResizingRight,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragBaseline {
    pointer:     PointerPos,
    start_time:  f64,
    duration:    f64,
    offset:      f64,
    track_index: usize,
}

/// What the renderer draws while a drag is live: the candidate start and the
/// pending track offset (0 = same track).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragPreview {
    pub clip_id:      Uuid,
    pub start_time:   f64,
    pub track_offset: i64,
}

enum ClipGesture {
    Idle,
    Active {
        mode:     DragMode,
        clip_id:  Uuid,
        baseline: DragBaseline,
        preview:  DragPreview,
        _capture: CaptureGuard,
    },
}

pub struct ClipDragController {
    gesture: ClipGesture,
    capture: PointerCapture,
}

impl ClipDragController {
    pub fn new(capture: PointerCapture) -> Self {
        Self { gesture: ClipGesture::Idle, capture }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, ClipGesture::Idle)
    }

    pub fn mode(&self) -> Option<DragMode> {
        match &self.gesture {
            ClipGesture::Idle              => None,
            ClipGesture::Active { mode, .. } => Some(*mode),
        }
    }

    pub fn preview(&self) -> Option<&DragPreview> {
        match &self.gesture {
            ClipGesture::Idle                 => None,
            ClipGesture::Active { preview, .. } => Some(preview),
        }
    }

    /// Enter a gesture on `clip_id`. Returns false (and stays Idle) when the
    /// clip is unknown or sits on a locked track.
    pub fn pointer_down(
        &mut self,
        clip_id: Uuid,
        handle:  ClipHandle,
        pos:     PointerPos,
        state:   &ProjectState,
        cmd:     &mut Vec<EditorCommand>,
    ) -> bool {
        // A new gesture supersedes any live one.
        self.cancel();

        let Some((ti, ci)) = state.clip_location(clip_id) else {
            return false;
        };
        let track = &state.tracks[ti];
        if track.is_locked {
            debug!("[drag] clip {clip_id} is on locked track {}", track.id);
            return false;
        }
        let Some(guard) = self.capture.acquire(GestureKind::ClipEdit) else {
            return false;
        };

        let clip = &track.clips[ci];
        let mode = DragMode::from(handle);
        let baseline = DragBaseline {
            pointer:     pos,
            start_time:  clip.start_time,
            duration:    clip.duration,
            offset:      clip.offset,
            track_index: ti,
        };

        cmd.push(EditorCommand::PushUndoSnapshot);
        if mode == DragMode::Dragging {
            cmd.push(EditorCommand::SelectClip(Some(clip_id)));
        }

        self.gesture = ClipGesture::Active {
            mode,
            clip_id,
            baseline,
            preview: DragPreview { clip_id, start_time: clip.start_time, track_offset: 0 },
            _capture: guard,
        };
        true
    }

    pub fn pointer_move(
        &mut self,
        pos:     PointerPos,
        metrics: TimelineMetrics,
        state:   &ProjectState,
        cmd:     &mut Vec<EditorCommand>,
    ) {
        let ClipGesture::Active { mode, clip_id, baseline, preview, .. } = &mut self.gesture else {
            return;
        };
        let clip_id = *clip_id;
        let Some((ti, _)) = state.clip_location(clip_id) else {
            return;
        };
        let siblings = &state.tracks[ti].clips;
        let delta_t  = (pos.x - baseline.pointer.x) / metrics.pixels_per_second;
        if !delta_t.is_finite() {
            return;
        }

        match mode {
            DragMode::Dragging => {
                let candidate    = snap(baseline.start_time + delta_t).max(0.0);
                let track_offset = if metrics.track_height > 0.0 {
                    ((pos.y - baseline.pointer.y) / metrics.track_height).round() as i64
                } else {
                    0
                };
                preview.start_time   = candidate;
                preview.track_offset = track_offset;

                if track_offset == 0
                    && !overlaps(candidate, baseline.duration, siblings, Some(clip_id))
                {
                    cmd.push(EditorCommand::MoveClip { id: clip_id, new_start: candidate });
                }
            }
            DragMode::ResizingLeft => {
                let new_start    = snap(baseline.start_time + delta_t).max(0.0);
                let shift        = new_start - baseline.start_time;
                let new_duration = baseline.duration - shift;
                let new_offset   = (baseline.offset + shift).max(0.0);
                preview.start_time = new_start;

                if new_duration >= MIN_DURATION
                    && !overlaps(new_start, new_duration, siblings, Some(clip_id))
                {
                    cmd.push(EditorCommand::TrimClipStart {
                        id: clip_id,
                        new_start,
                        new_duration,
                        new_offset,
                    });
                }
            }
            DragMode::ResizingRight => {
                let new_duration = snap(baseline.duration + delta_t).max(MIN_DURATION);
                if !overlaps(baseline.start_time, new_duration, siblings, Some(clip_id)) {
                    cmd.push(EditorCommand::TrimClipEnd { id: clip_id, new_duration });
                }
            }
        }
    }

    /// End the gesture. A pending vertical offset is resolved here: the clip
    /// moves to the target track only when that track exists and the last
    /// candidate interval is free on it.
    pub fn pointer_up(&mut self, state: &ProjectState, cmd: &mut Vec<EditorCommand>) {
        let gesture = std::mem::replace(&mut self.gesture, ClipGesture::Idle);
        let ClipGesture::Active { mode, clip_id, baseline, preview, .. } = gesture else {
            return;
        };
        if mode != DragMode::Dragging || preview.track_offset == 0 {
            return;
        }

        let track = match state.track_at_offset(baseline.track_index, preview.track_offset) {
            Ok(track) => track,
            Err(e) => {
                debug!("[drag] clip {clip_id} stays put: {e}");
                return;
            }
        };
        if overlaps(preview.start_time, baseline.duration, &track.clips, Some(clip_id)) {
            debug!("[drag] clip {clip_id} would overlap on track {}", track.id);
            return;
        }
        cmd.push(EditorCommand::MoveClipToTrack {
            id:        clip_id,
            track_id:  track.id,
            new_start: preview.start_time,
        });
    }

    /// Drop back to Idle without resolving a pending track change. Moves
    /// already committed during the gesture stay.
    pub fn cancel(&mut self) {
        self.gesture = ClipGesture::Idle;
    }
}
