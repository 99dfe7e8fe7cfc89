// crates/framecut-editor/src/interaction/transform.rs
//
// On-canvas move/resize of the selected clip's Transform.
//
//   Idle ─(box down)────→ Moving     ─(up)──→ Idle
//   Idle ─(corner down)─→ Resizing   ─(up)──→ Idle
//
// Pointer deltas arrive in display pixels and are divided by the display
// scale to get canonical pixels. Each move emits SetClipProperties with the
// clip's current properties and the recomputed transform merged in.
//
// Resizing uses one coarse heuristic for every corner: the canonical dx + dy
// sum, scaled down by 10, is added to the scale percentage. Dragging a
// top-left corner outward therefore shrinks the clip. Aspect and anchor are
// not modelled.

use uuid::Uuid;
use framecut_core::commands::EditorCommand;
use framecut_core::helpers::geometry::{overlay_box, CanvasSize, OverlayBox};
use framecut_core::properties::Transform;
use framecut_core::state::ProjectState;
use super::capture::{CaptureGuard, GestureKind, PointerCapture};
use super::PointerPos;

/// Scale percentage floor for resize gestures.
pub const MIN_SCALE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformHandle {
    Body,
    Corner(Corner),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformMode {
    Moving,
    Resizing(Corner),
}

enum TransformGesture {
    Idle,
    Active {
        mode:          TransformMode,
        clip_id:       Uuid,
        origin:        PointerPos,
        base:          Transform,
        display_scale: f64,
        _capture:      CaptureGuard,
    },
}

pub struct TransformController {
    gesture: TransformGesture,
    capture: PointerCapture,
    canvas:  CanvasSize,
}

impl TransformController {
    pub fn new(capture: PointerCapture, canvas: CanvasSize) -> Self {
        Self { gesture: TransformGesture::Idle, capture, canvas }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, TransformGesture::Idle)
    }

    pub fn mode(&self) -> Option<TransformMode> {
        match &self.gesture {
            TransformGesture::Idle                 => None,
            TransformGesture::Active { mode, .. }  => Some(*mode),
        }
    }

    /// Box to draw over the preview for the selected clip, if it has an
    /// explicit transform.
    pub fn overlay(&self, state: &ProjectState, container_width: f64) -> Option<OverlayBox> {
        let t = state.selected_clip()?.properties.transform?;
        Some(overlay_box(self.canvas, &t, self.canvas.display_scale(container_width)))
    }

    /// Start a gesture on the selected clip. Clips without an explicit
    /// transform, and clips on locked tracks, are not interactive.
    pub fn pointer_down(
        &mut self,
        handle:          TransformHandle,
        pos:             PointerPos,
        container_width: f64,
        state:           &ProjectState,
        cmd:             &mut Vec<EditorCommand>,
    ) -> bool {
        self.cancel();

        let Some(clip) = state.selected_clip() else { return false };
        let Some(base) = clip.properties.transform else { return false };
        if state.track(clip.track_id).is_some_and(|t| t.is_locked) {
            return false;
        }
        let Some(guard) = self.capture.acquire(GestureKind::Transform) else {
            return false;
        };

        cmd.push(EditorCommand::PushUndoSnapshot);
        self.gesture = TransformGesture::Active {
            mode: match handle {
                TransformHandle::Body      => TransformMode::Moving,
                TransformHandle::Corner(c) => TransformMode::Resizing(c),
            },
            clip_id:       clip.id,
            origin:        pos,
            base,
            display_scale: self.canvas.display_scale(container_width),
            _capture:      guard,
        };
        true
    }

    pub fn pointer_move(&mut self, pos: PointerPos, state: &ProjectState, cmd: &mut Vec<EditorCommand>) {
        let TransformGesture::Active { mode, clip_id, origin, base, display_scale, .. } = &self.gesture else {
            return;
        };
        let Some(clip) = state.clip(*clip_id) else { return };

        let dx = (pos.x - origin.x) / display_scale;
        let dy = (pos.y - origin.y) / display_scale;
        let mut t = *base;
        match mode {
            TransformMode::Moving => {
                t.x = base.x + dx;
                t.y = base.y + dy;
            }
            TransformMode::Resizing(_) => {
                t.scale = (base.scale + (dx + dy) / 10.0).max(MIN_SCALE);
            }
        }

        let mut properties = clip.properties.clone();
        properties.transform = Some(t);
        cmd.push(EditorCommand::SetClipProperties { id: *clip_id, properties });
    }

    pub fn pointer_up(&mut self) {
        self.cancel();
    }

    pub fn cancel(&mut self) {
        self.gesture = TransformGesture::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecut_core::properties::ClipProperties;
    use framecut_core::state::{Clip, TrackKind};

    fn selected_with_transform(t: Option<Transform>) -> (ProjectState, Uuid) {
        let mut s  = ProjectState::new(Uuid::nil());
        let track  = s.add_track(TrackKind::Video);
        let mut c  = Clip::text(track, "title", 0.0, 4.0);
        c.properties = ClipProperties { transform: t, opacity: Some(0.5), ..Default::default() };
        let id = s.insert_clip(track, c).unwrap();
        s.select_clip(Some(id));
        (s, id)
    }

    fn emitted_transform(cmd: &[EditorCommand]) -> Transform {
        match cmd.last() {
            Some(EditorCommand::SetClipProperties { properties, .. }) => properties.transform.unwrap(),
            other => panic!("expected SetClipProperties, got {other:?}"),
        }
    }

    #[test]
    fn move_divides_by_display_scale() {
        let (s, _) = selected_with_transform(Some(Transform::default()));
        let mut c   = TransformController::new(PointerCapture::new(), CanvasSize::default());
        let mut cmd = Vec::new();
        // 960 px container → display scale 0.5.
        assert!(c.pointer_down(TransformHandle::Body, PointerPos::new(100.0, 100.0), 960.0, &s, &mut cmd));
        assert_eq!(cmd, vec![EditorCommand::PushUndoSnapshot]);

        c.pointer_move(PointerPos::new(150.0, 80.0), &s, &mut cmd);
        let t = emitted_transform(&cmd);
        assert_eq!((t.x, t.y), (100.0, -40.0));
        assert_eq!(t.scale, 100.0);
    }

    #[test]
    fn move_keeps_other_properties() {
        let (s, id) = selected_with_transform(Some(Transform::default()));
        let mut c   = TransformController::new(PointerCapture::new(), CanvasSize::default());
        let mut cmd = Vec::new();
        c.pointer_down(TransformHandle::Body, PointerPos::default(), 1920.0, &s, &mut cmd);
        c.pointer_move(PointerPos::new(10.0, 0.0), &s, &mut cmd);
        match cmd.last() {
            Some(EditorCommand::SetClipProperties { id: got, properties }) => {
                assert_eq!(*got, id);
                assert_eq!(properties.opacity, Some(0.5));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn resize_grows_and_floors() {
        let (s, _) = selected_with_transform(Some(Transform::default()));
        let mut c   = TransformController::new(PointerCapture::new(), CanvasSize::default());
        let mut cmd = Vec::new();
        c.pointer_down(
            TransformHandle::Corner(Corner::BottomRight),
            PointerPos::default(), 1920.0, &s, &mut cmd,
        );
        assert_eq!(c.mode(), Some(TransformMode::Resizing(Corner::BottomRight)));

        c.pointer_move(PointerPos::new(100.0, 100.0), &s, &mut cmd);
        assert_eq!(emitted_transform(&cmd).scale, 120.0);

        c.pointer_move(PointerPos::new(-2000.0, -2000.0), &s, &mut cmd);
        assert_eq!(emitted_transform(&cmd).scale, MIN_SCALE);
    }

    #[test]
    fn clip_without_transform_is_not_interactive() {
        let (s, _) = selected_with_transform(None);
        let mut c   = TransformController::new(PointerCapture::new(), CanvasSize::default());
        let mut cmd = Vec::new();
        assert!(!c.pointer_down(TransformHandle::Body, PointerPos::default(), 960.0, &s, &mut cmd));
        assert!(c.overlay(&s, 960.0).is_none());
        assert!(cmd.is_empty());
    }

    #[test]
    fn overlay_follows_selected_transform() {
        let (s, _) = selected_with_transform(Some(Transform { x: 100.0, ..Transform::default() }));
        let c = TransformController::new(PointerCapture::new(), CanvasSize::default());
        let b = c.overlay(&s, 960.0).unwrap();
        assert_eq!(b.center_x, 530.0);
    }

    #[test]
    fn release_returns_to_idle_and_frees_capture() {
        let (s, _)  = selected_with_transform(Some(Transform::default()));
        let capture = PointerCapture::new();
        let mut c   = TransformController::new(capture.clone(), CanvasSize::default());
        let mut cmd = Vec::new();
        c.pointer_down(TransformHandle::Body, PointerPos::default(), 960.0, &s, &mut cmd);
        assert!(capture.is_held(GestureKind::Transform));
        c.pointer_up();
        assert!(c.is_idle());
        assert!(!capture.any_held());
    }
}
