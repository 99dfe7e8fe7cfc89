// crates/framecut-editor/src/interaction/track_drop.rs
//
// Library → track drops and the "add track" buttons.
//
// The drag source serialises the Asset as JSON into the drop payload. A
// payload that is empty or does not parse as an Asset is ignored. Drops are
// not overlap-checked: the clip lands where the pointer released.

use log::warn;
use uuid::Uuid;
use framecut_core::commands::EditorCommand;
use framecut_core::state::{Asset, TrackKind};

/// Decode a drop payload. Bad payloads are logged and yield None.
pub fn parse_drop_payload(payload: &str) -> Option<Asset> {
    if payload.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Asset>(payload) {
        Ok(asset) => Some(asset),
        Err(e) => {
            warn!("[drop] ignoring malformed asset payload: {e}");
            None
        }
    }
}

/// Pixel offset inside a track's content area → timeline seconds, ≥ 0.
///
/// ```
/// use framecut_editor::interaction::track_drop::drop_time;
/// assert_eq!(drop_time(150.0, 30.0), 5.0);
/// assert_eq!(drop_time(-20.0, 30.0), 0.0);
/// ```
pub fn drop_time(pixel_x: f64, pixels_per_second: f64) -> f64 {
    if pixels_per_second <= 0.0 {
        return 0.0;
    }
    (pixel_x / pixels_per_second).max(0.0)
}

/// Tracks which lane, if any, is under an in-flight library drag so the
/// renderer can highlight it.
#[derive(Debug, Default)]
pub struct TrackDropController {
    hovered: Option<Uuid>,
}

impl TrackDropController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_enter(&mut self, track_id: Uuid) {
        self.hovered = Some(track_id);
    }

    pub fn drag_leave(&mut self, track_id: Uuid) {
        if self.hovered == Some(track_id) {
            self.hovered = None;
        }
    }

    pub fn hovered(&self) -> Option<Uuid> {
        self.hovered
    }

    /// Handle a drop on `track_id`. Returns true if a DropAsset was emitted.
    pub fn drop_payload(
        &mut self,
        track_id:          Uuid,
        payload:           &str,
        pixel_x:           f64,
        pixels_per_second: f64,
        cmd:               &mut Vec<EditorCommand>,
    ) -> bool {
        self.hovered = None;
        let Some(asset) = parse_drop_payload(payload) else {
            return false;
        };
        cmd.push(EditorCommand::DropAsset {
            asset,
            track_id,
            at_time: drop_time(pixel_x, pixels_per_second),
        });
        true
    }

    pub fn add_track(&self, kind: TrackKind, cmd: &mut Vec<EditorCommand>) {
        cmd.push(EditorCommand::AddTrack(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use chrono::Utc;
    use framecut_core::state::AssetKind;

    fn asset() -> Asset {
        Asset {
            id:         Uuid::new_v4(),
            project_id: Uuid::nil(),
            name:       "beach.mp4".into(),
            kind:       AssetKind::Video,
            url:        "memory://beach.mp4".into(),
            duration:   8.0,
            metadata:   BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn drop_emits_clip_at_pointer_time() {
        let a     = asset();
        let track = Uuid::new_v4();
        let json  = serde_json::to_string(&a).unwrap();
        let mut c   = TrackDropController::new();
        let mut cmd = Vec::new();
        c.drag_enter(track);

        assert!(c.drop_payload(track, &json, 90.0, 30.0, &mut cmd));
        assert_eq!(cmd, vec![EditorCommand::DropAsset { asset: a, track_id: track, at_time: 3.0 }]);
        assert_eq!(c.hovered(), None);
    }

    #[test]
    fn malformed_or_empty_payload_is_ignored() {
        let mut c   = TrackDropController::new();
        let mut cmd = Vec::new();
        assert!(!c.drop_payload(Uuid::nil(), "", 10.0, 30.0, &mut cmd));
        assert!(!c.drop_payload(Uuid::nil(), "{\"id\": 3}", 10.0, 30.0, &mut cmd));
        assert!(cmd.is_empty());
    }

    #[test]
    fn leave_only_clears_the_matching_lane() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut c  = TrackDropController::new();
        c.drag_enter(a);
        c.drag_leave(b);
        assert_eq!(c.hovered(), Some(a));
        c.drag_leave(a);
        assert_eq!(c.hovered(), None);
    }
}
