// crates/framecut-editor/src/sync.rs
//
// Optimistic forwarding of model changes to the storage collaborator.
//
// Policy: last writer wins, no rollback. The in-memory model is always the
// source of truth for the running editor. A failed write is logged and
// forgotten: the synced baseline still advances, so the store may drift
// from the model until the same rows are written again.
//
// Write order per flush:
//   create tracks → update tracks → upsert new clips → update clips
//   → delete clips → delete tracks
// so a clip never references a track the store has not seen yet and a
// track is never deleted while the flush still needs it.

use std::collections::HashMap;
use log::{debug, warn};
use uuid::Uuid;
use framecut_core::diff::diff_tracks;
use framecut_core::state::{Clip, Track};
use crate::store::{ClipPatch, ProjectStore, StoreError, TrackPatch};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub written: usize,
    pub failed:  usize,
}

pub struct StoreSync {
    /// The track list as of the last flush.
    baseline: Vec<Track>,
}

impl StoreSync {
    pub fn new(baseline: Vec<Track>) -> Self {
        Self { baseline }
    }

    /// Replace the baseline without writing anything (after a fresh load).
    pub fn reset(&mut self, baseline: Vec<Track>) {
        self.baseline = baseline;
    }

    pub fn is_dirty(&self, current: &[Track]) -> bool {
        self.baseline.as_slice() != current
    }

    pub fn flush(&mut self, current: &[Track], store: &mut dyn ProjectStore) -> SyncReport {
        let diff = diff_tracks(&self.baseline, current);
        let mut report = SyncReport::default();
        if diff.is_empty() {
            return report;
        }

        let old_tracks: HashMap<Uuid, &Track> = self.baseline.iter().map(|t| (t.id, t)).collect();
        let old_clips:  HashMap<Uuid, &Clip>  = self.baseline.iter()
            .flat_map(|t| t.clips.iter())
            .map(|c| (c.id, c))
            .collect();

        let mut record = |what: &str, id: Uuid, r: Result<(), StoreError>| match r {
            Ok(())  => report.written += 1,
            Err(e)  => {
                report.failed += 1;
                warn!("[sync] {what} {id} failed: {e}");
            }
        };

        for t in &diff.created_tracks {
            record("create track", t.id, store.create_track(t).map(|_| ()));
        }
        for t in &diff.updated_tracks {
            let patch = old_tracks.get(&t.id)
                .map(|old| TrackPatch::between(old, t))
                .unwrap_or_default();
            if !patch.is_empty() {
                record("update track", t.id, store.update_track(t.id, &patch));
            }
        }
        for c in &diff.created_clips {
            record("upsert clip", c.id, store.upsert_clip(c).map(|_| ()));
        }
        for c in &diff.updated_clips {
            let patch = old_clips.get(&c.id)
                .map(|old| ClipPatch::between(old, c))
                .unwrap_or_default();
            if !patch.is_empty() {
                record("update clip", c.id, store.update_clip(c.id, &patch));
            }
        }
        for id in &diff.deleted_clips {
            record("delete clip", *id, store.delete_clip(*id));
        }
        for id in &diff.deleted_tracks {
            record("delete track", *id, store.delete_track(*id));
        }

        debug!("[sync] {} changes: {} writes, {} failed", diff.len(), report.written, report.failed);
        self.baseline = current.to_vec();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecut_core::state::{ProjectState, TrackKind};
    use crate::store::{MemoryStore, StoreCall};

    #[test]
    fn creates_track_before_its_clip() {
        let mut store = MemoryStore::new();
        let mut sync  = StoreSync::new(Vec::new());
        let mut s     = ProjectState::new(uuid::Uuid::nil());
        let t         = s.add_track(TrackKind::Video);
        let c         = s.insert_clip(t, Clip::text(t, "x", 0.0, 1.0)).unwrap();

        let report = sync.flush(&s.tracks, &mut store);
        assert_eq!(report, SyncReport { written: 2, failed: 0 });
        assert_eq!(store.calls, vec![StoreCall::CreateTrack(t), StoreCall::UpsertClip(c)]);
        assert!(!sync.is_dirty(&s.tracks));
    }

    #[test]
    fn net_change_is_written_once() {
        let mut store = MemoryStore::new();
        let mut s     = ProjectState::new(uuid::Uuid::nil());
        let t         = s.add_track(TrackKind::Video);
        let c         = s.insert_clip(t, Clip::text(t, "x", 0.0, 1.0)).unwrap();
        let mut sync  = StoreSync::new(Vec::new());
        sync.flush(&s.tracks, &mut store);
        store.calls.clear();

        for step in 1..=5 {
            s.move_clip(c, step as f64).unwrap();
        }
        sync.flush(&s.tracks, &mut store);
        assert_eq!(store.calls, vec![StoreCall::UpdateClip(c)]);
        assert_eq!(store.clip_row(c).unwrap().start_time, 5.0);
    }

    #[test]
    fn failures_are_counted_and_baseline_still_advances() {
        let mut store = MemoryStore::new();
        store.set_offline(true);
        let mut s    = ProjectState::new(uuid::Uuid::nil());
        s.add_track(TrackKind::Audio);
        let mut sync = StoreSync::new(Vec::new());

        let report = sync.flush(&s.tracks, &mut store);
        assert_eq!(report.failed, 1);
        assert!(!sync.is_dirty(&s.tracks));
    }
}
