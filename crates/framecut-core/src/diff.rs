// crates/framecut-core/src/diff.rs
//
// Structural diff between two track lists, keyed by entity id.
//
// Used to turn "the model before" / "the model after" into the minimal set
// of row-level writes for the storage collaborator, whatever mix of edits,
// undo/redo or cascades happened in between.
//
// Rules:
//   - A track is "updated" when any field other than `clips` differs.
//   - A clip that changed tracks is "updated" (its track_id differs), not
//     deleted + created.
//   - Clips that disappeared together with their track are NOT listed in
//     `deleted_clips`; deleting the track cascades.

use std::collections::HashMap;
use uuid::Uuid;
use crate::state::{Clip, Track};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineDiff {
    /// New tracks with `clips` emptied; their clips are in `created_clips`.
    pub created_tracks: Vec<Track>,
    pub updated_tracks: Vec<Track>,
    pub deleted_tracks: Vec<Uuid>,
    pub created_clips:  Vec<Clip>,
    pub updated_clips:  Vec<Clip>,
    pub deleted_clips:  Vec<Uuid>,
}

impl TimelineDiff {
    pub fn is_empty(&self) -> bool {
        self.created_tracks.is_empty()
            && self.updated_tracks.is_empty()
            && self.deleted_tracks.is_empty()
            && self.created_clips.is_empty()
            && self.updated_clips.is_empty()
            && self.deleted_clips.is_empty()
    }

    /// Total number of row writes this diff implies.
    pub fn len(&self) -> usize {
        self.created_tracks.len()
            + self.updated_tracks.len()
            + self.deleted_tracks.len()
            + self.created_clips.len()
            + self.updated_clips.len()
            + self.deleted_clips.len()
    }
}

fn header_eq(a: &Track, b: &Track) -> bool {
    a.id == b.id
        && a.project_id == b.project_id
        && a.name == b.name
        && a.kind == b.kind
        && a.order == b.order
        && a.is_muted == b.is_muted
        && a.is_locked == b.is_locked
        && a.created_at == b.created_at
}

fn without_clips(t: &Track) -> Track {
    Track { clips: Vec::new(), ..t.clone() }
}

pub fn diff_tracks(old: &[Track], new: &[Track]) -> TimelineDiff {
    let mut diff = TimelineDiff::default();

    let old_tracks: HashMap<Uuid, &Track> = old.iter().map(|t| (t.id, t)).collect();
    let new_tracks: HashMap<Uuid, &Track> = new.iter().map(|t| (t.id, t)).collect();
    let old_clips:  HashMap<Uuid, &Clip>  = old.iter().flat_map(|t| t.clips.iter()).map(|c| (c.id, c)).collect();
    let new_clips:  HashMap<Uuid, &Clip>  = new.iter().flat_map(|t| t.clips.iter()).map(|c| (c.id, c)).collect();

    for t in new {
        match old_tracks.get(&t.id) {
            None                             => diff.created_tracks.push(without_clips(t)),
            Some(prev) if !header_eq(prev, t) => diff.updated_tracks.push(without_clips(t)),
            Some(_)                          => {}
        }
        for c in &t.clips {
            match old_clips.get(&c.id) {
                None                => diff.created_clips.push(c.clone()),
                Some(prev) if *prev != c => diff.updated_clips.push(c.clone()),
                Some(_)             => {}
            }
        }
    }

    for t in old {
        if !new_tracks.contains_key(&t.id) {
            diff.deleted_tracks.push(t.id);
            continue;
        }
        diff.deleted_clips.extend(
            t.clips.iter()
                .filter(|c| !new_clips.contains_key(&c.id))
                .map(|c| c.id),
        );
    }

    diff
}
