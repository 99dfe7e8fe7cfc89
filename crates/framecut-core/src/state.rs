// crates/framecut-core/src/state.rs
// Pure project data. No logging or storage client here.
// Serializable via serde. Used by framecut-editor and by anything that only
// needs to read or compile a project.
//
// Every mutator validates first and touches nothing on rejection, so a
// rejected gesture step leaves the model in its last valid state.
use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::EditError;
use crate::helpers::grid::{overlaps, MIN_DURATION};
use crate::properties::ClipProperties;

/// Clip length used when a dropped asset has no known duration.
pub const FALLBACK_CLIP_DURATION: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Video,
    Audio,
    Image,
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    #[default]
    Video,
    Audio,
    Text,
}

impl TrackKind {
    pub fn label(self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
            TrackKind::Text  => "Text",
        }
    }
}

/// Uploaded media. Immutable once created; owned by a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id:         Uuid,
    pub project_id: Uuid,
    pub name:       String,
    #[serde(rename = "type")]
    pub kind:       AssetKind,
    pub url:        String,
    /// Seconds. Only meaningful for video/audio; 0 when unknown.
    #[serde(default)]
    pub duration:   f64,
    /// Opaque probe output (width, height, codec, ...).
    #[serde(default)]
    pub metadata:   BTreeMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Asset {
    /// Duration to give a clip created from this asset.
    pub fn clip_duration(&self, fallback: f64) -> f64 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.duration
        } else {
            fallback
        }
    }
}

/// A placed instance of an asset (or freestanding text) on a track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id:         Uuid,
    pub track_id:   Uuid,
    /// None for text-only clips.
    #[serde(default)]
    pub asset_id:   Option<Uuid>,
    pub name:       String,
    /// Seconds from the start of the timeline.
    pub start_time: f64,
    /// Seconds. Never below `MIN_DURATION` after an edit.
    pub duration:   f64,
    /// In-point within the source asset, seconds.
    #[serde(default)]
    pub offset:     f64,
    #[serde(default)]
    pub properties: ClipProperties,
    pub created_at: DateTime<Utc>,
    /// Read-through copy of the asset row, not owned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset:      Option<Asset>,
}

impl Clip {
    pub fn from_asset(asset: &Asset, track_id: Uuid, start_time: f64, fallback_duration: f64) -> Self {
        Self {
            id:         Uuid::new_v4(),
            track_id,
            asset_id:   Some(asset.id),
            name:       asset.name.clone(),
            start_time: start_time.max(0.0),
            duration:   asset.clip_duration(fallback_duration),
            offset:     0.0,
            properties: ClipProperties::default(),
            created_at: Utc::now(),
            asset:      Some(asset.clone()),
        }
    }

    /// A text-only clip with no backing asset.
    pub fn text(track_id: Uuid, name: &str, start_time: f64, duration: f64) -> Self {
        Self {
            id:         Uuid::new_v4(),
            track_id,
            asset_id:   None,
            name:       name.to_string(),
            start_time: start_time.max(0.0),
            duration,
            offset:     0.0,
            properties: ClipProperties::default(),
            created_at: Utc::now(),
            asset:      None,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// An ordered lane of non-overlapping clips.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id:         Uuid,
    pub project_id: Uuid,
    pub name:       String,
    #[serde(rename = "type")]
    pub kind:       TrackKind,
    /// Stacking position; higher is composited on top.
    pub order:      u32,
    #[serde(default)]
    pub is_muted:   bool,
    #[serde(default)]
    pub is_locked:  bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub clips:      Vec<Clip>,
}

impl Track {
    pub fn new(project_id: Uuid, kind: TrackKind, name: String, order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            name,
            kind,
            order,
            is_muted:   false,
            is_locked:  false,
            created_at: Utc::now(),
            clips:      Vec::new(),
        }
    }

    pub fn clip(&self, id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub fn end_time(&self) -> f64 {
        self.clips.iter().map(Clip::end_time).fold(0.0_f64, f64::max)
    }
}

/// A broken invariant found by [`ProjectState::violations`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Violation {
    Overlap        { track: Uuid, a: Uuid, b: Uuid },
    ShortClip      { clip: Uuid, duration: f64 },
    NegativeStart  { clip: Uuid, start_time: f64 },
    NegativeOffset { clip: Uuid, offset: f64 },
    WrongOwner     { clip: Uuid, track: Uuid },
}

fn default_pixels_per_second() -> f64 { 30.0 }

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectState {
    pub project_id:        Uuid,
    #[serde(default)]
    pub assets:            Vec<Asset>,
    /// Kept sorted by `order`, and `order` kept dense (0..n).
    #[serde(default)]
    pub tracks:            Vec<Track>,
    #[serde(default)]
    pub current_time:      f64,
    #[serde(default)]
    pub is_playing:        bool,
    #[serde(default)]
    pub selected_clip_id:  Option<Uuid>,
    #[serde(default = "default_pixels_per_second")]
    pub pixels_per_second: f64,
}

impl ProjectState {
    pub fn new(project_id: Uuid) -> Self {
        Self {
            project_id,
            assets:            Vec::new(),
            tracks:            Vec::new(),
            current_time:      0.0,
            is_playing:        false,
            selected_clip_id:  None,
            pixels_per_second: default_pixels_per_second(),
        }
    }

    /// Sort tracks by `order` and renumber them densely. Call after loading
    /// tracks from anywhere that does not guarantee the ordering.
    pub fn normalize_order(&mut self) {
        self.tracks.sort_by_key(|t| t.order);
        for (i, t) in self.tracks.iter_mut().enumerate() {
            t.order = i as u32;
        }
    }

    // ── Lookups ──────────────────────────────────────────────────────────────

    pub fn track(&self, id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_index(&self, id: Uuid) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// (track index, clip index) of the clip with `id`.
    pub fn clip_location(&self, id: Uuid) -> Option<(usize, usize)> {
        self.tracks.iter().enumerate().find_map(|(ti, t)| {
            t.clips.iter().position(|c| c.id == id).map(|ci| (ti, ci))
        })
    }

    /// The track `offset` rows away from the one at `index`.
    pub fn track_at_offset(&self, index: usize, offset: i64) -> Result<&Track, EditError> {
        let target = index as i64 + offset;
        usize::try_from(target)
            .ok()
            .and_then(|i| self.tracks.get(i))
            .ok_or(EditError::TrackIndexOutOfRange { index: target, len: self.tracks.len() })
    }

    pub fn clip(&self, id: Uuid) -> Option<&Clip> {
        self.clip_location(id).map(|(ti, ci)| &self.tracks[ti].clips[ci])
    }

    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selected_clip_id.and_then(|id| self.clip(id))
    }

    pub fn asset(&self, id: Uuid) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn total_duration(&self) -> f64 {
        self.tracks.iter().map(Track::end_time).fold(0.0_f64, f64::max)
    }

    // ── Assets ───────────────────────────────────────────────────────────────

    pub fn add_asset(&mut self, asset: Asset) {
        self.assets.retain(|a| a.id != asset.id);
        self.assets.insert(0, asset);
    }

    /// Removes the library entry only; clips keep their read-through copy.
    pub fn remove_asset(&mut self, id: Uuid) -> Option<Asset> {
        let pos = self.assets.iter().position(|a| a.id == id)?;
        Some(self.assets.remove(pos))
    }

    // ── Tracks ───────────────────────────────────────────────────────────────

    /// Append a new empty track named "<Kind> Track <n>" with `order` equal to
    /// the current track count.
    pub fn add_track(&mut self, kind: TrackKind) -> Uuid {
        let n     = self.tracks.len();
        let name  = format!("{} Track {}", kind.label(), n + 1);
        let track = Track::new(self.project_id, kind, name, n as u32);
        let id    = track.id;
        self.tracks.push(track);
        id
    }

    /// Delete a track and every clip it owns. Remaining tracks are renumbered.
    pub fn delete_track(&mut self, id: Uuid) -> Result<Track, EditError> {
        let idx   = self.track_index(id).ok_or(EditError::TrackNotFound(id))?;
        let track = self.tracks.remove(idx);
        if let Some(sel) = self.selected_clip_id {
            if track.clip(sel).is_some() {
                self.selected_clip_id = None;
            }
        }
        for (i, t) in self.tracks.iter_mut().enumerate() {
            t.order = i as u32;
        }
        Ok(track)
    }

    pub fn set_track_muted(&mut self, id: Uuid, muted: bool) -> Result<(), EditError> {
        self.track_mut(id)?.is_muted = muted;
        Ok(())
    }

    pub fn set_track_locked(&mut self, id: Uuid, locked: bool) -> Result<(), EditError> {
        self.track_mut(id)?.is_locked = locked;
        Ok(())
    }

    pub fn rename_track(&mut self, id: Uuid, name: String) -> Result<(), EditError> {
        self.track_mut(id)?.name = name;
        Ok(())
    }

    fn track_mut(&mut self, id: Uuid) -> Result<&mut Track, EditError> {
        self.tracks.iter_mut().find(|t| t.id == id).ok_or(EditError::TrackNotFound(id))
    }

    fn unlocked_track_mut(&mut self, id: Uuid) -> Result<&mut Track, EditError> {
        let track = self.track_mut(id)?;
        if track.is_locked {
            return Err(EditError::TrackLocked(id));
        }
        Ok(track)
    }

    // ── Clip creation ────────────────────────────────────────────────────────

    /// Append a clip built from `asset` at `at_time` (clamped to ≥ 0).
    ///
    /// No overlap check: a drop lands wherever the pointer released.
    pub fn add_clip_from_asset(
        &mut self,
        track_id:          Uuid,
        asset:             &Asset,
        at_time:           f64,
        fallback_duration: f64,
    ) -> Result<Uuid, EditError> {
        finite("start time", at_time)?;
        let track = self.unlocked_track_mut(track_id)?;
        let clip  = Clip::from_asset(asset, track_id, at_time, fallback_duration);
        let id    = clip.id;
        track.clips.push(clip);
        Ok(id)
    }

    /// Append an already-built clip, re-owning it to `track_id`. Same
    /// no-overlap-check policy as asset drops.
    pub fn insert_clip(&mut self, track_id: Uuid, mut clip: Clip) -> Result<Uuid, EditError> {
        finite("start time", clip.start_time)?;
        finite("duration", clip.duration)?;
        finite("offset", clip.offset)?;
        if clip.duration < MIN_DURATION {
            return Err(EditError::BelowMinDuration { duration: clip.duration, min: MIN_DURATION });
        }
        let track = self.unlocked_track_mut(track_id)?;
        clip.track_id   = track_id;
        clip.start_time = clip.start_time.max(0.0);
        let id = clip.id;
        track.clips.push(clip);
        Ok(id)
    }

    // ── Clip edits ───────────────────────────────────────────────────────────

    /// Move a clip within its own track.
    pub fn move_clip(&mut self, id: Uuid, new_start: f64) -> Result<(), EditError> {
        let (ti, ci) = self.editable_clip(id)?;
        valid_start(new_start)?;
        let track    = &self.tracks[ti];
        let duration = track.clips[ci].duration;
        if overlaps(new_start, duration, &track.clips, Some(id)) {
            return Err(EditError::Overlap { clip: id, start: new_start, end: new_start + duration });
        }
        self.tracks[ti].clips[ci].start_time = new_start;
        Ok(())
    }

    /// Left-edge trim: start, duration and source in-point change together.
    pub fn trim_clip_start(
        &mut self,
        id:           Uuid,
        new_start:    f64,
        new_duration: f64,
        new_offset:   f64,
    ) -> Result<(), EditError> {
        let (ti, ci) = self.editable_clip(id)?;
        valid_start(new_start)?;
        finite("duration", new_duration)?;
        finite("offset", new_offset)?;
        if new_duration < MIN_DURATION {
            return Err(EditError::BelowMinDuration { duration: new_duration, min: MIN_DURATION });
        }
        if overlaps(new_start, new_duration, &self.tracks[ti].clips, Some(id)) {
            return Err(EditError::Overlap { clip: id, start: new_start, end: new_start + new_duration });
        }
        let clip = &mut self.tracks[ti].clips[ci];
        clip.start_time = new_start;
        clip.duration   = new_duration;
        clip.offset     = new_offset.max(0.0);
        Ok(())
    }

    /// Right-edge trim: only the duration changes.
    pub fn trim_clip_end(&mut self, id: Uuid, new_duration: f64) -> Result<(), EditError> {
        let (ti, ci) = self.editable_clip(id)?;
        finite("duration", new_duration)?;
        if new_duration < MIN_DURATION {
            return Err(EditError::BelowMinDuration { duration: new_duration, min: MIN_DURATION });
        }
        let start = self.tracks[ti].clips[ci].start_time;
        if overlaps(start, new_duration, &self.tracks[ti].clips, Some(id)) {
            return Err(EditError::Overlap { clip: id, start, end: start + new_duration });
        }
        self.tracks[ti].clips[ci].duration = new_duration;
        Ok(())
    }

    /// Relocate a clip to another track at `new_start`.
    pub fn move_clip_to_track(
        &mut self,
        id:              Uuid,
        target_track_id: Uuid,
        new_start:       f64,
    ) -> Result<(), EditError> {
        let (ti, ci) = self.editable_clip(id)?;
        let target   = self.track_index(target_track_id).ok_or(EditError::TrackNotFound(target_track_id))?;
        if target == ti {
            return self.move_clip(id, new_start);
        }
        if self.tracks[target].is_locked {
            return Err(EditError::TrackLocked(target_track_id));
        }
        valid_start(new_start)?;
        let duration = self.tracks[ti].clips[ci].duration;
        if overlaps(new_start, duration, &self.tracks[target].clips, Some(id)) {
            return Err(EditError::Overlap { clip: id, start: new_start, end: new_start + duration });
        }
        let mut clip = self.tracks[ti].clips.remove(ci);
        clip.track_id   = target_track_id;
        clip.start_time = new_start;
        self.tracks[target].clips.push(clip);
        Ok(())
    }

    /// Replace a clip's properties wholesale.
    pub fn set_clip_properties(&mut self, id: Uuid, properties: ClipProperties) -> Result<(), EditError> {
        let (ti, ci) = self.editable_clip(id)?;
        self.tracks[ti].clips[ci].properties = properties;
        Ok(())
    }

    pub fn delete_clip(&mut self, id: Uuid) -> Result<Clip, EditError> {
        let (ti, ci) = self.editable_clip(id)?;
        if self.selected_clip_id == Some(id) {
            self.selected_clip_id = None;
        }
        Ok(self.tracks[ti].clips.remove(ci))
    }

    pub fn select_clip(&mut self, id: Option<Uuid>) {
        self.selected_clip_id = id.filter(|id| self.clip(*id).is_some());
    }

    /// Location of a clip whose track accepts edits.
    fn editable_clip(&self, id: Uuid) -> Result<(usize, usize), EditError> {
        let (ti, ci) = self.clip_location(id).ok_or(EditError::ClipNotFound(id))?;
        if self.tracks[ti].is_locked {
            return Err(EditError::TrackLocked(self.tracks[ti].id));
        }
        Ok((ti, ci))
    }

    // ── Invariants ───────────────────────────────────────────────────────────

    /// Every broken model invariant, in track then clip order.
    pub fn violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        for track in &self.tracks {
            for (i, a) in track.clips.iter().enumerate() {
                if a.track_id != track.id {
                    out.push(Violation::WrongOwner { clip: a.id, track: track.id });
                }
                if a.duration < MIN_DURATION {
                    out.push(Violation::ShortClip { clip: a.id, duration: a.duration });
                }
                if a.start_time < 0.0 {
                    out.push(Violation::NegativeStart { clip: a.id, start_time: a.start_time });
                }
                if a.offset < 0.0 {
                    out.push(Violation::NegativeOffset { clip: a.id, offset: a.offset });
                }
                for b in &track.clips[i + 1..] {
                    if overlaps(a.start_time, a.duration, std::slice::from_ref(b), None) {
                        out.push(Violation::Overlap { track: track.id, a: a.id, b: b.id });
                    }
                }
            }
        }
        out
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, EditError> {
    if value.is_finite() { Ok(value) } else { Err(EditError::NonFinite { field, value }) }
}

fn valid_start(t: f64) -> Result<f64, EditError> {
    if finite("start time", t)? < 0.0 {
        return Err(EditError::NegativeStart(t));
    }
    Ok(t)
}
