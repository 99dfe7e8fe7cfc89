// crates/framecut-editor/src/store.rs
//
// The persistence collaborator, seen from the editor.
//
// The real backend is a remote relational store reached through a
// request/response client; the editor only needs row-level create / patch /
// delete for tracks and clips, plus asset listing and upload. Everything is
// synchronous from the editor's point of view and every call may fail.
//
// MemoryStore is a complete in-process implementation: it backs the CLI and
// the integration tests, and can be switched offline to exercise the
// failure paths.

use std::collections::{BTreeMap, HashMap};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use framecut_core::properties::ClipProperties;
use framecut_core::state::{Asset, AssetKind, Clip, Track, TrackKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// A file handed to the upload collaborator. Duration and metadata have
/// already been probed by the time the editor sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetUpload {
    pub file_name: String,
    pub kind:      AssetKind,
    #[serde(default)]
    pub duration:  f64,
    #[serde(default)]
    pub metadata:  BTreeMap<String, serde_json::Value>,
}

/// Changed columns of a track row.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TrackPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name:      Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind:      Option<TrackKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order:     Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_muted:  Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

impl TrackPatch {
    pub fn between(old: &Track, new: &Track) -> Self {
        Self {
            name:      (old.name != new.name).then(|| new.name.clone()),
            kind:      (old.kind != new.kind).then_some(new.kind),
            order:     (old.order != new.order).then_some(new.order),
            is_muted:  (old.is_muted != new.is_muted).then_some(new.is_muted),
            is_locked: (old.is_locked != new.is_locked).then_some(new.is_locked),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, t: &mut Track) {
        if let Some(v) = &self.name   { t.name      = v.clone(); }
        if let Some(v) = self.kind    { t.kind      = v; }
        if let Some(v) = self.order   { t.order     = v; }
        if let Some(v) = self.is_muted  { t.is_muted  = v; }
        if let Some(v) = self.is_locked { t.is_locked = v; }
    }
}

/// Changed columns of a clip row.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ClipPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id:   Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name:       Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration:   Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset:     Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<ClipProperties>,
}

impl ClipPatch {
    pub fn between(old: &Clip, new: &Clip) -> Self {
        Self {
            track_id:   (old.track_id != new.track_id).then_some(new.track_id),
            name:       (old.name != new.name).then(|| new.name.clone()),
            start_time: (old.start_time != new.start_time).then_some(new.start_time),
            duration:   (old.duration != new.duration).then_some(new.duration),
            offset:     (old.offset != new.offset).then_some(new.offset),
            properties: (old.properties != new.properties).then(|| new.properties.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, c: &mut Clip) {
        if let Some(v) = self.track_id   { c.track_id   = v; }
        if let Some(v) = &self.name      { c.name       = v.clone(); }
        if let Some(v) = self.start_time { c.start_time = v; }
        if let Some(v) = self.duration   { c.duration   = v; }
        if let Some(v) = self.offset     { c.offset     = v; }
        if let Some(v) = &self.properties { c.properties = v.clone(); }
    }
}

pub trait ProjectStore {
    fn fetch_assets(&mut self, project_id: Uuid) -> Result<Vec<Asset>, StoreError>;
    fn upload_asset(&mut self, upload: &AssetUpload, project_id: Uuid) -> Result<Asset, StoreError>;
    /// Clips referencing the asset keep their read-through copy.
    fn delete_asset(&mut self, id: Uuid) -> Result<(), StoreError>;
    /// Tracks ordered by `order`, each with its clips joined.
    fn fetch_tracks(&mut self, project_id: Uuid) -> Result<Vec<Track>, StoreError>;

    fn create_track(&mut self, track: &Track) -> Result<Track, StoreError>;
    fn update_track(&mut self, id: Uuid, patch: &TrackPatch) -> Result<(), StoreError>;
    /// Deletes the track's clips as well.
    fn delete_track(&mut self, id: Uuid) -> Result<(), StoreError>;

    fn upsert_clip(&mut self, clip: &Clip) -> Result<Clip, StoreError>;
    fn update_clip(&mut self, id: Uuid, patch: &ClipPatch) -> Result<(), StoreError>;
    fn delete_clip(&mut self, id: Uuid) -> Result<(), StoreError>;
}

/// One call made against a MemoryStore, recorded in order.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreCall {
    FetchAssets,
    UploadAsset(String),
    DeleteAsset(Uuid),
    FetchTracks,
    CreateTrack(Uuid),
    UpdateTrack(Uuid),
    DeleteTrack(Uuid),
    UpsertClip(Uuid),
    UpdateClip(Uuid),
    DeleteClip(Uuid),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    assets:      Vec<Asset>,
    /// Track rows, without clips.
    tracks:      HashMap<Uuid, Track>,
    clips:       HashMap<Uuid, Clip>,
    offline:     bool,
    pub calls:   Vec<StoreCall>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with `Unavailable` (calls are still
    /// recorded).
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn clip_row(&self, id: Uuid) -> Option<&Clip> {
        self.clips.get(&id)
    }

    pub fn track_row(&self, id: Uuid) -> Option<&Track> {
        self.tracks.get(&id)
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn enter(&mut self, call: StoreCall) -> Result<(), StoreError> {
        self.calls.push(call);
        if self.offline {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

impl ProjectStore for MemoryStore {
    fn fetch_assets(&mut self, project_id: Uuid) -> Result<Vec<Asset>, StoreError> {
        self.enter(StoreCall::FetchAssets)?;
        Ok(self.assets.iter().filter(|a| a.project_id == project_id).cloned().collect())
    }

    fn upload_asset(&mut self, upload: &AssetUpload, project_id: Uuid) -> Result<Asset, StoreError> {
        self.enter(StoreCall::UploadAsset(upload.file_name.clone()))?;
        if upload.file_name.trim().is_empty() {
            return Err(StoreError::Rejected("empty file name".into()));
        }
        let id    = Uuid::new_v4();
        let asset = Asset {
            id,
            project_id,
            name:       upload.file_name.clone(),
            kind:       upload.kind,
            url:        format!("memory://{project_id}/{id}/{}", upload.file_name),
            duration:   upload.duration.max(0.0),
            metadata:   upload.metadata.clone(),
            created_at: Utc::now(),
        };
        self.assets.insert(0, asset.clone());
        Ok(asset)
    }

    fn delete_asset(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.enter(StoreCall::DeleteAsset(id))?;
        let before = self.assets.len();
        self.assets.retain(|a| a.id != id);
        if self.assets.len() == before {
            return Err(StoreError::NotFound { entity: "asset", id });
        }
        Ok(())
    }

    fn fetch_tracks(&mut self, project_id: Uuid) -> Result<Vec<Track>, StoreError> {
        self.enter(StoreCall::FetchTracks)?;
        let mut tracks: Vec<Track> = self.tracks.values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tracks.sort_by_key(|t| t.order);
        for t in &mut tracks {
            t.clips = self.clips.values().filter(|c| c.track_id == t.id).cloned().collect();
            t.clips.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        }
        Ok(tracks)
    }

    fn create_track(&mut self, track: &Track) -> Result<Track, StoreError> {
        self.enter(StoreCall::CreateTrack(track.id))?;
        let row = Track { clips: Vec::new(), ..track.clone() };
        self.tracks.insert(row.id, row.clone());
        Ok(row)
    }

    fn update_track(&mut self, id: Uuid, patch: &TrackPatch) -> Result<(), StoreError> {
        self.enter(StoreCall::UpdateTrack(id))?;
        let row = self.tracks.get_mut(&id).ok_or(StoreError::NotFound { entity: "track", id })?;
        patch.apply(row);
        Ok(())
    }

    fn delete_track(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.enter(StoreCall::DeleteTrack(id))?;
        self.tracks.remove(&id).ok_or(StoreError::NotFound { entity: "track", id })?;
        self.clips.retain(|_, c| c.track_id != id);
        Ok(())
    }

    fn upsert_clip(&mut self, clip: &Clip) -> Result<Clip, StoreError> {
        self.enter(StoreCall::UpsertClip(clip.id))?;
        if !self.tracks.contains_key(&clip.track_id) {
            return Err(StoreError::Rejected(format!("clip {} references unknown track", clip.id)));
        }
        self.clips.insert(clip.id, clip.clone());
        Ok(clip.clone())
    }

    fn update_clip(&mut self, id: Uuid, patch: &ClipPatch) -> Result<(), StoreError> {
        self.enter(StoreCall::UpdateClip(id))?;
        let row = self.clips.get_mut(&id).ok_or(StoreError::NotFound { entity: "clip", id })?;
        patch.apply(row);
        Ok(())
    }

    fn delete_clip(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.enter(StoreCall::DeleteClip(id))?;
        self.clips.remove(&id).ok_or(StoreError::NotFound { entity: "clip", id })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> AssetUpload {
        AssetUpload { file_name: name.into(), kind: AssetKind::Audio, duration: 12.5, metadata: BTreeMap::new() }
    }

    #[test]
    fn upload_then_fetch_is_scoped_to_project() {
        let mut store = MemoryStore::new();
        let p = Uuid::new_v4();
        let a = store.upload_asset(&upload("song.mp3"), p).unwrap();
        store.upload_asset(&upload("other.mp3"), Uuid::new_v4()).unwrap();

        let assets = store.fetch_assets(p).unwrap();
        assert_eq!(assets, vec![a.clone()]);
        assert_eq!(a.duration, 12.5);
        assert!(a.url.starts_with("memory://"));
    }

    #[test]
    fn offline_store_fails_every_call() {
        let mut store = MemoryStore::new();
        store.set_offline(true);
        assert!(matches!(store.fetch_assets(Uuid::nil()), Err(StoreError::Unavailable(_))));
        assert_eq!(store.calls, vec![StoreCall::FetchAssets]);
    }

    #[test]
    fn track_delete_cascades_to_clips() {
        let mut store = MemoryStore::new();
        let track = Track::new(Uuid::nil(), TrackKind::Video, "V".into(), 0);
        store.create_track(&track).unwrap();
        store.upsert_clip(&Clip::text(track.id, "t", 0.0, 1.0)).unwrap();
        assert_eq!(store.clip_count(), 1);

        store.delete_track(track.id).unwrap();
        assert_eq!(store.clip_count(), 0);
        assert!(store.fetch_tracks(Uuid::nil()).unwrap().is_empty());
    }

    #[test]
    fn clip_patch_only_carries_changed_columns() {
        let old     = Clip::text(Uuid::nil(), "t", 1.0, 2.0);
        let mut new = old.clone();
        new.start_time = 3.0;

        let patch = ClipPatch::between(&old, &new);
        assert_eq!(patch, ClipPatch { start_time: Some(3.0), ..Default::default() });

        let mut row = old.clone();
        patch.apply(&mut row);
        assert_eq!(row, new);
        assert!(ClipPatch::between(&new, &new).is_empty());
    }

    #[test]
    fn upsert_requires_existing_track() {
        let mut store = MemoryStore::new();
        let err = store.upsert_clip(&Clip::text(Uuid::new_v4(), "t", 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[test]
    fn delete_asset_removes_the_library_row() {
        let mut store = MemoryStore::new();
        let a = store.upload_asset(&upload("song.mp3"), Uuid::nil()).unwrap();
        store.delete_asset(a.id).unwrap();
        assert!(store.fetch_assets(Uuid::nil()).unwrap().is_empty());
        assert!(matches!(store.delete_asset(a.id), Err(StoreError::NotFound { .. })));
    }
}
