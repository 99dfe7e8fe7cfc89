// crates/framecut-core/src/commands.rs
//
// Every mutation of the editing model is expressed as an EditorCommand.
// Interaction controllers emit these; EditorSession applies them after the
// pointer event has been handled.
// Adding a new feature = add a variant here + one match arm in session.rs.

use uuid::Uuid;
use crate::properties::ClipProperties;
use crate::state::{Asset, Clip, TrackKind};

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    // ── Playback ─────────────────────────────────────────────────────────────
    SetPlayhead(f64),
    Play,
    Pause,
    Stop,

    // ── Assets ───────────────────────────────────────────────────────────────
    /// An upload finished; add the asset to the library.
    AddAsset(Asset),
    /// Remove a library entry. Clips that reference it are left alone.
    RemoveAsset(Uuid),

    // ── Tracks ───────────────────────────────────────────────────────────────
    AddTrack(TrackKind),
    /// Cascades to every clip on the track.
    DeleteTrack(Uuid),
    SetTrackMuted  { id: Uuid, muted: bool },
    SetTrackLocked { id: Uuid, locked: bool },
    RenameTrack    { id: Uuid, name: String },

    // ── Clips ────────────────────────────────────────────────────────────────
    DropAsset       { asset: Asset, track_id: Uuid, at_time: f64 },
    /// Place a pre-built clip (text clips, paste).
    InsertClip      { track_id: Uuid, clip: Clip },
    DeleteClip(Uuid),
    SelectClip(Option<Uuid>),
    MoveClip        { id: Uuid, new_start: f64 },
    MoveClipToTrack { id: Uuid, track_id: Uuid, new_start: f64 },
    TrimClipStart   { id: Uuid, new_start: f64, new_duration: f64, new_offset: f64 },
    TrimClipEnd     { id: Uuid, new_duration: f64 },
    /// Full replacement of the clip's properties (callers merge first).
    SetClipProperties { id: Uuid, properties: ClipProperties },

    // ── Undo / Redo ──────────────────────────────────────────────────────────
    /// Snapshot the track list onto the undo stack and clear redo.
    /// Emitted once at the start of a gesture, never per pointer-move.
    PushUndoSnapshot,
    Undo,
    Redo,

    // ── View ─────────────────────────────────────────────────────────────────
    SetZoom(f64),
}

impl EditorCommand {
    /// True for commands that change tracks or clips (as opposed to playback,
    /// selection and view state). These are the ones worth an undo step.
    pub fn edits_timeline(&self) -> bool {
        matches!(
            self,
            EditorCommand::AddTrack(_)
                | EditorCommand::DeleteTrack(_)
                | EditorCommand::SetTrackMuted { .. }
                | EditorCommand::SetTrackLocked { .. }
                | EditorCommand::RenameTrack { .. }
                | EditorCommand::DropAsset { .. }
                | EditorCommand::InsertClip { .. }
                | EditorCommand::DeleteClip(_)
                | EditorCommand::MoveClip { .. }
                | EditorCommand::MoveClipToTrack { .. }
                | EditorCommand::TrimClipStart { .. }
                | EditorCommand::TrimClipEnd { .. }
                | EditorCommand::SetClipProperties { .. }
        )
    }
}
