// crates/framecut-core/src/error.rs
//
// Validation rejections raised by ProjectState mutators.
//
// None of these are user-facing errors. The editor session treats every
// variant as "gesture hit a boundary": the mutation is dropped and the model
// stays in its last valid state.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("clip {0} not found")]
    ClipNotFound(Uuid),

    #[error("track {0} not found")]
    TrackNotFound(Uuid),

    #[error("track index {index} out of range (0..{len})")]
    TrackIndexOutOfRange { index: i64, len: usize },

    #[error("clip {clip} would overlap a sibling at [{start}, {end})")]
    Overlap { clip: Uuid, start: f64, end: f64 },

    #[error("duration {duration} is below the {min} floor")]
    BelowMinDuration { duration: f64, min: f64 },

    #[error("start time {0} is negative")]
    NegativeStart(f64),

    #[error("{field} {value} is not a finite number")]
    NonFinite { field: &'static str, value: f64 },

    #[error("track {0} is locked")]
    TrackLocked(Uuid),
}
