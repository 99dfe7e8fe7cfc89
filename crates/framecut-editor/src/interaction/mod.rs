// crates/framecut-editor/src/interaction/mod.rs
//
// Pointer-driven controllers. Each one is an explicit state machine that
// reads the ProjectState, never mutates it, and pushes EditorCommands for
// the session to apply once the event has been handled. Every move is
// recomputed from the baseline captured at pointer-down, so coalesced or
// dropped move events cannot accumulate drift.

pub mod capture;
pub mod clip_drag;
pub mod playhead;
pub mod track_drop;
pub mod transform;

/// Pointer position in host-surface pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Timeline layout values the clip controllers need to turn pixels into
/// seconds and track rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineMetrics {
    pub pixels_per_second: f64,
    pub track_height:      f64,
}
