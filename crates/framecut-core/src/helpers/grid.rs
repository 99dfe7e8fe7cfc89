// crates/framecut-core/src/helpers/grid.rs
//
// Temporal grid: snapping and the half-open overlap test.
//
// Every clip edit funnels through these two functions. Intervals are
// `[start, start + duration)` so two clips that touch (`end == other.start`)
// do not collide.

use uuid::Uuid;
use crate::state::Clip;

/// Snap grid spacing in seconds.
pub const GRID_INTERVAL: f64 = 0.5;

/// Shortest duration any clip may have after an edit, in seconds.
pub const MIN_DURATION: f64 = 0.1;

/// Round `time` to the nearest multiple of [`GRID_INTERVAL`].
///
/// Idempotent: a value already on the grid is returned unchanged.
///
/// ```
/// use framecut_core::helpers::grid::snap;
/// assert_eq!(snap(1.2), 1.0);
/// assert_eq!(snap(1.3), 1.5);
/// assert_eq!(snap(snap(7.26)), snap(7.26));
/// ```
pub fn snap(time: f64) -> f64 {
    (time / GRID_INTERVAL).round() * GRID_INTERVAL
}

/// True when `[start, start + duration)` intersects any clip in `clips`
/// other than `exclude`.
///
/// Checks the three ways two intervals can meet: the candidate starts inside
/// an existing clip, ends inside one, or swallows one whole.
pub fn overlaps(start: f64, duration: f64, clips: &[Clip], exclude: Option<Uuid>) -> bool {
    let end = start + duration;
    clips.iter()
        .filter(|c| Some(c.id) != exclude)
        .any(|c| {
            let other_end = c.start_time + c.duration;
            let starts_inside = start >= c.start_time && start < other_end;
            let ends_inside   = end > c.start_time && end <= other_end;
            let contains      = start <= c.start_time && end >= other_end;
            starts_inside || ends_inside || contains
        })
}
