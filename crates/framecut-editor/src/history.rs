// crates/framecut-editor/src/history.rs
//
// Snapshot undo/redo of the track list.
//
// A snapshot is pushed *before* a change, once per discrete command. A gesture
// parks its snapshot at pointer-down and commits it at release only if the
// tracks changed, so a plain click neither adds a step nor clears redo.
// Pushing clears the redo stack. Only tracks and clips are captured; playhead,
// selection and zoom are view state and are not undone.

use std::collections::VecDeque;
use framecut_core::state::Track;

pub struct History {
    undo:  VecDeque<Vec<Track>>,
    redo:  Vec<Vec<Track>>,
    depth: usize,
    /// Baseline of the gesture in progress, not yet an undo step.
    gesture: Option<Vec<Track>>,
}

impl History {
    pub fn new(depth: usize) -> Self {
        Self { undo: VecDeque::new(), redo: Vec::new(), depth: depth.max(1), gesture: None }
    }

    pub fn push(&mut self, snapshot: Vec<Track>) {
        // Consecutive identical snapshots collapse into one step.
        if self.undo.back() == Some(&snapshot) {
            return;
        }
        if self.undo.len() == self.depth {
            self.undo.pop_front();
        }
        self.undo.push_back(snapshot);
        self.redo.clear();
    }

    /// Park the tracks as they were when a gesture started. A gesture that
    /// supersedes an unfinished one keeps the older baseline.
    pub fn begin_gesture(&mut self, snapshot: Vec<Track>) {
        self.gesture.get_or_insert(snapshot);
    }

    /// Close the parked gesture. It becomes an undo step only when `current`
    /// differs from it; otherwise undo and redo are left as they were.
    pub fn end_gesture(&mut self, current: &[Track]) -> bool {
        match self.gesture.take() {
            Some(before) if before.as_slice() != current => {
                self.push(before);
                true
            }
            _ => false,
        }
    }

    /// Swap `current` for the most recent snapshot. Returns the snapshot to
    /// restore, or None when there is nothing to undo.
    pub fn undo(&mut self, current: Vec<Track>) -> Option<Vec<Track>> {
        let prev = self.undo.pop_back()?;
        self.redo.push(current);
        Some(prev)
    }

    pub fn redo(&mut self, current: Vec<Track>) -> Option<Vec<Track>> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        Some(next)
    }

    pub fn undo_len(&self) -> usize { self.undo.len() }
    pub fn redo_len(&self) -> usize { self.redo.len() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use framecut_core::state::TrackKind;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n).map(|i| Track::new(Uuid::nil(), TrackKind::Video, format!("T{i}"), i as u32)).collect()
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut h = History::new(10);
        let a = tracks(1);
        let b = tracks(2);
        h.push(a.clone());

        let restored = h.undo(b.clone()).unwrap();
        assert_eq!(restored, a);
        assert_eq!(h.redo(restored).unwrap(), b);
        assert_eq!((h.undo_len(), h.redo_len()), (1, 0));
    }

    #[test]
    fn depth_is_bounded() {
        let mut h = History::new(3);
        for n in 0..5 {
            h.push(tracks(n));
        }
        assert_eq!(h.undo_len(), 3);
    }

    #[test]
    fn push_clears_redo_and_dedups() {
        let mut h = History::new(10);
        let a = tracks(1);
        h.push(a.clone());
        h.push(a);
        assert_eq!(h.undo_len(), 1);
        h.undo(tracks(2));
        assert_eq!(h.redo_len(), 1);
        h.push(tracks(3));
        assert_eq!(h.redo_len(), 0);
    }

    #[test]
    fn unchanged_gesture_keeps_redo() {
        let mut h = History::new(10);
        let a = tracks(1);
        h.push(a.clone());
        h.undo(tracks(2));
        assert_eq!(h.redo_len(), 1);

        h.begin_gesture(a.clone());
        assert!(!h.end_gesture(&a));
        assert_eq!((h.undo_len(), h.redo_len()), (0, 1));
    }

    #[test]
    fn changed_gesture_commits_its_baseline() {
        let mut h = History::new(10);
        let (a, b) = (tracks(1), tracks(2));
        h.push(a.clone());
        h.undo(b.clone());

        h.begin_gesture(a.clone());
        h.begin_gesture(tracks(3));
        assert!(h.end_gesture(&b));
        assert_eq!((h.undo_len(), h.redo_len()), (1, 0));
        assert_eq!(h.undo(b).unwrap(), a);
    }

    #[test]
    fn end_without_begin_is_a_no_op() {
        let mut h = History::new(10);
        assert!(!h.end_gesture(&tracks(1)));
        assert_eq!(h.undo_len(), 0);
    }
}
