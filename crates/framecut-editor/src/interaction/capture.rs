// crates/framecut-editor/src/interaction/capture.rs
//
// Scoped pointer capture.
//
// A gesture that needs global pointer-move/up delivery acquires a
// CaptureGuard for its kind and keeps it inside its non-idle state. Dropping
// the guard (gesture end, supersede, or the controller itself going away)
// releases the capture unconditionally, so there is no path that leaves a
// stale listener registered.
//
// At most one guard per kind exists at a time. Kinds are independent: a
// scrub and a clip drag could in principle be captured together.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    ClipEdit,
    Transform,
    Scrub,
}

/// Shared registry of held captures. Cloning shares the same registry.
#[derive(Clone, Debug, Default)]
pub struct PointerCapture {
    held: Rc<RefCell<Vec<GestureKind>>>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire `kind`, or None if it is already held.
    pub fn acquire(&self, kind: GestureKind) -> Option<CaptureGuard> {
        let mut held = self.held.borrow_mut();
        if held.contains(&kind) {
            return None;
        }
        held.push(kind);
        Some(CaptureGuard { kind, held: Rc::clone(&self.held) })
    }

    pub fn is_held(&self, kind: GestureKind) -> bool {
        self.held.borrow().contains(&kind)
    }

    pub fn any_held(&self) -> bool {
        !self.held.borrow().is_empty()
    }
}

#[derive(Debug)]
pub struct CaptureGuard {
    kind: GestureKind,
    held: Rc<RefCell<Vec<GestureKind>>>,
}

impl CaptureGuard {
    pub fn kind(&self) -> GestureKind {
        self.kind
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.held.borrow_mut().retain(|k| *k != self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_releases_on_drop() {
        let cap   = PointerCapture::new();
        let guard = cap.acquire(GestureKind::Scrub).unwrap();
        assert!(cap.is_held(GestureKind::Scrub));
        assert!(cap.acquire(GestureKind::Scrub).is_none());
        drop(guard);
        assert!(!cap.any_held());
        assert!(cap.acquire(GestureKind::Scrub).is_some());
    }

    #[test]
    fn kinds_are_independent() {
        let cap = PointerCapture::new();
        let _a  = cap.acquire(GestureKind::ClipEdit).unwrap();
        let b   = cap.acquire(GestureKind::Transform).unwrap();
        assert_eq!(b.kind(), GestureKind::Transform);
        assert!(cap.is_held(GestureKind::ClipEdit));
    }
}
