// crates/framecut-editor/src/interaction/playhead.rs
//
// Ruler geometry and playhead scrubbing.
//
// Time zero sits at the right edge of the track header column, so every
// pixel ↔ time conversion carries the header width. Scrubbing clamps the
// playhead at 0 but not at the composition end.

use framecut_core::commands::EditorCommand;
use framecut_core::helpers::time::format_time;
use super::capture::{CaptureGuard, GestureKind, PointerCapture};

/// One labelled tick on the ruler.
#[derive(Clone, Debug, PartialEq)]
pub struct RulerMarker {
    pub time:  f64,
    pub x:     f64,
    pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ruler {
    pub header_width:      f64,
    pub pixels_per_second: f64,
    pub fps:               f64,
}

impl Ruler {
    /// ```
    /// use framecut_editor::interaction::playhead::Ruler;
    /// let r = Ruler { header_width: 160.0, pixels_per_second: 30.0, fps: 30.0 };
    /// assert_eq!(r.time_to_px(2.0), 220.0);
    /// assert_eq!(r.px_to_time(220.0), 2.0);
    /// ```
    pub fn time_to_px(&self, t: f64) -> f64 {
        self.header_width + t * self.pixels_per_second
    }

    pub fn px_to_time(&self, x: f64) -> f64 {
        if self.pixels_per_second <= 0.0 {
            return 0.0;
        }
        (x - self.header_width) / self.pixels_per_second
    }

    /// Seconds between ruler ticks: 1 s when zoomed in past 20 px/s, else 5 s.
    pub fn marker_step(&self) -> u32 {
        if self.pixels_per_second > 20.0 { 1 } else { 5 }
    }

    /// Ticks from 0 up to and including ceil(`max_duration`).
    pub fn markers(&self, max_duration: f64) -> Vec<RulerMarker> {
        let end  = max_duration.max(0.0).ceil() as u32;
        let step = self.marker_step() as usize;
        (0..=end)
            .step_by(step)
            .map(|s| {
                let time = s as f64;
                RulerMarker { time, x: self.time_to_px(time), label: format_time(time, self.fps) }
            })
            .collect()
    }
}

enum ScrubState {
    Idle,
    Dragging(CaptureGuard),
}

pub struct ScrubController {
    state:   ScrubState,
    capture: PointerCapture,
}

impl ScrubController {
    pub fn new(capture: PointerCapture) -> Self {
        Self { state: ScrubState::Idle, capture }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ScrubState::Idle)
    }

    /// Click or start of a drag on the ruler: seek immediately.
    pub fn pointer_down(&mut self, x: f64, ruler: &Ruler, cmd: &mut Vec<EditorCommand>) {
        self.state = ScrubState::Idle;
        if let Some(guard) = self.capture.acquire(GestureKind::Scrub) {
            self.state = ScrubState::Dragging(guard);
        }
        cmd.push(seek(x, ruler));
    }

    pub fn pointer_move(&mut self, x: f64, ruler: &Ruler, cmd: &mut Vec<EditorCommand>) {
        if let ScrubState::Dragging(_) = self.state {
            cmd.push(seek(x, ruler));
        }
    }

    pub fn pointer_up(&mut self) {
        self.state = ScrubState::Idle;
    }
}

fn seek(x: f64, ruler: &Ruler) -> EditorCommand {
    EditorCommand::SetPlayhead(ruler.px_to_time(x).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULER: Ruler = Ruler { header_width: 160.0, pixels_per_second: 30.0, fps: 30.0 };

    #[test]
    fn marker_density_follows_zoom() {
        let fine = RULER.markers(3.2);
        assert_eq!(fine.iter().map(|m| m.time).collect::<Vec<_>>(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(fine[1].x, 190.0);
        assert_eq!(fine[1].label, "00:01:00");

        let coarse = Ruler { pixels_per_second: 10.0, ..RULER }.markers(12.0);
        assert_eq!(coarse.iter().map(|m| m.time).collect::<Vec<_>>(), vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn scrub_clamps_at_zero_only() {
        let mut c   = ScrubController::new(PointerCapture::new());
        let mut cmd = Vec::new();
        c.pointer_down(100.0, &RULER, &mut cmd);
        c.pointer_move(160.0 + 30.0 * 500.0, &RULER, &mut cmd);
        assert_eq!(cmd, vec![EditorCommand::SetPlayhead(0.0), EditorCommand::SetPlayhead(500.0)]);
    }

    #[test]
    fn moves_after_release_are_ignored() {
        let capture = PointerCapture::new();
        let mut c   = ScrubController::new(capture.clone());
        let mut cmd = Vec::new();
        c.pointer_down(190.0, &RULER, &mut cmd);
        assert!(capture.is_held(GestureKind::Scrub));
        c.pointer_up();
        c.pointer_move(250.0, &RULER, &mut cmd);
        assert_eq!(cmd, vec![EditorCommand::SetPlayhead(1.0)]);
        assert!(c.is_idle());
        assert!(!capture.any_held());
    }
}
