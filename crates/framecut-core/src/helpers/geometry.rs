// crates/framecut-core/src/helpers/geometry.rs
//
// Canonical-space ↔ display-space mapping for the preview surface.
//
// The composition is always authored at a fixed canonical size; the preview
// container is whatever size the host gives it. A single scale factor
// (container width / canonical width) converts between the two, in both
// directions. Transform x/y are offsets from the canonical centre.

use serde::{Deserialize, Serialize};
use crate::properties::Transform;

pub const CANONICAL_WIDTH:  u32 = 1920;
pub const CANONICAL_HEIGHT: u32 = 1080;

/// Canonical composition size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width:  u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self { width: CANONICAL_WIDTH, height: CANONICAL_HEIGHT }
    }
}

impl CanvasSize {
    /// On-screen pixels per canonical pixel for a container `container_width`
    /// pixels wide. Falls back to 1.0 for a zero-width container.
    ///
    /// ```
    /// use framecut_core::helpers::geometry::CanvasSize;
    /// assert_eq!(CanvasSize::default().display_scale(960.0), 0.5);
    /// assert_eq!(CanvasSize::default().display_scale(0.0),   1.0);
    /// ```
    pub fn display_scale(&self, container_width: f64) -> f64 {
        if container_width > 0.0 && self.width > 0 {
            container_width / self.width as f64
        } else {
            1.0
        }
    }
}

/// Screen-space box drawn around a transformed clip, centre-anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayBox {
    pub center_x: f64,
    pub center_y: f64,
    pub width:    f64,
    pub height:   f64,
    pub rotation: f64,
}

/// Where the transform overlay for `t` sits inside a container whose width
/// gives `display_scale`. Content is assumed to fill the canvas at 100 %.
pub fn overlay_box(canvas: CanvasSize, t: &Transform, display_scale: f64) -> OverlayBox {
    let w = canvas.width as f64;
    let h = canvas.height as f64;
    let s = t.scale / 100.0;
    OverlayBox {
        center_x: (w / 2.0 + t.x) * display_scale,
        center_y: (h / 2.0 + t.y) * display_scale,
        width:    w * s * display_scale,
        height:   h * s * display_scale,
        rotation: t.rotation,
    }
}
