// crates/framecut-editor/src/config.rs
//
// Editor tunables. Every field has a default so a partial JSON file (or no
// file at all) is a valid configuration.
//
// The snap grid (0.5 s) and the clip duration floor (0.1 s) are model
// constants in framecut_core::helpers::grid, not configuration.

use std::path::Path;
use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use framecut_core::helpers::geometry::CanvasSize;
use framecut_core::state::FALLBACK_CLIP_DURATION;

/// Zoom bounds, pixels per second.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 1000.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Composition frame rate.
    pub fps:                   f64,
    /// Initial timeline zoom.
    pub pixels_per_second:     f64,
    /// Height of one track lane in pixels; drives cross-track drag offsets.
    pub track_height:          f64,
    /// Width of the track header column left of time zero.
    pub track_header_width:    f64,
    pub canonical_width:       u32,
    pub canonical_height:      u32,
    /// Maximum number of undo steps kept.
    pub history_depth:         usize,
    /// Duration given to dropped assets with no known length.
    pub default_clip_duration: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fps:                   30.0,
            pixels_per_second:     30.0,
            track_height:          64.0,
            track_header_width:    160.0,
            canonical_width:       1920,
            canonical_height:      1080,
            history_depth:         100,
            default_clip_duration: FALLBACK_CLIP_DURATION,
        }
    }
}

impl EditorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Replace geometry and rate values the editor cannot divide by.
    /// Zoom is clamped to `MIN_ZOOM..=MAX_ZOOM`; a non-positive or non-finite
    /// fps or track height falls back to its default.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.pixels_per_second.is_finite() {
            self.pixels_per_second = self.pixels_per_second.clamp(MIN_ZOOM, MAX_ZOOM);
        } else {
            warn!("[config] pixels_per_second {} is not finite; using {}", self.pixels_per_second, defaults.pixels_per_second);
            self.pixels_per_second = defaults.pixels_per_second;
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            warn!("[config] fps {} is invalid; using {}", self.fps, defaults.fps);
            self.fps = defaults.fps;
        }
        if !(self.track_height.is_finite() && self.track_height > 0.0) {
            warn!("[config] track_height {} is invalid; using {}", self.track_height, defaults.track_height);
            self.track_height = defaults.track_height;
        }
        self
    }

    /// Like `load`, but a missing or broken file falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e)  => {
                warn!("[config] {e:#}; using defaults");
                Self::default()
            }
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize { width: self.canonical_width, height: self.canonical_height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{ "fps": 24.0, "track_height": 48.0 }}"#).unwrap();

        let cfg = EditorConfig::load(f.path()).unwrap();
        assert_eq!(cfg.fps, 24.0);
        assert_eq!(cfg.track_height, 48.0);
        assert_eq!(cfg.pixels_per_second, 30.0);
        assert_eq!(cfg.canvas(), CanvasSize::default());
    }

    #[test]
    fn degenerate_geometry_is_repaired() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{ "pixels_per_second": 0.0, "track_height": -5.0, "fps": 0.0 }}"#).unwrap();

        let cfg = EditorConfig::load(f.path()).unwrap();
        assert_eq!(cfg.pixels_per_second, MIN_ZOOM);
        assert_eq!(cfg.track_height, 64.0);
        assert_eq!(cfg.fps, 30.0);

        let wide = EditorConfig { pixels_per_second: 5000.0, ..EditorConfig::default() }.sanitized();
        assert_eq!(wide.pixels_per_second, MAX_ZOOM);
    }

    #[test]
    fn missing_file_is_an_error_but_load_or_default_recovers() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(EditorConfig::load(&path).is_err());
        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());
    }
}
