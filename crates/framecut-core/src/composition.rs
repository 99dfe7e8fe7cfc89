// crates/framecut-core/src/composition.rs
//
// Track/clip model → frame-indexed layer list.
//
// compile() is pure: same tracks + same fps always give the same
// Composition. Nothing here reads a clock or depends on the storage order of
// clips inside a track; clips are sorted by (start_time, id) before layers
// are emitted, and tracks by `order`, so a downstream renderer can composite
// the layer list front to back in sequence (later layers on top).
//
// Frame arithmetic:
//   from               = round(start_time * fps)
//   duration_in_frames = round(duration * fps)          (clip skipped if ≤ 0)
//   start_from         = round(offset * fps)            (video/audio in-point)
//   total              = ceil(max(10 s, last clip end) * fps)

use serde::Serialize;
use uuid::Uuid;
use crate::helpers::geometry::CanvasSize;
use crate::helpers::time::secs_to_frame;
use crate::properties::{TextStyle, Transform};
use crate::state::{AssetKind, Clip, Track};

/// A composition is never shorter than this, even when empty.
pub const MIN_COMPOSITION_SECS: f64 = 10.0;

/// What a layer draws or plays.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerSource {
    Video { url: String, start_from: u64 },
    Audio { url: String, start_from: u64 },
    Image { url: String },
    Text  { content: String, style: TextStyle },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layer {
    pub clip_id:            Uuid,
    pub track_id:           Uuid,
    pub from:               u64,
    pub duration_in_frames: u64,
    pub source:             LayerSource,
    pub transform:          Transform,
    pub opacity:            f64,
    pub volume:             f64,
}

impl Layer {
    pub fn end_frame(&self) -> u64 {
        self.from + self.duration_in_frames
    }

    pub fn is_active_at(&self, frame: u64) -> bool {
        frame >= self.from && frame < self.end_frame()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Composition {
    pub fps:                f64,
    pub width:              u32,
    pub height:             u32,
    pub duration_in_frames: u64,
    /// Bottom-most first.
    pub layers:             Vec<Layer>,
}

impl Composition {
    /// Layers visible/audible at `frame`, bottom-most first.
    pub fn layers_at(&self, frame: u64) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(move |l| l.is_active_at(frame))
    }
}

/// Input contract handed to the external renderer: the raw tracks plus the
/// derived timing and canvas size.
#[derive(Clone, Debug, Serialize)]
pub struct RenderInput<'a> {
    pub tracks:             &'a [Track],
    pub duration_in_frames: u64,
    pub fps:                f64,
    pub width:              u32,
    pub height:             u32,
}

/// Total length in frames: the last clip end across every track (muted or
/// not), floored at [`MIN_COMPOSITION_SECS`].
pub fn duration_in_frames(tracks: &[Track], fps: f64) -> u64 {
    let end = tracks.iter()
        .flat_map(|t| t.clips.iter())
        .map(Clip::end_time)
        .fold(MIN_COMPOSITION_SECS, f64::max);
    (end * fps).ceil() as u64
}

/// Compile at the canonical 1920×1080 canvas.
pub fn compile(tracks: &[Track], fps: f64) -> Composition {
    compile_with_canvas(tracks, fps, CanvasSize::default())
}

pub fn compile_with_canvas(tracks: &[Track], fps: f64, canvas: CanvasSize) -> Composition {
    let mut ordered: Vec<&Track> = tracks.iter().collect();
    ordered.sort_by_key(|t| t.order);

    let mut layers = Vec::new();
    for track in ordered.into_iter().filter(|t| !t.is_muted) {
        let mut clips: Vec<&Clip> = track.clips.iter().collect();
        clips.sort_by(|a, b| a.start_time.total_cmp(&b.start_time).then(a.id.cmp(&b.id)));
        layers.extend(clips.into_iter().filter_map(|c| compile_clip(track, c, fps)));
    }

    Composition {
        fps,
        width:              canvas.width,
        height:             canvas.height,
        duration_in_frames: duration_in_frames(tracks, fps),
        layers,
    }
}

pub fn render_input(tracks: &[Track], fps: f64, canvas: CanvasSize) -> RenderInput<'_> {
    RenderInput {
        tracks,
        duration_in_frames: duration_in_frames(tracks, fps),
        fps,
        width:  canvas.width,
        height: canvas.height,
    }
}

fn compile_clip(track: &Track, clip: &Clip, fps: f64) -> Option<Layer> {
    let duration_frames = secs_to_frame(clip.duration, fps);
    if duration_frames <= 0 {
        return None;
    }
    let from       = secs_to_frame(clip.start_time, fps).max(0) as u64;
    let start_from = secs_to_frame(clip.offset, fps).max(0) as u64;
    let props      = &clip.properties;

    let text_layer = || LayerSource::Text {
        content: props.text_content().unwrap_or(&clip.name).to_string(),
        style:   props.text.as_ref().map(|t| t.style.clone()).unwrap_or_default(),
    };
    let source = match &clip.asset {
        Some(a) => match a.kind {
            AssetKind::Video => LayerSource::Video { url: a.url.clone(), start_from },
            AssetKind::Audio => LayerSource::Audio { url: a.url.clone(), start_from },
            AssetKind::Image => LayerSource::Image { url: a.url.clone() },
            AssetKind::Text  => text_layer(),
        },
        None => text_layer(),
    };

    Some(Layer {
        clip_id:            clip.id,
        track_id:           track.id,
        from,
        duration_in_frames: duration_frames as u64,
        source,
        transform:          props.resolved_transform(),
        opacity:            props.resolved_opacity(),
        volume:             props.resolved_volume(),
    })
}
