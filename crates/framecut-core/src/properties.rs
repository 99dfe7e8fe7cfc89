// crates/framecut-core/src/properties.rs
//
// Per-clip visual/audio metadata.
//
// Closed structure: each facet (transform, text, audio) is an explicit
// Option so "absent" and "set to the default" stay distinguishable on disk.
// Readers go through the `resolved_*` accessors, which apply the defaults:
//
//   x = 0, y = 0, scale = 100 (%), rotation = 0 (deg), opacity = 1, volume = 1
//
// Writers either replace a whole facet with `set_facet` or mutate the field
// directly; there is no open key-value escape hatch.
//
// Rows stored with the flat keys `volume`, `text_content` and `text_style`
// are folded into their facets on load. Output is always the nested shape.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCALE:   f64 = 100.0;
pub const DEFAULT_OPACITY: f64 = 1.0;
pub const DEFAULT_VOLUME:  f64 = 1.0;

/// 2D placement in canonical composition space (pixels from centre).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub x:        f64,
    #[serde(default)]
    pub y:        f64,
    /// Percent; 100 = natural size.
    #[serde(default = "default_scale")]
    pub scale:    f64,
    /// Degrees, clockwise.
    #[serde(default)]
    pub rotation: f64,
}

fn default_scale() -> f64 { DEFAULT_SCALE }

impl Default for Transform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: DEFAULT_SCALE, rotation: 0.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size:   Option<f64>,
    #[serde(default)]
    pub font_weight: Option<u16>,
    /// CSS-style colour string, passed through to the renderer untouched.
    #[serde(default)]
    pub color:       Option<String>,
    #[serde(default)]
    pub align:       TextAlign,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct TextProps {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub style:   TextStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioProps {
    /// Linear gain 0..1.
    #[serde(default = "default_volume")]
    pub volume: f64,
}

fn default_volume() -> f64 { DEFAULT_VOLUME }

impl Default for AudioProps {
    fn default() -> Self { Self { volume: DEFAULT_VOLUME } }
}

/// One facet of a clip's properties, used to replace that facet wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyFacet {
    Transform(Transform),
    Text(TextProps),
    Audio(AudioProps),
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "StoredProperties")]
pub struct ClipProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    /// 0..1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity:   Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text:      Option<TextProps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio:     Option<AudioProps>,
}

/// Everything a stored properties object may carry. A nested facet wins
/// over its flat counterpart when both are present.
#[derive(Default, Deserialize)]
#[serde(default)]
struct StoredProperties {
    transform:    Option<Transform>,
    opacity:      Option<f64>,
    text:         Option<TextProps>,
    audio:        Option<AudioProps>,
    volume:       Option<f64>,
    text_content: Option<String>,
    text_style:   Option<TextStyle>,
}

impl From<StoredProperties> for ClipProperties {
    fn from(s: StoredProperties) -> Self {
        let audio = s.audio.or(s.volume.map(|volume| AudioProps { volume }));
        let text  = match s.text {
            Some(t) => Some(t),
            None if s.text_content.is_some() || s.text_style.is_some() => Some(TextProps {
                content: s.text_content,
                style:   s.text_style.unwrap_or_default(),
            }),
            None => None,
        };
        Self { transform: s.transform, opacity: s.opacity, text, audio }
    }
}

impl ClipProperties {
    pub fn set_facet(&mut self, facet: PropertyFacet) {
        match facet {
            PropertyFacet::Transform(t) => self.transform = Some(t),
            PropertyFacet::Text(t)      => self.text      = Some(t),
            PropertyFacet::Audio(a)     => self.audio     = Some(a),
        }
    }

    /// Present facets, in a fixed order.
    pub fn facets(&self) -> Vec<PropertyFacet> {
        let mut out = Vec::new();
        if let Some(t) = self.transform   { out.push(PropertyFacet::Transform(t)); }
        if let Some(t) = &self.text       { out.push(PropertyFacet::Text(t.clone())); }
        if let Some(a) = self.audio       { out.push(PropertyFacet::Audio(a)); }
        out
    }

    pub fn resolved_transform(&self) -> Transform {
        self.transform.unwrap_or_default()
    }

    pub fn resolved_opacity(&self) -> f64 {
        self.opacity.unwrap_or(DEFAULT_OPACITY).clamp(0.0, 1.0)
    }

    pub fn resolved_volume(&self) -> f64 {
        self.audio.map(|a| a.volume).unwrap_or(DEFAULT_VOLUME).clamp(0.0, 1.0)
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_ref().and_then(|t| t.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_properties_resolve_to_defaults() {
        let p = ClipProperties::default();
        assert_eq!(p.resolved_transform(), Transform { x: 0.0, y: 0.0, scale: 100.0, rotation: 0.0 });
        assert_eq!(p.resolved_opacity(), 1.0);
        assert_eq!(p.resolved_volume(), 1.0);
        assert!(p.text_content().is_none());
        assert!(p.facets().is_empty());
    }

    #[test]
    fn set_facet_replaces_only_that_facet() {
        let mut p = ClipProperties { opacity: Some(0.5), ..Default::default() };
        p.set_facet(PropertyFacet::Audio(AudioProps { volume: 0.25 }));
        assert_eq!(p.resolved_volume(), 0.25);
        assert_eq!(p.resolved_opacity(), 0.5);
        assert!(p.transform.is_none());
        assert_eq!(p.facets().len(), 1);
    }

    #[test]
    fn partial_transform_json_fills_defaults() {
        let p: ClipProperties = serde_json::from_str(r#"{"transform":{"x":12.0}}"#).unwrap();
        let t = p.resolved_transform();
        assert_eq!(t.x, 12.0);
        assert_eq!(t.scale, 100.0);
    }

    #[test]
    fn flat_keys_fold_into_facets() {
        let p: ClipProperties = serde_json::from_str(
            r#"{"volume":0.4,"text_content":"Title","text_style":{"font_size":48.0,"align":"left"}}"#,
        ).unwrap();
        assert_eq!(p.resolved_volume(), 0.4);
        assert_eq!(p.text_content(), Some("Title"));
        let style = &p.text.as_ref().unwrap().style;
        assert_eq!((style.font_size, style.align), (Some(48.0), TextAlign::Left));

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["audio"]["volume"], 0.4);
        assert!(json.get("volume").is_none());
    }

    #[test]
    fn nested_facet_wins_over_flat_key() {
        let p: ClipProperties = serde_json::from_str(r#"{"audio":{"volume":0.2},"volume":0.9}"#).unwrap();
        assert_eq!(p.resolved_volume(), 0.2);
    }

    #[test]
    fn out_of_range_opacity_is_clamped_when_resolved() {
        let p = ClipProperties { opacity: Some(3.0), ..Default::default() };
        assert_eq!(p.resolved_opacity(), 1.0);
    }
}
