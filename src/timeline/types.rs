use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    cadence::MarkerSequence,
    music::MusicCandidate,
    ranking::MedalTag,
};

/// Classification of a host layer, decided once at ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Footage or nested composition; the only kind that is rescaled
    AudioVisual,

    /// Text layer
    Text,

    /// Anything else (shapes, nulls, cameras)
    Other,
}

/// A layer of a source composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLayer {
    pub name: String,
    pub kind: LayerKind,
    pub in_point: f64,
    pub out_point: f64,
    pub start_time: f64,

    /// Stroke markers placed on the layer itself
    pub markers: MarkerSequence,

    /// 1-based stacking index; 1 is frontmost
    pub z_order: usize,
}

/// A source composition: one piece of raw footage to repackage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Full host item name, e.g. `M1a::Smith`
    pub id: String,
    pub duration: f64,
    pub work_area_start: f64,
    pub work_area_duration: f64,
    pub frame_rate: f64,

    /// Stroke markers on the composition itself
    pub markers: MarkerSequence,

    /// Layers ordered front to back
    pub layers: Vec<SourceLayer>,
}

impl Source {
    pub fn work_area_end(&self) -> f64 {
        self.work_area_start + self.work_area_duration
    }
}

/// A layer of a template composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLayer {
    pub name: String,
    pub kind: LayerKind,

    /// Source text for text layers
    pub text: Option<String>,
}

/// A reusable output style applied to every source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Second field of `_template:<id>:<suffix>`
    pub id: String,

    /// Full host item name
    pub name: String,
    pub frame_rate: f64,
    pub scale_factor: f64,

    /// Time-stretch percentage of the template's first layer
    pub stretch: Option<f64>,

    /// Layers ordered front to back
    pub layers: Vec<TemplateLayer>,
    pub music_candidates: Vec<MusicCandidate>,
}

/// A rescaled and trimmed layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedLayer {
    pub name: String,
    pub kind: LayerKind,
    pub in_point: f64,
    pub out_point: f64,
    pub start_time: f64,
    pub z_order: usize,
    pub stretch: Option<f64>,
}

impl SynthesizedLayer {
    /// Trimmed away entirely by layers in front of it
    pub fn is_degenerate(&self) -> bool {
        self.in_point >= self.out_point
    }

    /// Visible length, zero for degenerate layers
    pub fn visible_duration(&self) -> f64 {
        (self.out_point - self.in_point).max(0.0)
    }
}

/// Text value set at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextKeyframe {
    pub time: f64,
    pub text: String,
}

/// A template layer copied onto a synthesized timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayLayer {
    pub name: String,
    pub kind: LayerKind,
    pub enabled: bool,

    /// Static text, or the value at time zero
    pub text: Option<String>,

    /// Time-varying text, ordered by time
    pub keyframes: Vec<TextKeyframe>,
}

/// Descriptor of a new composition for the host adapter to materialize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedTimeline {
    pub name: String,
    pub source_id: String,
    pub template_id: String,
    pub frame_rate: f64,
    pub duration: f64,
    pub work_area_start: f64,
    pub work_area_duration: f64,
    pub layers: Vec<SynthesizedLayer>,
    pub overlays: Vec<OverlayLayer>,
    pub selected_music: Option<MusicCandidate>,
    pub medals: BTreeSet<MedalTag>,

    /// Rank of the source by final stroke rate, when it was ranked
    pub placement: Option<usize>,
}

impl SynthesizedTimeline {
    pub fn work_area_end(&self) -> f64 {
        self.work_area_start + self.work_area_duration
    }
}
