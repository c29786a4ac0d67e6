//! # Timeline Module
//!
//! Data model for source and template compositions, plus the two layout
//! algorithms that produce new timelines from them:
//!
//! - [`scale_and_trim`] rescales a source's footage layers and removes the
//!   ranges hidden behind layers in front of them.
//! - [`sequence`] joins several synthesized timelines into one reel.

pub mod scaler;
pub mod sequencer;
pub mod types;

pub use scaler::{scale_and_trim, TimelineScaler};
pub use sequencer::sequence;
pub use types::{
    LayerKind, OverlayLayer, Source, SourceLayer, SynthesizedLayer,
    SynthesizedTimeline, Template, TemplateLayer, TextKeyframe,
};
