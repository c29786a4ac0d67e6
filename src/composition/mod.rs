//! # Composition Engine
//!
//! The batch run coordinates cadence analysis, ranking, layer scaling and
//! music selection to produce one synthesized timeline per source and
//! template, plus an optional reel.

pub mod engine;
pub mod overlays;

// Re-exports for convenience
pub use engine::{BatchReport, BatchRun, MusicUsage, VariantFailure};
pub use overlays::{plan_overlays, subtitle_keyframes};
